// src/services/report_service.rs

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::error::AppError,
    db::{DispatchRepository, JobRepository, ProductRepository, ReportRepository},
    models::{
        dispatch::DispatchRecord,
        job::{Job, JobDetail, JobFilter, JobStatus},
        product::Product,
        report::{
            day_bounds, ActiveProduct, DateRange, DaySummary, DispatchGroup, DispatchReport, MachineJobs,
            MachineStats, OperatorContact, ProductDetails, ProductionGroup, ProductionReport, StatusCounts,
        },
    },
};

#[derive(Clone)]
pub struct ReportService {
    job_repo: JobRepository,
    dispatch_repo: DispatchRepository,
    product_repo: ProductRepository,
    report_repo: ReportRepository,
}

impl ReportService {
    pub fn new(
        job_repo: JobRepository,
        dispatch_repo: DispatchRepository,
        product_repo: ProductRepository,
        report_repo: ReportRepository,
    ) -> Self {
        Self {
            job_repo,
            dispatch_repo,
            product_repo,
            report_repo,
        }
    }

    async fn jobs_in_range<'e, E>(&self, executor: E, range: DateRange, now: DateTime<Utc>) -> Result<Vec<JobDetail>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let filter = JobFilter {
            created_from: range.start(now),
            ..JobFilter::default()
        };

        let mut tx = executor.begin().await?;
        let jobs = self.job_repo.load_details(&mut *tx, &filter).await?;
        tx.commit().await?;
        Ok(jobs)
    }

    pub async fn production_report<'e, E>(
        &self,
        executor: E,
        range: DateRange,
        now: DateTime<Utc>,
    ) -> Result<ProductionReport, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let jobs = self.jobs_in_range(executor, range, now).await?;
        Ok(build_production_report(range, &jobs))
    }

    pub async fn export_csv<'e, E>(&self, executor: E, range: DateRange, now: DateTime<Utc>) -> Result<String, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let jobs = self.jobs_in_range(executor, range, now).await?;
        tracing::debug!(rows = jobs.len(), "exporting report csv");
        Ok(jobs_to_csv(&jobs))
    }

    pub async fn dispatch_report<'e, E>(
        &self,
        executor: E,
        range: DateRange,
        now: DateTime<Utc>,
    ) -> Result<DispatchReport, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let records = self.dispatch_repo.list_records(executor, range.start(now)).await?;
        Ok(build_dispatch_report(range, &records))
    }

    pub async fn product_counts<'e, E>(&self, executor: E) -> Result<BTreeMap<String, i64>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = self.report_repo.quantity_by_product(executor).await?;
        Ok(rows.into_iter().collect())
    }

    pub async fn active_products<'e, E>(&self, executor: E) -> Result<Vec<ActiveProduct>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let filter = JobFilter {
            status: Some(JobStatus::InProgress),
            ..JobFilter::default()
        };
        let rows = self.job_repo.list_details(executor, &filter).await?;

        Ok(rows
            .into_iter()
            .map(|row| ActiveProduct {
                job_id: row.job.id,
                machine_name: row.machine_name,
                product_type: row.product_name,
                quantity: row.job.quantity,
                status: row.job.status,
            })
            .collect())
    }

    pub async fn product_details<'e, E>(&self, executor: E, product_id: i32, date: NaiveDate) -> Result<ProductDetails, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let product = self
            .product_repo
            .find_by_id(&mut *tx, product_id)
            .await?
            .ok_or(AppError::ResourceNotFound("product"))?;

        let (from, to) = day_bounds(date);
        let filter = JobFilter {
            product_id: Some(product_id),
            created_from: Some(from),
            created_to: Some(to),
            ..JobFilter::default()
        };
        let jobs = self.job_repo.load_details(&mut *tx, &filter).await?;

        tx.commit().await?;

        Ok(build_product_details(product, date, jobs))
    }

    /// Jobs do dia de um tipo de produto, agrupados por máquina.
    pub async fn workpanel<'e, E>(&self, executor: E, product_type: &str, today: NaiveDate) -> Result<Vec<MachineJobs>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let (from, to) = day_bounds(today);
        let filter = JobFilter {
            product_name: Some(product_type.to_string()),
            created_from: Some(from),
            created_to: Some(to),
            ..JobFilter::default()
        };

        let mut tx = executor.begin().await?;
        let jobs = self.job_repo.load_details(&mut *tx, &filter).await?;
        tx.commit().await?;

        Ok(group_by_machine(jobs))
    }

    pub async fn product_types<'e, E>(&self, executor: E) -> Result<Vec<String>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = self.product_repo.list(executor).await?;
        let names: BTreeSet<String> = products.into_iter().map(|p| p.name).collect();
        Ok(names.into_iter().collect())
    }
}

// =============================================================================
//  AGREGAÇÕES (puras)
// =============================================================================

fn is_dispatched(status: JobStatus) -> bool {
    matches!(status, JobStatus::Dispatched | JobStatus::Completed)
}

/// Percentual despachado sobre o fabricado, 2 casas; 0 quando nada foi fabricado.
pub fn efficiency(dispatched: i64, manufactured: i64) -> Decimal {
    if manufactured <= 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(dispatched) * Decimal::ONE_HUNDRED / Decimal::from(manufactured)).round_dp(2)
}

fn empty_group(id: i32, name: &str) -> ProductionGroup {
    ProductionGroup {
        id,
        name: name.to_string(),
        total_jobs: 0,
        total_quantity: 0,
        dispatched_quantity: 0,
        total_cost: Decimal::ZERO,
        status_counts: StatusCounts::default(),
    }
}

fn add_to_group(group: &mut ProductionGroup, job: &Job) {
    group.total_jobs += 1;
    group.total_quantity += i64::from(job.quantity);
    group.total_cost += job.total_cost;
    if is_dispatched(job.status) {
        group.dispatched_quantity += i64::from(job.quantity);
    }
    group.status_counts.record(job.status);
}

fn sorted_groups(groups: BTreeMap<i32, ProductionGroup>) -> Vec<ProductionGroup> {
    let mut groups: Vec<ProductionGroup> = groups.into_values().collect();
    groups.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    groups
}

pub fn build_production_report(filter: DateRange, jobs: &[JobDetail]) -> ProductionReport {
    let mut status_counts = StatusCounts::default();
    let mut total_manufactured = 0i64;
    let mut total_dispatched = 0i64;
    let mut total_cost = Decimal::ZERO;
    let mut dispatched_cost = Decimal::ZERO;
    let mut products: BTreeMap<i32, ProductionGroup> = BTreeMap::new();
    let mut machines: BTreeMap<i32, ProductionGroup> = BTreeMap::new();

    for detail in jobs {
        let job = &detail.job;
        status_counts.record(job.status);
        total_manufactured += i64::from(job.quantity);
        total_cost += job.total_cost;
        if is_dispatched(job.status) {
            total_dispatched += i64::from(job.quantity);
            dispatched_cost += job.total_cost;
        }

        let product = products
            .entry(detail.product.id)
            .or_insert_with(|| empty_group(detail.product.id, &detail.product.name));
        add_to_group(product, job);

        let machine = machines
            .entry(detail.machine.id)
            .or_insert_with(|| empty_group(detail.machine.id, &detail.machine.name));
        add_to_group(machine, job);
    }

    ProductionReport {
        filter,
        total_jobs: status_counts.total(),
        total_manufactured,
        total_dispatched,
        total_cost,
        dispatched_cost,
        efficiency: efficiency(total_dispatched, total_manufactured),
        status_counts,
        products: sorted_groups(products),
        machines: sorted_groups(machines),
    }
}

pub fn build_dispatch_report(date_range: DateRange, records: &[DispatchRecord]) -> DispatchReport {
    struct Acc {
        product_name: String,
        dispatch_count: u32,
        total_quantity: i64,
        total_cost: Decimal,
        machines: BTreeSet<String>,
        operators: BTreeSet<String>,
        last_dispatch_date: DateTime<Utc>,
    }

    let mut groups: BTreeMap<i32, Acc> = BTreeMap::new();
    for record in records {
        let acc = groups.entry(record.product_id).or_insert_with(|| Acc {
            product_name: record.product_name.clone(),
            dispatch_count: 0,
            total_quantity: 0,
            total_cost: Decimal::ZERO,
            machines: BTreeSet::new(),
            operators: BTreeSet::new(),
            last_dispatch_date: record.created_at,
        });

        acc.dispatch_count += 1;
        acc.total_quantity += i64::from(record.quantity);
        acc.total_cost += record.cost;
        acc.machines.insert(record.machine_name.clone());
        acc.operators
            .insert(record.operator_username.clone().unwrap_or_else(|| "Unassigned".to_string()));
        acc.last_dispatch_date = acc.last_dispatch_date.max(record.created_at);
    }

    let mut products: Vec<DispatchGroup> = groups
        .into_iter()
        .map(|(product_id, acc)| DispatchGroup {
            product_id,
            product_name: acc.product_name,
            dispatch_count: acc.dispatch_count,
            total_quantity: acc.total_quantity,
            total_cost: acc.total_cost,
            machines: acc.machines.into_iter().collect(),
            operators: acc.operators.into_iter().collect(),
            last_dispatch_date: acc.last_dispatch_date,
        })
        .collect();
    products.sort_by(|a, b| b.last_dispatch_date.cmp(&a.last_dispatch_date));

    DispatchReport {
        date_range,
        total_dispatches: products.iter().map(|p| p.dispatch_count).sum(),
        total_quantity: products.iter().map(|p| p.total_quantity).sum(),
        total_cost: products.iter().map(|p| p.total_cost).sum(),
        products,
    }
}

pub fn build_product_details(product: Product, date: NaiveDate, jobs: Vec<JobDetail>) -> ProductDetails {
    let mut summary = DaySummary::default();
    let mut machine_ids = HashSet::new();
    let mut operator_ids = HashSet::new();
    let mut operators = BTreeSet::new();
    let mut machine_stats: BTreeMap<String, MachineStats> = BTreeMap::new();

    for detail in &jobs {
        let job = &detail.job;
        summary.total_jobs += 1;
        summary.total_quantity += i64::from(job.quantity);
        summary.total_cost += job.total_cost;

        let stats = machine_stats
            .entry(detail.machine.name.clone())
            .or_insert_with(|| MachineStats {
                machine_name: detail.machine.name.clone(),
                total_jobs: 0,
                total_quantity: 0,
                total_cost: Decimal::ZERO,
                completed_jobs: 0,
                in_progress_jobs: 0,
                pending_jobs: 0,
                jobs: Vec::new(),
            });
        stats.total_jobs += 1;
        stats.total_quantity += i64::from(job.quantity);
        stats.total_cost += job.total_cost;
        stats.jobs.push(detail.clone());

        if job.status.is_complete() {
            summary.completed_jobs += 1;
            stats.completed_jobs += 1;
        } else if job.status == JobStatus::InProgress {
            summary.in_progress_jobs += 1;
            stats.in_progress_jobs += 1;
        } else {
            summary.pending_jobs += 1;
            stats.pending_jobs += 1;
        }

        machine_ids.insert(job.machine_id);
        if let Some(operator) = &detail.operator {
            operator_ids.insert(operator.id);
            operators.insert(OperatorContact {
                username: operator.username.clone(),
                phone: operator.phone.clone(),
            });
        }
    }

    summary.total_machines = machine_ids.len() as u32;
    summary.total_operators = operator_ids.len() as u32;

    ProductDetails {
        product,
        date,
        summary,
        machine_stats: machine_stats.into_values().collect(),
        operators: operators.into_iter().collect(),
        jobs,
    }
}

pub fn group_by_machine(jobs: Vec<JobDetail>) -> Vec<MachineJobs> {
    let mut groups: BTreeMap<String, Vec<JobDetail>> = BTreeMap::new();
    for job in jobs {
        groups.entry(job.machine.name.clone()).or_default().push(job);
    }

    groups
        .into_iter()
        .map(|(machine_name, jobs)| MachineJobs { machine_name, jobs })
        .collect()
}

// Aspas quando o campo tem vírgula, aspas ou quebra de linha
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub const CSV_HEADER: &str = "Job ID,Product,Machine,Operator,Quantity,Status,Total Cost,Created At";

pub fn jobs_to_csv(jobs: &[JobDetail]) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');

    for detail in jobs {
        let job = &detail.job;
        let fields = [
            job.id.to_string(),
            csv_field(&detail.product.name),
            csv_field(&detail.machine.name),
            csv_field(detail.operator_name()),
            job.quantity.to_string(),
            job.status.as_str().to_string(),
            format!("{:.2}", job.total_cost),
            job.created_at.to_rfc3339(),
        ];
        csv.push_str(&fields.join(","));
        csv.push('\n');
    }

    csv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        job::{JobStage, MachineSummary, OperatorSummary, ProductSummary},
        machine::MachineStatus,
    };
    use chrono::TimeZone;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn job(id: i32, machine: (i32, &str), product: (i32, &str), operator: Option<(i32, &str)>, quantity: i32, status: JobStatus) -> JobDetail {
        let cost = dec("25.50");
        let created_at = Utc.with_ymd_and_hms(2025, 3, 18, 9, 0, 0).unwrap();
        JobDetail {
            job: Job {
                id,
                machine_id: machine.0,
                product_id: product.0,
                operator_id: operator.map(|o| o.0),
                quantity,
                cost_per_unit: cost,
                total_cost: cost * Decimal::from(quantity),
                status,
                stage: JobStage::Initial,
                created_at,
                updated_at: created_at,
                dispatched_at: None,
            },
            machine: MachineSummary {
                id: machine.0,
                name: machine.1.to_string(),
                status: MachineStatus::On,
            },
            product: ProductSummary {
                id: product.0,
                name: product.1.to_string(),
                description: None,
                cost_per_unit: cost,
            },
            operator: operator.map(|(id, name)| OperatorSummary {
                id,
                username: Some(name.to_string()),
                phone: format!("+55{}", id),
            }),
            checklist_items: Vec::new(),
        }
    }

    #[test]
    fn empty_range_yields_zero_report() {
        let report = build_production_report(DateRange::Today, &[]);
        assert_eq!(report.total_jobs, 0);
        assert_eq!(report.total_manufactured, 0);
        assert_eq!(report.total_cost, Decimal::ZERO);
        assert_eq!(report.efficiency, Decimal::ZERO);
        assert!(report.products.is_empty());
        assert!(report.machines.is_empty());
    }

    #[test]
    fn production_report_groups_and_totals() {
        let jobs = vec![
            job(1, (1, "Cutting MC/1"), (1, "Product A"), Some((1, "Ana")), 100, JobStatus::Dispatched),
            job(2, (1, "Cutting MC/1"), (2, "Product B"), None, 50, JobStatus::InProgress),
            job(3, (2, "Lathe"), (1, "Product A"), Some((2, "Bruno")), 50, JobStatus::Pending),
        ];

        let report = build_production_report(DateRange::Week, &jobs);

        assert_eq!(report.total_jobs, 3);
        assert_eq!(report.total_manufactured, 200);
        assert_eq!(report.total_dispatched, 100);
        assert_eq!(report.total_cost, dec("5100.00"));
        assert_eq!(report.dispatched_cost, dec("2550.00"));
        assert_eq!(report.efficiency, dec("50.00"));
        assert_eq!(report.status_counts.pending, 1);
        assert_eq!(report.status_counts.in_progress, 1);
        assert_eq!(report.status_counts.dispatched, 1);

        assert_eq!(report.products.len(), 2);
        assert_eq!(report.products[0].name, "Product A");
        assert_eq!(report.products[0].total_quantity, 150);
        assert_eq!(report.products[0].dispatched_quantity, 100);
        assert_eq!(report.machines[0].name, "Cutting MC/1");
        assert_eq!(report.machines[0].total_jobs, 2);
    }

    #[test]
    fn efficiency_rounds_to_two_places() {
        assert_eq!(efficiency(1, 3), dec("33.33"));
        assert_eq!(efficiency(2, 3), dec("66.67"));
        assert_eq!(efficiency(5, 0), Decimal::ZERO);
    }

    #[test]
    fn completed_counts_as_dispatched() {
        let jobs = vec![job(1, (1, "M"), (1, "P"), None, 10, JobStatus::Completed)];
        let report = build_production_report(DateRange::All, &jobs);
        assert_eq!(report.total_dispatched, 10);
        assert_eq!(report.status_counts.completed, 1);
    }

    #[test]
    fn dispatch_report_groups_by_product() {
        let t1 = Utc.with_ymd_and_hms(2025, 3, 17, 8, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2025, 3, 18, 8, 0, 0).unwrap();
        let record = |id, product_id: i32, product: &str, machine: &str, operator: Option<&str>, at| DispatchRecord {
            id,
            job_id: id,
            quantity: 10,
            cost: dec("100.00"),
            created_at: at,
            product_id,
            product_name: product.to_string(),
            machine_name: machine.to_string(),
            operator_username: operator.map(str::to_string),
        };

        let records = vec![
            record(1, 1, "Product A", "Lathe", Some("Ana"), t1),
            record(2, 1, "Product A", "Cutting MC/1", None, t2),
            record(3, 2, "Product B", "Lathe", Some("Ana"), t1),
        ];

        let report = build_dispatch_report(DateRange::Month, &records);

        assert_eq!(report.total_dispatches, 3);
        assert_eq!(report.total_quantity, 30);
        assert_eq!(report.total_cost, dec("300.00"));
        assert_eq!(report.products[0].product_name, "Product A");
        assert_eq!(report.products[0].dispatch_count, 2);
        assert_eq!(report.products[0].machines, vec!["Cutting MC/1", "Lathe"]);
        assert_eq!(report.products[0].operators, vec!["Ana", "Unassigned"]);
        assert_eq!(report.products[0].last_dispatch_date, t2);
    }

    #[test]
    fn product_details_summarize_the_day() {
        let product = Product {
            id: 1,
            name: "Product A".to_string(),
            description: None,
            cost_per_unit: dec("25.50"),
            created_at: Utc::now(),
        };
        let jobs = vec![
            job(1, (1, "Cutting MC/1"), (1, "Product A"), Some((1, "Ana")), 100, JobStatus::Finished),
            job(2, (1, "Cutting MC/1"), (1, "Product A"), Some((1, "Ana")), 20, JobStatus::InProgress),
            job(3, (2, "Lathe"), (1, "Product A"), None, 5, JobStatus::Pending),
        ];
        let date = NaiveDate::from_ymd_opt(2025, 3, 18).unwrap();

        let details = build_product_details(product, date, jobs);

        assert_eq!(details.summary.total_jobs, 3);
        assert_eq!(details.summary.total_quantity, 125);
        assert_eq!(details.summary.completed_jobs, 1);
        assert_eq!(details.summary.in_progress_jobs, 1);
        assert_eq!(details.summary.pending_jobs, 1);
        assert_eq!(details.summary.total_machines, 2);
        assert_eq!(details.summary.total_operators, 1);
        assert_eq!(details.operators.len(), 1);
        assert_eq!(details.machine_stats[0].machine_name, "Cutting MC/1");
        assert_eq!(details.machine_stats[0].jobs.len(), 2);
    }

    #[test]
    fn workpanel_groups_by_machine_name() {
        let jobs = vec![
            job(1, (2, "Lathe"), (1, "P"), None, 1, JobStatus::Pending),
            job(2, (1, "Cutting MC/1"), (1, "P"), None, 1, JobStatus::Pending),
            job(3, (2, "Lathe"), (1, "P"), None, 1, JobStatus::Pending),
        ];

        let groups = group_by_machine(jobs);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].machine_name, "Cutting MC/1");
        assert_eq!(groups[1].jobs.len(), 2);
    }

    #[test]
    fn csv_escapes_and_formats() {
        let jobs = vec![job(7, (1, "Cutting MC/1"), (1, "Bolt, \"M8\""), None, 100, JobStatus::Finished)];
        let csv = jobs_to_csv(&jobs);
        let mut lines = csv.lines();

        assert_eq!(lines.next(), Some(CSV_HEADER));
        assert_eq!(
            lines.next(),
            Some("7,\"Bolt, \"\"M8\"\"\",Cutting MC/1,Unassigned,100,FINISHED,2550.00,2025-03-18T09:00:00+00:00")
        );
        assert_eq!(lines.next(), None);
    }
}
