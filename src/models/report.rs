// src/models/report.rs

use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    models::job::{JobDetail, JobStatus},
    models::product::Product,
};

// --- Intervalos de data ---

/// Janela de tempo dos relatórios. Aceita os dois vocabulários usados pela UI
/// (`daily|weekly|monthly` e `today|week|month`), mais `all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    Today,
    Week,
    Month,
    All,
}

impl DateRange {
    /// Início (inclusivo) da janela; `None` = sem limite.
    pub fn start(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            DateRange::Today => Some(start_of_day(now.date_naive())),
            DateRange::Week => Some(now - Duration::days(7)),
            DateRange::Month => NaiveDate::from_ymd_opt(now.year(), now.month(), 1).map(start_of_day),
            DateRange::All => None,
        }
    }
}

impl FromStr for DateRange {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" | "daily" => Ok(DateRange::Today),
            "week" | "weekly" => Ok(DateRange::Week),
            "month" | "monthly" => Ok(DateRange::Month),
            "all" => Ok(DateRange::All),
            _ => Err(AppError::InvalidParameter("filter".to_string())),
        }
    }
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default())
}

/// [início, fim) de um dia inteiro.
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = start_of_day(date);
    (start, start + Duration::days(1))
}

// --- Contadores ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub pending: u32,
    pub in_progress: u32,
    pub finished: u32,
    pub dispatched: u32,
    pub completed: u32,
}

impl StatusCounts {
    pub fn record(&mut self, status: JobStatus) {
        match status {
            JobStatus::Pending => self.pending += 1,
            JobStatus::InProgress => self.in_progress += 1,
            JobStatus::Finished => self.finished += 1,
            JobStatus::Dispatched => self.dispatched += 1,
            JobStatus::Completed => self.completed += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.pending + self.in_progress + self.finished + self.dispatched + self.completed
    }
}

// --- Relatório de produção (GET /api/reports) ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductionGroup {
    pub id: i32,
    pub name: String,
    pub total_jobs: u32,
    pub total_quantity: i64,
    pub dispatched_quantity: i64,
    pub total_cost: Decimal,
    pub status_counts: StatusCounts,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductionReport {
    pub filter: DateRange,
    pub total_jobs: u32,
    pub total_manufactured: i64,
    pub total_dispatched: i64,
    pub total_cost: Decimal,
    pub dispatched_cost: Decimal,
    #[schema(example = "75.50")]
    pub efficiency: Decimal,
    pub status_counts: StatusCounts,
    pub products: Vec<ProductionGroup>,
    pub machines: Vec<ProductionGroup>,
}

// --- Relatório de despachos (GET /api/dispatch) ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DispatchGroup {
    pub product_id: i32,
    pub product_name: String,
    pub dispatch_count: u32,
    pub total_quantity: i64,
    pub total_cost: Decimal,
    pub machines: Vec<String>,
    pub operators: Vec<String>,
    pub last_dispatch_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    pub date_range: DateRange,
    pub total_dispatches: u32,
    pub total_quantity: i64,
    pub total_cost: Decimal,
    pub products: Vec<DispatchGroup>,
}

// --- Detalhes do produto (GET /api/products/details) ---

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub total_jobs: u32,
    pub total_quantity: i64,
    pub total_cost: Decimal,
    pub completed_jobs: u32,
    pub in_progress_jobs: u32,
    pub pending_jobs: u32,
    pub total_machines: u32,
    pub total_operators: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineStats {
    pub machine_name: String,
    pub total_jobs: u32,
    pub total_quantity: i64,
    pub total_cost: Decimal,
    pub completed_jobs: u32,
    pub in_progress_jobs: u32,
    pub pending_jobs: u32,
    pub jobs: Vec<JobDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperatorContact {
    pub username: Option<String>,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub product: Product,
    #[schema(example = "2025-01-31")]
    pub date: NaiveDate,
    pub summary: DaySummary,
    pub machine_stats: Vec<MachineStats>,
    pub operators: Vec<OperatorContact>,
    pub jobs: Vec<JobDetail>,
}

// --- Painel do gerente (GET /api/manager/workpanel) ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineJobs {
    pub machine_name: String,
    pub jobs: Vec<JobDetail>,
}

// --- Produtos ativos (GET /api/products/active) ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveProduct {
    pub job_id: i32,
    pub machine_name: String,
    pub product_type: String,
    pub quantity: i32,
    pub status: JobStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_vocabularies() {
        assert_eq!("daily".parse::<DateRange>().unwrap(), DateRange::Today);
        assert_eq!("today".parse::<DateRange>().unwrap(), DateRange::Today);
        assert_eq!("Weekly".parse::<DateRange>().unwrap(), DateRange::Week);
        assert_eq!("month".parse::<DateRange>().unwrap(), DateRange::Month);
        assert_eq!("all".parse::<DateRange>().unwrap(), DateRange::All);
        assert!("yearly".parse::<DateRange>().is_err());
    }

    #[test]
    fn range_starts() {
        let now = Utc.with_ymd_and_hms(2025, 3, 18, 15, 30, 0).unwrap();

        assert_eq!(
            DateRange::Today.start(now),
            Some(Utc.with_ymd_and_hms(2025, 3, 18, 0, 0, 0).unwrap())
        );
        assert_eq!(
            DateRange::Week.start(now),
            Some(Utc.with_ymd_and_hms(2025, 3, 11, 15, 30, 0).unwrap())
        );
        assert_eq!(
            DateRange::Month.start(now),
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(DateRange::All.start(now), None);
    }

    #[test]
    fn day_bounds_cover_one_day() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let (start, end) = day_bounds(date);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn status_counts_total() {
        let mut counts = StatusCounts::default();
        counts.record(JobStatus::Pending);
        counts.record(JobStatus::Pending);
        counts.record(JobStatus::Dispatched);
        assert_eq!(counts.pending, 2);
        assert_eq!(counts.dispatched, 1);
        assert_eq!(counts.total(), 3);
    }
}
