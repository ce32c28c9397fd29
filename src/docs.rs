// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "TrackOpz API", description = "Rastreamento de jobs de produção, checklist e despacho"),
    paths(
        // --- Jobs ---
        handlers::jobs::create_job,
        handlers::jobs::list_jobs,
        handlers::jobs::update_job,
        handlers::jobs::start_job,
        handlers::jobs::form_data,
        handlers::jobs::pending_jobs,

        // --- Machines ---
        handlers::machines::list_machines,
        handlers::machines::create_machine,
        handlers::machines::update_machine,

        // --- Products ---
        handlers::products::list_products,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::product_counts,
        handlers::products::active_products,
        handlers::products::product_details,

        // --- Operators ---
        handlers::operators::list_operators,
        handlers::operators::create_operator,
        handlers::operators::update_operator,

        // --- Alerts ---
        handlers::alerts::list_alerts,
        handlers::alerts::create_alert,

        // --- Reports ---
        handlers::reports::production_report,
        handlers::reports::export_report,

        // --- Dispatch ---
        handlers::dispatch::dispatch_report,
        handlers::dispatch::dispatch_slip,

        // --- Manager ---
        handlers::workpanel::workpanel,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::register_user,
    ),
    components(
        schemas(
            // --- Jobs ---
            models::job::JobStatus,
            models::job::JobStage,
            models::job::JobAction,
            models::job::Job,
            models::job::ChecklistItem,
            models::job::ChecklistUpdate,
            models::job::MachineSummary,
            models::job::ProductSummary,
            models::job::OperatorSummary,
            models::job::JobDetail,
            models::job::JobFormData,

            // --- Cadastros ---
            models::machine::MachineStatus,
            models::machine::Machine,
            models::machine::MachineWithJobs,
            models::product::Product,
            models::operator::Operator,
            models::operator::OperatorWithJobs,
            models::user::User,

            // --- Alerts / Dispatch ---
            models::alert::AlertType,
            models::alert::Alert,
            models::alert::AlertWithSender,
            models::dispatch::Dispatch,

            // --- Reports ---
            models::report::DateRange,
            models::report::StatusCounts,
            models::report::ProductionGroup,
            models::report::ProductionReport,
            models::report::DispatchGroup,
            models::report::DispatchReport,
            models::report::DaySummary,
            models::report::MachineStats,
            models::report::OperatorContact,
            models::report::ProductDetails,
            models::report::MachineJobs,
            models::report::ActiveProduct,

            // --- Payloads ---
            handlers::jobs::CreateJobPayload,
            handlers::jobs::UpdateJobPayload,
            handlers::machines::CreateMachinePayload,
            handlers::machines::UpdateMachinePayload,
            handlers::products::CreateProductPayload,
            handlers::products::UpdateProductPayload,
            handlers::operators::CreateOperatorPayload,
            handlers::operators::UpdateOperatorPayload,
            handlers::alerts::CreateAlertPayload,
            handlers::users::RegisterUserPayload,
        )
    ),
    tags(
        (name = "Jobs", description = "Criação, checklist e despacho de jobs"),
        (name = "Machines", description = "Cadastro e status das máquinas"),
        (name = "Products", description = "Cadastro de produtos e indicadores"),
        (name = "Operators", description = "Cadastro de operadores"),
        (name = "Alerts", description = "Alertas do sistema, dos gerentes e dos jobs"),
        (name = "Reports", description = "Relatórios de produção"),
        (name = "Dispatch", description = "Despachos e romaneios"),
        (name = "Manager", description = "Painel do gerente"),
        (name = "Users", description = "Usuários gerentes")
    )
)]
pub struct ApiDoc;
