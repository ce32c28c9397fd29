pub mod alert_service;
pub mod document_service;
pub mod job_service;
pub mod machine_service;
pub mod operator_service;
pub mod product_service;
pub mod report_service;
pub mod user_service;
