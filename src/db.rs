pub mod alert_repo;
pub use alert_repo::AlertRepository;
pub mod dispatch_repo;
pub use dispatch_repo::DispatchRepository;
pub mod job_repo;
pub use job_repo::JobRepository;
pub mod machine_repo;
pub use machine_repo::MachineRepository;
pub mod operator_repo;
pub use operator_repo::OperatorRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod report_repo;
pub use report_repo::ReportRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
