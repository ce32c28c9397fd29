pub mod alert;
pub mod dispatch;
pub mod job;
pub mod machine;
pub mod operator;
pub mod product;
pub mod report;
pub mod user;
