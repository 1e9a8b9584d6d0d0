pub mod auth;
pub mod crm;
pub mod dashboard;
pub mod finance;
pub mod inventory;
pub mod operations;
pub mod report;
pub mod supplier;
