#[allow(clippy::module_inception)]
pub mod db;
pub use db::{Database, Tables, Transaction, keys};
pub mod storage;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
pub mod crm_repo;
pub use crm_repo::CrmRepository;
pub mod supplier_repo;
pub use supplier_repo::SupplierRepository;
pub mod operations_repo;
pub use operations_repo::OperationsRepository;
pub mod finance_repo;
pub use finance_repo::FinanceRepository;
pub mod report_repo;
pub use report_repo::ReportRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
