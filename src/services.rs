pub mod auth;
pub use auth::AuthService;
pub mod inventory_service;
pub use inventory_service::InventoryService;
pub mod crm_service;
pub use crm_service::CrmService;
pub mod supplier_service;
pub use supplier_service::SupplierService;
pub mod operation_service;
pub use operation_service::OperationsService;
pub mod finance_service;
pub use finance_service::FinanceService;
pub mod report_service;
pub use report_service::ReportService;
pub mod dashboard_service;
pub use dashboard_service::DashboardService;
