// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use crate::{
    db::{
        CrmRepository, DashboardRepository, Database, FileStore, FinanceRepository, InventoryRepository, KeyValueStore,
        MemoryStore, OperationsRepository, ReportRepository, SupplierRepository, UserRepository,
    },
    events::EventBus,
    seed,
    services::{
        auth::{AuthService, AuthSettings},
        crm_service::CrmService,
        dashboard_service::DashboardService,
        finance_service::FinanceService,
        inventory_service::InventoryService,
        operation_service::OperationsService,
        report_service::ReportService,
        supplier_service::SupplierService,
    },
};

const DEFAULT_LOGIN_LATENCY_MS: u64 = 500;
const DEFAULT_SESSION_TTL_HOURS: i64 = 168;

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Diretório do armazenamento em arquivos. `None` = só memória.
    pub data_dir: Option<PathBuf>,
    pub jwt_secret: String,
    pub login_latency: Duration,
    pub bcrypt_cost: u32,
    pub session_ttl_hours: i64,
    pub seed_demo_data: bool,
}

fn parse_var<T: std::str::FromStr>(name: &str) -> anyhow::Result<Option<T>> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{} tem um valor inválido: {}", name, value)),
        Err(_) => Ok(None),
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET deve ser definido"))?;

        Ok(Self {
            data_dir: env::var("STOCKROOM_DATA_DIR").ok().filter(|d| !d.trim().is_empty()).map(PathBuf::from),
            jwt_secret,
            login_latency: Duration::from_millis(
                parse_var("LOGIN_LATENCY_MS")?.unwrap_or(DEFAULT_LOGIN_LATENCY_MS),
            ),
            bcrypt_cost: parse_var("BCRYPT_COST")?.unwrap_or(bcrypt::DEFAULT_COST),
            session_ttl_hours: parse_var("SESSION_TTL_HOURS")?.unwrap_or(DEFAULT_SESSION_TTL_HOURS),
            seed_demo_data: parse_var("SEED_DEMO_DATA")?.unwrap_or(true),
        })
    }

    /// Configuração para testes: memória, bcrypt barato e sem latência.
    pub fn for_tests() -> Self {
        Self {
            data_dir: None,
            jwt_secret: "segredo-de-teste".to_string(),
            login_latency: Duration::ZERO,
            bcrypt_cost: 4,
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            seed_demo_data: false,
        }
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub events: EventBus,
    pub auth_service: AuthService,
    pub inventory_service: InventoryService,
    pub crm_service: CrmService,
    pub supplier_service: SupplierService,
    pub operations_service: OperationsService,
    pub finance_service: FinanceService,
    pub report_service: ReportService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let storage: Arc<dyn KeyValueStore> = match &config.data_dir {
            Some(dir) => Arc::new(FileStore::open(dir).await?),
            None => {
                tracing::info!("🧠 Armazenamento em memória (STOCKROOM_DATA_DIR não definido)");
                Arc::new(MemoryStore::new())
            }
        };
        Self::with_storage(config, storage).await
    }

    /// Monta o estado sobre um armazenamento já aberto.
    pub async fn with_storage(config: AppConfig, storage: Arc<dyn KeyValueStore>) -> anyhow::Result<Self> {
        let db = Database::connect(storage).await?;
        let events = EventBus::new();

        // --- Monta o gráfico de dependências ---
        let inventory_repo = InventoryRepository::new();
        let operations_repo = OperationsRepository::new();
        let report_repo = ReportRepository::new();

        let auth_service = AuthService::new(
            db.clone(),
            UserRepository::new(),
            AuthSettings {
                jwt_secret: config.jwt_secret.clone(),
                bcrypt_cost: config.bcrypt_cost,
                login_latency: config.login_latency,
                session_ttl: chrono::Duration::hours(config.session_ttl_hours),
            },
            events.clone(),
        );
        let inventory_service = InventoryService::new(db.clone(), inventory_repo.clone(), events.clone());
        let crm_service = CrmService::new(db.clone(), CrmRepository::new(), events.clone());
        let supplier_service =
            SupplierService::new(db.clone(), SupplierRepository::new(), inventory_repo.clone(), events.clone());
        let operations_service =
            OperationsService::new(db.clone(), operations_repo.clone(), inventory_repo, events.clone());
        let finance_service =
            FinanceService::new(db.clone(), FinanceRepository::new(), report_repo.clone(), events.clone());
        let report_service = ReportService::new(db.clone(), report_repo);
        let dashboard_service = DashboardService::new(db.clone(), DashboardRepository::new(), operations_repo);

        seed::seed_users(&db, &auth_service).await?;
        if config.seed_demo_data {
            seed::seed_demo_data(&db).await?;
        }

        auth_service.bootstrap().await;

        Ok(Self {
            db,
            events,
            auth_service,
            inventory_service,
            crm_service,
            supplier_service,
            operations_service,
            finance_service,
            report_service,
            dashboard_service,
        })
    }
}
