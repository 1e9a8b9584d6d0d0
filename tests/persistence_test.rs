mod common;

use std::sync::Arc;

use common::*;
use rust_decimal_macros::dec;
use stockroom::{
    AppConfig, AppError, AppState,
    common::query::SearchParams,
    db::{FileStore, KeyValueStore, MemoryStore, keys, storage::SCHEMA_VERSION},
};

async fn open_app(dir: &std::path::Path) -> AppState {
    let store = FileStore::open(dir).await.expect("open file store");
    test_app_with(Arc::new(store)).await
}

// Armazenamento que recusa gravar uma chave específica.
struct FailingStore {
    inner: Arc<MemoryStore>,
    fail_on: &'static str,
}

#[async_trait::async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        if key == self.fail_on {
            return Err(AppError::StorageError(std::io::Error::other("disco cheio")));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.inner.remove(key).await
    }
}

#[tokio::test]
async fn data_survives_reopening_the_directory() {
    let dir = tempfile::tempdir().unwrap();

    let (product_id, order_id) = {
        let app = open_app(dir.path()).await;
        let category = create_category(&app, "Eletrônicos").await;
        let monitor = create_product(&app, category.id, "Monitor", dec!(100.00), 10).await;
        let client = create_client(&app, "Maria Lima", "123.456.789-00").await;
        let order = app
            .operations_service
            .create_order(new_order(client.id, vec![item(&monitor, 4)]))
            .await
            .unwrap();
        (monitor.id, order.id)
    };

    let reopened = open_app(dir.path()).await;
    assert_eq!(stock_of(&reopened, product_id).await, 6);
    let order = reopened.operations_service.get_order(order_id).await.unwrap();
    assert_eq!(order.order_number, "ORD-001");
    assert_eq!(reopened.operations_service.generate_order_number().await, "ORD-002");
}

#[tokio::test]
async fn collections_are_written_as_versioned_json() {
    let dir = tempfile::tempdir().unwrap();
    let app = open_app(dir.path()).await;
    create_category(&app, "Móveis").await;

    let raw = tokio::fs::read_to_string(dir.path().join(format!("{}.json", keys::CATEGORIES)))
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["version"], SCHEMA_VERSION);
    assert_eq!(json["data"][0]["name"], "Móveis");
    assert!(json["data"][0]["createdAt"].is_string());

    // Nenhum temporário fica para trás
    let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
    while let Some(entry) = entries.next_entry().await.unwrap() {
        assert!(!entry.file_name().to_string_lossy().ends_with(".tmp"));
    }
}

#[tokio::test]
async fn failed_operations_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let app = open_app(dir.path()).await;
    let category = create_category(&app, "Eletrônicos").await;
    let monitor = create_product(&app, category.id, "Monitor", dec!(100.00), 2).await;

    let err = app
        .operations_service
        .create_order(new_order(uuid::Uuid::new_v4(), vec![item(&monitor, 3)]))
        .await;
    assert!(err.is_err());
    assert!(!dir.path().join(format!("{}.json", keys::ORDERS)).exists());

    let reopened = open_app(dir.path()).await;
    assert_eq!(stock_of(&reopened, monitor.id).await, 2);
}

#[tokio::test]
async fn unknown_schema_version_refuses_to_start() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(
        dir.path().join(format!("{}.json", keys::PRODUCTS)),
        r#"{"version":99,"data":[]}"#,
    )
    .await
    .unwrap();

    let store = FileStore::open(dir.path()).await.unwrap();
    let result = AppState::with_storage(AppConfig::for_tests(), Arc::new(store)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn a_failed_write_undoes_the_collections_already_saved() {
    let inner = Arc::new(MemoryStore::new());
    let app = test_app_with(Arc::new(FailingStore {
        inner: inner.clone(),
        fail_on: keys::ORDERS,
    }))
    .await;
    let category = create_category(&app, "Eletrônicos").await;
    let monitor = create_product(&app, category.id, "Monitor", dec!(100.00), 10).await;

    // Produtos são gravados antes de pedidos
    let result = app
        .operations_service
        .create_order(new_order(uuid::Uuid::new_v4(), vec![item(&monitor, 4)]))
        .await;
    assert!(matches!(result, Err(AppError::StorageError(_))));
    assert_eq!(stock_of(&app, monitor.id).await, 10);

    let reopened = test_app_with(inner.clone()).await;
    assert_eq!(stock_of(&reopened, monitor.id).await, 10);
    assert_eq!(reopened.operations_service.search_orders(&SearchParams::new()).await.total, 0);
    assert_eq!(inner.get(keys::ORDERS).await.unwrap(), None);
}
