// src/db/storage.rs

//! Armazenamento durável chave -> valor (o antigo localStorage).
//!
//! Cada coleção fica numa chave própria, num envelope versionado
//! `{"version": 1, "data": [...]}`.

use std::collections::HashMap;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;

use crate::common::error::AppError;

pub const SCHEMA_VERSION: u32 = 1;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    async fn remove(&self, key: &str) -> Result<(), AppError>;
}

// =========================================================================
//  MEMÓRIA (testes e execuções efêmeras)
// =========================================================================

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

// =========================================================================
//  ARQUIVOS (um <chave>.json por chave)
// =========================================================================

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, AppError> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        tracing::info!("📂 Armazenamento em arquivos: {}", dir.display());
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        // Grava num temporário e renomeia: o arquivo nunca fica pela metade.
        let target = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &target).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =========================================================================
//  ENVELOPE VERSIONADO
// =========================================================================

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    data: &'a [T],
}

#[derive(Deserialize)]
struct RawEnvelope {
    version: u32,
    data: serde_json::Value,
}

/// Lê uma coleção. `None` quando a chave nunca foi gravada.
pub async fn load_collection<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<Vec<T>>, AppError> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };

    let envelope: RawEnvelope = serde_json::from_str(&raw)?;
    if envelope.version != SCHEMA_VERSION {
        return Err(AppError::UnsupportedSchemaVersion {
            key: key.to_string(),
            version: envelope.version,
        });
    }

    Ok(Some(serde_json::from_value(envelope.data)?))
}

/// Serializa a coleção no envelope, sem gravar.
pub fn encode_collection<T: Serialize>(items: &[T]) -> Result<String, AppError> {
    Ok(serde_json::to_string(&EnvelopeRef {
        version: SCHEMA_VERSION,
        data: items,
    })?)
}

pub async fn save_collection<T: Serialize + Sync>(
    store: &dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> Result<(), AppError> {
    let body = encode_collection(items)?;
    store.set(key, &body).await
}
