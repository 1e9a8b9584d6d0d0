// src/db/db.rs

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    common::error::AppError,
    db::storage::{KeyValueStore, encode_collection, load_collection},
    models::{
        auth::User, crm::Client, finance::Transaction as LedgerEntry, inventory::{Category, Product},
        operations::Order, supplier::Supplier,
    },
};

/// Nomes das chaves no armazenamento.
pub mod keys {
    pub const PRODUCTS: &str = "products";
    pub const CATEGORIES: &str = "categories";
    pub const CLIENTS: &str = "clients";
    pub const SUPPLIERS: &str = "suppliers";
    pub const ORDERS: &str = "orders";
    pub const TRANSACTIONS: &str = "transactions";
    pub const USERS: &str = "users";

    // Singletons da sessão
    pub const CURRENT_USER: &str = "currentUser";
    pub const TOKEN: &str = "token";

    pub const COLLECTIONS: [&str; 7] = [PRODUCTS, CATEGORIES, CLIENTS, SUPPLIERS, ORDERS, TRANSACTIONS, USERS];
}

/// Snapshot completo de todas as coleções.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tables {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub clients: Vec<Client>,
    pub suppliers: Vec<Supplier>,
    pub orders: Vec<Order>,
    pub transactions: Vec<LedgerEntry>,
    pub users: Vec<User>,
}

impl Tables {
    async fn load(store: &dyn KeyValueStore) -> Result<Self, AppError> {
        Ok(Self {
            products: load_collection(store, keys::PRODUCTS).await?.unwrap_or_default(),
            categories: load_collection(store, keys::CATEGORIES).await?.unwrap_or_default(),
            clients: load_collection(store, keys::CLIENTS).await?.unwrap_or_default(),
            suppliers: load_collection(store, keys::SUPPLIERS).await?.unwrap_or_default(),
            orders: load_collection(store, keys::ORDERS).await?.unwrap_or_default(),
            transactions: load_collection(store, keys::TRANSACTIONS).await?.unwrap_or_default(),
            users: load_collection(store, keys::USERS).await?.unwrap_or_default(),
        })
    }

    // Coleções que mudaram em relação ao snapshot anterior, já serializadas.
    fn staged_changes(&self, before: &Tables) -> Result<Vec<(&'static str, String)>, AppError> {
        let mut staged = Vec::new();
        if self.products != before.products {
            staged.push((keys::PRODUCTS, encode_collection(&self.products)?));
        }
        if self.categories != before.categories {
            staged.push((keys::CATEGORIES, encode_collection(&self.categories)?));
        }
        if self.clients != before.clients {
            staged.push((keys::CLIENTS, encode_collection(&self.clients)?));
        }
        if self.suppliers != before.suppliers {
            staged.push((keys::SUPPLIERS, encode_collection(&self.suppliers)?));
        }
        if self.orders != before.orders {
            staged.push((keys::ORDERS, encode_collection(&self.orders)?));
        }
        if self.transactions != before.transactions {
            staged.push((keys::TRANSACTIONS, encode_collection(&self.transactions)?));
        }
        if self.users != before.users {
            staged.push((keys::USERS, encode_collection(&self.users)?));
        }
        Ok(staged)
    }

    /// Grava as coleções alteradas. Se uma gravação falhar, as chaves já
    /// gravadas voltam ao conteúdo anterior: ou tudo vai para o disco, ou nada.
    async fn persist_changes(&self, before: &Tables, store: &dyn KeyValueStore) -> Result<(), AppError> {
        let staged = self.staged_changes(before)?;

        let mut written: Vec<(&'static str, Option<String>)> = Vec::with_capacity(staged.len());
        for (key, body) in &staged {
            let result = match store.get(key).await {
                Ok(previous) => store.set(key, body).await.map(|()| previous),
                Err(e) => Err(e),
            };
            match result {
                Ok(previous) => written.push((*key, previous)),
                Err(e) => {
                    restore_previous(store, &written).await;
                    return Err(e);
                }
            }
        }
        Ok(())
    }
}

async fn restore_previous(store: &dyn KeyValueStore, written: &[(&'static str, Option<String>)]) {
    for (key, previous) in written.iter().rev() {
        let restored = match previous {
            Some(raw) => store.set(key, raw).await,
            None => store.remove(key).await,
        };
        if let Err(e) = restored {
            tracing::error!("🔥 Não foi possível restaurar '{}' após falha de gravação: {}", key, e);
        }
    }
}

/// O "pool": um único lock coordena todas as coleções.
///
/// Escritas passam por [`Database::begin`]: a transação trabalha numa cópia
/// e só substitui o snapshot no `commit`. Sair do escopo sem `commit`
/// descarta tudo (rollback).
#[derive(Clone)]
pub struct Database {
    tables: Arc<RwLock<Tables>>,
    storage: Arc<dyn KeyValueStore>,
}

impl Database {
    pub async fn connect(storage: Arc<dyn KeyValueStore>) -> Result<Self, AppError> {
        let tables = Tables::load(storage.as_ref()).await?;
        tracing::info!(
            products = tables.products.len(),
            clients = tables.clients.len(),
            orders = tables.orders.len(),
            "✅ Coleções carregadas do armazenamento"
        );
        Ok(Self {
            tables: Arc::new(RwLock::new(tables)),
            storage,
        })
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    pub async fn begin(&self) -> Transaction<'_> {
        let guard = self.tables.write().await;
        let working = guard.clone();
        Transaction {
            guard,
            working,
            storage: self.storage.as_ref(),
        }
    }
}

pub struct Transaction<'a> {
    guard: RwLockWriteGuard<'a, Tables>,
    working: Tables,
    storage: &'a dyn KeyValueStore,
}

impl Transaction<'_> {
    pub async fn commit(self) -> Result<(), AppError> {
        let Transaction {
            mut guard,
            working,
            storage,
        } = self;

        // Se a gravação falhar, o snapshot em memória continua intacto.
        if let Err(e) = working.persist_changes(&guard, storage).await {
            tracing::error!("🔥 Falha ao gravar as coleções: {}", e);
            return Err(e);
        }
        *guard = working;
        Ok(())
    }
}

impl Deref for Transaction<'_> {
    type Target = Tables;

    fn deref(&self) -> &Tables {
        &self.working
    }
}

impl DerefMut for Transaction<'_> {
    fn deref_mut(&mut self) -> &mut Tables {
        &mut self.working
    }
}
