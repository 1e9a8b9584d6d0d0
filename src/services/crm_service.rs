// src/services/crm_service.rs

use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        query::{PaginatedResponse, SearchParams},
    },
    db::{CrmRepository, Database},
    events::{EntityKind, EventAction, EventBus},
    models::crm::{Client, NewClient},
};

#[derive(Clone)]
pub struct CrmService {
    db: Database,
    repo: CrmRepository,
    events: EventBus,
}

impl CrmService {
    pub fn new(db: Database, repo: CrmRepository, events: EventBus) -> Self {
        Self { db, repo, events }
    }

    pub async fn create_client(&self, data: NewClient) -> Result<Client, AppError> {
        let mut tx = self.db.begin().await;

        let client = self
            .repo
            .create_client(&mut tx, data)
            .inspect_err(|e| tracing::warn!("⚠️ Cliente recusado: {}", e))?;

        tx.commit().await?;

        tracing::info!("👤 Cliente cadastrado: {} ({})", client.name, client.id);
        self.events.publish(EntityKind::Client, client.id, EventAction::Created);
        Ok(client)
    }

    pub async fn get_client(&self, id: Uuid) -> Option<Client> {
        let tables = self.db.read().await;
        self.repo.find_client(&tables, id)
    }

    pub async fn update_client(&self, client: Client) -> Result<Client, AppError> {
        let mut tx = self.db.begin().await;

        let client = self
            .repo
            .update_client(&mut tx, client)
            .inspect_err(|e| tracing::warn!("⚠️ Atualização de cliente recusada: {}", e))?;

        tx.commit().await?;

        tracing::info!("👤 Cliente atualizado: {}", client.id);
        self.events.publish(EntityKind::Client, client.id, EventAction::Updated);
        Ok(client)
    }

    pub async fn delete_client(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.db.begin().await;

        self.repo
            .soft_delete_client(&mut tx, id)
            .inspect_err(|e| tracing::warn!("⚠️ Exclusão de cliente recusada: {}", e))?;

        tx.commit().await?;

        tracing::info!("🗑️ Cliente desativado: {}", id);
        self.events.publish(EntityKind::Client, id, EventAction::Deactivated);
        Ok(())
    }

    pub async fn search_clients(&self, params: &SearchParams) -> PaginatedResponse<Client> {
        let tables = self.db.read().await;
        self.repo.search_clients(&tables, params)
    }
}
