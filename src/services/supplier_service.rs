// src/services/supplier_service.rs

use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        query::{PaginatedResponse, SearchParams},
    },
    db::{Database, InventoryRepository, SupplierRepository},
    events::{EntityKind, EventAction, EventBus},
    models::supplier::{NewSupplier, Supplier},
};

#[derive(Clone)]
pub struct SupplierService {
    db: Database,
    supplier_repo: SupplierRepository,
    // Desativar um fornecedor mexe nos produtos dele
    inventory_repo: InventoryRepository,
    events: EventBus,
}

impl SupplierService {
    pub fn new(
        db: Database,
        supplier_repo: SupplierRepository,
        inventory_repo: InventoryRepository,
        events: EventBus,
    ) -> Self {
        Self {
            db,
            supplier_repo,
            inventory_repo,
            events,
        }
    }

    pub async fn create_supplier(&self, data: NewSupplier) -> Result<Supplier, AppError> {
        let mut tx = self.db.begin().await;

        let supplier = self
            .supplier_repo
            .create_supplier(&mut tx, data)
            .inspect_err(|e| tracing::warn!("⚠️ Fornecedor recusado: {}", e))?;

        tx.commit().await?;

        tracing::info!("🚚 Fornecedor cadastrado: {} ({})", supplier.name, supplier.id);
        self.events.publish(EntityKind::Supplier, supplier.id, EventAction::Created);
        Ok(supplier)
    }

    pub async fn get_supplier(&self, id: Uuid) -> Option<Supplier> {
        let tables = self.db.read().await;
        self.supplier_repo.find_supplier(&tables, id)
    }

    pub async fn update_supplier(&self, supplier: Supplier) -> Result<Supplier, AppError> {
        let mut tx = self.db.begin().await;

        let supplier = self
            .supplier_repo
            .update_supplier(&mut tx, supplier)
            .inspect_err(|e| tracing::warn!("⚠️ Atualização de fornecedor recusada: {}", e))?;

        tx.commit().await?;

        tracing::info!("🚚 Fornecedor atualizado: {}", supplier.id);
        self.events.publish(EntityKind::Supplier, supplier.id, EventAction::Updated);
        Ok(supplier)
    }

    /// Desativa o fornecedor e, na mesma transação, desvincula os produtos.
    pub async fn delete_supplier(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.db.begin().await;

        self.supplier_repo
            .soft_delete_supplier(&mut tx, id)
            .inspect_err(|e| tracing::warn!("⚠️ Exclusão de fornecedor recusada: {}", e))?;

        let unlinked = self.inventory_repo.clear_supplier(&mut tx, id);

        tx.commit().await?;

        tracing::info!("🗑️ Fornecedor desativado: {} ({} produtos desvinculados)", id, unlinked);
        self.events.publish(EntityKind::Supplier, id, EventAction::Deactivated);
        Ok(())
    }

    pub async fn search_suppliers(&self, params: &SearchParams) -> PaginatedResponse<Supplier> {
        let tables = self.db.read().await;
        self.supplier_repo.search_suppliers(&tables, params)
    }
}
