// src/services/inventory_service.rs

use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        query::{PaginatedResponse, SearchParams},
    },
    db::{Database, InventoryRepository},
    events::{EntityKind, EventAction, EventBus},
    models::inventory::{Category, NewCategory, NewProduct, Product},
};

#[derive(Clone)]
pub struct InventoryService {
    db: Database,
    inventory_repo: InventoryRepository,
    events: EventBus,
}

// Tipo MIME pela extensão do arquivo
fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

impl InventoryService {
    pub fn new(db: Database, inventory_repo: InventoryRepository, events: EventBus) -> Self {
        Self {
            db,
            inventory_repo,
            events,
        }
    }

    // =========================================================================
    //  PRODUTOS
    // =========================================================================

    pub async fn create_product(&self, data: NewProduct) -> Result<Product, AppError> {
        let mut tx = self.db.begin().await;

        let product = self
            .inventory_repo
            .create_product(&mut tx, data)
            .inspect_err(|e| tracing::warn!("⚠️ Produto recusado: {}", e))?;

        tx.commit().await?;

        tracing::info!("📦 Produto criado: {} ({})", product.name, product.id);
        self.events.publish(EntityKind::Product, product.id, EventAction::Created);
        Ok(product)
    }

    pub async fn get_product(&self, id: Uuid) -> Option<Product> {
        let tables = self.db.read().await;
        self.inventory_repo.find_product(&tables, id)
    }

    pub async fn update_product(&self, product: Product) -> Result<Product, AppError> {
        let mut tx = self.db.begin().await;

        let product = self
            .inventory_repo
            .update_product(&mut tx, product)
            .inspect_err(|e| tracing::warn!("⚠️ Atualização de produto recusada: {}", e))?;

        tx.commit().await?;

        tracing::info!("📦 Produto atualizado: {}", product.id);
        self.events.publish(EntityKind::Product, product.id, EventAction::Updated);
        Ok(product)
    }

    /// Exclusão lógica: o produto some das buscas, mas continua nos pedidos.
    pub async fn delete_product(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.db.begin().await;

        self.inventory_repo
            .soft_delete_product(&mut tx, id)
            .inspect_err(|e| tracing::warn!("⚠️ Exclusão de produto recusada: {}", e))?;

        tx.commit().await?;

        tracing::info!("🗑️ Produto desativado: {}", id);
        self.events.publish(EntityKind::Product, id, EventAction::Deactivated);
        Ok(())
    }

    pub async fn search_products(&self, params: &SearchParams) -> PaginatedResponse<Product> {
        let tables = self.db.read().await;
        self.inventory_repo.search_products(&tables, params)
    }

    /// Lê a imagem do disco e devolve um data URL (`data:<mime>;base64,...`).
    pub async fn upload_product_image(&self, path: impl AsRef<Path>) -> Result<String, AppError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .inspect_err(|e| tracing::error!("🔥 Falha ao ler a imagem {}: {}", path.display(), e))?;

        Ok(format!("data:{};base64,{}", mime_for(path), STANDARD.encode(bytes)))
    }

    // =========================================================================
    //  CATEGORIAS
    // =========================================================================

    pub async fn create_category(&self, data: NewCategory) -> Result<Category, AppError> {
        let mut tx = self.db.begin().await;

        let category = self
            .inventory_repo
            .create_category(&mut tx, data)
            .inspect_err(|e| tracing::warn!("⚠️ Categoria recusada: {}", e))?;

        tx.commit().await?;

        tracing::info!("🏷️ Categoria criada: {}", category.name);
        self.events.publish(EntityKind::Category, category.id, EventAction::Created);
        Ok(category)
    }

    pub async fn get_category(&self, id: Uuid) -> Option<Category> {
        let tables = self.db.read().await;
        self.inventory_repo.find_category(&tables, id)
    }

    pub async fn get_all_categories(&self) -> Vec<Category> {
        let tables = self.db.read().await;
        self.inventory_repo.get_all_categories(&tables)
    }

    pub async fn update_category(&self, category: Category) -> Result<Category, AppError> {
        let mut tx = self.db.begin().await;

        let category = self
            .inventory_repo
            .update_category(&mut tx, category)
            .inspect_err(|e| tracing::warn!("⚠️ Atualização de categoria recusada: {}", e))?;

        tx.commit().await?;

        tracing::info!("🏷️ Categoria atualizada: {}", category.id);
        self.events.publish(EntityKind::Category, category.id, EventAction::Updated);
        Ok(category)
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.db.begin().await;

        self.inventory_repo
            .delete_category(&mut tx, id)
            .inspect_err(|e| tracing::warn!("⚠️ Exclusão de categoria recusada: {}", e))?;

        tx.commit().await?;

        tracing::info!("🗑️ Categoria removida: {}", id);
        self.events.publish(EntityKind::Category, id, EventAction::Deleted);
        Ok(())
    }

    pub async fn search_categories(&self, params: &SearchParams) -> PaginatedResponse<Category> {
        let tables = self.db.read().await;
        self.inventory_repo.search_categories(&tables, params)
    }

    pub async fn count_products_in_category(&self, category_id: Uuid) -> usize {
        let tables = self.db.read().await;
        self.inventory_repo.count_active_products_in_category(&tables, category_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_is_picked_from_the_extension() {
        assert_eq!(mime_for(Path::new("foto.PNG")), "image/png");
        assert_eq!(mime_for(Path::new("a/b/c.jpeg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("sem_extensao")), "application/octet-stream");
    }
}
