// src/db/inventory_repo.rs

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        query::{PaginatedResponse, SearchParams, paginate_query},
    },
    db::Tables,
    models::inventory::{Category, NewCategory, NewProduct, Product},
};

#[derive(Clone, Default)]
pub struct InventoryRepository;

impl InventoryRepository {
    pub fn new() -> Self {
        Self
    }

    // ---
    // Funções de "Leitura"
    // ---

    pub fn find_product(&self, executor: &Tables, id: Uuid) -> Option<Product> {
        executor.products.iter().find(|p| p.id == id).cloned()
    }

    pub fn find_category(&self, executor: &Tables, id: Uuid) -> Option<Category> {
        executor.categories.iter().find(|c| c.id == id).cloned()
    }

    pub fn get_all_categories(&self, executor: &Tables) -> Vec<Category> {
        let mut categories = executor.categories.clone();
        categories.sort_by_key(|c| c.name.to_lowercase());
        categories
    }

    pub fn count_active_products_in_category(&self, executor: &Tables, category_id: Uuid) -> usize {
        executor
            .products
            .iter()
            .filter(|p| p.category_id == category_id && p.is_active)
            .count()
    }

    /// Busca de produtos: texto em nome/descrição/SKU e filtros
    /// categoryId, supplierId, priceMin, priceMax, inStock.
    pub fn search_products(&self, executor: &Tables, params: &SearchParams) -> PaginatedResponse<Product> {
        let search = params.search_text();
        let category_id = params.filter_uuid("categoryId");
        let supplier_id = params.filter_uuid("supplierId");
        let price_min = params.filter_decimal("priceMin");
        let price_max = params.filter_decimal("priceMax");
        let in_stock = params.filter_bool("inStock");

        paginate_query(
            &executor.products,
            params,
            |product| {
                if !product.is_active && !params.include_inactive {
                    return false;
                }

                let matches_search = search.as_ref().is_none_or(|s| {
                    product.name.to_lowercase().contains(s)
                        || product.description.to_lowercase().contains(s)
                        || product.sku.to_lowercase().contains(s)
                });

                matches_search
                    && category_id.matches(|id| product.category_id == id)
                    && supplier_id.matches(|id| product.supplier_id == Some(id))
                    && price_min.matches(|min| product.price >= min)
                    && price_max.matches(|max| product.price <= max)
                    && (!in_stock || product.stock_quantity > 0)
            },
            Product::SORTABLE_FIELDS,
        )
    }

    pub fn search_categories(&self, executor: &Tables, params: &SearchParams) -> PaginatedResponse<Category> {
        let search = params.search_text();
        paginate_query(
            &executor.categories,
            params,
            |category| {
                search.as_ref().is_none_or(|s| {
                    category.name.to_lowercase().contains(s) || category.description.to_lowercase().contains(s)
                })
            },
            Category::SORTABLE_FIELDS,
        )
    }

    // ---
    // Funções de "Escrita"
    // ---

    // Categoria precisa existir; fornecedor, se informado, precisa estar ativo.
    fn check_references(&self, executor: &Tables, category_id: Uuid, supplier_id: Option<Uuid>) -> Result<(), AppError> {
        if !executor.categories.iter().any(|c| c.id == category_id) {
            return Err(AppError::not_found("Categoria", category_id));
        }
        if let Some(supplier_id) = supplier_id {
            if !executor.suppliers.iter().any(|s| s.id == supplier_id && s.is_active) {
                return Err(AppError::not_found("Fornecedor", supplier_id));
            }
        }
        Ok(())
    }

    /// Cria um produto. Novos produtos entram no início da lista.
    pub fn create_product(&self, executor: &mut Tables, data: NewProduct) -> Result<Product, AppError> {
        data.validate()?;
        self.check_references(executor, data.category_id, data.supplier_id)?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: data.name,
            description: data.description,
            sku: data.sku,
            price: data.price,
            cost: data.cost,
            stock_quantity: data.stock_quantity,
            category_id: data.category_id,
            supplier_id: data.supplier_id,
            image_url: data.image_url,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        executor.products.insert(0, product.clone());
        Ok(product)
    }

    pub fn update_product(&self, executor: &mut Tables, product: Product) -> Result<Product, AppError> {
        product.validate()?;
        self.check_references(executor, product.category_id, product.supplier_id)?;

        let slot = executor
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| AppError::not_found("Produto", product.id))?;

        let created_at = slot.created_at;
        *slot = Product {
            created_at,
            updated_at: Utc::now(),
            ..product
        };
        Ok(slot.clone())
    }

    pub fn soft_delete_product(&self, executor: &mut Tables, id: Uuid) -> Result<(), AppError> {
        let product = executor
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::not_found("Produto", id))?;

        product.is_active = false;
        product.updated_at = Utc::now();
        Ok(())
    }

    /// Soma (ou subtrai) `quantity_changed` do estoque de um produto.
    /// Nunca deixa o estoque negativo.
    pub fn update_stock_level(
        &self,
        executor: &mut Tables,
        product_id: Uuid,
        quantity_changed: i32,
    ) -> Result<Product, AppError> {
        let product = executor
            .products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or_else(|| AppError::not_found("Produto", product_id))?;

        let new_quantity = product
            .stock_quantity
            .checked_add(quantity_changed)
            .ok_or(AppError::QuantityOutOfRange(product_id))?;
        if new_quantity < 0 {
            return Err(AppError::InsufficientStock {
                name: product.name.clone(),
                available: product.stock_quantity,
                requested: quantity_changed.saturating_neg(),
            });
        }

        product.stock_quantity = new_quantity;
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    /// Limpa o fornecedor de todos os produtos ativos que apontam para ele.
    /// Retorna quantos produtos foram alterados.
    pub fn clear_supplier(&self, executor: &mut Tables, supplier_id: Uuid) -> usize {
        let now = Utc::now();
        let mut count = 0;
        for product in executor
            .products
            .iter_mut()
            .filter(|p| p.is_active && p.supplier_id == Some(supplier_id))
        {
            product.supplier_id = None;
            product.updated_at = now;
            count += 1;
        }
        count
    }

    // --- Categorias ---

    pub fn create_category(&self, executor: &mut Tables, data: NewCategory) -> Result<Category, AppError> {
        data.validate()?;

        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            name: data.name,
            description: data.description,
            created_at: now,
            updated_at: now,
        };

        executor.categories.push(category.clone());
        Ok(category)
    }

    pub fn update_category(&self, executor: &mut Tables, category: Category) -> Result<Category, AppError> {
        NewCategory {
            name: category.name.clone(),
            description: category.description.clone(),
        }
        .validate()?;

        let slot = executor
            .categories
            .iter_mut()
            .find(|c| c.id == category.id)
            .ok_or_else(|| AppError::not_found("Categoria", category.id))?;

        let created_at = slot.created_at;
        *slot = Category {
            created_at,
            updated_at: Utc::now(),
            ..category
        };
        Ok(slot.clone())
    }

    /// Remove a categoria. Recusa enquanto houver produto ativo usando.
    pub fn delete_category(&self, executor: &mut Tables, id: Uuid) -> Result<(), AppError> {
        if !executor.categories.iter().any(|c| c.id == id) {
            return Err(AppError::not_found("Categoria", id));
        }

        let in_use = self.count_active_products_in_category(executor, id);
        if in_use > 0 {
            return Err(AppError::CategoryInUse(in_use));
        }

        executor.categories.retain(|c| c.id != id);
        Ok(())
    }
}
