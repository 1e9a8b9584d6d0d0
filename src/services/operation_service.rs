// src/services/operation_service.rs

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        query::{PaginatedResponse, SearchParams},
    },
    db::{Database, InventoryRepository, OperationsRepository, Tables, operations_repo::calculate_order_total},
    events::{EntityKind, EventAction, EventBus},
    models::operations::{NewOrder, Order, OrderItem, OrderStatus},
};

#[derive(Clone)]
pub struct OperationsService {
    db: Database,
    repo: OperationsRepository,
    inventory_repo: InventoryRepository,
    events: EventBus,
}

// Soma as quantidades por produto, mantendo a ordem de aparição.
// Soma que estoura i32 é recusada.
fn requested_quantities<'a>(items: impl Iterator<Item = (&'a Uuid, i32)>) -> Result<Vec<(Uuid, i32)>, AppError> {
    let mut requested: Vec<(Uuid, i32)> = Vec::new();
    for (product_id, quantity) in items {
        match requested.iter_mut().find(|(id, _)| id == product_id) {
            Some((_, total)) => {
                *total = total
                    .checked_add(quantity)
                    .ok_or(AppError::QuantityOutOfRange(*product_id))?;
            }
            None => requested.push((*product_id, quantity)),
        }
    }
    Ok(requested)
}

impl OperationsService {
    pub fn new(
        db: Database,
        repo: OperationsRepository,
        inventory_repo: InventoryRepository,
        events: EventBus,
    ) -> Self {
        Self {
            db,
            repo,
            inventory_repo,
            events,
        }
    }

    // Devolve ao estoque os itens de um pedido. Produto que não existe mais é ignorado.
    fn restore_stock(&self, executor: &mut Tables, items: &[OrderItem]) -> Result<Vec<Uuid>, AppError> {
        let mut touched = Vec::new();
        for (product_id, quantity) in requested_quantities(items.iter().map(|i| (&i.product_id, i.quantity)))? {
            if self.inventory_repo.find_product(executor, product_id).is_none() {
                tracing::warn!("⚠️ Produto {} não existe mais; estoque não devolvido", product_id);
                continue;
            }
            self.inventory_repo.update_stock_level(executor, product_id, quantity)?;
            touched.push(product_id);
        }
        Ok(touched)
    }

    fn publish_stock_changes(&self, product_ids: &[Uuid]) {
        for id in product_ids {
            self.events.publish(EntityKind::Product, *id, EventAction::StockAdjusted);
        }
    }

    // =========================================================================
    //  PEDIDOS
    // =========================================================================

    /// Cria o pedido e baixa o estoque.
    ///
    /// Primeiro valida TODOS os itens (existência e saldo), só depois aplica
    /// as baixas. Qualquer falha descarta a transação inteira.
    pub async fn create_order(&self, data: NewOrder) -> Result<Order, AppError> {
        if data.items.is_empty() {
            tracing::warn!("⚠️ Pedido sem itens recusado");
            return Err(AppError::EmptyOrder);
        }
        data.validate()?;
        if data.status == OrderStatus::Cancelled {
            return Err(AppError::InvalidStatusTransition {
                from: "new".to_string(),
                to: OrderStatus::Cancelled.to_string(),
            });
        }

        let mut tx = self.db.begin().await;

        // 1. Verificação
        let requested = requested_quantities(data.items.iter().map(|i| (&i.product_id, i.quantity)))
            .inspect_err(|e| tracing::warn!("⚠️ Pedido recusado: {}", e))?;
        for (product_id, quantity) in &requested {
            let product = self
                .inventory_repo
                .find_product(&tx, *product_id)
                .ok_or_else(|| AppError::not_found("Produto", *product_id))
                .inspect_err(|e| tracing::warn!("⚠️ Pedido recusado: {}", e))?;

            if product.stock_quantity < *quantity {
                tracing::warn!("⚠️ Pedido recusado: estoque insuficiente para {}", product.name);
                return Err(AppError::InsufficientStock {
                    name: product.name,
                    available: product.stock_quantity,
                    requested: *quantity,
                });
            }
        }

        // 2. Baixa
        for (product_id, quantity) in &requested {
            self.inventory_repo.update_stock_level(&mut tx, *product_id, -quantity)?;
        }

        let order_number = match data.order_number {
            Some(number) => number,
            None => self.repo.next_order_number(&tx),
        };
        let total = calculate_order_total(&data.items, data.discount, data.tax, data.shipping);

        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            client_id: data.client_id,
            user_id: data.user_id,
            order_number,
            status: data.status,
            payment_status: data.payment_status,
            payment_method: data.payment_method,
            items: data.items.into_iter().map(OrderItem::from).collect(),
            discount: data.discount,
            tax: data.tax,
            shipping: data.shipping,
            total,
            notes: data.notes,
            created_at: now,
            updated_at: now,
        };

        let order = self
            .repo
            .insert_order(&mut tx, order)
            .inspect_err(|e| tracing::warn!("⚠️ Pedido recusado: {}", e))?;

        tx.commit().await?;

        tracing::info!("🧾 Pedido {} criado ({} itens, total {})", order.order_number, order.items.len(), order.total);
        self.events.publish(EntityKind::Order, order.id, EventAction::Created);
        let touched: Vec<Uuid> = requested.iter().map(|(id, _)| *id).collect();
        self.publish_stock_changes(&touched);
        Ok(order)
    }

    pub async fn get_order(&self, id: Uuid) -> Option<Order> {
        let tables = self.db.read().await;
        self.repo.find_order(&tables, id)
    }

    /// Atualiza o pedido. Só a passagem para `cancelled` mexe no estoque
    /// (devolve os itens gravados); outras edições não.
    pub async fn update_order(&self, order: Order) -> Result<Order, AppError> {
        if order.items.is_empty() {
            return Err(AppError::EmptyOrder);
        }
        order
            .validate()
            .inspect_err(|e| tracing::warn!("⚠️ Atualização de pedido recusada: {}", e))?;

        let mut tx = self.db.begin().await;

        let existing = self
            .repo
            .find_order(&tx, order.id)
            .ok_or_else(|| AppError::not_found("Pedido", order.id))
            .inspect_err(|e| tracing::warn!("⚠️ Atualização de pedido recusada: {}", e))?;

        if !existing.status.can_transition_to(order.status) {
            tracing::warn!("⚠️ Transição inválida: {} -> {}", existing.status, order.status);
            return Err(AppError::InvalidStatusTransition {
                from: existing.status.to_string(),
                to: order.status.to_string(),
            });
        }

        let touched = if existing.status != OrderStatus::Cancelled && order.status == OrderStatus::Cancelled {
            self.restore_stock(&mut tx, &existing.items)?
        } else {
            Vec::new()
        };

        let order = self
            .repo
            .replace_order(&mut tx, order)
            .inspect_err(|e| tracing::warn!("⚠️ Atualização de pedido recusada: {}", e))?;

        tx.commit().await?;

        tracing::info!("🧾 Pedido {} atualizado (status {})", order.order_number, order.status);
        self.events.publish(EntityKind::Order, order.id, EventAction::Updated);
        self.publish_stock_changes(&touched);
        Ok(order)
    }

    /// Remove o pedido. Se ainda não estava cancelado, devolve o estoque antes.
    pub async fn delete_order(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.db.begin().await;

        let order = self
            .repo
            .remove_order(&mut tx, id)
            .inspect_err(|e| tracing::warn!("⚠️ Exclusão de pedido recusada: {}", e))?;

        let touched = if order.status != OrderStatus::Cancelled {
            self.restore_stock(&mut tx, &order.items)?
        } else {
            Vec::new()
        };

        tx.commit().await?;

        tracing::info!("🗑️ Pedido {} removido", order.order_number);
        self.events.publish(EntityKind::Order, id, EventAction::Deleted);
        self.publish_stock_changes(&touched);
        Ok(())
    }

    pub async fn search_orders(&self, params: &SearchParams) -> PaginatedResponse<Order> {
        let tables = self.db.read().await;
        self.repo.search_orders(&tables, params)
    }

    /// Número que o próximo pedido receberá se nenhum for informado.
    pub async fn generate_order_number(&self) -> String {
        let tables = self.db.read().await;
        self.repo.next_order_number(&tables)
    }
}
