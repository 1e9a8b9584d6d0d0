// src/db/operations_repo.rs

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        query::{PaginatedResponse, SearchParams, paginate_query},
    },
    db::Tables,
    models::operations::{NewOrderItem, Order, OrderItem},
};

pub const ORDER_NUMBER_PREFIX: &str = "ORD";

/// Próximo número de pedido: maior sufixo (comparação de texto) + 1,
/// com três dígitos. Lista vazia começa em ORD-001.
pub fn generate_order_number(existing: &[Order]) -> String {
    let last = existing
        .iter()
        .map(|o| o.order_number.as_str())
        .filter(|n| {
            n.strip_prefix(ORDER_NUMBER_PREFIX)
                .and_then(|rest| rest.strip_prefix('-'))
                .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
        })
        .max();

    let next = last
        .and_then(|n| n.rsplit_once('-'))
        .and_then(|(_, digits)| digits.parse::<u64>().ok())
        .map_or(1, |n| n + 1);

    format!("{ORDER_NUMBER_PREFIX}-{next:03}")
}

/// soma(itens) - desconto + imposto + frete.
pub fn calculate_order_total(items: &[NewOrderItem], discount: Decimal, tax: Decimal, shipping: Decimal) -> Decimal {
    let subtotal: Decimal = items.iter().map(|i| i.total).sum();
    subtotal - discount + tax + shipping
}

#[derive(Clone, Default)]
pub struct OperationsRepository;

impl OperationsRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn find_order(&self, executor: &Tables, id: Uuid) -> Option<Order> {
        executor.orders.iter().find(|o| o.id == id).cloned()
    }

    pub fn next_order_number(&self, executor: &Tables) -> String {
        generate_order_number(&executor.orders)
    }

    /// Texto no número do pedido ou no nome do cliente. Filtros: status,
    /// paymentStatus, paymentMethod, clientId, startDate, endDate.
    pub fn search_orders(&self, executor: &Tables, params: &SearchParams) -> PaginatedResponse<Order> {
        let search = params.search_text();
        let status = params.filter_str("status");
        let payment_status = params.filter_str("paymentStatus");
        let payment_method = params.filter_str("paymentMethod");
        let client_id = params.filter_uuid("clientId");
        let start_date = params.filter_datetime("startDate");
        let end_date = params.filter_datetime("endDate");

        let client_name = |id: Uuid| {
            executor
                .clients
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.name.to_lowercase())
                .unwrap_or_default()
        };

        paginate_query(
            &executor.orders,
            params,
            |order| {
                let matches_search = search.as_ref().is_none_or(|s| {
                    order.order_number.to_lowercase().contains(s) || client_name(order.client_id).contains(s)
                });

                matches_search
                    && status.is_none_or(|v| order.status.as_str() == v)
                    && payment_status.is_none_or(|v| order.payment_status.as_str() == v)
                    && payment_method.is_none_or(|v| order.payment_method.as_str() == v)
                    && client_id.matches(|id| order.client_id == id)
                    && start_date.matches(|start| order.created_at >= start)
                    && end_date.matches(|end| order.created_at <= end)
            },
            Order::SORTABLE_FIELDS,
        )
    }

    // ---
    // Escrita (o controle de estoque fica no OperationService)
    // ---

    pub fn insert_order(&self, executor: &mut Tables, order: Order) -> Result<Order, AppError> {
        if executor.orders.iter().any(|o| o.order_number == order.order_number) {
            return Err(AppError::OrderNumberAlreadyExists(order.order_number));
        }
        executor.orders.push(order.clone());
        Ok(order)
    }

    pub fn replace_order(&self, executor: &mut Tables, order: Order) -> Result<Order, AppError> {
        if executor
            .orders
            .iter()
            .any(|o| o.id != order.id && o.order_number == order.order_number)
        {
            return Err(AppError::OrderNumberAlreadyExists(order.order_number));
        }

        let slot = executor
            .orders
            .iter_mut()
            .find(|o| o.id == order.id)
            .ok_or_else(|| AppError::not_found("Pedido", order.id))?;

        let created_at = slot.created_at;
        *slot = Order {
            created_at,
            updated_at: Utc::now(),
            ..order
        };
        Ok(slot.clone())
    }

    pub fn remove_order(&self, executor: &mut Tables, id: Uuid) -> Result<Order, AppError> {
        let index = executor
            .orders
            .iter()
            .position(|o| o.id == id)
            .ok_or_else(|| AppError::not_found("Pedido", id))?;
        Ok(executor.orders.remove(index))
    }
}

impl From<NewOrderItem> for OrderItem {
    fn from(item: NewOrderItem) -> Self {
        OrderItem {
            id: Uuid::new_v4(),
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            discount: item.discount,
            total: item.total,
        }
    }
}
