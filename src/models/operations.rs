// src/models/operations.rs

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::common::query::{FieldValue, Sortable};

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// pending -> completed | cancelled; completed -> cancelled.
    /// Manter o mesmo status é sempre permitido (edição de outros campos).
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, _) | (Completed, Completed) | (Completed, Cancelled) | (Cancelled, Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Credit,
    Debit,
    Transfer,
    Other,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Credit => "credit",
            PaymentMethod::Debit => "debit",
            PaymentMethod::Transfer => "transfer",
            PaymentMethod::Other => "other",
        }
    }
}

// --- Structs ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "A quantidade deve ser no mínimo 1."))]
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount: Decimal,
    /// unit_price * quantity - discount, calculado por quem chama.
    pub total: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "A quantidade deve ser no mínimo 1."))]
    pub quantity: i32,
    pub unit_price: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    pub total: Decimal,
}

impl NewOrderItem {
    /// Monta o item já com o total de linha calculado.
    pub fn priced(product_id: Uuid, quantity: i32, unit_price: Decimal, discount: Decimal) -> Self {
        Self {
            product_id,
            quantity,
            unit_price,
            discount,
            total: unit_price * Decimal::from(quantity) - discount,
        }
    }
}

// Edições passam pelas mesmas regras de item da criação.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub client_id: Uuid,
    pub user_id: Uuid,
    pub order_number: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    #[validate(nested)]
    pub items: Vec<OrderItem>,
    pub discount: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub const SORTABLE_FIELDS: &'static [&'static str] = &[
        "orderNumber",
        "status",
        "paymentStatus",
        "paymentMethod",
        "createdAt",
        "updatedAt",
        "total",
    ];
}

impl Sortable for Order {
    fn sort_value(&self, path: &str) -> Option<FieldValue> {
        let value = match path {
            "orderNumber" => (&self.order_number).into(),
            "status" => self.status.as_str().into(),
            "paymentStatus" => self.payment_status.as_str().into(),
            "paymentMethod" => self.payment_method.as_str().into(),
            "createdAt" => self.created_at.into(),
            "updatedAt" => self.updated_at.into(),
            "total" => self.total.into(),
            "discount" => self.discount.into(),
            _ => return None,
        };
        Some(value)
    }
}

// Dados para criação de um pedido. O total do pedido é derivado dos itens.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub client_id: Uuid,
    pub user_id: Uuid,
    /// Quando ausente, o próximo número ORD-NNN é gerado.
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[validate(nested)]
    pub items: Vec<NewOrderItem>,
    #[serde(default)]
    pub discount: Decimal,
    #[serde(default)]
    pub tax: Decimal,
    #[serde(default)]
    pub shipping: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}
