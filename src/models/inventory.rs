// src/models/inventory.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::common::query::{FieldValue, Sortable};
use crate::common::validation::{validate_non_negative, validate_price};

// --- 1. Categorias ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub const SORTABLE_FIELDS: &'static [&'static str] = &["name", "createdAt", "updatedAt"];
}

impl Sortable for Category {
    fn sort_value(&self, path: &str) -> Option<FieldValue> {
        let value = match path {
            "name" => (&self.name).into(),
            "description" => (&self.description).into(),
            "createdAt" => self.created_at.into(),
            "updatedAt" => self.updated_at.into(),
            _ => return None,
        };
        Some(value)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCategory {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

// --- 2. Produtos ---
// O mesmo conjunto de regras vale na criação e na edição.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub description: String,
    pub sku: String,
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[validate(custom(function = "validate_non_negative"))]
    pub cost: Decimal,
    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    pub stock_quantity: i32,
    pub category_id: Uuid,
    /// Limpo quando o fornecedor é desativado.
    pub supplier_id: Option<Uuid>,
    pub image_url: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub const SORTABLE_FIELDS: &'static [&'static str] = &[
        "name",
        "price",
        "stockQuantity",
        "createdAt",
        "updatedAt",
        "sku",
        "cost",
    ];

    /// Valor do estoque a preço de venda.
    pub fn stock_value(&self) -> Decimal {
        self.price * Decimal::from(self.stock_quantity)
    }
}

impl Sortable for Product {
    fn sort_value(&self, path: &str) -> Option<FieldValue> {
        let value = match path {
            "name" => (&self.name).into(),
            "description" => (&self.description).into(),
            "sku" => (&self.sku).into(),
            "price" => self.price.into(),
            "cost" => self.cost.into(),
            "stockQuantity" => self.stock_quantity.into(),
            "createdAt" => self.created_at.into(),
            "updatedAt" => self.updated_at.into(),
            _ => return None,
        };
        Some(value)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub sku: String,
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[validate(custom(function = "validate_non_negative"))]
    pub cost: Decimal,
    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    pub stock_quantity: i32,
    pub category_id: Uuid,
    pub supplier_id: Option<Uuid>,
    #[serde(default)]
    pub image_url: String,
}
