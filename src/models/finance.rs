// src/models/finance.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::common::query::{FieldValue, Sortable};
use crate::common::validation::validate_positive;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,  // Entrada
    Expense, // Saída
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }

    /// Sinal aplicado ao saldo: entrada soma, saída subtrai.
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            TransactionType::Income => amount,
            TransactionType::Expense => -amount,
        }
    }
}

// --- Structs ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[validate(custom(function = "validate_positive"))]
    pub amount: Decimal,
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<Uuid>,
    pub user_id: Uuid,
    /// Categoria livre: "sale", "purchase", "rent"...
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub const SORTABLE_FIELDS: &'static [&'static str] = &[
        "date",
        "amount",
        "description",
        "type",
        "category",
        "createdAt",
        "updatedAt",
    ];
}

impl Sortable for Transaction {
    fn sort_value(&self, path: &str) -> Option<FieldValue> {
        let value = match path {
            "date" => self.date.into(),
            "amount" => self.amount.into(),
            "description" => (&self.description).into(),
            "type" => self.kind.as_str().into(),
            "category" => (&self.category).into(),
            "createdAt" => self.created_at.into(),
            "updatedAt" => self.updated_at.into(),
            _ => return None,
        };
        Some(value)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[validate(custom(function = "validate_positive"))]
    pub amount: Decimal,
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub order_id: Option<Uuid>,
    #[serde(default)]
    pub supplier_id: Option<Uuid>,
    pub user_id: Uuid,
    #[serde(default)]
    pub category: String,
}

/// Totais de um período: entradas, saídas e saldo.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}
