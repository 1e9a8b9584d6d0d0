// src/models/report.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::finance::TransactionType;
use crate::models::operations::{OrderStatus, PaymentStatus};

/// Filtro comum dos relatórios. Datas são inclusivas nos dois extremos.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilter {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
}

impl ReportFilter {
    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        self.start_date.is_none_or(|start| date >= start) && self.end_date.is_none_or(|end| date <= end)
    }
}

// Posição de estoque
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockReport {
    pub product_id: Uuid,
    pub name: String,
    pub sku: String,
    pub current_stock: i32,
    pub average_cost: Decimal, // custo cadastrado, sem custo médio móvel
    pub total_value: Decimal,  // preço * estoque
}

// Vendas
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub order_id: Uuid,
    pub order_number: String,
    pub client_name: String,
    pub date: DateTime<Utc>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
}

// Financeiro, com saldo acumulado
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
    pub transaction_id: Uuid,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    pub description: String,
    pub amount: Decimal,
    pub balance: Decimal,
}
