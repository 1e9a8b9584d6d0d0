// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;

// 1. Resumo (os cards do topo)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_products: usize,
    pub active_products: usize,
    pub low_stock_products: usize, // ativos com estoque abaixo do limite
    pub total_clients: usize,
    pub active_clients: usize,
    pub total_orders: usize,
    pub orders_this_month: usize,
    pub total_revenue: Decimal,
    pub revenue_this_month: Decimal,
}

// 2. Gráfico de vendas (últimos meses)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesChartEntry {
    pub year: i32,
    pub month: u32,
    pub revenue: Decimal,
    pub orders: usize,
}

// 3. Top produtos por valor em estoque
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProductEntry {
    pub name: String,
    pub value: Decimal,
    pub stock: i32,
}
