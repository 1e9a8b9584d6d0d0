// src/db/dashboard_repo.rs

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;

use crate::{
    db::Tables,
    models::dashboard::{DashboardSummary, SalesChartEntry, TopProductEntry},
};

/// Abaixo disso o produto conta como "estoque baixo".
pub const LOW_STOCK_THRESHOLD: i32 = 10;

#[derive(Clone, Default)]
pub struct DashboardRepository;

// (ano, mês 1-12) recuado `back` meses a partir de `now`
fn month_back(now: DateTime<Utc>, back: u32) -> (i32, u32) {
    let index = now.year() * 12 + now.month0() as i32 - back as i32;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

fn same_month(date: DateTime<Utc>, year: i32, month: u32) -> bool {
    date.year() == year && date.month() == month
}

impl DashboardRepository {
    pub fn new() -> Self {
        Self
    }

    // 1. Resumo Geral
    pub fn get_summary(&self, executor: &Tables, now: DateTime<Utc>) -> DashboardSummary {
        let active_products = executor.products.iter().filter(|p| p.is_active);
        let low_stock_products = active_products
            .clone()
            .filter(|p| p.stock_quantity < LOW_STOCK_THRESHOLD)
            .count();

        let this_month: Vec<_> = executor
            .orders
            .iter()
            .filter(|o| same_month(o.created_at, now.year(), now.month()))
            .collect();

        DashboardSummary {
            total_products: executor.products.len(),
            active_products: active_products.count(),
            low_stock_products,
            total_clients: executor.clients.len(),
            active_clients: executor.clients.iter().filter(|c| c.is_active).count(),
            total_orders: executor.orders.len(),
            orders_this_month: this_month.len(),
            total_revenue: executor.orders.iter().map(|o| o.total).sum(),
            revenue_this_month: this_month.iter().map(|o| o.total).sum(),
        }
    }

    // 2. Vendas por mês, do mais antigo para o atual
    pub fn get_sales_by_month(&self, executor: &Tables, now: DateTime<Utc>, months: u32) -> Vec<SalesChartEntry> {
        (0..months)
            .rev()
            .map(|back| {
                let (year, month) = month_back(now, back);
                let (revenue, orders) = executor
                    .orders
                    .iter()
                    .filter(|o| same_month(o.created_at, year, month))
                    .fold((Decimal::ZERO, 0), |(revenue, count), o| (revenue + o.total, count + 1));

                SalesChartEntry {
                    year,
                    month,
                    revenue,
                    orders,
                }
            })
            .collect()
    }

    // 3. Top produtos ativos por valor em estoque
    pub fn get_top_products(&self, executor: &Tables, limit: usize) -> Vec<TopProductEntry> {
        let mut entries: Vec<TopProductEntry> = executor
            .products
            .iter()
            .filter(|p| p.is_active)
            .map(|p| TopProductEntry {
                name: p.name.clone(),
                value: p.stock_value(),
                stock: p.stock_quantity,
            })
            .collect();

        entries.sort_by(|a, b| b.value.cmp(&a.value));
        entries.truncate(limit);
        entries
    }
}
