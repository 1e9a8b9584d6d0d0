// src/db/report_repo.rs

//! Projeções somente-leitura, recalculadas a cada chamada.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{
    db::Tables,
    models::{
        finance::{BalanceSummary, TransactionType},
        report::{FinancialReport, ReportFilter, SalesReport, StockReport},
    },
};

#[derive(Clone, Default)]
pub struct ReportRepository;

impl ReportRepository {
    pub fn new() -> Self {
        Self
    }

    // 1. Posição de estoque (só produtos ativos)
    pub fn stock_report(&self, executor: &Tables) -> Vec<StockReport> {
        executor
            .products
            .iter()
            .filter(|p| p.is_active)
            .map(|p| StockReport {
                product_id: p.id,
                name: p.name.clone(),
                sku: p.sku.clone(),
                current_stock: p.stock_quantity,
                average_cost: p.cost,
                total_value: p.stock_value(),
            })
            .collect()
    }

    // 2. Vendas no período, com o nome do cliente resolvido
    pub fn sales_report(&self, executor: &Tables, filter: &ReportFilter) -> Vec<SalesReport> {
        executor
            .orders
            .iter()
            .filter(|o| filter.contains(o.created_at))
            .map(|o| SalesReport {
                order_id: o.id,
                order_number: o.order_number.clone(),
                client_name: executor
                    .clients
                    .iter()
                    .find(|c| c.id == o.client_id)
                    .map_or_else(|| "N/A".to_string(), |c| c.name.clone()),
                date: o.created_at,
                total: o.total,
                status: o.status,
                payment_status: o.payment_status,
            })
            .collect()
    }

    // 3. Extrato financeiro: data crescente e saldo acumulado
    pub fn financial_report(&self, executor: &Tables, filter: &ReportFilter) -> Vec<FinancialReport> {
        let mut transactions: Vec<_> = executor
            .transactions
            .iter()
            .filter(|t| {
                filter.contains(t.date)
                    && filter.category.as_ref().is_none_or(|c| &t.category == c)
                    && filter.kind.is_none_or(|k| t.kind == k)
            })
            .collect();

        // Estável: mesma data mantém a ordem da coleção
        transactions.sort_by_key(|t| t.date);

        let mut balance = Decimal::ZERO;
        transactions
            .into_iter()
            .map(|t| {
                balance += t.kind.signed(t.amount);
                FinancialReport {
                    transaction_id: t.id,
                    date: t.date,
                    kind: t.kind,
                    category: t.category.clone(),
                    description: t.description.clone(),
                    amount: t.amount,
                    balance,
                }
            })
            .collect()
    }

    // 4. Totais de entradas/saídas num intervalo (limites inclusivos)
    pub fn balance_by_period(
        &self,
        executor: &Tables,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> BalanceSummary {
        let filter = ReportFilter {
            start_date: start,
            end_date: end,
            ..ReportFilter::default()
        };

        let (income, expense) = executor
            .transactions
            .iter()
            .filter(|t| filter.contains(t.date))
            .fold((Decimal::ZERO, Decimal::ZERO), |(income, expense), t| match t.kind {
                TransactionType::Income => (income + t.amount, expense),
                TransactionType::Expense => (income, expense + t.amount),
            });

        BalanceSummary {
            income,
            expense,
            balance: income - expense,
        }
    }
}
