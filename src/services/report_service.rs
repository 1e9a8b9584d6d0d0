// src/services/report_service.rs

use crate::{
    db::{Database, ReportRepository},
    models::report::{FinancialReport, ReportFilter, SalesReport, StockReport},
};

/// Relatórios. Tudo é recalculado a partir do estado atual, sem cache.
#[derive(Clone)]
pub struct ReportService {
    db: Database,
    repo: ReportRepository,
}

impl ReportService {
    pub fn new(db: Database, repo: ReportRepository) -> Self {
        Self { db, repo }
    }

    pub async fn stock_report(&self) -> Vec<StockReport> {
        let tables = self.db.read().await;
        self.repo.stock_report(&tables)
    }

    pub async fn sales_report(&self, filter: &ReportFilter) -> Vec<SalesReport> {
        let tables = self.db.read().await;
        self.repo.sales_report(&tables, filter)
    }

    pub async fn financial_report(&self, filter: &ReportFilter) -> Vec<FinancialReport> {
        let tables = self.db.read().await;
        self.repo.financial_report(&tables, filter)
    }
}
