// src/services/dashboard_service.rs

use chrono::Utc;

use crate::{
    common::query::{SearchParams, SortOrder},
    db::{Database, DashboardRepository, OperationsRepository},
    models::{
        dashboard::{DashboardSummary, SalesChartEntry, TopProductEntry},
        operations::Order,
    },
};

const CHART_MONTHS: u32 = 6;
const TOP_PRODUCTS: usize = 5;
const RECENT_ORDERS: u32 = 5;

#[derive(Clone)]
pub struct DashboardService {
    db: Database,
    repo: DashboardRepository,
    operations_repo: OperationsRepository,
}

impl DashboardService {
    pub fn new(db: Database, repo: DashboardRepository, operations_repo: OperationsRepository) -> Self {
        Self {
            db,
            repo,
            operations_repo,
        }
    }

    pub async fn get_summary(&self) -> DashboardSummary {
        let tables = self.db.read().await;
        self.repo.get_summary(&tables, Utc::now())
    }

    // Últimos 6 meses, incluindo o atual
    pub async fn get_sales_chart(&self) -> Vec<SalesChartEntry> {
        let tables = self.db.read().await;
        self.repo.get_sales_by_month(&tables, Utc::now(), CHART_MONTHS)
    }

    pub async fn get_top_products(&self) -> Vec<TopProductEntry> {
        let tables = self.db.read().await;
        self.repo.get_top_products(&tables, TOP_PRODUCTS)
    }

    pub async fn get_recent_orders(&self) -> Vec<Order> {
        let params = SearchParams::new()
            .limit(RECENT_ORDERS)
            .sort("createdAt")
            .order(SortOrder::Desc);

        let tables = self.db.read().await;
        self.operations_repo.search_orders(&tables, &params).data
    }
}
