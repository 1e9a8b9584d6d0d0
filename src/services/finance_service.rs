// src/services/finance_service.rs

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        query::{PaginatedResponse, SearchParams},
    },
    db::{Database, FinanceRepository, ReportRepository},
    events::{EntityKind, EventAction, EventBus},
    models::finance::{BalanceSummary, NewTransaction, Transaction},
};

#[derive(Clone)]
pub struct FinanceService {
    db: Database,
    repo: FinanceRepository,
    report_repo: ReportRepository,
    events: EventBus,
}

impl FinanceService {
    pub fn new(db: Database, repo: FinanceRepository, report_repo: ReportRepository, events: EventBus) -> Self {
        Self {
            db,
            repo,
            report_repo,
            events,
        }
    }

    // =========================================================================
    //  LANÇAMENTOS
    // =========================================================================

    pub async fn create_transaction(&self, data: NewTransaction) -> Result<Transaction, AppError> {
        let mut tx = self.db.begin().await;

        let transaction = self
            .repo
            .create_transaction(&mut tx, data)
            .inspect_err(|e| tracing::warn!("⚠️ Lançamento recusado: {}", e))?;

        tx.commit().await?;

        tracing::info!(
            "💰 Lançamento registrado: {} {} ({})",
            transaction.kind.as_str(),
            transaction.amount,
            transaction.category
        );
        self.events
            .publish(EntityKind::Transaction, transaction.id, EventAction::Created);
        Ok(transaction)
    }

    pub async fn get_transaction(&self, id: Uuid) -> Option<Transaction> {
        let tables = self.db.read().await;
        self.repo.find_transaction(&tables, id)
    }

    pub async fn update_transaction(&self, transaction: Transaction) -> Result<Transaction, AppError> {
        let mut tx = self.db.begin().await;

        let transaction = self
            .repo
            .update_transaction(&mut tx, transaction)
            .inspect_err(|e| tracing::warn!("⚠️ Atualização de lançamento recusada: {}", e))?;

        tx.commit().await?;

        tracing::info!("💰 Lançamento atualizado: {}", transaction.id);
        self.events
            .publish(EntityKind::Transaction, transaction.id, EventAction::Updated);
        Ok(transaction)
    }

    pub async fn delete_transaction(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.db.begin().await;

        self.repo
            .delete_transaction(&mut tx, id)
            .inspect_err(|e| tracing::warn!("⚠️ Exclusão de lançamento recusada: {}", e))?;

        tx.commit().await?;

        tracing::info!("🗑️ Lançamento removido: {}", id);
        self.events.publish(EntityKind::Transaction, id, EventAction::Deleted);
        Ok(())
    }

    pub async fn search_transactions(&self, params: &SearchParams) -> PaginatedResponse<Transaction> {
        let tables = self.db.read().await;
        self.repo.search_transactions(&tables, params)
    }

    // =========================================================================
    //  SALDO
    // =========================================================================

    /// Entradas, saídas e saldo no intervalo (limites inclusivos, opcionais).
    pub async fn balance_by_period(&self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> BalanceSummary {
        let tables = self.db.read().await;
        self.report_repo.balance_by_period(&tables, start, end)
    }
}
