// src/db/finance_repo.rs

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        query::{PaginatedResponse, SearchParams, SortOrder, paginate_query},
    },
    db::Tables,
    models::finance::{NewTransaction, Transaction, TransactionType},
};

#[derive(Clone, Default)]
pub struct FinanceRepository;

impl FinanceRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  LANÇAMENTOS
    // =========================================================================

    pub fn find_transaction(&self, executor: &Tables, id: Uuid) -> Option<Transaction> {
        executor.transactions.iter().find(|t| t.id == id).cloned()
    }

    /// Texto na descrição; filtros type, category, startDate, endDate,
    /// orderId, supplierId. Sem ordenação explícita: data decrescente.
    pub fn search_transactions(&self, executor: &Tables, params: &SearchParams) -> PaginatedResponse<Transaction> {
        let mut params = params.clone();
        if params.sort.is_none() {
            params.sort = Some("date".to_string());
            params.order.get_or_insert(SortOrder::Desc);
        }

        let search = params.search_text();
        let kind = params.filter_parsed("type", TransactionType::parse);
        let category = params.filter_str("category");
        let start_date = params.filter_datetime("startDate");
        let end_date = params.filter_datetime("endDate");
        let order_id = params.filter_uuid("orderId");
        let supplier_id = params.filter_uuid("supplierId");

        paginate_query(
            &executor.transactions,
            &params,
            |t| {
                search
                    .as_ref()
                    .is_none_or(|s| t.description.to_lowercase().contains(s))
                    && kind.matches(|k| t.kind == k)
                    && category.is_none_or(|c| t.category.eq_ignore_ascii_case(c))
                    && start_date.matches(|start| t.date >= start)
                    && end_date.matches(|end| t.date <= end)
                    && order_id.matches(|id| t.order_id == Some(id))
                    && supplier_id.matches(|id| t.supplier_id == Some(id))
            },
            Transaction::SORTABLE_FIELDS,
        )
    }

    pub fn create_transaction(&self, executor: &mut Tables, data: NewTransaction) -> Result<Transaction, AppError> {
        data.validate()?;

        let now = Utc::now();
        let transaction = Transaction {
            id: Uuid::new_v4(),
            kind: data.kind,
            amount: data.amount,
            description: data.description,
            date: data.date,
            order_id: data.order_id,
            supplier_id: data.supplier_id,
            user_id: data.user_id,
            category: data.category,
            created_at: now,
            updated_at: now,
        };

        executor.transactions.insert(0, transaction.clone());
        Ok(transaction)
    }

    pub fn update_transaction(&self, executor: &mut Tables, transaction: Transaction) -> Result<Transaction, AppError> {
        transaction.validate()?;

        let slot = executor
            .transactions
            .iter_mut()
            .find(|t| t.id == transaction.id)
            .ok_or_else(|| AppError::not_found("Lançamento", transaction.id))?;

        let created_at = slot.created_at;
        *slot = Transaction {
            created_at,
            updated_at: Utc::now(),
            ..transaction
        };
        Ok(slot.clone())
    }

    // Lançamentos não têm exclusão lógica: saem da coleção.
    pub fn delete_transaction(&self, executor: &mut Tables, id: Uuid) -> Result<(), AppError> {
        let before = executor.transactions.len();
        executor.transactions.retain(|t| t.id != id);
        if executor.transactions.len() == before {
            return Err(AppError::not_found("Lançamento", id));
        }
        Ok(())
    }
}
