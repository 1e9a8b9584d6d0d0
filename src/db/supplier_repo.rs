// src/db/supplier_repo.rs

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        query::{PaginatedResponse, SearchParams, paginate_query},
        validation::{clean_document, validate_document},
    },
    db::Tables,
    models::{
        crm::DocumentType,
        supplier::{NewSupplier, Supplier},
    },
};

#[derive(Clone, Default)]
pub struct SupplierRepository;

impl SupplierRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn find_supplier(&self, executor: &Tables, id: Uuid) -> Option<Supplier> {
        executor.suppliers.iter().find(|s| s.id == id).cloned()
    }

    pub fn document_in_use(&self, executor: &Tables, document: &str, exclude_id: Option<Uuid>) -> bool {
        let wanted = clean_document(document);
        executor
            .suppliers
            .iter()
            .any(|s| s.is_active && Some(s.id) != exclude_id && clean_document(&s.document) == wanted)
    }

    /// Texto em nome/produto/contato/e-mail/documento e filtros city, state.
    pub fn search_suppliers(&self, executor: &Tables, params: &SearchParams) -> PaginatedResponse<Supplier> {
        let search = params.search_text();
        let city = params.filter_str("city");
        let state = params.filter_str("state");

        paginate_query(
            &executor.suppliers,
            params,
            |supplier| {
                if !supplier.is_active && !params.include_inactive {
                    return false;
                }

                let matches_search = search.as_ref().is_none_or(|s| {
                    supplier.name.to_lowercase().contains(s)
                        || supplier.product.to_lowercase().contains(s)
                        || supplier.contact_name.to_lowercase().contains(s)
                        || supplier.email.to_lowercase().contains(s)
                        || supplier.document.to_lowercase().contains(s)
                });

                matches_search && supplier.address.matches_location(city, state)
            },
            Supplier::SORTABLE_FIELDS,
        )
    }

    // Fornecedor é sempre pessoa jurídica.
    fn check_document(&self, executor: &Tables, document: &str, exclude_id: Option<Uuid>) -> Result<(), AppError> {
        if !validate_document(document, DocumentType::Cnpj) {
            return Err(AppError::InvalidDocument(DocumentType::Cnpj));
        }
        if self.document_in_use(executor, document, exclude_id) {
            return Err(AppError::DocumentAlreadyExists(DocumentType::Cnpj));
        }
        Ok(())
    }

    pub fn create_supplier(&self, executor: &mut Tables, data: NewSupplier) -> Result<Supplier, AppError> {
        data.validate()?;
        self.check_document(executor, &data.document, None)?;

        let now = Utc::now();
        let supplier = Supplier {
            id: Uuid::new_v4(),
            name: data.name,
            product: data.product,
            contact_name: data.contact_name,
            email: data.email,
            phone: data.phone,
            document: data.document,
            address: data.address,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        executor.suppliers.insert(0, supplier.clone());
        Ok(supplier)
    }

    pub fn update_supplier(&self, executor: &mut Tables, supplier: Supplier) -> Result<Supplier, AppError> {
        NewSupplier {
            name: supplier.name.clone(),
            product: supplier.product.clone(),
            contact_name: supplier.contact_name.clone(),
            email: supplier.email.clone(),
            phone: supplier.phone.clone(),
            document: supplier.document.clone(),
            address: supplier.address.clone(),
        }
        .validate()?;
        self.check_document(executor, &supplier.document, Some(supplier.id))?;

        let slot = executor
            .suppliers
            .iter_mut()
            .find(|s| s.id == supplier.id)
            .ok_or_else(|| AppError::not_found("Fornecedor", supplier.id))?;

        let created_at = slot.created_at;
        *slot = Supplier {
            created_at,
            updated_at: Utc::now(),
            ..supplier
        };
        Ok(slot.clone())
    }

    pub fn soft_delete_supplier(&self, executor: &mut Tables, id: Uuid) -> Result<(), AppError> {
        let supplier = executor
            .suppliers
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::not_found("Fornecedor", id))?;

        supplier.is_active = false;
        supplier.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::crm::Address;

    #[test]
    fn documents_without_digits_are_invalid_not_duplicates() {
        let repo = SupplierRepository::new();
        let mut tables = Tables::default();
        let now = Utc::now();
        tables.suppliers.push(Supplier {
            id: Uuid::new_v4(),
            name: "Legado".to_string(),
            product: String::new(),
            contact_name: String::new(),
            email: "legado@fornecedor.com.br".to_string(),
            phone: String::new(),
            document: "sem cnpj".to_string(),
            address: Address::default(),
            is_active: true,
            created_at: now,
            updated_at: now,
        });

        let err = repo
            .create_supplier(
                &mut tables,
                NewSupplier {
                    name: "Outro".to_string(),
                    product: "Papelaria".to_string(),
                    contact_name: "Ana".to_string(),
                    email: "outro@fornecedor.com.br".to_string(),
                    phone: String::new(),
                    document: "n/a".to_string(),
                    address: Address::default(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidDocument(DocumentType::Cnpj)));
        assert_eq!(tables.suppliers.len(), 1);
    }
}
