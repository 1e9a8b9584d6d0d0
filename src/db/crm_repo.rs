// src/db/crm_repo.rs

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
    models::crm::{Client, DocumentType, NewClient},
};

#[derive(Clone, Default)]
pub struct CrmRepository;

impl CrmRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  CONSULTAS
    // =========================================================================

    pub fn find_client(&self, executor: &Tables, id: Uuid) -> Option<Client> {
        executor.clients.iter().find(|c| c.id == id).cloned()
    }

    /// Existe outro cliente ATIVO com o mesmo documento (só dígitos)?
    pub fn document_in_use(&self, executor: &Tables, document: &str, exclude_id: Option<Uuid>) -> bool {
        let wanted = clean_document(document);
        executor
            .clients
            .iter()
            .any(|c| c.is_active && Some(c.id) != exclude_id && clean_document(&c.document) == wanted)
    }

    /// Texto em nome/e-mail/documento/telefone e filtros city, state, documentType.
    pub fn search_clients(&self, executor: &Tables, params: &SearchParams) -> PaginatedResponse<Client> {
        let search = params.search_text();
        let digits = params.raw_search().map(clean_document).filter(|d| !d.is_empty());
        let city = params.filter_str("city");
        let state = params.filter_str("state");
        let document_type = params.filter_str("documentType");

        paginate_query(
            &executor.clients,
            params,
            |client| {
                if !client.is_active && !params.include_inactive {
                    return false;
                }

                let matches_search = search.as_ref().is_none_or(|s| {
                    client.name.to_lowercase().contains(s)
                        || client.email.to_lowercase().contains(s)
                        || client.phone.to_lowercase().contains(s)
                        || client.document.to_lowercase().contains(s)
                        || digits
                            .as_ref()
                            .is_some_and(|d| clean_document(&client.document).contains(d.as_str()))
                });

                matches_search
                    && client.address.matches_location(city, state)
                    && document_type.is_none_or(|t| client.document_type.as_str() == t)
            },
            Client::SORTABLE_FIELDS,
        )
    }

    // =========================================================================
    //  ESCRITA
    // =========================================================================

    // Formato primeiro: documentos sem dígitos não podem colidir entre si.
    fn check_document(
        &self,
        executor: &Tables,
        document: &str,
        document_type: DocumentType,
        exclude_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        if !validate_document(document, document_type) {
            return Err(AppError::InvalidDocument(document_type));
        }
        if self.document_in_use(executor, document, exclude_id) {
            return Err(AppError::DocumentAlreadyExists(document_type));
        }
        Ok(())
    }

    pub fn create_client(&self, executor: &mut Tables, data: NewClient) -> Result<Client, AppError> {
        data.validate()?;
        self.check_document(executor, &data.document, data.document_type, None)?;

        let now = Utc::now();
        let client = Client {
            id: Uuid::new_v4(),
            name: data.name,
            email: data.email,
            phone: data.phone,
            document: data.document,
            document_type: data.document_type,
            address: data.address,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        executor.clients.insert(0, client.clone());
        Ok(client)
    }

    pub fn update_client(&self, executor: &mut Tables, client: Client) -> Result<Client, AppError> {
        NewClient {
            name: client.name.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
            document: client.document.clone(),
            document_type: client.document_type,
            address: client.address.clone(),
        }
        .validate()?;
        self.check_document(executor, &client.document, client.document_type, Some(client.id))?;

        let slot = executor
            .clients
            .iter_mut()
            .find(|c| c.id == client.id)
            .ok_or_else(|| AppError::not_found("Cliente", client.id))?;

        let created_at = slot.created_at;
        *slot = Client {
            created_at,
            updated_at: Utc::now(),
            ..client
        };
        Ok(slot.clone())
    }

    pub fn soft_delete_client(&self, executor: &mut Tables, id: Uuid) -> Result<(), AppError> {
        let client = executor
            .clients
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::not_found("Cliente", id))?;

        client.is_active = false;
        client.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::crm::Address;

    fn client_with(document: &str) -> Client {
        let now = Utc::now();
        Client {
            id: Uuid::new_v4(),
            name: "Legado".to_string(),
            email: "legado@example.com".to_string(),
            phone: String::new(),
            document: document.to_string(),
            document_type: DocumentType::Cpf,
            address: Address::default(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn documents_without_digits_are_invalid_not_duplicates() {
        let repo = CrmRepository::new();
        let mut tables = Tables::default();
        tables.clients.push(client_with("abc"));

        let err = repo
            .create_client(
                &mut tables,
                NewClient {
                    name: "Outro".to_string(),
                    email: "outro@example.com".to_string(),
                    phone: String::new(),
                    document: "xyz".to_string(),
                    document_type: DocumentType::Cpf,
                    address: Address::default(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidDocument(DocumentType::Cpf)));
        assert_eq!(tables.clients.len(), 1);
    }
}
