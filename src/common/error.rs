// src/common/error.rs

use thiserror::Error;
use uuid::Uuid;

use crate::models::crm::DocumentType;

/// Categoria do erro. A camada de apresentação usa isso para escolher
/// a mensagem (o antigo mapeamento para StatusCode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    BusinessRule,
    Internal,
}

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Formato de {0} inválido")]
    InvalidDocument(DocumentType),

    #[error("O pedido deve ter ao menos um item")]
    EmptyOrder,

    #[error("Quantidade fora do limite para o produto: {0}")]
    QuantityOutOfRange(Uuid),

    #[error("Transição de status inválida: {from} -> {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Já existe cadastro ativo com este {0}")]
    DocumentAlreadyExists(DocumentType),

    #[error("Número de pedido já existe: {0}")]
    OrderNumberAlreadyExists(String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("{entity} não encontrado: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Esta categoria é usada por {0} produtos ativos")]
    CategoryInUse(usize),

    #[error("Você não pode excluir sua própria conta enquanto estiver conectado")]
    CannotDeleteCurrentUser,

    #[error("Estoque insuficiente para o produto: {name} (disponível {available}, pedido {requested})")]
    InsufficientStock {
        name: String,
        available: i32,
        requested: i32,
    },

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Erro de armazenamento: {0}")]
    StorageError(#[from] std::io::Error),

    #[error("Erro de serialização: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Versão de esquema não suportada para '{key}': {version}")]
    UnsupportedSchemaVersion { key: String, version: u32 },

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        AppError::NotFound { entity, id }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidDocument(_)
            | AppError::EmptyOrder
            | AppError::QuantityOutOfRange(_)
            | AppError::InvalidStatusTransition { .. } => ErrorKind::Validation,

            AppError::DocumentAlreadyExists(_)
            | AppError::OrderNumberAlreadyExists(_)
            | AppError::EmailAlreadyExists => ErrorKind::Conflict,

            AppError::NotFound { .. } => ErrorKind::NotFound,

            AppError::CategoryInUse(_)
            | AppError::CannotDeleteCurrentUser
            | AppError::InsufficientStock { .. }
            | AppError::InvalidCredentials => ErrorKind::BusinessRule,

            // Todos os outros viram erro interno. O `tracing` registra a mensagem detalhada.
            AppError::StorageError(_)
            | AppError::SerializationError(_)
            | AppError::UnsupportedSchemaVersion { .. }
            | AppError::BcryptError(_)
            | AppError::JwtError(_)
            | AppError::InternalServerError(_) => ErrorKind::Internal,
        }
    }

    /// Detalhes por campo para erros de validação (campo -> mensagens).
    pub fn field_messages(&self) -> Vec<(String, Vec<String>)> {
        match self {
            AppError::ValidationError(errors) => errors
                .field_errors()
                .iter()
                .map(|(field, field_errors)| {
                    let messages = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    (field.to_string(), messages)
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}
