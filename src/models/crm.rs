// src/models/crm.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::common::query::{FieldValue, Sortable};

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Cpf,  // Pessoa física, 11 dígitos
    Cnpj, // Pessoa jurídica, 14 dígitos
}

impl DocumentType {
    pub fn digit_count(self) -> usize {
        match self {
            DocumentType::Cpf => 11,
            DocumentType::Cnpj => 14,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::Cpf => "cpf",
            DocumentType::Cnpj => "cnpj",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::Cpf => write!(f, "CPF"),
            DocumentType::Cnpj => write!(f, "CNPJ"),
        }
    }
}

// --- ENDEREÇO (objeto de valor, sempre embutido) ---

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Sortable for Address {
    fn sort_value(&self, path: &str) -> Option<FieldValue> {
        let value = match path {
            "street" => (&self.street).into(),
            "number" => (&self.number).into(),
            "complement" => self.complement.as_ref().into(),
            "neighborhood" => (&self.neighborhood).into(),
            "city" => (&self.city).into(),
            "state" => (&self.state).into(),
            "zipCode" => (&self.zip_code).into(),
            "country" => (&self.country).into(),
            _ => return None,
        };
        Some(value)
    }
}

impl Address {
    /// Filtros comuns de cliente/fornecedor: cidade por substring, UF por igualdade.
    pub fn matches_location(&self, city: Option<&str>, state: Option<&str>) -> bool {
        let city_ok = city.is_none_or(|c| self.city.to_lowercase().contains(&c.to_lowercase()));
        let state_ok = state.is_none_or(|s| self.state.eq_ignore_ascii_case(s));
        city_ok && state_ok
    }
}

// --- CLIENTE ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub document: String, // CPF ou CNPJ, como digitado
    pub document_type: DocumentType,
    pub address: Address,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    pub const SORTABLE_FIELDS: &'static [&'static str] = &[
        "name",
        "email",
        "document",
        "documentType",
        "createdAt",
        "updatedAt",
        "address.city",
        "address.state",
    ];
}

impl Sortable for Client {
    fn sort_value(&self, path: &str) -> Option<FieldValue> {
        if let Some(("address", rest)) = path.split_once('.') {
            return self.address.sort_value(rest);
        }
        let value = match path {
            "name" => (&self.name).into(),
            "email" => (&self.email).into(),
            "phone" => (&self.phone).into(),
            "document" => (&self.document).into(),
            "documentType" => self.document_type.as_str().into(),
            "createdAt" => self.created_at.into(),
            "updatedAt" => self.updated_at.into(),
            _ => return None,
        };
        Some(value)
    }
}

// Dados para cadastro de um novo cliente
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    pub phone: String,
    pub document: String,
    pub document_type: DocumentType,
    pub address: Address,
}
