// src/models/supplier.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::common::query::{FieldValue, Sortable};
use crate::models::crm::Address;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    /// Produto fornecido (texto livre, ex: "Eletrônicos")
    pub product: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub document: String, // sempre CNPJ
    pub address: Address,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Supplier {
    pub const SORTABLE_FIELDS: &'static [&'static str] = &[
        "name",
        "product",
        "contactName",
        "email",
        "document",
        "createdAt",
        "updatedAt",
        "address.city",
        "address.state",
    ];
}

impl Sortable for Supplier {
    fn sort_value(&self, path: &str) -> Option<FieldValue> {
        if let Some(("address", rest)) = path.split_once('.') {
            return self.address.sort_value(rest);
        }
        let value = match path {
            "name" => (&self.name).into(),
            "product" => (&self.product).into(),
            "contactName" => (&self.contact_name).into(),
            "email" => (&self.email).into(),
            "phone" => (&self.phone).into(),
            "document" => (&self.document).into(),
            "createdAt" => self.created_at.into(),
            "updatedAt" => self.updated_at.into(),
            _ => return None,
        };
        Some(value)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewSupplier {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub product: String,
    pub contact_name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    pub phone: String,
    pub document: String,
    pub address: Address,
}
