#![allow(dead_code)]

use std::sync::Arc;

use rust_decimal::Decimal;
use stockroom::{
    AppConfig, AppState,
    db::{KeyValueStore, MemoryStore},
    models::{
        crm::{Address, Client, DocumentType, NewClient},
        inventory::{Category, NewCategory, NewProduct, Product},
        operations::{NewOrder, NewOrderItem, PaymentMethod, PaymentStatus, OrderStatus},
        supplier::{NewSupplier, Supplier},
    },
};
use uuid::Uuid;

/// Estado completo sobre um armazenamento em memória novo.
pub async fn test_app() -> AppState {
    test_app_with(Arc::new(MemoryStore::new())).await
}

/// Estado sobre um armazenamento existente (para "reabrir" a aplicação).
pub async fn test_app_with(storage: Arc<dyn KeyValueStore>) -> AppState {
    AppState::with_storage(AppConfig::for_tests(), storage)
        .await
        .expect("failed to build test app")
}

pub fn address(city: &str, state: &str) -> Address {
    Address {
        street: "Rua das Flores".to_string(),
        number: "42".to_string(),
        complement: None,
        neighborhood: "Centro".to_string(),
        city: city.to_string(),
        state: state.to_string(),
        zip_code: "01001-000".to_string(),
        country: "Brasil".to_string(),
    }
}

pub async fn create_category(app: &AppState, name: &str) -> Category {
    app.inventory_service
        .create_category(NewCategory {
            name: name.to_string(),
            description: format!("{name} em geral"),
        })
        .await
        .expect("create category")
}

pub fn new_product(category_id: Uuid, name: &str, price: Decimal, stock: i32) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: format!("{name} de teste"),
        sku: format!("SKU-{}", name.to_uppercase()),
        price,
        cost: price / Decimal::TWO,
        stock_quantity: stock,
        category_id,
        supplier_id: None,
        image_url: String::new(),
    }
}

pub async fn create_product(app: &AppState, category_id: Uuid, name: &str, price: Decimal, stock: i32) -> Product {
    app.inventory_service
        .create_product(new_product(category_id, name, price, stock))
        .await
        .expect("create product")
}

/// Parte local de e-mail só com ASCII ("João Souza" -> "joo.souza").
pub fn email_slug(name: &str, separator: char) -> String {
    name.to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some(separator),
            c if c.is_ascii_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}

pub fn new_client(name: &str, document: &str, document_type: DocumentType) -> NewClient {
    NewClient {
        name: name.to_string(),
        email: format!("{}@example.com", email_slug(name, '.')),
        phone: "(11) 90000-0000".to_string(),
        document: document.to_string(),
        document_type,
        address: address("São Paulo", "SP"),
    }
}

pub async fn create_client(app: &AppState, name: &str, document: &str) -> Client {
    app.crm_service
        .create_client(new_client(name, document, DocumentType::Cpf))
        .await
        .expect("create client")
}

pub fn new_supplier(name: &str, document: &str, city: &str) -> NewSupplier {
    NewSupplier {
        name: name.to_string(),
        product: "Eletrônicos".to_string(),
        contact_name: "Ana Souza".to_string(),
        email: format!("{}@fornecedor.com.br", email_slug(name, '_')),
        phone: "(41) 3000-0000".to_string(),
        document: document.to_string(),
        address: address(city, "PR"),
    }
}

pub async fn create_supplier(app: &AppState, name: &str, document: &str) -> Supplier {
    app.supplier_service
        .create_supplier(new_supplier(name, document, "Curitiba"))
        .await
        .expect("create supplier")
}

/// Item com total de linha consistente (preço * quantidade).
pub fn item(product: &Product, quantity: i32) -> NewOrderItem {
    NewOrderItem::priced(product.id, quantity, product.price, Decimal::ZERO)
}

pub fn new_order(client_id: Uuid, items: Vec<NewOrderItem>) -> NewOrder {
    NewOrder {
        client_id,
        user_id: Uuid::new_v4(),
        order_number: None,
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Pending,
        payment_method: PaymentMethod::Cash,
        items,
        discount: Decimal::ZERO,
        tax: Decimal::ZERO,
        shipping: Decimal::ZERO,
        notes: None,
    }
}

pub async fn stock_of(app: &AppState, product_id: Uuid) -> i32 {
    app.inventory_service
        .get_product(product_id)
        .await
        .expect("product exists")
        .stock_quantity
}
