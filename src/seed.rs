// src/seed.rs

//! Dados iniciais: usuários padrão sempre que a coleção não existe,
//! e um catálogo de demonstração opcional.

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::{CrmRepository, Database, InventoryRepository, SupplierRepository, UserRepository, keys},
    models::{
        auth::UserRole,
        crm::{Address, DocumentType, NewClient},
        inventory::{NewCategory, NewProduct},
        supplier::NewSupplier,
    },
    services::auth::AuthService,
};

const DEFAULT_USERS: [(&str, &str, &str, UserRole); 2] = [
    ("Admin User", "admin@example.com", "admin123", UserRole::Admin),
    ("Regular User", "user@example.com", "user123", UserRole::User),
];

async fn is_absent(db: &Database, key: &str) -> Result<bool, AppError> {
    Ok(db.storage().get(key).await?.is_none())
}

fn address(street: &str, number: &str, neighborhood: &str, city: &str, state: &str, zip_code: &str) -> Address {
    Address {
        street: street.to_string(),
        number: number.to_string(),
        complement: None,
        neighborhood: neighborhood.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        zip_code: zip_code.to_string(),
        country: "Brasil".to_string(),
    }
}

pub async fn seed_users(db: &Database, auth: &AuthService) -> Result<(), AppError> {
    if !is_absent(db, keys::USERS).await? {
        return Ok(());
    }

    // Hash fora da transação: é caro e não toca nas coleções
    let mut hashed = Vec::with_capacity(DEFAULT_USERS.len());
    for (name, email, password, role) in DEFAULT_USERS {
        hashed.push((name, email, auth.hash_password(password).await?, role));
    }

    let user_repo = UserRepository::new();
    let mut tx = db.begin().await;
    for (name, email, password_hash, role) in &hashed {
        user_repo.create_user(&mut tx, name, email, password_hash, *role)?;
    }
    tx.commit().await?;

    tracing::info!("🌱 {} usuários padrão criados", hashed.len());
    Ok(())
}

/// Catálogo de demonstração. Só roda se nenhuma das coleções existir ainda.
pub async fn seed_demo_data(db: &Database) -> Result<(), AppError> {
    for key in [keys::CATEGORIES, keys::SUPPLIERS, keys::PRODUCTS, keys::CLIENTS] {
        if !is_absent(db, key).await? {
            return Ok(());
        }
    }

    let inventory_repo = InventoryRepository::new();
    let supplier_repo = SupplierRepository::new();
    let crm_repo = CrmRepository::new();

    let mut tx = db.begin().await;

    let mut categories = Vec::new();
    for (name, description) in [
        ("Eletrônicos", "Dispositivos eletrônicos e acessórios"),
        ("Móveis", "Móveis para casa e escritório"),
        ("Vestuário", "Roupas e acessórios"),
    ] {
        categories.push(inventory_repo.create_category(
            &mut tx,
            NewCategory {
                name: name.to_string(),
                description: description.to_string(),
            },
        )?);
    }

    let mut suppliers = Vec::new();
    for (name, product, contact_name, email, document, city, state) in [
        ("Tech Distribuidora", "Eletrônicos", "Sara Lima", "sara@techdist.com.br", "12.345.678/0001-90", "São Paulo", "SP"),
        ("Office Soluções", "Móveis para escritório", "Miguel Costa", "miguel@officesolucoes.com.br", "98.765.432/0001-10", "Curitiba", "PR"),
        ("Moda Atacado", "Roupas", "Ema Rocha", "ema@modaatacado.com.br", "87.654.321/0001-01", "Rio de Janeiro", "RJ"),
    ] {
        suppliers.push(supplier_repo.create_supplier(
            &mut tx,
            NewSupplier {
                name: name.to_string(),
                product: product.to_string(),
                contact_name: contact_name.to_string(),
                email: email.to_string(),
                phone: "(11) 4000-0000".to_string(),
                document: document.to_string(),
                address: address("Avenida Central", "1000", "Centro", city, state, "01000-000"),
            },
        )?);
    }

    let products = [
        ("Monitor", "Monitor para computador", "LPT-001", Decimal::new(129999, 2), Decimal::new(800, 0), 25),
        ("Cadeira", "Cadeira de escritório", "OFC-001", Decimal::new(24999, 2), Decimal::new(150, 0), 15),
        ("Camiseta", "Camiseta polo", "TSH-001", Decimal::new(1999, 2), Decimal::new(5, 0), 100),
    ];
    for (index, (name, description, sku, price, cost, stock_quantity)) in products.into_iter().enumerate() {
        inventory_repo.create_product(
            &mut tx,
            NewProduct {
                name: name.to_string(),
                description: description.to_string(),
                sku: sku.to_string(),
                price,
                cost,
                stock_quantity,
                category_id: categories[index].id,
                supplier_id: Some(suppliers[index].id),
                image_url: String::new(),
            },
        )?;
    }

    for (name, email, document, document_type) in [
        ("João da Silva", "joao@example.com", "123.456.789-00", DocumentType::Cpf),
        ("ABC Comércio Ltda", "contato@abc.com.br", "12.345.678/0001-90", DocumentType::Cnpj),
    ] {
        crm_repo.create_client(
            &mut tx,
            NewClient {
                name: name.to_string(),
                email: email.to_string(),
                phone: "(11) 98888-0000".to_string(),
                document: document.to_string(),
                document_type,
                address: address("Rua Principal", "123", "Centro", "São Paulo", "SP", "01001-000"),
            },
        )?;
    }

    tx.commit().await?;

    tracing::info!("🌱 Catálogo de demonstração criado");
    Ok(())
}
