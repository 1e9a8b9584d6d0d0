mod common;

use common::*;
use rust_decimal_macros::dec;
use stockroom::{
    AppError, ErrorKind,
    common::query::{SearchParams, SortOrder},
    models::crm::DocumentType,
};
use uuid::Uuid;

// =========================================================================
//  CLIENTES
// =========================================================================

#[tokio::test]
async fn duplicate_active_document_is_a_conflict() {
    let app = test_app().await;
    create_client(&app, "Maria Lima", "123.456.789-00").await;

    // Mesmo documento, pontuação diferente
    let err = app
        .crm_service
        .create_client(new_client("Outra Maria", "12345678900", DocumentType::Cpf))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::DocumentAlreadyExists(DocumentType::Cpf)));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(app.crm_service.search_clients(&SearchParams::new()).await.total, 1);
}

#[tokio::test]
async fn document_of_a_deactivated_client_can_be_reused() {
    let app = test_app().await;
    let first = create_client(&app, "Maria Lima", "123.456.789-00").await;
    app.crm_service.delete_client(first.id).await.unwrap();

    let second = app
        .crm_service
        .create_client(new_client("Maria Lima", "123.456.789-00", DocumentType::Cpf))
        .await
        .unwrap();
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn malformed_document_is_rejected() {
    let app = test_app().await;
    let err = app
        .crm_service
        .create_client(new_client("Empresa X", "12.345.678/0001", DocumentType::Cnpj))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidDocument(DocumentType::Cnpj)));
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn updating_a_client_keeps_its_own_document() {
    let app = test_app().await;
    let client = create_client(&app, "Maria Lima", "123.456.789-00").await;

    let updated = app
        .crm_service
        .update_client(stockroom::models::crm::Client {
            phone: "(21) 95555-0000".to_string(),
            ..client.clone()
        })
        .await
        .unwrap();

    assert_eq!(updated.phone, "(21) 95555-0000");
    assert_eq!(updated.created_at, client.created_at);
    assert!(updated.updated_at >= client.updated_at);
}

#[tokio::test]
async fn updating_into_another_clients_document_is_a_conflict() {
    let app = test_app().await;
    create_client(&app, "Maria Lima", "123.456.789-00").await;
    let other = create_client(&app, "João Souza", "987.654.321-00").await;

    let err = app
        .crm_service
        .update_client(stockroom::models::crm::Client {
            document: "123.456.789-00".to_string(),
            ..other.clone()
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    let stored = app.crm_service.get_client(other.id).await.unwrap();
    assert_eq!(stored.document, "987.654.321-00");
}

#[tokio::test]
async fn client_search_hides_inactive_and_filters_by_location() {
    let app = test_app().await;
    create_client(&app, "Maria Lima", "111.111.111-11").await;
    let gone = create_client(&app, "Mariana Andrade", "222.222.222-22").await;
    let mut carioca = new_client("Carla Dias", "333.333.333-33", DocumentType::Cpf);
    carioca.address = address("Rio de Janeiro", "RJ");
    app.crm_service.create_client(carioca).await.unwrap();
    app.crm_service.delete_client(gone.id).await.unwrap();

    let active = app.crm_service.search_clients(&SearchParams::new().search("mar")).await;
    assert_eq!(active.total, 1);
    assert_eq!(active.data[0].name, "Maria Lima");

    let all = app
        .crm_service
        .search_clients(&SearchParams::new().search("mar").include_inactive())
        .await;
    assert_eq!(all.total, 2);

    let rio = app
        .crm_service
        .search_clients(&SearchParams::new().filter("city", "rio").filter("state", "rj"))
        .await;
    assert_eq!(rio.total, 1);
    assert_eq!(rio.data[0].name, "Carla Dias");
}

#[tokio::test]
async fn clients_sort_by_nested_city() {
    let app = test_app().await;
    for (name, doc, city) in [
        ("A", "111.111.111-11", "Recife"),
        ("B", "222.222.222-22", "belo Horizonte"),
        ("C", "333.333.333-33", "Curitiba"),
    ] {
        let mut client = new_client(name, doc, DocumentType::Cpf);
        client.address = address(city, "XX");
        app.crm_service.create_client(client).await.unwrap();
    }

    let page = app
        .crm_service
        .search_clients(&SearchParams::new().sort("address.city").order(SortOrder::Asc))
        .await;
    let cities: Vec<_> = page.data.iter().map(|c| c.address.city.as_str()).collect();
    assert_eq!(cities, vec!["belo Horizonte", "Curitiba", "Recife"]);
}

#[tokio::test]
async fn deleting_a_missing_client_reports_not_found() {
    let app = test_app().await;
    let err = app.crm_service.delete_client(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

// =========================================================================
//  FORNECEDORES
// =========================================================================

#[tokio::test]
async fn supplier_documents_must_be_cnpj_and_unique() {
    let app = test_app().await;
    create_supplier(&app, "Tech Distribuidora", "12.345.678/0001-90").await;

    let duplicate = app
        .supplier_service
        .create_supplier(new_supplier("Outra Tech", "12345678000190", "Londrina"))
        .await
        .unwrap_err();
    assert!(matches!(duplicate, AppError::DocumentAlreadyExists(DocumentType::Cnpj)));

    let cpf = app
        .supplier_service
        .create_supplier(new_supplier("Pessoa Física", "123.456.789-00", "Londrina"))
        .await
        .unwrap_err();
    assert!(matches!(cpf, AppError::InvalidDocument(DocumentType::Cnpj)));
}

#[tokio::test]
async fn deactivating_a_supplier_unlinks_its_products() {
    let app = test_app().await;
    let category = create_category(&app, "Eletrônicos").await;
    let supplier = create_supplier(&app, "Tech Distribuidora", "12.345.678/0001-90").await;

    let mut data = new_product(category.id, "Monitor", dec!(1299.99), 25);
    data.supplier_id = Some(supplier.id);
    let linked = app.inventory_service.create_product(data).await.unwrap();
    let unrelated = create_product(&app, category.id, "Mouse", dec!(80.00), 10).await;

    app.supplier_service.delete_supplier(supplier.id).await.unwrap();

    let linked = app.inventory_service.get_product(linked.id).await.unwrap();
    assert_eq!(linked.supplier_id, None);
    assert!(linked.is_active);
    assert_eq!(app.inventory_service.get_product(unrelated.id).await.unwrap(), unrelated);

    let supplier = app.supplier_service.get_supplier(supplier.id).await.unwrap();
    assert!(!supplier.is_active);
    assert_eq!(app.supplier_service.search_suppliers(&SearchParams::new()).await.total, 0);
}

#[tokio::test]
async fn products_cannot_point_at_inactive_suppliers() {
    let app = test_app().await;
    let category = create_category(&app, "Eletrônicos").await;
    let supplier = create_supplier(&app, "Tech Distribuidora", "12.345.678/0001-90").await;
    app.supplier_service.delete_supplier(supplier.id).await.unwrap();

    let mut data = new_product(category.id, "Monitor", dec!(1299.99), 25);
    data.supplier_id = Some(supplier.id);
    let err = app.inventory_service.create_product(data).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

// =========================================================================
//  PRODUTOS E CATEGORIAS
// =========================================================================

#[tokio::test]
async fn category_in_use_cannot_be_deleted() {
    let app = test_app().await;
    let category = create_category(&app, "Eletrônicos").await;
    let product = create_product(&app, category.id, "Monitor", dec!(1299.99), 25).await;

    let err = app.inventory_service.delete_category(category.id).await.unwrap_err();
    assert!(matches!(err, AppError::CategoryInUse(1)));
    assert_eq!(err.kind(), ErrorKind::BusinessRule);
    assert!(app.inventory_service.get_category(category.id).await.is_some());
    assert_eq!(app.inventory_service.get_product(product.id).await.unwrap(), product);

    // Produto desativado não prende mais a categoria
    app.inventory_service.delete_product(product.id).await.unwrap();
    app.inventory_service.delete_category(category.id).await.unwrap();
    assert!(app.inventory_service.get_category(category.id).await.is_none());
}

#[tokio::test]
async fn invalid_products_are_rejected_with_field_messages() {
    let app = test_app().await;
    let category = create_category(&app, "Eletrônicos").await;

    let mut data = new_product(category.id, "Monitor", dec!(0), -1);
    data.name = String::new();
    let err = app.inventory_service.create_product(data).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    let fields: Vec<String> = err.field_messages().into_iter().map(|(field, _)| field).collect();
    assert!(fields.contains(&"name".to_string()));
    assert!(fields.contains(&"price".to_string()));
    assert!(fields.contains(&"stock_quantity".to_string()));
}

#[tokio::test]
async fn product_needs_an_existing_category() {
    let app = test_app().await;
    let err = app
        .inventory_service
        .create_product(new_product(Uuid::new_v4(), "Órfão", dec!(10), 1))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn product_search_combines_text_and_filters() {
    let app = test_app().await;
    let electronics = create_category(&app, "Eletrônicos").await;
    let office = create_category(&app, "Escritório").await;
    create_product(&app, electronics.id, "Monitor", dec!(1299.99), 25).await;
    create_product(&app, electronics.id, "Mouse", dec!(80.00), 0).await;
    create_product(&app, office.id, "Cadeira", dec!(249.99), 15).await;

    let in_stock = app
        .inventory_service
        .search_products(&SearchParams::new().filter("inStock", true))
        .await;
    assert_eq!(in_stock.total, 2);

    let electronics_under_100 = app
        .inventory_service
        .search_products(
            &SearchParams::new()
                .filter("categoryId", electronics.id.to_string())
                .filter("priceMax", 100),
        )
        .await;
    assert_eq!(electronics_under_100.total, 1);
    assert_eq!(electronics_under_100.data[0].name, "Mouse");

    let by_sku = app.inventory_service.search_products(&SearchParams::new().search("sku-cad")).await;
    assert_eq!(by_sku.total, 1);

    let by_price_desc = app
        .inventory_service
        .search_products(&SearchParams::new().sort("price").order(SortOrder::Desc))
        .await;
    let names: Vec<_> = by_price_desc.data.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Monitor", "Cadeira", "Mouse"]);
}

#[tokio::test]
async fn unreadable_filter_values_match_no_product() {
    let app = test_app().await;
    let category = create_category(&app, "Eletrônicos").await;
    create_product(&app, category.id, "Monitor", dec!(1299.99), 25).await;
    create_product(&app, category.id, "Mouse", dec!(80.00), 10).await;

    let bad_category = app
        .inventory_service
        .search_products(&SearchParams::new().filter("categoryId", "cat_1"))
        .await;
    assert_eq!(bad_category.total, 0);

    let bad_price = app
        .inventory_service
        .search_products(&SearchParams::new().filter("priceMin", "abc"))
        .await;
    assert_eq!(bad_price.total, 0);

    // Texto numérico continua valendo
    let from_100 = app
        .inventory_service
        .search_products(&SearchParams::new().filter("priceMin", "100"))
        .await;
    assert_eq!(from_100.total, 1);
}

#[tokio::test]
async fn soft_deleted_products_leave_search_but_remain_readable() {
    let app = test_app().await;
    let category = create_category(&app, "Eletrônicos").await;
    let product = create_product(&app, category.id, "Monitor", dec!(1299.99), 25).await;

    app.inventory_service.delete_product(product.id).await.unwrap();

    assert_eq!(app.inventory_service.search_products(&SearchParams::new()).await.total, 0);
    let stored = app.inventory_service.get_product(product.id).await.unwrap();
    assert!(!stored.is_active);
}

#[tokio::test]
async fn categories_are_listed_by_name() {
    let app = test_app().await;
    create_category(&app, "Vestuário").await;
    create_category(&app, "eletrônicos").await;
    create_category(&app, "Móveis").await;

    let names: Vec<String> = app
        .inventory_service
        .get_all_categories()
        .await
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["eletrônicos", "Móveis", "Vestuário"]);
}

#[tokio::test]
async fn product_images_become_data_urls() {
    let app = test_app().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foto.png");
    tokio::fs::write(&path, b"abc").await.unwrap();

    let url = app.inventory_service.upload_product_image(&path).await.unwrap();
    assert_eq!(url, "data:image/png;base64,YWJj");

    let missing = app
        .inventory_service
        .upload_product_image(dir.path().join("nada.png"))
        .await
        .unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::Internal);
}
