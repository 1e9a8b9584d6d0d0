mod common;

use std::sync::Arc;

use common::*;
use stockroom::{
    AppError, ErrorKind,
    db::{KeyValueStore, MemoryStore, keys},
    models::auth::{LoginCredentials, RegisterUserPayload, User, UserRole},
};

fn credentials(email: &str, password: &str) -> LoginCredentials {
    LoginCredentials {
        email: email.to_string(),
        password: password.to_string(),
    }
}

fn payload(name: &str, email: &str, password: &str) -> RegisterUserPayload {
    RegisterUserPayload {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        role: UserRole::User,
    }
}

// =========================================================================
//  LOGIN / LOGOUT
// =========================================================================

#[tokio::test]
async fn default_users_are_seeded_and_can_log_in() {
    let app = test_app().await;

    let users = app.auth_service.get_users().await;
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.password_hash.starts_with("$2")));

    assert!(app.auth_service.login(&credentials("admin@example.com", "admin123")).await);
    let state = app.auth_service.state().await;
    assert!(state.is_authenticated);
    assert!(!state.is_loading);
    assert_eq!(state.error, None);

    let user = state.user.expect("session user");
    assert_eq!(user.role, UserRole::Admin);
    let claims = app.auth_service.validate_token(state.token.as_deref().unwrap()).unwrap();
    assert_eq!(claims.sub, user.id);
}

#[tokio::test]
async fn wrong_password_leaves_session_logged_out() {
    let app = test_app().await;

    assert!(!app.auth_service.login(&credentials("admin@example.com", "errada")).await);
    let state = app.auth_service.state().await;
    assert!(!state.is_authenticated);
    assert_eq!(state.error.as_deref(), Some("Credenciais inválidas"));
    assert_eq!(app.db.storage().get(keys::TOKEN).await.unwrap(), None);
}

#[tokio::test]
async fn login_email_must_match_exactly() {
    let app = test_app().await;
    assert!(!app.auth_service.login(&credentials("ADMIN@example.com", "admin123")).await);
    assert!(!app.auth_service.login(&credentials("ninguem@example.com", "admin123")).await);
}

#[tokio::test]
async fn deactivated_users_cannot_log_in() {
    let app = test_app().await;
    let user = app
        .auth_service
        .register(payload("Paula Reis", "paula@example.com", "segredo1"))
        .await
        .unwrap();
    app.auth_service.delete_user(user.id).await.unwrap();

    assert!(!app.auth_service.login(&credentials("paula@example.com", "segredo1")).await);
    let stored = app.auth_service.get_user_by_id(user.id).await.unwrap();
    assert!(!stored.is_active);
}

#[tokio::test]
async fn logout_clears_session_and_storage() {
    let app = test_app().await;
    assert!(app.auth_service.login(&credentials("user@example.com", "user123")).await);

    app.auth_service.logout().await.unwrap();

    assert_eq!(app.auth_service.current_user().await, None);
    assert!(!app.auth_service.state().await.is_authenticated);
    assert_eq!(app.db.storage().get(keys::CURRENT_USER).await.unwrap(), None);
    assert_eq!(app.db.storage().get(keys::TOKEN).await.unwrap(), None);
}

// =========================================================================
//  RESTAURAÇÃO DA SESSÃO
// =========================================================================

#[tokio::test]
async fn session_survives_a_restart() {
    let store = Arc::new(MemoryStore::new());
    let first = test_app_with(store.clone()).await;
    assert!(first.auth_service.login(&credentials("admin@example.com", "admin123")).await);
    let logged = first.auth_service.current_user().await.unwrap();

    let second = test_app_with(store).await;
    let state = second.auth_service.state().await;
    assert!(state.is_authenticated);
    assert!(!state.is_loading);
    assert_eq!(state.user, Some(logged));
    // Usuários não são semeados de novo
    assert_eq!(second.auth_service.get_users().await.len(), 2);
}

#[tokio::test]
async fn corrupted_session_starts_logged_out() {
    let store = Arc::new(MemoryStore::new());
    store.set(keys::CURRENT_USER, "{ isto não é json").await.unwrap();
    store.set(keys::TOKEN, "token").await.unwrap();

    let app = test_app_with(store).await;
    let state = app.auth_service.state().await;
    assert!(!state.is_authenticated);
    assert!(!state.is_loading);
    assert_eq!(state.user, None);
}

#[tokio::test]
async fn forged_token_is_not_restored() {
    let store = Arc::new(MemoryStore::new());
    let first = test_app_with(store.clone()).await;
    assert!(first.auth_service.login(&credentials("admin@example.com", "admin123")).await);
    store.set(keys::TOKEN, "eyJhbGciOiJIUzI1NiJ9.e30.assinatura").await.unwrap();

    let second = test_app_with(store).await;
    assert!(!second.auth_service.state().await.is_authenticated);
}

// =========================================================================
//  USUÁRIOS
// =========================================================================

#[tokio::test]
async fn register_hashes_and_rejects_duplicate_emails() {
    let app = test_app().await;
    let user = app
        .auth_service
        .register(payload("Paula Reis", "paula@example.com", "segredo1"))
        .await
        .unwrap();
    assert_ne!(user.password_hash, "segredo1");
    assert!(user.is_active);
    assert!(app.auth_service.login(&credentials("paula@example.com", "segredo1")).await);

    let err = app
        .auth_service
        .register(payload("Outra Paula", "Paula@Example.com", "segredo2"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EmailAlreadyExists));
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn register_validates_payload() {
    let app = test_app().await;
    let err = app
        .auth_service
        .register(payload("", "não-é-email", "123"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.field_messages().len(), 3);
}

#[tokio::test]
async fn logged_user_cannot_delete_itself() {
    let app = test_app().await;
    assert!(app.auth_service.login(&credentials("admin@example.com", "admin123")).await);
    let me = app.auth_service.current_user().await.unwrap();

    let err = app.auth_service.delete_user(me.id).await.unwrap_err();
    assert!(matches!(err, AppError::CannotDeleteCurrentUser));
    assert!(app.auth_service.get_user_by_id(me.id).await.unwrap().is_active);
}

#[tokio::test]
async fn updating_the_logged_user_refreshes_the_session() {
    let app = test_app().await;
    assert!(app.auth_service.login(&credentials("user@example.com", "user123")).await);
    let me = app.auth_service.current_user().await.unwrap();
    let stored = app.auth_service.get_user_by_id(me.id).await.unwrap();

    app.auth_service
        .update_user(User {
            name: "Usuário Renomeado".to_string(),
            ..stored
        })
        .await
        .unwrap();

    let session = app.auth_service.current_user().await.unwrap();
    assert_eq!(session.name, "Usuário Renomeado");
    let raw = app.db.storage().get(keys::CURRENT_USER).await.unwrap().unwrap();
    assert!(raw.contains("Usuário Renomeado"));
}

#[tokio::test]
async fn updating_into_a_taken_email_is_a_conflict() {
    let app = test_app().await;
    let users = app.auth_service.get_users().await;
    let regular = users.iter().find(|u| u.role == UserRole::User).unwrap().clone();

    let err = app
        .auth_service
        .update_user(User {
            email: "admin@example.com".to_string(),
            ..regular
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}
