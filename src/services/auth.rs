// src/services/auth.rs

use std::sync::Arc;
use std::time::Duration;

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tokio::sync::RwLock;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{Database, UserRepository, keys},
    events::{EntityKind, EventAction, EventBus},
    models::auth::{AuthState, Claims, LoginCredentials, RegisterUserPayload, SessionUser, User},
};

/// Parâmetros de autenticação vindos da configuração.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
    pub login_latency: Duration,
    pub session_ttl: chrono::Duration,
}

#[derive(Clone)]
pub struct AuthService {
    db: Database,
    user_repo: UserRepository,
    settings: AuthSettings,
    session: Arc<RwLock<AuthState>>,
    events: EventBus,
}

impl AuthService {
    pub fn new(db: Database, user_repo: UserRepository, settings: AuthSettings, events: EventBus) -> Self {
        Self {
            db,
            user_repo,
            settings,
            session: Arc::new(RwLock::new(AuthState {
                is_loading: true,
                ..AuthState::default()
            })),
            events,
        }
    }

    // =========================================================================
    //  SESSÃO
    // =========================================================================

    /// Restaura a sessão gravada (`currentUser` + `token`).
    /// Qualquer falha de leitura deixa a sessão deslogada, sem erro.
    pub async fn bootstrap(&self) -> AuthState {
        let state = match self.read_stored_session().await {
            Ok(Some((user, token))) => {
                tracing::info!("🔐 Sessão restaurada para {}", user.email);
                AuthState::authenticated(user, token)
            }
            Ok(None) => AuthState::default(),
            Err(e) => {
                tracing::warn!("⚠️ Sessão gravada inválida, iniciando deslogado: {}", e);
                AuthState::default()
            }
        };

        *self.session.write().await = state.clone();
        state
    }

    async fn read_stored_session(&self) -> Result<Option<(SessionUser, String)>, AppError> {
        let storage = self.db.storage();
        let (Some(raw_user), Some(token)) = (storage.get(keys::CURRENT_USER).await?, storage.get(keys::TOKEN).await?)
        else {
            return Ok(None);
        };

        let user: SessionUser = serde_json::from_str(&raw_user)?;
        let claims = self.validate_token(&token)?;
        if claims.sub != user.id {
            return Err(AppError::InvalidCredentials);
        }
        Ok(Some((user, token)))
    }

    pub async fn state(&self) -> AuthState {
        self.session.read().await.clone()
    }

    pub async fn current_user(&self) -> Option<SessionUser> {
        self.session.read().await.user.clone()
    }

    /// Login: e-mail exato + senha, só usuários ativos.
    /// Devolve `false` para credencial inválida ou erro inesperado.
    pub async fn login(&self, credentials: &LoginCredentials) -> bool {
        {
            let mut session = self.session.write().await;
            session.is_loading = true;
            session.error = None;
        }

        // Latência simulada de rede
        tokio::time::sleep(self.settings.login_latency).await;

        let state = match self.try_login(credentials).await {
            Ok((user, token)) => {
                tracing::info!("✅ Login realizado: {}", user.email);
                AuthState::authenticated(user, token)
            }
            Err(AppError::InvalidCredentials) => {
                tracing::warn!("⚠️ Credenciais inválidas para {}", credentials.email);
                AuthState::failed("Credenciais inválidas")
            }
            Err(e) => {
                tracing::error!("🔥 Erro inesperado no login: {}", e);
                AuthState::failed("Erro inesperado")
            }
        };

        let ok = state.is_authenticated;
        *self.session.write().await = state;
        ok
    }

    async fn try_login(&self, credentials: &LoginCredentials) -> Result<(SessionUser, String), AppError> {
        let user = {
            let tables = self.db.read().await;
            self.user_repo
                .find_by_email(&tables, &credentials.email)
                .filter(|u| u.email == credentials.email && u.is_active)
                .ok_or(AppError::InvalidCredentials)?
        };

        let password_clone = credentials.password.clone();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(user.id)?;
        let session_user = SessionUser::from(&user);

        let storage = self.db.storage();
        storage
            .set(keys::CURRENT_USER, &serde_json::to_string(&session_user)?)
            .await?;
        storage.set(keys::TOKEN, &token).await?;

        Ok((session_user, token))
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        *self.session.write().await = AuthState::default();

        let storage = self.db.storage();
        storage.remove(keys::CURRENT_USER).await?;
        storage.remove(keys::TOKEN).await?;

        tracing::info!("👋 Sessão encerrada");
        Ok(())
    }

    // =========================================================================
    //  USUÁRIOS
    // =========================================================================

    pub async fn register(&self, payload: RegisterUserPayload) -> Result<User, AppError> {
        payload.validate()?;

        // Falha rápido antes do hash, que é caro
        {
            let tables = self.db.read().await;
            if self.user_repo.find_by_email(&tables, &payload.email).is_some() {
                tracing::warn!("⚠️ Registro recusado: e-mail {} já existe", payload.email);
                return Err(AppError::EmailAlreadyExists);
            }
        }

        let hashed_password = self.hash_password(&payload.password).await?;

        let mut tx = self.db.begin().await;
        let user = self
            .user_repo
            .create_user(&mut tx, &payload.name, &payload.email, &hashed_password, payload.role)
            .inspect_err(|e| tracing::warn!("⚠️ Registro recusado: {}", e))?;
        tx.commit().await?;

        tracing::info!("🆕 Usuário registrado: {}", user.email);
        self.events.publish(EntityKind::User, user.id, EventAction::Created);
        Ok(user)
    }

    /// Atualiza o usuário; se for o logado, a cópia da sessão acompanha.
    pub async fn update_user(&self, user: User) -> Result<User, AppError> {
        let mut tx = self.db.begin().await;
        let user = self
            .user_repo
            .update_user(&mut tx, user)
            .inspect_err(|e| tracing::warn!("⚠️ Atualização de usuário recusada: {}", e))?;
        tx.commit().await?;

        let is_current = self.current_user().await.is_some_and(|u| u.id == user.id);
        if is_current {
            let session_user = SessionUser::from(&user);
            self.db
                .storage()
                .set(keys::CURRENT_USER, &serde_json::to_string(&session_user)?)
                .await?;
            self.session.write().await.user = Some(session_user);
        }

        tracing::info!("👤 Usuário atualizado: {}", user.id);
        self.events.publish(EntityKind::User, user.id, EventAction::Updated);
        Ok(user)
    }

    pub async fn get_users(&self) -> Vec<User> {
        let tables = self.db.read().await;
        self.user_repo.get_all_users(&tables)
    }

    pub async fn get_user_by_id(&self, id: Uuid) -> Option<User> {
        let tables = self.db.read().await;
        self.user_repo.find_by_id(&tables, id)
    }

    /// Exclusão lógica. O usuário logado não pode se excluir.
    pub async fn delete_user(&self, id: Uuid) -> Result<(), AppError> {
        if self.current_user().await.is_some_and(|u| u.id == id) {
            tracing::warn!("⚠️ Tentativa de excluir o próprio usuário: {}", id);
            return Err(AppError::CannotDeleteCurrentUser);
        }

        let mut tx = self.db.begin().await;
        self.user_repo
            .deactivate_user(&mut tx, id)
            .inspect_err(|e| tracing::warn!("⚠️ Exclusão de usuário recusada: {}", e))?;
        tx.commit().await?;

        tracing::info!("🗑️ Usuário desativado: {}", id);
        self.events.publish(EntityKind::User, id, EventAction::Deactivated);
        Ok(())
    }

    // =========================================================================
    //  SENHAS E TOKENS
    // =========================================================================

    pub async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password_clone = password.to_owned();
        let cost = self.settings.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.settings.jwt_secret.as_ref()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + self.settings.session_ttl;

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.settings.jwt_secret.as_ref()),
        )?)
    }
}
