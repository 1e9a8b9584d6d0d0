// src/db/user_repo.rs

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::Tables,
    models::auth::{User, UserRole},
};

// O repositório de usuários, responsável pela coleção 'users'
#[derive(Clone, Default)]
pub struct UserRepository;

impl UserRepository {
    pub fn new() -> Self {
        Self
    }

    // Busca um usuário pelo seu e-mail (sem diferenciar maiúsculas)
    pub fn find_by_email(&self, executor: &Tables, email: &str) -> Option<User> {
        let email = email.trim();
        executor
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    // Busca um usuário pelo seu ID
    pub fn find_by_id(&self, executor: &Tables, id: Uuid) -> Option<User> {
        executor.users.iter().find(|u| u.id == id).cloned()
    }

    pub fn get_all_users(&self, executor: &Tables) -> Vec<User> {
        executor.users.clone()
    }

    // Cria um novo usuário. O hash da senha já vem pronto do serviço.
    pub fn create_user(
        &self,
        executor: &mut Tables,
        name: &str,
        email: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, AppError> {
        if self.find_by_email(executor, email).is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.trim().to_string(),
            password_hash: password_hash.to_string(),
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        executor.users.push(user.clone());
        Ok(user)
    }

    pub fn update_user(&self, executor: &mut Tables, user: User) -> Result<User, AppError> {
        if executor
            .users
            .iter()
            .any(|u| u.id != user.id && u.email.eq_ignore_ascii_case(user.email.trim()))
        {
            return Err(AppError::EmailAlreadyExists);
        }

        let slot = executor
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| AppError::not_found("Usuário", user.id))?;

        let created_at = slot.created_at;
        *slot = User {
            created_at,
            updated_at: Utc::now(),
            ..user
        };
        Ok(slot.clone())
    }

    pub fn deactivate_user(&self, executor: &mut Tables, id: Uuid) -> Result<User, AppError> {
        let user = executor
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found("Usuário", id))?;

        user.is_active = false;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}
