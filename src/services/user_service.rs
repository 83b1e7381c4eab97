//! User service - profile access and admin user management.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Action, Actor, NewUser, Password, User, UserFilter, UserUpdate};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

/// Admin-side account creation input; unlike self-registration this may
/// create accounts of any role.
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub name: String,
    pub email: String,
    pub role: crate::domain::UserRole,
    pub password: String,
    pub profile: crate::domain::TeachingProfile,
}

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Update own profile
    async fn update_profile(&self, actor: Actor, update: UserUpdate) -> AppResult<User>;

    /// Admin: list users with search/role filters
    async fn list_users(
        &self,
        actor: Actor,
        filter: UserFilter,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<User>, u64)>;

    /// Admin: create an account of any role
    async fn create_user(&self, actor: Actor, account: CreateAccount) -> AppResult<User>;

    /// Admin: update another user's profile fields
    async fn update_user(&self, actor: Actor, id: Uuid, update: UserUpdate) -> AppResult<User>;

    /// Admin: delete a user
    async fn delete_user(&self, actor: Actor, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn update_profile(&self, actor: Actor, update: UserUpdate) -> AppResult<User> {
        self.uow.users().update(actor.id, update).await
    }

    async fn list_users(
        &self,
        actor: Actor,
        filter: UserFilter,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<User>, u64)> {
        actor.ensure(Action::Administer)?;
        self.uow.users().list(filter, pagination).await
    }

    async fn create_user(&self, actor: Actor, account: CreateAccount) -> AppResult<User> {
        actor.ensure(Action::Administer)?;

        if self
            .uow
            .users()
            .find_by_email(&account.email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Email already exists"));
        }

        let password_hash = Password::new(&account.password)?.into_string();
        self.uow
            .users()
            .create(NewUser {
                name: account.name,
                email: account.email,
                role: account.role,
                password_hash,
                profile: account.profile,
            })
            .await
    }

    async fn update_user(&self, actor: Actor, id: Uuid, update: UserUpdate) -> AppResult<User> {
        actor.ensure(Action::Administer)?;
        self.uow.users().update(id, update).await
    }

    async fn delete_user(&self, actor: Actor, id: Uuid) -> AppResult<()> {
        actor.ensure(Action::Administer)?;

        // Deleting yourself would orphan the session issuing this call
        if actor.id == id {
            return Err(AppError::validation("Cannot delete your own account"));
        }

        self.uow.users().delete(id).await
    }
}
