//! User repository - data access for the user registry.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::user::{self, Entity as UserEntity};
use crate::domain::{NewUser, User, UserFilter, UserRole, UserUpdate};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Create a new user
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// Update profile fields
    async fn update(&self, id: Uuid, update: UserUpdate) -> AppResult<User>;

    /// Delete a user
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// List users with search/role filters, paginated
    async fn list(
        &self,
        filter: UserFilter,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<User>, u64)>;

    /// Count users holding a role
    async fn count_by_role(&self, role: UserRole) -> AppResult<u64>;

    /// Count all users
    async fn count_all(&self) -> AppResult<u64>;
}

/// SeaORM-backed implementation of UserRepository.
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn apply_filter(filter: &UserFilter) -> Condition {
    let mut condition = Condition::all();
    if let Some(search) = &filter.search {
        condition = condition.add(
            Condition::any()
                .add(user::Column::Name.contains(search))
                .add(user::Column::Email.contains(search)),
        );
    }
    if let Some(role) = filter.role {
        condition = condition.add(user::Column::Role.eq(role.to_string()));
    }
    condition
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            name: Set(new_user.name),
            role: Set(new_user.role.to_string()),
            profile: Set(new_user.profile),
            rating: Set(rust_decimal::Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;

        Ok(User::from(model))
    }

    async fn update(&self, id: Uuid, update: UserUpdate) -> AppResult<User> {
        let existing = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: user::ActiveModel = existing.into();
        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(profile) = update.profile {
            active.profile = Set(profile);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;

        Ok(User::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn list(
        &self,
        filter: UserFilter,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<User>, u64)> {
        let paginator = UserEntity::find()
            .filter(apply_filter(&filter))
            .order_by_desc(user::Column::CreatedAt)
            .paginate(&self.db, pagination.limit());

        let total = paginator.num_items().await?;
        let models = paginator
            .fetch_page(pagination.page.saturating_sub(1))
            .await?;

        Ok((models.into_iter().map(User::from).collect(), total))
    }

    async fn count_by_role(&self, role: UserRole) -> AppResult<u64> {
        UserEntity::find()
            .filter(user::Column::Role.eq(role.to_string()))
            .count(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn count_all(&self) -> AppResult<u64> {
        UserEntity::find().count(&self.db).await.map_err(Into::into)
    }
}
