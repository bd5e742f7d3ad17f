use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::users::dtos::UserQueryParams;
use crate::features::users::models::{NewUser, User};

const USER_COLUMNS: &str = "id, email, name, password, avatar, created_at, updated_at";

/// Narrow storage interface for the `users` table
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, data: NewUser) -> Result<User>;
    async fn find(&self, query: &UserQueryParams) -> Result<(Vec<User>, i64)>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>>;
    async fn update(&self, user: &User) -> Result<User>;
    async fn delete(&self, id: Uuid) -> Result<u64>;
}

/// PostgreSQL-backed user repository
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &UserQueryParams) {
        if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
            qb.push(" AND name LIKE ").push_bind(format!("%{}%", search));
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, data: NewUser) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, name, password, avatar) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, email, name, password, avatar, created_at, updated_at",
        )
        .bind(&data.email)
        .bind(&data.name)
        .bind(&data.password)
        .bind(&data.avatar)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert user: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(user)
    }

    async fn find(&self, query: &UserQueryParams) -> Result<(Vec<User>, i64)> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM users WHERE 1=1");
        Self::push_filters(&mut count_qb, query);

        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count users: {:?}", e);
                AppError::Database(e)
            })?;

        let mut qb =
            QueryBuilder::new(format!("SELECT {} FROM users WHERE 1=1", USER_COLUMNS));
        Self::push_filters(&mut qb, query);
        qb.push(" ORDER BY ")
            .push(query.sort_by.as_sql())
            .push(" ")
            .push(query.sort_order.as_sql());
        qb.push(" LIMIT ")
            .push_bind(query.page_size())
            .push(" OFFSET ")
            .push_bind(query.offset());

        let users = qb
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list users: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((users, total))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, password, avatar, created_at, updated_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get user by id: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, password, avatar, created_at, updated_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get user by email: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(user)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = sqlx::query_as::<_, User>(
            "SELECT id, email, name, password, avatar, created_at, updated_at \
             FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get users by ids: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(users)
    }

    async fn update(&self, user: &User) -> Result<User> {
        let updated = sqlx::query_as::<_, User>(
            "UPDATE users SET email = $2, name = $3, password = $4, avatar = $5, \
             updated_at = NOW() \
             WHERE id = $1 \
             RETURNING id, email, name, password, avatar, created_at, updated_at",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password)
        .bind(&user.avatar)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update user: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete user: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected())
    }
}
