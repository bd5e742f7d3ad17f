use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::users::dtos::{CreateUserDto, UpdateUserDto, UserQueryParams, UserResponseDto};
use crate::features::users::models::{NewUser, User};
use crate::features::users::repositories::UserRepository;

/// Service for user directory operations
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Create a user, rejecting duplicate emails.
    ///
    /// The password is stored as given; hashing is out of scope here.
    pub async fn create(&self, dto: CreateUserDto) -> Result<UserResponseDto> {
        if self.repo.find_by_email(&dto.email).await?.is_some() {
            return Err(AppError::Conflict("Email already in use".to_string()));
        }

        let user = self
            .repo
            .insert(NewUser {
                email: dto.email,
                name: dto.name,
                password: dto.password,
                avatar: dto.avatar,
            })
            .await?;

        tracing::info!("User created: id={}, email={}", user.id, user.email);

        Ok(user.into())
    }

    /// List users matching the filter, with the unpaginated total
    pub async fn find_all(&self, query: &UserQueryParams) -> Result<(Vec<UserResponseDto>, i64)> {
        let (users, total) = self.repo.find(query).await?;
        Ok((users.into_iter().map(|u| u.into()).collect(), total))
    }

    /// Get a user by id
    pub async fn find_one(&self, id: Uuid) -> Result<UserResponseDto> {
        let user = self.repo.find_by_id(id).await?;

        user.map(|u| u.into())
            .ok_or_else(|| AppError::NotFound(format!("User with ID {} not found", id)))
    }

    /// Look up a user by email, password included.
    ///
    /// Internal lookup for collaborators outside the HTTP surface; never
    /// routed directly.
    #[allow(dead_code)]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.repo.find_by_email(email).await
    }

    /// Apply a partial update to a user
    pub async fn update(&self, id: Uuid, dto: UpdateUserDto) -> Result<UserResponseDto> {
        let mut user = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with ID {} not found", id)))?;

        // Re-check uniqueness when the email actually changes.
        if let Some(email) = dto.email.as_deref() {
            if email != user.email && self.repo.find_by_email(email).await?.is_some() {
                return Err(AppError::Conflict("Email already in use".to_string()));
            }
        }

        // The pair replaces the password directly; the current password is
        // not verified against the stored value. Neither field is persisted.
        if let (Some(_current), Some(new_password)) = (&dto.current_password, &dto.new_password) {
            user.password = new_password.clone();
        }

        if let Some(email) = dto.email {
            user.email = email;
        }
        if let Some(name) = dto.name {
            user.name = name;
        }
        if let Some(avatar) = dto.avatar {
            user.avatar = Some(avatar);
        }

        let updated = self.repo.update(&user).await?;

        tracing::info!("User updated: id={}", updated.id);

        Ok(updated.into())
    }

    /// Delete a user by id
    pub async fn remove(&self, id: Uuid) -> Result<()> {
        let deleted = self.repo.delete(id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound(format!("User with ID {} not found", id)));
        }

        tracing::info!("User deleted: id={}", id);

        Ok(())
    }
}
