use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user_model::UserRow;
use crate::types::auth_types::SignUpInput;
use crate::utils::error::AppError;

const USER_COLUMNS: &str = "id, full_name, email, password, role, banned, email_verified_at, \
                            verification_token, created_at, updated_at";

pub async fn signup(pool: &PgPool, input: &SignUpInput) -> Result<UserRow, AppError> {
    let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(&input.email)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Err(AppError::InvalidArgs("Email already exists.".to_string()));
    }

    let hashed = hash(&input.password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))?;
    let verification_token = format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    );

    let user = sqlx::query_as::<_, UserRow>(&format!(
        "INSERT INTO users (id, full_name, email, password, role, verification_token, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
         RETURNING {}",
        USER_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(&input.full_name)
    .bind(&input.email)
    .bind(&hashed)
    .bind(&input.role)
    .bind(&verification_token)
    .fetch_one(pool)
    .await?;
    Ok(user)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>, AppError> {
    let user = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {} FROM users WHERE email = $1",
        USER_COLUMNS
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn verify_email(pool: &PgPool, token: &str) -> Result<UserRow, AppError> {
    let user = sqlx::query_as::<_, UserRow>(&format!(
        "UPDATE users
         SET email_verified_at = NOW(), verification_token = NULL, updated_at = NOW()
         WHERE verification_token = $1
         RETURNING {}",
        USER_COLUMNS
    ))
    .bind(token)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::InvalidArgs("Invalid verification token.".to_string()))?;
    Ok(user)
}

pub async fn list_users(pool: &PgPool, role: Option<&str>) -> Result<Vec<UserRow>, AppError> {
    let users = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {} FROM users
         WHERE ($1::text IS NULL OR role = $1)
         ORDER BY created_at DESC",
        USER_COLUMNS
    ))
    .bind(role)
    .fetch_all(pool)
    .await?;
    Ok(users)
}

pub async fn set_banned(pool: &PgPool, id: Uuid, banned: bool) -> Result<UserRow, AppError> {
    let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(AppError::InvalidArgs("User not found.".to_string()));
    }

    let user = sqlx::query_as::<_, UserRow>(&format!(
        "UPDATE users SET banned = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
        USER_COLUMNS
    ))
    .bind(id)
    .bind(banned)
    .fetch_one(pool)
    .await?;
    Ok(user)
}
