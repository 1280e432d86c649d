use std::env;

use actix_web::{get, post, put, web, HttpRequest, HttpResponse};
use bcrypt::verify;
use serde_json::json;
use validator::Validate;

use crate::middleware::auth::authenticated_user;
use crate::services::user_service;
use crate::types::auth_types::{
    BanUserInput, ListUsersQuery, LoginInput, SignUpInput, VerifyEmailQuery,
};
use crate::utils::error::AppError;
use crate::utils::jwt::create_jwt;
use crate::utils::responses::ApiResponse;

#[post("/signup")]
pub async fn signup(
    pool: web::Data<sqlx::PgPool>,
    body: web::Json<SignUpInput>,
) -> Result<HttpResponse, AppError> {
    body.validate().map_err(AppError::from_validation)?;

    let user = user_service::signup(&pool, &body).await?;

    // No mail transport is wired up; the link lands in the server log so
    // operators can hand it over or a mailer can be attached later.
    let base_url = env::var("APP_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    if let Some(token) = &user.verification_token {
        log::info!(
            "verification link for {}: {}/verify-email?token={}",
            user.email,
            base_url,
            token
        );
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "User added successfully. Please check your email to verify your account.",
        json!([user]),
    )))
}

#[post("/login")]
pub async fn login(
    pool: web::Data<sqlx::PgPool>,
    body: web::Json<LoginInput>,
) -> Result<HttpResponse, AppError> {
    body.validate().map_err(AppError::from_validation)?;

    let user = user_service::find_by_email(&pool, &body.email)
        .await?
        .ok_or_else(|| AppError::InvalidArgs("User not found".to_string()))?;

    if user.banned {
        return Err(AppError::Forbidden(
            "Your account has been banned. Please contact support.".to_string(),
        ));
    }
    if user.email_verified_at.is_none() {
        return Err(AppError::Forbidden(
            "Please verify your email address.".to_string(),
        ));
    }

    let matches = verify(&body.password, &user.password)
        .map_err(|e| AppError::Internal(format!("password verification failed: {}", e)))?;
    if !matches {
        return Err(AppError::InvalidArgs("Incorrect Password.".to_string()));
    }

    let secret =
        env::var("JWT_SECRET").map_err(|_| AppError::Internal("JWT_SECRET is not configured".to_string()))?;
    let token = create_jwt(user.id, &user.role, &secret)
        .map_err(|e| AppError::Internal(format!("token creation failed: {}", e)))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "User logged in successfully.",
        json!([{ "token": token, "user": user }]),
    )))
}

#[get("/verify-email")]
pub async fn verify_email(
    pool: web::Data<sqlx::PgPool>,
    query: web::Query<VerifyEmailQuery>,
) -> Result<HttpResponse, AppError> {
    let token = query
        .token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::InvalidArgs("Verification token is required.".to_string()))?;

    let user = user_service::verify_email(&pool, token).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Email verified successfully.",
        json!([user]),
    )))
}

#[get("/users")]
pub async fn get_users(
    req: HttpRequest,
    pool: web::Data<sqlx::PgPool>,
    query: web::Query<ListUsersQuery>,
) -> Result<HttpResponse, AppError> {
    authenticated_user(&req)?;

    let users = user_service::list_users(&pool, query.role.as_deref()).await?;
    let total = users.len() as i64;
    Ok(HttpResponse::Ok().json(
        ApiResponse::success("Users fetched successfully.", json!(users))
            .with_total_records(total),
    ))
}

#[put("/users")]
pub async fn ban_user(
    req: HttpRequest,
    pool: web::Data<sqlx::PgPool>,
    body: web::Json<BanUserInput>,
) -> Result<HttpResponse, AppError> {
    authenticated_user(&req)?;

    let user = user_service::set_banned(&pool, body.id, body.banned).await?;
    let message = if body.banned {
        "User banned successfully."
    } else {
        "User unbanned successfully."
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(message, json!([user]))))
}
