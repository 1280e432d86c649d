use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::middleware::auth::authenticated_user;
use crate::services::venue_service;
use crate::types::parse_optional_id;
use crate::types::venue_types::{
    CreateVenueInput, DeleteVenueInput, ListVenuesQuery, UpdateVenueInput,
};
use crate::utils::error::AppError;
use crate::utils::responses::ApiResponse;

#[post("/venues")]
pub async fn create_venue(
    req: HttpRequest,
    pool: web::Data<sqlx::PgPool>,
    body: web::Json<CreateVenueInput>,
) -> Result<HttpResponse, AppError> {
    // Ownership comes from the verified token, never from the payload.
    let auth = authenticated_user(&req)?;
    body.validate().map_err(AppError::from_validation)?;

    let venue = venue_service::create_venue(&pool, auth.user_id, &body).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Venue added successfully",
        json!([venue]),
    )))
}

#[get("/venues")]
pub async fn get_venues(
    pool: web::Data<sqlx::PgPool>,
    query: web::Query<ListVenuesQuery>,
) -> Result<HttpResponse, AppError> {
    if let Some(id) = parse_optional_id(query.id.as_deref(), "id")? {
        let venue = venue_service::get_venue(&pool, id).await?;
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            "Venue details fetched successfully.",
            json!([venue]),
        )));
    }

    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(10).clamp(1, 100);

    let (venues, total) =
        venue_service::list_venues(&pool, query.query.as_deref(), page, page_size).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::page(
        "Venues fetched successfully.",
        json!(venues),
        page,
        page_size,
        total,
    )))
}

#[put("/venues")]
pub async fn update_venue(
    req: HttpRequest,
    pool: web::Data<sqlx::PgPool>,
    body: web::Json<UpdateVenueInput>,
) -> Result<HttpResponse, AppError> {
    authenticated_user(&req)?;
    body.validate().map_err(AppError::from_validation)?;

    let venue = venue_service::update_venue(&pool, &body).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Venue updated successfully.",
        json!([venue]),
    )))
}

#[delete("/venues")]
pub async fn delete_venue(
    req: HttpRequest,
    pool: web::Data<sqlx::PgPool>,
    body: web::Json<DeleteVenueInput>,
) -> Result<HttpResponse, AppError> {
    authenticated_user(&req)?;

    venue_service::delete_venue(&pool, body.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Venue deleted successfully.",
        json!([]),
    )))
}
