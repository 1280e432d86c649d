use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::middleware::auth::authenticated_user;
use crate::services::booking_service;
use crate::types::booking_types::{
    CreateBookingInput, DeleteBookingInput, ListBookingsQuery, UpdateBookingInput,
};
use crate::types::parse_optional_id;
use crate::utils::error::AppError;
use crate::utils::responses::ApiResponse;

#[post("/bookings")]
pub async fn create_booking(
    req: HttpRequest,
    pool: web::Data<sqlx::PgPool>,
    body: web::Json<CreateBookingInput>,
) -> Result<HttpResponse, AppError> {
    authenticated_user(&req)?;
    body.validate().map_err(AppError::from_validation)?;

    let booking = booking_service::create_booking(&pool, &body).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Booking created successfully.",
        json!([booking]),
    )))
}

/// A present `id` filter narrows the listing down to a single booking
/// detail; otherwise the result is a paginated page.
#[get("/bookings")]
pub async fn get_bookings(
    req: HttpRequest,
    pool: web::Data<sqlx::PgPool>,
    query: web::Query<ListBookingsQuery>,
) -> Result<HttpResponse, AppError> {
    authenticated_user(&req)?;

    if let Some(id) = parse_optional_id(query.id.as_deref(), "id")? {
        let booking = booking_service::get_booking(&pool, id).await?;
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            "Booking details fetched successfully.",
            json!([booking]),
        )));
    }

    let user_id = parse_optional_id(query.user_id.as_deref(), "userId")?;
    let court_id = parse_optional_id(query.court_id.as_deref(), "courtId")?;
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(10).clamp(1, 100);

    let (bookings, total) =
        booking_service::list_bookings(&pool, user_id, court_id, page, page_size).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::page(
        "Bookings fetched successfully.",
        json!(bookings),
        page,
        page_size,
        total,
    )))
}

#[put("/bookings")]
pub async fn update_booking(
    req: HttpRequest,
    pool: web::Data<sqlx::PgPool>,
    body: web::Json<UpdateBookingInput>,
) -> Result<HttpResponse, AppError> {
    authenticated_user(&req)?;
    body.validate().map_err(AppError::from_validation)?;

    let booking = booking_service::update_booking(&pool, &body).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Booking updated successfully.",
        json!([booking]),
    )))
}

#[delete("/bookings")]
pub async fn delete_booking(
    req: HttpRequest,
    pool: web::Data<sqlx::PgPool>,
    body: web::Json<DeleteBookingInput>,
) -> Result<HttpResponse, AppError> {
    authenticated_user(&req)?;

    booking_service::delete_booking(&pool, body.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Booking deleted successfully.",
        json!([]),
    )))
}
