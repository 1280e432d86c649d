use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::middleware::auth::authenticated_user;
use crate::services::review_service;
use crate::types::parse_optional_id;
use crate::types::review_types::{ListReviewsQuery, SubmitReviewInput};
use crate::utils::error::AppError;
use crate::utils::responses::ApiResponse;

#[post("/reviews")]
pub async fn submit_review(
    req: HttpRequest,
    pool: web::Data<sqlx::PgPool>,
    body: web::Json<SubmitReviewInput>,
) -> Result<HttpResponse, AppError> {
    authenticated_user(&req)?;
    body.validate().map_err(AppError::from_validation)?;

    let review = review_service::submit_review(&pool, &body).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Review submitted successfully.",
        json!([review]),
    )))
}

#[get("/reviews")]
pub async fn get_reviews(
    pool: web::Data<sqlx::PgPool>,
    query: web::Query<ListReviewsQuery>,
) -> Result<HttpResponse, AppError> {
    let facility_id = parse_optional_id(query.facility_id.as_deref(), "facilityId")?
        .ok_or_else(|| AppError::InvalidArgs("facilityId is required.".to_string()))?;

    let (reviews, avg_rating) = review_service::list_reviews(&pool, facility_id).await?;
    let total = reviews.len() as i64;
    Ok(HttpResponse::Ok().json(
        ApiResponse::success(
            "Reviews fetched successfully.",
            json!([{ "reviews": reviews, "avgRating": avg_rating }]),
        )
        .with_total_records(total),
    ))
}
