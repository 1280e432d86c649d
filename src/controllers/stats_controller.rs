use actix_web::{get, web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::middleware::auth::authenticated_user;
use crate::services::stats_service;
use crate::utils::error::AppError;
use crate::utils::responses::ApiResponse;

#[get("/dashboard-stats")]
pub async fn get_dashboard_stats(
    req: HttpRequest,
    pool: web::Data<sqlx::PgPool>,
) -> Result<HttpResponse, AppError> {
    authenticated_user(&req)?;

    let stats = stats_service::compute_dashboard_stats(&pool).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Dashboard stats fetched successfully.",
        json!([stats]),
    )))
}
