mod controllers;
mod middleware;
mod models;
mod services;
mod types;
mod utils;

use actix_web::{error::InternalError, web, App, HttpResponse, HttpServer, Responder};
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::env;

use crate::controllers::booking_controller::{
    create_booking, delete_booking, get_bookings, update_booking,
};
use crate::controllers::review_controller::{get_reviews, submit_review};
use crate::controllers::stats_controller::get_dashboard_stats;
use crate::controllers::user_controller::{ban_user, get_users, login, signup, verify_email};
use crate::controllers::venue_controller::{
    create_venue, delete_venue, get_venues, update_venue,
};
use crate::middleware::auth::AuthMiddleware;
use crate::utils::responses::{ApiResponse, ServerCode};

async fn health() -> impl Responder {
    HttpResponse::Ok()
        .content_type("application/json")
        .body(r#"{"status": "Ok"}"#)
}

/// Malformed payloads never reach a handler; they get the same envelope
/// shape as every other validation failure.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let body = HttpResponse::BadRequest().json(ApiResponse::failure(
            ServerCode::ValidationError,
            err.to_string(),
        ));
        InternalError::from_response(err, body).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let body = HttpResponse::BadRequest().json(ApiResponse::failure(
            ServerCode::ValidationError,
            err.to_string(),
        ));
        InternalError::from_response(err, body).into()
    })
}

async fn run() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    log::info!("Connected to Postgres, migrations applied");

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string());

    // The gate wraps the whole app; its allow-list decides which of
    // these routes answer without a token.
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(json_config())
            .app_data(query_config())
            .wrap(AuthMiddleware)
            .service(signup)
            .service(login)
            .service(verify_email)
            .service(get_venues)
            .service(get_reviews)
            .service(create_booking)
            .service(get_bookings)
            .service(update_booking)
            .service(delete_booking)
            .service(create_venue)
            .service(update_venue)
            .service(delete_venue)
            .service(submit_review)
            .service(get_dashboard_stats)
            .service(get_users)
            .service(ban_user)
            .route("/health", web::get().to(health))
    })
    .bind(bind_addr)?
    .run()
    .await
}

fn main() -> std::io::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build Tokio runtime");
    runtime.block_on(run())
}
