use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, Validate, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingInput {
    pub user_id: Uuid,
    pub court_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[validate(range(min = 0.0, message = "Total price must be at least 0"))]
    pub total_price: f64,
    #[validate(custom(function = "crate::types::validate_booking_status"))]
    pub status: Option<String>,
}

#[derive(Deserialize, Validate, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingInput {
    pub id: Uuid,
    pub user_id: Uuid,
    pub court_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[validate(range(min = 0.0, message = "Total price must be at least 0"))]
    pub total_price: f64,
    #[validate(custom(function = "crate::types::validate_booking_status"))]
    pub status: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct DeleteBookingInput {
    pub id: Uuid,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ListBookingsQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub user_id: Option<String>,
    pub court_id: Option<String>,
    pub id: Option<String>,
}
