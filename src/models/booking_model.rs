use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::user_model::UserRow;
use crate::models::venue_model::CourtRow;

#[derive(Serialize, Debug, Clone, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookingRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub court_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub total_price: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Booking with its related user and court, as embedded in detail and
/// list responses.
#[derive(Serialize, Debug, Clone)]
pub struct BookingDetail {
    #[serde(flatten)]
    pub booking: BookingRow,
    pub user: UserRow,
    pub court: CourtRow,
}
