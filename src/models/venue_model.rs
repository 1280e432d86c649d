use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Serialize, Debug, Clone, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FacilityRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub starting_price_per_hour: f64,
    pub status: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CourtRow {
    pub id: Uuid,
    pub facility_id: Uuid,
    pub name: String,
    pub sport: String,
    pub price_per_hour: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Venue detail as served by the API: facility fields with the court
/// collection embedded.
#[derive(Serialize, Debug, Clone)]
pub struct VenueWithCourts {
    #[serde(flatten)]
    pub facility: FacilityRow,
    pub courts: Vec<CourtRow>,
}
