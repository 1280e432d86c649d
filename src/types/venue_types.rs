use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A court inside a venue payload. On update, a present `id` means the
/// stored court is edited in place; an absent one means a new court.
/// Serialize is needed by the list-length rule on the venue payloads.
#[derive(Deserialize, Serialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CourtPayload {
    pub id: Option<Uuid>,
    #[validate(length(min = 1, message = "Court name is required"))]
    pub name: String,
    #[validate(custom(function = "crate::types::validate_sport"))]
    pub sport: String,
    #[validate(range(min = 0.0, message = "Price per hour must be at least 0"))]
    pub price_per_hour: f64,
}

#[derive(Deserialize, Validate, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateVenueInput {
    #[validate(length(min = 1, message = "Venue name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(range(min = 0.0, message = "Starting price per hour must be at least 0"))]
    pub starting_price_per_hour: f64,
    #[validate(length(min = 1, message = "At least one court is required"), nested)]
    pub courts: Vec<CourtPayload>,
}

#[derive(Deserialize, Validate, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVenueInput {
    pub id: Uuid,
    pub owner_id: Uuid,
    #[validate(length(min = 1, message = "Venue name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(range(min = 0.0, message = "Starting price per hour must be at least 0"))]
    pub starting_price_per_hour: f64,
    /// Administrative status transition rides the same update call.
    #[validate(custom(function = "crate::types::validate_venue_status"))]
    pub status: Option<String>,
    #[validate(length(min = 1, message = "At least one court is required"), nested)]
    pub courts: Vec<CourtPayload>,
}

#[derive(Deserialize, Debug)]
pub struct DeleteVenueInput {
    pub id: Uuid,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ListVenuesQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub query: Option<String>,
    pub id: Option<String>,
}
