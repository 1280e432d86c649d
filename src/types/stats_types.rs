use serde::Serialize;

/// Aggregates served to the dashboard overview page.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_owners: i64,
    pub total_venues: i64,
    pub total_bookings: i64,
    pub total_booking_counts: BookingCounts,
}

/// Month-indexed booking counts, index 0 = January.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BookingCounts {
    pub current_year: [i64; 12],
    pub last_year: [i64; 12],
}
