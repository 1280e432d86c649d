use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::booking_model::{BookingDetail, BookingRow};
use crate::models::user_model::UserRow;
use crate::models::venue_model::CourtRow;
use crate::types::booking_types::{CreateBookingInput, UpdateBookingInput};
use crate::utils::error::AppError;

const OVERLAP_MESSAGE: &str = "Court is already booked for the selected time.";
const DEFAULT_STATUS: &str = "PENDING_PAYMENT";

const BOOKING_COLUMNS: &str =
    "id, user_id, court_id, starts_at, ends_at, total_price, status, created_at";

/// Closed-bound interval intersection: abutting bookings whose end and
/// start fall on the same instant are treated as overlapping. The SQL
/// probes below encode the same predicate.
#[cfg(test)]
fn intervals_overlap(
    existing: (DateTime<Utc>, DateTime<Utc>),
    candidate: (DateTime<Utc>, DateTime<Utc>),
) -> bool {
    existing.0 <= candidate.1 && existing.1 >= candidate.0
}

/// The probe-then-insert sequence is only safe when both steps share a
/// serializable transaction; of two concurrent overlapping writers one
/// commit fails instead of silently double-booking the court.
async fn set_transaction_serializable(
    tx: &mut Transaction<'_, Postgres>,
) -> Result<(), AppError> {
    sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub async fn create_booking(
    pool: &PgPool,
    input: &CreateBookingInput,
) -> Result<BookingRow, AppError> {
    let mut tx = pool.begin().await?;
    set_transaction_serializable(&mut tx).await?;

    let overlap: Option<Uuid> = sqlx::query_scalar(
        "SELECT id FROM bookings
         WHERE court_id = $1 AND starts_at <= $3 AND ends_at >= $2
         LIMIT 1",
    )
    .bind(input.court_id)
    .bind(input.starts_at)
    .bind(input.ends_at)
    .fetch_optional(&mut *tx)
    .await?;

    if overlap.is_some() {
        return Err(AppError::InvalidArgs(OVERLAP_MESSAGE.to_string()));
    }

    let booking = sqlx::query_as::<_, BookingRow>(
        "INSERT INTO bookings (id, user_id, court_id, starts_at, ends_at, total_price, status, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
         RETURNING id, user_id, court_id, starts_at, ends_at, total_price, status, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(input.user_id)
    .bind(input.court_id)
    .bind(input.starts_at)
    .bind(input.ends_at)
    .bind(input.total_price)
    .bind(input.status.as_deref().unwrap_or(DEFAULT_STATUS))
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(booking)
}

pub async fn update_booking(
    pool: &PgPool,
    input: &UpdateBookingInput,
) -> Result<BookingDetail, AppError> {
    let mut tx = pool.begin().await?;
    set_transaction_serializable(&mut tx).await?;

    let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM bookings WHERE id = $1")
        .bind(input.id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(AppError::InvalidArgs("Booking does not exist.".to_string()));
    }

    // Same probe as create, minus the booking's own row.
    let overlap: Option<Uuid> = sqlx::query_scalar(
        "SELECT id FROM bookings
         WHERE court_id = $1 AND id <> $4 AND starts_at <= $3 AND ends_at >= $2
         LIMIT 1",
    )
    .bind(input.court_id)
    .bind(input.starts_at)
    .bind(input.ends_at)
    .bind(input.id)
    .fetch_optional(&mut *tx)
    .await?;

    if overlap.is_some() {
        return Err(AppError::InvalidArgs(OVERLAP_MESSAGE.to_string()));
    }

    let booking = sqlx::query_as::<_, BookingRow>(
        "UPDATE bookings
         SET user_id = $2, court_id = $3, starts_at = $4, ends_at = $5, total_price = $6, status = $7
         WHERE id = $1
         RETURNING id, user_id, court_id, starts_at, ends_at, total_price, status, created_at",
    )
    .bind(input.id)
    .bind(input.user_id)
    .bind(input.court_id)
    .bind(input.starts_at)
    .bind(input.ends_at)
    .bind(input.total_price)
    .bind(input.status.as_deref().unwrap_or(DEFAULT_STATUS))
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    load_relations(pool, booking).await
}

pub async fn delete_booking(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM bookings WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(AppError::InvalidArgs("Booking does not exist.".to_string()));
    }

    // No status guard: deleting is how a confirmed booking gets cancelled.
    sqlx::query("DELETE FROM bookings WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn get_booking(pool: &PgPool, id: Uuid) -> Result<BookingDetail, AppError> {
    let booking = sqlx::query_as::<_, BookingRow>(&format!(
        "SELECT {} FROM bookings WHERE id = $1",
        BOOKING_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::InvalidArgs("Booking not found.".to_string()))?;

    load_relations(pool, booking).await
}

pub async fn list_bookings(
    pool: &PgPool,
    user_id: Option<Uuid>,
    court_id: Option<Uuid>,
    page: i64,
    page_size: i64,
) -> Result<(Vec<BookingDetail>, i64), AppError> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM bookings
         WHERE ($1::uuid IS NULL OR user_id = $1)
           AND ($2::uuid IS NULL OR court_id = $2)",
    )
    .bind(user_id)
    .bind(court_id)
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query_as::<_, BookingRow>(&format!(
        "SELECT {} FROM bookings
         WHERE ($1::uuid IS NULL OR user_id = $1)
           AND ($2::uuid IS NULL OR court_id = $2)
         ORDER BY starts_at DESC
         LIMIT $3 OFFSET $4",
        BOOKING_COLUMNS
    ))
    .bind(user_id)
    .bind(court_id)
    .bind(page_size)
    .bind((page - 1) * page_size)
    .fetch_all(pool)
    .await?;

    let mut details = Vec::with_capacity(rows.len());
    for row in rows {
        details.push(load_relations(pool, row).await?);
    }
    Ok((details, total))
}

async fn load_relations(pool: &PgPool, booking: BookingRow) -> Result<BookingDetail, AppError> {
    let user = sqlx::query_as::<_, UserRow>(
        "SELECT id, full_name, email, password, role, banned, email_verified_at,
                verification_token, created_at, updated_at
         FROM users WHERE id = $1",
    )
    .bind(booking.user_id)
    .fetch_one(pool)
    .await?;

    let court = sqlx::query_as::<_, CourtRow>(
        "SELECT id, facility_id, name, sport, price_per_hour, created_at, updated_at
         FROM courts WHERE id = $1",
    )
    .bind(booking.court_id)
    .fetch_one(pool)
    .await?;

    Ok(BookingDetail {
        booking,
        user,
        court,
    })
}
