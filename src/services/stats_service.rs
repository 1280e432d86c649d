use chrono::{Datelike, Utc};
use sqlx::PgPool;

use crate::types::stats_types::{BookingCounts, DashboardStats};
use crate::utils::error::AppError;

/// The histogram always aggregates the bookings table; the identifier is
/// part of the SQL text and never spliced in from caller input.
const MONTHLY_BOOKING_COUNTS_SQL: &str = "SELECT EXTRACT(MONTH FROM created_at)::INT AS month, COUNT(*) AS count
     FROM bookings
     WHERE EXTRACT(YEAR FROM created_at)::INT = $1
     GROUP BY month
     ORDER BY month";

pub async fn compute_dashboard_stats(pool: &PgPool) -> Result<DashboardStats, AppError> {
    let total_users = count_users_with_role(pool, "USER").await?;
    let total_owners = count_users_with_role(pool, "OWNER").await?;

    let total_venues: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM facilities")
        .fetch_one(pool)
        .await?;
    let total_bookings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
        .fetch_one(pool)
        .await?;

    let current_year = Utc::now().year();
    let current = booking_counts_for_year(pool, current_year).await?;
    let last = booking_counts_for_year(pool, current_year - 1).await?;

    Ok(DashboardStats {
        total_users,
        total_owners,
        total_venues,
        total_bookings,
        total_booking_counts: BookingCounts {
            current_year: current,
            last_year: last,
        },
    })
}

async fn count_users_with_role(pool: &PgPool, role: &str) -> Result<i64, AppError> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = $1")
        .bind(role)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

async fn booking_counts_for_year(pool: &PgPool, year: i32) -> Result<[i64; 12], AppError> {
    let rows: Vec<(i32, i64)> = sqlx::query_as(MONTHLY_BOOKING_COUNTS_SQL)
        .bind(year)
        .fetch_all(pool)
        .await?;
    Ok(zero_filled_months(&rows))
}

/// Month m lands at index m-1; months without bookings stay zero. An
/// empty year produces an all-zero array rather than an error.
pub(crate) fn zero_filled_months(rows: &[(i32, i64)]) -> [i64; 12] {
    let mut counts = [0i64; 12];
    for (month, count) in rows {
        if (1..=12).contains(month) {
            counts[(month - 1) as usize] = *count;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_year_is_all_zero() {
        assert_eq!(zero_filled_months(&[]), [0i64; 12]);
    }

    #[test]
    fn months_are_one_indexed_in_rows() {
        let counts = zero_filled_months(&[(1, 3), (6, 7), (12, 2)]);
        assert_eq!(counts[0], 3);
        assert_eq!(counts[5], 7);
        assert_eq!(counts[11], 2);
        assert_eq!(counts.iter().sum::<i64>(), 12);
    }

    #[test]
    fn out_of_range_months_are_ignored() {
        assert_eq!(zero_filled_months(&[(0, 5), (13, 5)]), [0i64; 12]);
    }
}
