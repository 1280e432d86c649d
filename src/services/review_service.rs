use sqlx::PgPool;
use uuid::Uuid;

use crate::models::review_model::{ReviewRow, ReviewWithUser};
use crate::models::user_model::UserRow;
use crate::types::review_types::SubmitReviewInput;
use crate::utils::error::AppError;

pub async fn submit_review(
    pool: &PgPool,
    input: &SubmitReviewInput,
) -> Result<ReviewRow, AppError> {
    let existing: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM reviews WHERE user_id = $1 AND facility_id = $2")
            .bind(input.user_id)
            .bind(input.facility_id)
            .fetch_optional(pool)
            .await?;
    if existing.is_some() {
        return Err(AppError::InvalidArgs(
            "You have already reviewed this court.".to_string(),
        ));
    }

    let review = sqlx::query_as::<_, ReviewRow>(
        "INSERT INTO reviews (id, user_id, facility_id, rating, comment, created_at)
         VALUES ($1, $2, $3, $4, $5, NOW())
         RETURNING id, user_id, facility_id, rating, comment, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(input.user_id)
    .bind(input.facility_id)
    .bind(input.rating)
    .bind(input.comment.as_deref())
    .fetch_one(pool)
    .await?;
    Ok(review)
}

pub async fn list_reviews(
    pool: &PgPool,
    facility_id: Uuid,
) -> Result<(Vec<ReviewWithUser>, Option<f64>), AppError> {
    let rows = sqlx::query_as::<_, ReviewRow>(
        "SELECT id, user_id, facility_id, rating, comment, created_at
         FROM reviews
         WHERE facility_id = $1
         ORDER BY created_at DESC",
    )
    .bind(facility_id)
    .fetch_all(pool)
    .await?;

    let avg = average_rating(&rows.iter().map(|r| r.rating).collect::<Vec<_>>());

    let mut reviews = Vec::with_capacity(rows.len());
    for review in rows {
        let user = sqlx::query_as::<_, UserRow>(
            "SELECT id, full_name, email, password, role, banned, email_verified_at,
                    verification_token, created_at, updated_at
             FROM users WHERE id = $1",
        )
        .bind(review.user_id)
        .fetch_one(pool)
        .await?;
        reviews.push(ReviewWithUser { review, user });
    }

    Ok((reviews, avg))
}

/// Arithmetic mean of the ratings; None (serialized as null) when there
/// are no reviews yet, never zero.
pub(crate) fn average_rating(ratings: &[i32]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    Some(ratings.iter().map(|r| *r as f64).sum::<f64>() / ratings.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_reviews_means_no_average() {
        assert_eq!(average_rating(&[]), None);
    }

    #[test]
    fn mean_over_ratings() {
        assert_eq!(average_rating(&[4]), Some(4.0));
        assert_eq!(average_rating(&[1, 2, 3, 4, 5]), Some(3.0));
        assert_eq!(average_rating(&[4, 5]), Some(4.5));
    }
}
