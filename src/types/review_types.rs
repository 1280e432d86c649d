use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, Validate, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewInput {
    pub user_id: Uuid,
    pub facility_id: Uuid,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ListReviewsQuery {
    pub facility_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::first_validation_message;

    fn input(rating: i32) -> SubmitReviewInput {
        SubmitReviewInput {
            user_id: Uuid::new_v4(),
            facility_id: Uuid::new_v4(),
            rating,
            comment: None,
        }
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        assert!(input(1).validate().is_ok());
        assert!(input(5).validate().is_ok());
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        let msg = first_validation_message(&input(6).validate().unwrap_err());
        assert_eq!(msg, "Rating must be between 1 and 5");
        assert!(input(0).validate().is_err());
    }
}
