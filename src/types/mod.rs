pub mod auth_types;
pub mod booking_types;
pub mod review_types;
pub mod stats_types;
pub mod venue_types;

use uuid::Uuid;
use validator::ValidationError;

use crate::utils::error::AppError;

pub const ROLES: [&str; 3] = ["USER", "OWNER", "ADMIN"];
pub const SPORTS: [&str; 5] = ["BADMINTON", "FOOTBALL", "TENNIS", "TABLE_TENNIS", "CRICKET"];
pub const BOOKING_STATUSES: [&str; 4] =
    ["PENDING_PAYMENT", "CONFIRMED", "CANCELLED", "COMPLETED"];
pub const VENUE_STATUSES: [&str; 3] = ["PENDING", "APPROVED", "REJECTED"];

fn enum_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

pub fn validate_role(role: &str) -> Result<(), ValidationError> {
    if ROLES.contains(&role) {
        Ok(())
    } else {
        Err(enum_error("role", "Role must be one of: USER, OWNER, ADMIN"))
    }
}

pub fn validate_sport(sport: &str) -> Result<(), ValidationError> {
    if SPORTS.contains(&sport) {
        Ok(())
    } else {
        Err(enum_error(
            "sport",
            "Sport must be one of BADMINTON, FOOTBALL, TENNIS, TABLE_TENNIS, CRICKET",
        ))
    }
}

pub fn validate_booking_status(status: &str) -> Result<(), ValidationError> {
    if BOOKING_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(enum_error(
            "booking_status",
            "Status must be one of PENDING_PAYMENT, CONFIRMED, CANCELLED, COMPLETED",
        ))
    }
}

pub fn validate_venue_status(status: &str) -> Result<(), ValidationError> {
    if VENUE_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(enum_error(
            "venue_status",
            "Status must be one of PENDING, APPROVED, REJECTED",
        ))
    }
}

/// Query-string ids arrive as plain strings; the dashboard sends empty
/// strings for unset filters, which count as absent.
pub fn parse_optional_id(value: Option<&str>, field: &str) -> Result<Option<Uuid>, AppError> {
    match value {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => raw
            .parse::<Uuid>()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("{} must be a valid id", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_validators_accept_members_and_reject_strangers() {
        assert!(validate_sport("TABLE_TENNIS").is_ok());
        assert!(validate_sport("CHESS").is_err());
        assert!(validate_booking_status("CONFIRMED").is_ok());
        assert!(validate_booking_status("confirmed").is_err());
        assert!(validate_venue_status("APPROVED").is_ok());
        assert!(validate_venue_status("LIVE").is_err());
        assert!(validate_role("OWNER").is_ok());
        assert!(validate_role("ROOT").is_err());
    }

    #[test]
    fn optional_id_treats_empty_as_absent() {
        assert_eq!(parse_optional_id(None, "id").unwrap(), None);
        assert_eq!(parse_optional_id(Some(""), "id").unwrap(), None);
        let id = Uuid::new_v4();
        assert_eq!(
            parse_optional_id(Some(&id.to_string()), "id").unwrap(),
            Some(id)
        );
        assert!(parse_optional_id(Some("not-a-uuid"), "id").is_err());
    }
}
