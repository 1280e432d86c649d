use serde::{Serialize, Serializer};
use serde_json::Value;

/// Closed set of application status codes carried in every response
/// envelope, separate from the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerCode {
    Success,
    UnknownError,
    ValidationError,
    AuthError,
    InvalidArgs,
}

impl ServerCode {
    pub fn as_u16(self) -> u16 {
        match self {
            ServerCode::Success => 0,
            ServerCode::UnknownError => 1,
            ServerCode::ValidationError => 2,
            ServerCode::AuthError => 3,
            ServerCode::InvalidArgs => 4,
        }
    }
}

impl Serialize for ServerCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.as_u16())
    }
}

/// Shared response envelope. Pagination fields are only present on list
/// responses; `data` is always a JSON array when present.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub code: ServerCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_records: Option<i64>,
}

impl ApiResponse {
    pub fn success(message: impl Into<String>, data: Value) -> Self {
        ApiResponse {
            code: ServerCode::Success,
            message: Some(message.into()),
            data: Some(data),
            current_page: None,
            page_size: None,
            total_pages: None,
            total_records: None,
        }
    }

    pub fn page(
        message: impl Into<String>,
        data: Value,
        current_page: i64,
        page_size: i64,
        total_records: i64,
    ) -> Self {
        ApiResponse {
            code: ServerCode::Success,
            message: Some(message.into()),
            data: Some(data),
            current_page: Some(current_page),
            page_size: Some(page_size),
            total_pages: Some(total_pages(total_records, page_size)),
            total_records: Some(total_records),
        }
    }

    pub fn failure(code: ServerCode, message: impl Into<String>) -> Self {
        ApiResponse {
            code,
            message: Some(message.into()),
            data: None,
            current_page: None,
            page_size: None,
            total_pages: None,
            total_records: None,
        }
    }

    pub fn with_total_records(mut self, total_records: i64) -> Self {
        self.total_records = Some(total_records);
        self
    }
}

pub fn total_pages(total_records: i64, page_size: i64) -> i64 {
    if page_size <= 0 {
        return 0;
    }
    (total_records + page_size - 1) / page_size
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn server_codes_are_stable() {
        assert_eq!(ServerCode::Success.as_u16(), 0);
        assert_eq!(ServerCode::UnknownError.as_u16(), 1);
        assert_eq!(ServerCode::ValidationError.as_u16(), 2);
        assert_eq!(ServerCode::AuthError.as_u16(), 3);
        assert_eq!(ServerCode::InvalidArgs.as_u16(), 4);
    }

    #[test]
    fn envelope_omits_absent_fields() {
        let body = serde_json::to_value(ApiResponse::failure(
            ServerCode::InvalidArgs,
            "Booking does not exist.",
        ))
        .unwrap();
        assert_eq!(
            body,
            json!({ "code": 4, "message": "Booking does not exist." })
        );
    }

    #[test]
    fn page_envelope_carries_pagination_metadata() {
        let body = serde_json::to_value(ApiResponse::page(
            "Bookings fetched successfully.",
            json!([]),
            2,
            10,
            31,
        ))
        .unwrap();
        assert_eq!(body["currentPage"], 2);
        assert_eq!(body["pageSize"], 10);
        assert_eq!(body["totalPages"], 4);
        assert_eq!(body["totalRecords"], 31);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 0);
    }
}
