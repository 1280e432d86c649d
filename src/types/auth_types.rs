use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, Validate, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SignUpInput {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 25, message = "Password is required"))]
    pub password: String,
    #[validate(custom(function = "crate::types::validate_role"))]
    pub role: String,
}

#[derive(Deserialize, Validate, Debug)]
pub struct LoginInput {
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct BanUserInput {
    pub id: Uuid,
    pub banned: bool,
}

#[derive(Deserialize, Debug)]
pub struct ListUsersQuery {
    pub role: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct VerifyEmailQuery {
    pub token: Option<String>,
}
