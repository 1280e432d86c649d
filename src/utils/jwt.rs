use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims mirror the wire names the dashboard expects. `user_id` stays
/// optional so a decodable token without the claim is distinguishable
/// from a token that fails signature or expiry checks.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    pub exp: usize,
}

pub fn create_jwt(
    user_id: Uuid,
    role: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = Utc::now() + Duration::hours(24);

    let claims = Claims {
        user_id: Some(user_id.to_string()),
        parent_user_id: None,
        account_type: Some(role.to_string()),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
}

pub fn decode_jwt(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn round_trip_preserves_identity() {
        let user_id = Uuid::new_v4();
        let token = create_jwt(user_id, "OWNER", SECRET).unwrap();
        let claims = decode_jwt(&token, SECRET).unwrap();
        assert_eq!(claims.user_id.as_deref(), Some(user_id.to_string().as_str()));
        assert_eq!(claims.account_type.as_deref(), Some("OWNER"));
    }

    #[test]
    fn wrong_secret_fails_decode() {
        let token = create_jwt(Uuid::new_v4(), "USER", SECRET).unwrap();
        assert!(decode_jwt(&token, "other-secret").is_err());
    }

    #[test]
    fn expired_token_fails_decode() {
        let claims = Claims {
            user_id: Some(Uuid::new_v4().to_string()),
            parent_user_id: None,
            account_type: None,
            exp: (Utc::now() - Duration::hours(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_ref()),
        )
        .unwrap();
        assert!(decode_jwt(&token, SECRET).is_err());
    }

    #[test]
    fn token_without_user_id_claim_still_decodes() {
        let claims = Claims {
            user_id: None,
            parent_user_id: None,
            account_type: None,
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_ref()),
        )
        .unwrap();
        let decoded = decode_jwt(&token, SECRET).unwrap();
        assert!(decoded.user_id.is_none());
    }
}
