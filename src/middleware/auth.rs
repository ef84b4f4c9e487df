use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::error::AppError;
use crate::models::auth::{AuthenticatedUser, Claims};

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let secret = parts
            .extensions
            .get::<JwtSecret>()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("JWT secret not configured")))?;

        decode_access_token(token, &secret.0)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))
    }
}

/// Extension type to carry the identity provider's JWT secret through request extensions.
#[derive(Clone)]
pub struct JwtSecret(pub String);

/// The token from an `Authorization: Bearer <token>` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
}

pub fn decode_access_token(token: &str, secret: &str) -> Result<AuthenticatedUser, anyhow::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    // Provider tokens carry aud="authenticated"; the signature is what we trust.
    validation.validate_aud = false;

    let data = decode::<Claims>(token, &key, &validation)?;
    let claims = data.claims;

    Ok(AuthenticatedUser {
        user_id: claims.sub.parse()?,
        email: claims.email,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    use super::*;

    fn token(sub: &str, secret: &str, exp_offset: i64) -> String {
        let claims = Claims {
            sub: sub.into(),
            email: Some("cook@example.com".into()),
            role: Some("authenticated".into()),
            exp: (Utc::now().timestamp() + exp_offset) as usize,
            iat: Some(Utc::now().timestamp() as usize),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_valid_token() {
        let id = Uuid::new_v4();
        let user = decode_access_token(&token(&id.to_string(), "s3cret", 3600), "s3cret").unwrap();
        assert_eq!(user.user_id, id);
        assert_eq!(user.email.as_deref(), Some("cook@example.com"));
    }

    #[test]
    fn test_reject_wrong_secret_and_expired() {
        let id = Uuid::new_v4().to_string();
        assert!(decode_access_token(&token(&id, "s3cret", 3600), "other").is_err());
        assert!(decode_access_token(&token(&id, "s3cret", -3600), "s3cret").is_err());
    }

    #[test]
    fn test_reject_non_uuid_subject() {
        assert!(decode_access_token(&token("not-a-uuid", "s3cret", 3600), "s3cret").is_err());
    }
}
