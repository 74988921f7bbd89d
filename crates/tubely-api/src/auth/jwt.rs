use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tubely_core::AppError;
use uuid::Uuid;

const TOKEN_ISSUER: &str = "tubely-access";

/// Claims carried by an access token. `sub` is the user id.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 access-token verification and minting.
#[derive(Clone)]
pub struct JwtAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtAuthenticator {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Resolve the calling user from an `Authorization: Bearer <token>` header.
    pub fn resolve_principal(&self, headers: &HeaderMap) -> Result<Uuid, AppError> {
        let auth_header = headers
            .get(AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::Unauthorized("Invalid authorization header format".to_string())
            })?;

        let claims = self.validate_token(token)?;

        Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<AccessClaims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = 0;

        let token_data =
            decode::<AccessClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                tracing::debug!("JWT validation failed: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::Unauthorized("Token has expired".to_string())
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                        AppError::Unauthorized("Invalid token issuer".to_string())
                    }
                    _ => AppError::Unauthorized("Invalid or expired token".to_string()),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Mint an access token for `user_id` valid for `expires_in`.
    pub fn issue_token(&self, user_id: Uuid, expires_in: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = AccessClaims {
            iss: TOKEN_ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }
}
