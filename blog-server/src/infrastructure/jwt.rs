use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::access::Identity;

#[derive(Debug, Error)]
pub(crate) enum JwtError {
    #[error("token decode/validation failed")]
    Decode(#[source] jsonwebtoken::errors::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct IdentityClaim {
    pub(crate) username: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct Claims {
    pub(crate) identity: IdentityClaim,
    pub(crate) nbf: i64,
    pub(crate) exp: i64,
    pub(crate) iat: i64,
}

/// Verifies HS256 tokens minted by the identity service.
pub(crate) struct JwtService {
    secret: String,
}

impl JwtService {
    const LEEWAY_SECONDS: u64 = 10;

    pub(crate) fn new(secret: &str) -> Self {
        JwtService {
            secret: secret.into(),
        }
    }

    pub(crate) fn verify_token(&self, token: &str) -> Result<Identity, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = Self::LEEWAY_SECONDS;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(JwtError::Decode)?;

        Ok(Identity {
            username: token_data.claims.identity.username,
        })
    }

    #[cfg(test)]
    pub(crate) fn issue_token(
        &self,
        username: &str,
        ttl_seconds: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        use chrono::Utc;
        use jsonwebtoken::{EncodingKey, Header, encode};

        let now = Utc::now().timestamp();
        let claims = Claims {
            identity: IdentityClaim {
                username: username.into(),
            },
            nbf: now,
            exp: now + ttl_seconds,
            iat: now,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }
}
