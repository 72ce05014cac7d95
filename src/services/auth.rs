use crate::models::UserProfile;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while resolving the caller's session
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization header must use the Bearer scheme")]
    MalformedHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// Claims carried by access tokens from the hosted auth service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Identity and profile of the caller for one request
///
/// Built at the edge and handed to the recommender explicitly. Anonymous
/// sessions have neither a user id nor a profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    pub user_id: Option<String>,
    pub profile: Option<UserProfile>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            profile: None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none()
    }
}

/// Verifies HS256 access tokens and turns them into sessions
pub struct SessionVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(secret: &str, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        Ok(data.claims)
    }

    /// Resolve a session from an optional `Authorization` header value
    ///
    /// A missing header yields an anonymous session.
    pub fn session_from_header(&self, header: Option<&str>) -> Result<SessionContext, AuthError> {
        let Some(header) = header else {
            return Ok(SessionContext::anonymous());
        };

        let token = bearer_token(header).ok_or(AuthError::MalformedHeader)?;
        let claims = self.verify(token)?;

        tracing::debug!("Resolved session for user {}", claims.sub);

        Ok(SessionContext::for_user(claims.sub))
    }
}

fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
