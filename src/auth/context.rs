use std::fmt;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use time::OffsetDateTime;
use tracing::debug;

use super::claims::TokenClaims;
use crate::error::ApiError;

/// Bearer credential attached to every authenticated request.
///
/// Only presence is enforced on the client. Signature and expiry are the
/// service's business; [`AuthContext::claims`] reads the payload for display.
#[derive(Clone, Default)]
pub struct AuthContext {
    token: Option<String>,
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl AuthContext {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        *self = Self::new(Some(token.into()));
    }

    pub fn is_present(&self) -> bool {
        self.token.is_some()
    }

    /// The raw token, or `Unauthorized` when none is configured.
    pub fn bearer(&self) -> Result<&str, ApiError> {
        self.token
            .as_deref()
            .ok_or_else(|| ApiError::Unauthorized("missing access token".into()))
    }

    /// Decodes the token payload without checking its signature.
    pub fn claims(&self) -> Option<TokenClaims> {
        let token = self.token.as_deref()?;
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        match decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                debug!(error = %e, "access token payload is not readable");
                None
            }
        }
    }

    pub fn is_expired(&self) -> bool {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        self.claims()
            .and_then(|c| c.exp)
            .is_some_and(|exp| exp <= now)
    }
}
