use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Method;
use tracing::{info, instrument, warn};

use super::dto::{LoginForm, RegisterRequest, TokenResponse};
use crate::{api::ApiClient, error::ApiError};

const MIN_PASSWORD_LEN: usize = 8;

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

impl ApiClient {
    /// Creates an account and returns its first access token.
    #[instrument(skip(self, password))]
    pub async fn register(&self, login: &str, email: &str, password: &str) -> Result<String, ApiError> {
        let email = email.trim().to_lowercase();
        let login = login.trim();
        if login.is_empty() {
            return Err(ApiError::Validation("login is required".into()));
        }
        if !is_valid_email(&email) {
            return Err(ApiError::Validation("invalid email".into()));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(ApiError::Validation("password too short".into()));
        }

        let req = self
            .anonymous(Method::POST, "/auth/registration")
            .json(&RegisterRequest { login, email: &email, password });
        let token: TokenResponse = Self::send_json(req).await?;
        info!(%login, "registered");
        Ok(token.access_token)
    }

    /// Exchanges credentials for an access token.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let username = username.trim();
        let req = self
            .anonymous(Method::POST, "/auth/login")
            .form(&LoginForm { username, password });
        let token: TokenResponse = match Self::send_json(req).await {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, %username, "login failed");
                return Err(e);
            }
        };
        if let Some(kind) = token.token_type.as_deref() {
            if !kind.eq_ignore_ascii_case("bearer") {
                warn!(token_type = %kind, "unexpected token type");
            }
        }
        info!(%username, "logged in");
        Ok(token.access_token)
    }
}
