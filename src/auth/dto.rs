use serde::{Deserialize, Serialize};

/// Request body for user registration.
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub login: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// OAuth2 password form sent to the login endpoint.
#[derive(Debug, Serialize)]
pub struct LoginForm<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Token pair returned by both login and registration.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}
