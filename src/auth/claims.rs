use serde::{Deserialize, Serialize};

/// Payload of the access token issued by the food-diary service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    pub sub: String,         // user login
    pub exp: Option<i64>,    // expires at (unix timestamp)
}
