use thiserror::Error;

/// Why a meal-in-progress cannot be turned into a save payload yet.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("empty name")]
    EmptyName,
    #[error("no products")]
    NoProducts,
}

/// Failures reported by the remote food-diary service or the transport to it.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("rejected by server: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub(crate) fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => Self::Unauthorized(message),
            400 | 422 => Self::Validation(message),
            404 => Self::NotFound(message),
            _ => Self::Server { status, message },
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e)
        }
    }
}

/// Anything that can go wrong while composing and saving a meal.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_statuses() {
        assert!(matches!(ApiError::from_status(401, "x".into()), ApiError::Unauthorized(_)));
        assert!(matches!(ApiError::from_status(403, "x".into()), ApiError::Unauthorized(_)));
        assert!(matches!(ApiError::from_status(422, "x".into()), ApiError::Validation(_)));
        assert!(matches!(ApiError::from_status(400, "x".into()), ApiError::Validation(_)));
        assert!(matches!(ApiError::from_status(404, "x".into()), ApiError::NotFound(_)));
        assert!(matches!(
            ApiError::from_status(502, "x".into()),
            ApiError::Server { status: 502, .. }
        ));
    }

    #[test]
    fn validation_messages_name_the_problem() {
        assert_eq!(ValidationError::EmptyName.to_string(), "empty name");
        assert_eq!(ValidationError::NoProducts.to_string(), "no products");
        let err: Error = ValidationError::NoProducts.into();
        assert_eq!(err.to_string(), "no products");
    }
}
