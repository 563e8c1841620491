use std::time::Duration;

use bytes::Bytes;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::{auth::AuthContext, config::ClientConfig, error::ApiError};

/// Typed client for the remote food-diary service.
///
/// One instance serves search, persistence and auth calls. It is cheap to
/// clone; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    auth: AuthContext,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            auth: AuthContext::new(config.access_token.clone()),
        })
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth.set_token(token);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request carrying the bearer token. Fails before any I/O without one.
    pub(crate) fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.auth.bearer()?;
        Ok(self.http.request(method, self.url(path)).bearer_auth(token))
    }

    pub(crate) fn anonymous(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, ApiError> {
        let response = check(req.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    /// Like [`Self::send_json`], but also rejects a `{"status_code", "detail"}`
    /// body that some catalog routes return with a 200 status.
    pub(crate) async fn send_checked_json<T: DeserializeOwned>(
        req: RequestBuilder,
    ) -> Result<T, ApiError> {
        let value: Value = Self::send_json(req).await?;
        if let Some(err) = embedded_error(&value) {
            warn!(error = %err, "api request failed inside a success response");
            return Err(err);
        }
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub(crate) async fn send_empty(req: RequestBuilder) -> Result<(), ApiError> {
        check(req.send().await?).await?;
        Ok(())
    }

    pub(crate) async fn send_bytes(req: RequestBuilder) -> Result<Bytes, ApiError> {
        let response = check(req.send().await?).await?;
        Ok(response.bytes().await?)
    }
}

async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = response.url().path().to_string();
    let body = response.text().await.unwrap_or_default();
    let message = server_message(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
    warn!(%status, %url, %message, "api request failed");
    Err(ApiError::from_status(status.as_u16(), message))
}

/// Pulls a human-readable reason out of the service's error bodies:
/// `{"detail": "..."}`, `{"detail": [{"msg": "..."}]}` or `{"message": "..."}`.
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail") {
        Some(Value::String(s)) => return Some(s.clone()),
        Some(Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|i| i.get("msg").and_then(Value::as_str))
                .collect();
            if !msgs.is_empty() {
                return Some(msgs.join("; "));
            }
        }
        _ => {}
    }
    value.get("message").and_then(Value::as_str).map(str::to_string)
}

fn embedded_error(value: &Value) -> Option<ApiError> {
    let status = value.get("status_code")?.as_u64()?;
    if !(400..600).contains(&status) {
        return None;
    }
    let message = match value.get("detail").and_then(Value::as_str) {
        Some(d) if !d.is_empty() => d.to_string(),
        _ => "request rejected".to_string(),
    };
    Some(ApiError::from_status(status as u16, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_plain_detail() {
        assert_eq!(
            server_message(r#"{"detail":"Неверный логин или пароль"}"#).as_deref(),
            Some("Неверный логин или пароль")
        );
    }

    #[test]
    fn joins_validation_detail_list() {
        let body = r#"{"detail":[{"loc":["body","name"],"msg":"field required"},{"msg":"value is not a valid float"}]}"#;
        assert_eq!(
            server_message(body).as_deref(),
            Some("field required; value is not a valid float")
        );
    }

    #[test]
    fn falls_back_to_message_field() {
        assert_eq!(
            server_message(r#"{"message":"internal"}"#).as_deref(),
            Some("internal")
        );
    }

    #[test]
    fn non_json_body_has_no_message() {
        assert_eq!(server_message("<html>bad gateway</html>"), None);
        assert_eq!(server_message(""), None);
    }

    #[test]
    fn status_carried_in_body_is_an_error() {
        let dup = serde_json::json!({"status_code": 400, "detail": "Product Rice already exists", "headers": null});
        assert!(matches!(
            embedded_error(&dup),
            Some(ApiError::Validation(ref m)) if m == "Product Rice already exists"
        ));
        let gone = serde_json::json!({"status_code": 404, "detail": ""});
        assert!(matches!(embedded_error(&gone), Some(ApiError::NotFound(ref m)) if m == "request rejected"));
        assert!(embedded_error(&serde_json::json!({"id": 1, "name": "Rice"})).is_none());
        assert!(embedded_error(&serde_json::json!([])).is_none());
    }

    #[test]
    fn authorized_request_requires_token() {
        let client = ApiClient::new(&ClientConfig::new("http://localhost:1")).unwrap();
        assert!(matches!(
            client.authorized(Method::GET, "/product/search"),
            Err(ApiError::Unauthorized(_))
        ));
        let client = client.with_token("t");
        assert!(client.authorized(Method::GET, "/product/search").is_ok());
    }
}
