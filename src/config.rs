const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub access_token: Option<String>,
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_base_url = std::env::var("FOOD_DIARY_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.into())
            .trim_end_matches('/')
            .to_string();
        if api_base_url.is_empty() {
            anyhow::bail!("FOOD_DIARY_API_URL must not be empty");
        }
        let access_token = std::env::var("FOOD_DIARY_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        let timeout_secs = std::env::var("FOOD_DIARY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Ok(Self {
            api_base_url,
            access_token,
            timeout_secs,
        })
    }

    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            access_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}
