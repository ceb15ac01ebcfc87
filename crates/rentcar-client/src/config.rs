use std::env;
use std::time::Duration;

use crate::storage::Language;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub storage_path: String,
    pub request_timeout: Duration,
    pub default_language: Language,
    pub page_size: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("RENTCAR_API_URL")
                .unwrap_or_else(|_| "http://localhost:5000/api/v1".to_string()),
            storage_path: env::var("RENTCAR_STORAGE_PATH")
                .unwrap_or_else(|_| "./data/rentcar.db".to_string()),
            request_timeout: Duration::from_secs(
                env::var("RENTCAR_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
            default_language: env::var("RENTCAR_LANGUAGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            page_size: env::var("RENTCAR_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(9),
        }
    }

    /// Config pointing at `api_url` with every other value at its default.
    pub fn for_api(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            storage_path: "./data/rentcar.db".to_string(),
            request_timeout: Duration::from_secs(30),
            default_language: Language::default(),
            page_size: 9,
        }
    }
}
