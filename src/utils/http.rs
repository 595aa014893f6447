// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::FeedConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &FeedConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| AppError::feed(&config.url, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_from_default_config() {
        assert!(create_async_client(&FeedConfig::default()).is_ok());
    }
}
