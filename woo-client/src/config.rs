//! Client configuration

use crate::error::{ClientError, ClientResult};

/// REST API path appended to the site URL
pub const API_PATH: &str = "wp-json/wc/v3";

/// Connection settings for one WooCommerce store
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Store URL (e.g., "https://shop.example.com")
    pub site_url: String,

    /// REST API consumer key (`ck_...`)
    pub consumer_key: String,

    /// REST API consumer secret (`cs_...`)
    pub consumer_secret: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    pub fn new(
        site_url: impl Into<String>,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Self {
        Self {
            site_url: site_url.into(),
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            timeout: 30,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// `{site}/wp-json/wc/v3`, without a trailing slash
    pub fn api_base(&self) -> String {
        format!("{}/{}", self.site_url.trim().trim_end_matches('/'), API_PATH)
    }

    pub fn validate(&self) -> ClientResult<()> {
        let url = self.site_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClientError::InvalidConfig(format!(
                "Site URL must start with http:// or https://: {:?}",
                self.site_url
            )));
        }
        if self.consumer_key.trim().is_empty() || self.consumer_secret.trim().is_empty() {
            return Err(ClientError::InvalidConfig(
                "Consumer key and secret are required".to_string(),
            ));
        }
        if self.timeout == 0 {
            return Err(ClientError::InvalidConfig(
                "Timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Create a client from this configuration
    pub fn build(&self) -> ClientResult<super::WooClient> {
        super::WooClient::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_strips_trailing_slash() {
        let config = ClientConfig::new("https://shop.example.com/", "ck", "cs");
        assert_eq!(config.api_base(), "https://shop.example.com/wp-json/wc/v3");
    }

    #[test]
    fn test_validate() {
        assert!(ClientConfig::new("https://a.b", "ck", "cs").validate().is_ok());
        assert!(ClientConfig::new("shop.example.com", "ck", "cs").validate().is_err());
        assert!(ClientConfig::new("https://a.b", "", "cs").validate().is_err());
        assert!(
            ClientConfig::new("https://a.b", "ck", "cs")
                .with_timeout(0)
                .validate()
                .is_err()
        );
    }
}
