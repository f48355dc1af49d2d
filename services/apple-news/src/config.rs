use std::fmt::{Debug, Formatter};

use crate::constants::*;
use pushsign_core::{utils::Redact, Context};

/// Config carries all the configuration for Apple News services.
#[derive(Clone, Default)]
pub struct Config {
    /// `key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`APPLE_NEWS_API_KEY_ID`]
    pub key_id: Option<String>,
    /// `secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`APPLE_NEWS_API_KEY_SECRET`]
    ///
    /// The secret is expected to be base64 encoded, as issued by News Publisher.
    pub secret: Option<String>,
    /// `endpoint` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`APPLE_NEWS_ENDPOINT`]
    /// - default value: `https://news-api.apple.com`
    pub endpoint: Option<String>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set key_id
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Set secret
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Set endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(APPLE_NEWS_API_KEY_ID) {
            self.key_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(APPLE_NEWS_API_KEY_SECRET) {
            self.secret.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(APPLE_NEWS_ENDPOINT) {
            self.endpoint.get_or_insert(v);
        }

        self
    }

    /// Get the endpoint, falls back to the public Apple News API.
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("key_id", &self.key_id.as_ref().map(Redact::from))
            .field("secret", &self.secret.as_ref().map(Redact::from))
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pushsign_core::StaticEnv;
    use std::collections::HashMap;

    #[test]
    fn test_config_from_env() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                (APPLE_NEWS_API_KEY_ID.to_string(), "env_key".to_string()),
                (APPLE_NEWS_API_KEY_SECRET.to_string(), "env_secret".to_string()),
                (
                    APPLE_NEWS_ENDPOINT.to_string(),
                    "https://news-api.example.com".to_string(),
                ),
            ]),
        });

        let config = Config::new().with_key_id("explicit_key").from_env(&ctx);
        assert_eq!(config.key_id.as_deref(), Some("explicit_key"));
        assert_eq!(config.secret.as_deref(), Some("env_secret"));
        assert_eq!(config.endpoint(), "https://news-api.example.com");
    }

    #[test]
    fn test_config_default_endpoint() {
        let config = Config::new().from_env(&Context::new());
        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
        assert!(config.key_id.is_none());
    }

    #[test]
    fn test_config_debug_redacts_secret() {
        let config = Config::new()
            .with_key_id("a7ad31c6-3dcb-4c3c-9a9d-8d1e8e4c1a44")
            .with_secret("c2VjcmV0LXNlY3JldC1zZWNyZXQ=");
        let debug = format!("{config:?}");
        assert!(!debug.contains("c2VjcmV0LXNlY3JldC1zZWNyZXQ="));
        assert!(debug.contains("c2V***XQ="));
    }
}
