use derive_more::Display;
use secrecy::{ExposeSecret, SecretString};

use crate::DEFAULT_LIMIT;

/// Value shipped in `.env.example`; treated the same as a missing key.
pub const PLACEHOLDER_API_KEY: &str = "your_tenor_api_key_here";

pub const V1_BASE_URL: &str = "https://g.tenor.com/v1";
pub const V2_BASE_URL: &str = "https://tenor.googleapis.com/v2";

const DEFAULT_CLIENT_KEY: &str = "gif-wall";
const DEFAULT_COUNTRY: &str = "US";
const DEFAULT_CONTENT_FILTER: &str = "high";

/// Which upstream response schema the client speaks. Fixed when the client
/// is constructed; records are never sniffed individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Default)]
pub enum ApiVersion {
    /// `g.tenor.com/v1`: media renditions under `media[0]`, listing
    /// endpoint `trending`.
    #[display("v1")]
    V1,
    /// `tenor.googleapis.com/v2`: renditions under `media_formats`,
    /// listing endpoint `featured`, requires `client_key` and `country`.
    #[default]
    #[display("v2")]
    V2,
}

impl ApiVersion {
    pub fn default_base_url(self) -> &'static str {
        match self {
            ApiVersion::V1 => V1_BASE_URL,
            ApiVersion::V2 => V2_BASE_URL,
        }
    }

    /// Path of the listing that backs the "featured" wall.
    pub fn featured_endpoint(self) -> &'static str {
        match self {
            ApiVersion::V1 => "trending",
            ApiVersion::V2 => "featured",
        }
    }
}

impl std::str::FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(ApiVersion::V1),
            "v2" | "2" => Ok(ApiVersion::V2),
            _ => Err(ConfigError::InvalidApiVersion(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Required environment variable TENOR_API_KEY is not set")]
    MissingApiKey,
    #[error("TENOR_API_KEY must be set to a valid Tenor API key")]
    PlaceholderApiKey,
    #[error("Unsupported TENOR_API_VERSION {0:?}, expected v1 or v2")]
    InvalidApiVersion(String),
}

/// Settings for talking to the upstream GIF service.
///
/// Environment variables:
/// - TENOR_API_KEY: required, must not be the placeholder value
/// - TENOR_API_VERSION: `v1` or `v2` (default `v2`)
/// - TENOR_API_BASE_URL: overrides the per-version default
/// - TENOR_CLIENT_KEY, TENOR_COUNTRY: only sent to v2
/// - TENOR_DEFAULT_LIMIT: page size, falls back to 8 when unset or invalid
/// - TENOR_CONTENT_FILTER: default `high`
#[derive(Debug, Clone)]
pub struct TenorConfig {
    pub api_key: SecretString,
    pub version: ApiVersion,
    pub base_url: String,
    pub client_key: String,
    pub country: String,
    pub default_limit: u32,
    pub content_filter: String,
}

impl TenorConfig {
    /// Build a configuration with defaults for everything but the key.
    pub fn new(
        api_key: impl Into<String>,
        version: ApiVersion,
    ) -> Result<Self, ConfigError> {
        let api_key = validate_api_key(Some(api_key.into()))?;
        Ok(Self {
            api_key,
            version,
            base_url: version.default_base_url().to_string(),
            client_key: DEFAULT_CLIENT_KEY.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            default_limit: DEFAULT_LIMIT,
            content_filter: DEFAULT_CONTENT_FILTER.to_string(),
        })
    }

    /// Build from an arbitrary key/value source, so the same rules apply to
    /// process environment and compile-time values baked into the UI.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let version = match non_empty("TENOR_API_VERSION") {
            Some(v) => v.parse()?,
            None => ApiVersion::default(),
        };
        let mut config = Self::new(
            non_empty("TENOR_API_KEY").ok_or(ConfigError::MissingApiKey)?,
            version,
        )?;

        if let Some(base_url) = non_empty("TENOR_API_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(client_key) = non_empty("TENOR_CLIENT_KEY") {
            config.client_key = client_key;
        }
        if let Some(country) = non_empty("TENOR_COUNTRY") {
            config.country = country;
        }
        if let Some(filter) = non_empty("TENOR_CONTENT_FILTER") {
            config.content_filter = filter;
        }
        config.default_limit = non_empty("TENOR_DEFAULT_LIMIT")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_LIMIT);

        Ok(config)
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

fn validate_api_key(key: Option<String>) -> Result<SecretString, ConfigError> {
    match key.map(|k| k.trim().to_string()) {
        None => Err(ConfigError::MissingApiKey),
        Some(k) if k.is_empty() => Err(ConfigError::MissingApiKey),
        Some(k) if k == PLACEHOLDER_API_KEY => {
            Err(ConfigError::PlaceholderApiKey)
        }
        Some(k) => Ok(SecretString::from(k)),
    }
}
