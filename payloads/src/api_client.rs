use jiff::Timestamp;
use reqwest::StatusCode;

use crate::{ApiVersion, Cursor, PageResponse, TenorConfig, wire};

type ReqwestResult = Result<reqwest::Response, reqwest::Error>;

/// An API client for the upstream GIF search service.
///
/// The schema version comes from the configuration and is fixed for the
/// lifetime of the client.
#[derive(Debug, Clone)]
pub struct TenorClient {
    config: TenorConfig,
    inner_client: reqwest::Client,
}

/// Helper methods for http actions
impl TenorClient {
    pub fn new(config: TenorConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(
        config: TenorConfig,
        inner_client: reqwest::Client,
    ) -> Self {
        Self {
            config,
            inner_client,
        }
    }

    pub fn version(&self) -> ApiVersion {
        self.config.version
    }

    pub fn default_limit(&self) -> u32 {
        self.config.default_limit
    }

    fn format_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.config.base_url)
    }

    /// Query parameters every request carries, in the shape the configured
    /// version expects.
    fn base_params(&self, limit: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("key", self.config.api_key().to_string()),
            ("limit", limit.to_string()),
            ("contentfilter", self.config.content_filter.clone()),
        ];
        match self.config.version {
            ApiVersion::V1 => {
                params.push(("media_filter", "minimal".to_string()));
            }
            ApiVersion::V2 => {
                params.push(("client_key", self.config.client_key.clone()));
                params.push(("country", self.config.country.clone()));
                params.push(("media_filter", "gif,tinygif".to_string()));
            }
        }
        params
    }

    async fn get(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> ReqwestResult {
        self.inner_client
            .get(self.format_url(endpoint))
            .query(params)
            .send()
            .await
    }

    async fn get_page(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<PageResponse, ClientError> {
        let response = self
            .get(endpoint, params)
            .await
            .map_err(ClientError::from_transport)?;
        ok_page(self.config.version, response).await
    }
}

/// Methods on the upstream API
impl TenorClient {
    /// Search for GIFs matching `query`. `cursor` is passed back verbatim
    /// as `pos` to fetch the page after it.
    #[tracing::instrument(skip(self, cursor), fields(version = %self.config.version, paged = cursor.is_some()))]
    pub async fn search(
        &self,
        query: &str,
        limit: u32,
        cursor: Option<&Cursor>,
    ) -> Result<PageResponse, ClientError> {
        let mut params = self.base_params(limit);
        params.push(("q", query.to_string()));
        if let Some(cursor) = cursor {
            params.push(("pos", cursor.as_str().to_string()));
        }
        self.get_page("search", &params).await
    }

    /// The curated listing: `trending` on v1, `featured` on v2.
    #[tracing::instrument(skip(self), fields(version = %self.config.version))]
    pub async fn featured(
        &self,
        limit: u32,
    ) -> Result<PageResponse, ClientError> {
        let params = self.base_params(limit);
        self.get_page(self.config.version.featured_endpoint(), &params)
            .await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The upstream answered with a non-success status other than 429.
    #[error("HTTP error! status: {}", .0.as_u16())]
    Http(StatusCode),
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,
    /// No response was received.
    #[error("Network error. Please check your connection.")]
    Network(#[source] reqwest::Error),
    #[error("Request timeout while contacting the GIF service")]
    Timeout(#[source] reqwest::Error),
    /// A success status with a body that is not a result page.
    #[error("Unexpected response from the GIF service: {0}")]
    Decode(String),
}

impl ClientError {
    /// The upstream status, when a response was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Http(status) => Some(*status),
            ClientError::RateLimited => Some(StatusCode::TOO_MANY_REQUESTS),
            _ => None,
        }
    }

    fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout(e)
        } else {
            ClientError::Network(e)
        }
    }
}

/// Decode a successful response into a page, or return an appropriate
/// error.
async fn ok_page(
    version: ApiVersion,
    response: reqwest::Response,
) -> Result<PageResponse, ClientError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ClientError::RateLimited);
    }
    if !status.is_success() {
        return Err(ClientError::Http(status));
    }
    let body = response.bytes().await.map_err(ClientError::from_transport)?;
    wire::parse_page(version, &body, Timestamp::now())
        .map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(version: ApiVersion) -> TenorClient {
        TenorClient::new(TenorConfig::new("test-api-key", version).unwrap())
    }

    fn keys(params: &[(&'static str, String)]) -> Vec<&'static str> {
        params.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn v1_params_omit_v2_fields() {
        let params = client(ApiVersion::V1).base_params(8);
        let keys = keys(&params);
        assert!(keys.contains(&"key"));
        assert!(!keys.contains(&"client_key"));
        assert!(!keys.contains(&"country"));
        assert!(params.contains(&("limit", "8".to_string())));
    }

    #[test]
    fn v2_params_carry_client_and_country() {
        let params = client(ApiVersion::V2).base_params(12);
        assert!(params.contains(&("client_key", "gif-wall".to_string())));
        assert!(params.contains(&("country", "US".to_string())));
        assert!(params.contains(&("limit", "12".to_string())));
        assert!(params.contains(&("key", "test-api-key".to_string())));
    }

    #[test]
    fn urls_are_built_from_the_base() {
        let client = client(ApiVersion::V2);
        assert_eq!(
            client.format_url("search"),
            "https://tenor.googleapis.com/v2/search"
        );
    }

    #[test]
    fn error_messages_match_the_classifier_table() {
        assert_eq!(
            ClientError::Http(StatusCode::SERVICE_UNAVAILABLE).to_string(),
            "HTTP error! status: 503"
        );
        assert_eq!(
            ClientError::RateLimited.status(),
            Some(StatusCode::TOO_MANY_REQUESTS)
        );
    }
}
