//! Shared types and the upstream client for the GIF wall.
//!
//! Everything in here compiles for both native targets (tests, dev server)
//! and `wasm32` (the Yew front-end).

pub mod api_client;
pub mod config;
mod wire;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

pub use api_client::{ClientError, TenorClient};
pub use config::{ApiVersion, ConfigError, TenorConfig};

/// Used when the upstream record has no usable description.
pub const UNTITLED_GIF: &str = "Untitled GIF";

/// Page size used when neither the caller nor the configuration picks one.
pub const DEFAULT_LIMIT: u32 = 8;

/// A single GIF as the rest of the application sees it, independent of
/// which upstream schema version produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gif {
    /// Upstream-assigned identifier.
    pub id: String,
    pub title: String,
    /// Full resolution animation.
    pub full_url: String,
    /// Small rendition for the grid; equals `full_url` when the upstream
    /// record has no preview.
    pub preview_url: String,
    /// Zero when the upstream record omits dimensions.
    pub width: u32,
    pub height: u32,
    pub created_at: Timestamp,
}

/// Opaque pagination token handed out by the upstream API.
///
/// The value is only ever passed back to the upstream verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Cursor {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for Cursor {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// One page of results, normalized from either schema version.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageResponse {
    pub items: Vec<Gif>,
    /// Present when the upstream has another page.
    pub next_cursor: Option<Cursor>,
    /// Set when the upstream answered 2xx with an embedded error.
    pub error: Option<String>,
}

impl PageResponse {
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}
