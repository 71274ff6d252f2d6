//! Raw upstream response shapes and their mapping into [`PageResponse`].
//!
//! Both schema versions share the envelope (`results`, `next`, `error`) but
//! disagree on where media renditions live. Every field is optional on the
//! wire and may also be `null`; defaults are applied during mapping, not
//! during deserialization. Records are decoded one at a time so a malformed
//! record is skipped without losing the rest of the page.

use jiff::Timestamp;
use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::Value;

use crate::{ApiVersion, Cursor, Gif, PageResponse, UNTITLED_GIF};

#[derive(Debug, Deserialize)]
struct Envelope {
    results: Option<Vec<Value>>,
    next: Option<Value>,
    error: Option<Value>,
}

/// `media[0].gif` / `media[0].tinygif`
#[derive(Debug, Deserialize)]
struct V1Result {
    id: Option<String>,
    content_description: Option<String>,
    media: Option<Vec<Option<MediaFormats>>>,
    created: Option<RawTimestamp>,
}

/// `media_formats.gif` / `media_formats.tinygif`
#[derive(Debug, Deserialize)]
struct V2Result {
    id: Option<String>,
    content_description: Option<String>,
    media_formats: Option<MediaFormats>,
    created: Option<RawTimestamp>,
}

#[derive(Debug, Default, Deserialize)]
struct MediaFormats {
    gif: Option<MediaObject>,
    tinygif: Option<MediaObject>,
}

#[derive(Debug, Deserialize)]
struct MediaObject {
    url: Option<String>,
    /// Kept loose; anything but two non-negative integers means unknown.
    dims: Option<Vec<Value>>,
}

impl MediaObject {
    fn dimensions(&self) -> Option<(u32, u32)> {
        let dim = |value: &Value| {
            value.as_u64().and_then(|n| u32::try_from(n).ok())
        };
        match self.dims.as_deref() {
            Some([w, h, ..]) => Some((dim(w)?, dim(h)?)),
            _ => None,
        }
    }
}

/// v2 sends epoch seconds as a float, older fixtures send RFC 3339 strings.
/// Anything else is treated as absent.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Epoch(f64),
    Text(String),
    Other(IgnoredAny),
}

impl RawTimestamp {
    fn to_timestamp(&self) -> Option<Timestamp> {
        match self {
            RawTimestamp::Epoch(secs) => {
                Timestamp::from_millisecond((secs * 1000.0) as i64).ok()
            }
            RawTimestamp::Text(text) => text.parse().ok(),
            RawTimestamp::Other(_) => None,
        }
    }
}

/// Fields common to both versions after the media lookup.
struct Record<'a> {
    id: Option<&'a str>,
    description: Option<&'a str>,
    media: Option<&'a MediaFormats>,
    created: Option<&'a RawTimestamp>,
}

impl V1Result {
    fn record(&self) -> Record<'_> {
        Record {
            id: self.id.as_deref(),
            description: self.content_description.as_deref(),
            media: self
                .media
                .as_deref()
                .and_then(<[_]>::first)
                .and_then(Option::as_ref),
            created: self.created.as_ref(),
        }
    }
}

impl V2Result {
    fn record(&self) -> Record<'_> {
        Record {
            id: self.id.as_deref(),
            description: self.content_description.as_deref(),
            media: self.media_formats.as_ref(),
            created: self.created.as_ref(),
        }
    }
}

impl Record<'_> {
    fn into_gif(self, fetched_at: Timestamp) -> Option<Gif> {
        let Some(id) = self.id.filter(|id| !id.is_empty()) else {
            tracing::warn!("Skipping upstream record without an id");
            return None;
        };

        let gif = self.media.and_then(|m| m.gif.as_ref());
        let full_url = gif
            .and_then(|g| g.url.clone())
            .unwrap_or_default();
        let preview_url = self
            .media
            .and_then(|m| m.tinygif.as_ref())
            .and_then(|t| t.url.clone())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| full_url.clone());
        let (width, height) =
            gif.and_then(MediaObject::dimensions).unwrap_or((0, 0));

        Some(Gif {
            id: id.to_string(),
            title: self
                .description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .unwrap_or(UNTITLED_GIF)
                .to_string(),
            full_url,
            preview_url,
            width,
            height,
            created_at: self
                .created
                .and_then(RawTimestamp::to_timestamp)
                .unwrap_or(fetched_at),
        })
    }
}

/// Decode a 2xx body with the mapping selected by `version`. Only a body
/// that is not an envelope at all is an error.
pub(crate) fn parse_page(
    version: ApiVersion,
    body: &[u8],
    fetched_at: Timestamp,
) -> Result<PageResponse, serde_json::Error> {
    let envelope: Envelope = serde_json::from_slice(body)?;
    Ok(envelope.into_page(version, fetched_at))
}

impl Envelope {
    fn into_page(
        self,
        version: ApiVersion,
        fetched_at: Timestamp,
    ) -> PageResponse {
        let Envelope {
            results,
            next,
            error,
        } = self;
        PageResponse {
            items: results
                .unwrap_or_default()
                .into_iter()
                .filter_map(|raw| map_record(version, raw, fetched_at))
                .collect(),
            next_cursor: next
                .as_ref()
                .and_then(Value::as_str)
                .filter(|next| !next.is_empty())
                .map(Cursor::from),
            error: error.as_ref().and_then(error_message),
        }
    }
}

fn map_record(
    version: ApiVersion,
    raw: Value,
    fetched_at: Timestamp,
) -> Option<Gif> {
    let mapped = match version {
        ApiVersion::V1 => serde_json::from_value::<V1Result>(raw)
            .map(|result| result.record().into_gif(fetched_at)),
        ApiVersion::V2 => serde_json::from_value::<V2Result>(raw)
            .map(|result| result.record().into_gif(fetched_at)),
    };
    match mapped {
        Ok(gif) => gif,
        Err(e) => {
            tracing::warn!("Skipping malformed upstream record: {e}");
            None
        }
    }
}

/// v1 embeds a plain string, v2 an object with a `message`.
fn error_message(error: &Value) -> Option<String> {
    match error {
        Value::Null => None,
        Value::String(message) if message.is_empty() => None,
        Value::String(message) => Some(message.clone()),
        Value::Object(fields) => match fields.get("message") {
            Some(Value::String(message)) => Some(message.clone()),
            _ => Some(error.to_string()),
        },
        other => Some(other.to_string()),
    }
}
