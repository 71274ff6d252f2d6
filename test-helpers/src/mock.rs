//! Mock of the upstream GIF service.
//!
//! Serves both schema versions from one deterministic catalog:
//! - `GET /v1/search`, `GET /v1/trending` answer in the legacy shape
//!   (`media[0].gif`)
//! - `GET /v2/search`, `GET /v2/featured` answer in the current shape
//!   (`media_formats.gif`) and insist on `client_key` and `country`
//!
//! Every query has `catalog_size` results named `{query}-{index}`. The
//! `pos` token is the decimal offset of the next result, which is enough to
//! check that clients hand it back untouched.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use actix_web::{HttpResponse, web};
use serde_json::{Value, json};

pub const TEST_API_KEY: &str = "test-api-key";

/// First `created` value handed out; each result adds one second.
const CREATED_BASE: i64 = 1_736_676_000;

/// A failure to serve instead of the next catalog page.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// Respond with this status and an error body.
    Status(u16),
    /// Respond 200 with an `error` field in the envelope.
    Embedded(String),
}

/// What the mock saw, for asserting on query parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub path: String,
    pub params: HashMap<String, String>,
}

impl RecordedRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// Count of every request served plus the most recent ones.
#[derive(Debug, Default)]
pub struct RequestLog {
    served: usize,
    recent: VecDeque<RecordedRequest>,
}

impl RequestLog {
    /// Requests retained for inspection.
    pub const CAPACITY: usize = 256;

    fn push(&mut self, request: RecordedRequest) {
        if self.recent.len() == Self::CAPACITY {
            self.recent.pop_front();
        }
        self.recent.push_back(request);
        self.served += 1;
    }

    pub fn served(&self) -> usize {
        self.served
    }

    /// Retained requests, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &RecordedRequest> {
        self.recent.iter()
    }

    /// Retained requests after the first `seen` served.
    pub fn since(&self, seen: usize) -> impl Iterator<Item = &RecordedRequest> {
        let evicted = self.served - self.recent.len();
        self.recent.iter().skip(seen.saturating_sub(evicted))
    }
}

pub struct MockState {
    pub catalog_size: usize,
    pub failures: Mutex<VecDeque<Failure>>,
    pub requests: Mutex<RequestLog>,
}

impl MockState {
    pub fn new(catalog_size: usize) -> Self {
        Self {
            catalog_size,
            failures: Mutex::default(),
            requests: Mutex::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Schema {
    V1,
    V2,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1")
            .route("/search", web::get().to(v1_search))
            .route("/trending", web::get().to(v1_trending)),
    )
    .service(
        web::scope("/v2")
            .route("/search", web::get().to(v2_search))
            .route("/featured", web::get().to(v2_featured)),
    );
}

type Params = web::Query<HashMap<String, String>>;

async fn v1_search(state: web::Data<MockState>, params: Params) -> HttpResponse {
    respond(&state, Schema::V1, "/v1/search", params.into_inner())
}

async fn v1_trending(
    state: web::Data<MockState>,
    params: Params,
) -> HttpResponse {
    respond(&state, Schema::V1, "/v1/trending", params.into_inner())
}

async fn v2_search(state: web::Data<MockState>, params: Params) -> HttpResponse {
    respond(&state, Schema::V2, "/v2/search", params.into_inner())
}

async fn v2_featured(
    state: web::Data<MockState>,
    params: Params,
) -> HttpResponse {
    respond(&state, Schema::V2, "/v2/featured", params.into_inner())
}

#[tracing::instrument(skip(state, params))]
fn respond(
    state: &MockState,
    schema: Schema,
    path: &str,
    params: HashMap<String, String>,
) -> HttpResponse {
    state
        .requests
        .lock()
        .expect("request log poisoned")
        .push(RecordedRequest {
            path: path.to_string(),
            params: params.clone(),
        });

    if params.get("key").map(String::as_str) != Some(TEST_API_KEY) {
        return error_response(401, "API key not valid");
    }
    if schema == Schema::V2
        && (!params.contains_key("client_key") || !params.contains_key("country"))
    {
        return error_response(400, "client_key and country are required");
    }

    let failure = state
        .failures
        .lock()
        .expect("failure queue poisoned")
        .pop_front();
    match failure {
        Some(Failure::Status(status)) => {
            return error_response(status, "Scripted failure");
        }
        Some(Failure::Embedded(message)) => {
            let error = match schema {
                Schema::V1 => json!(message),
                Schema::V2 => json!({ "code": 200, "message": message }),
            };
            return HttpResponse::Ok().json(json!({ "results": [], "error": error }));
        }
        None => {}
    }

    let limit = params
        .get("limit")
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(8);
    let offset = params
        .get("pos")
        .and_then(|p| p.parse::<usize>().ok())
        .unwrap_or(0);
    let prefix = params.get("q").map(String::as_str).unwrap_or("featured");

    let end = (offset + limit).min(state.catalog_size);
    let results: Vec<Value> = (offset..end)
        .map(|index| record(schema, prefix, index))
        .collect();
    let next = if end < state.catalog_size {
        end.to_string()
    } else {
        // The live v2 API signals the last page with an empty token.
        String::new()
    };

    tracing::debug!(offset, end, "Serving mock page");
    HttpResponse::Ok().json(json!({ "results": results, "next": next }))
}

fn record(schema: Schema, prefix: &str, index: usize) -> Value {
    let id = format!("{prefix}-{index}");
    let gif = json!({
        "url": format!("https://media.tenor.com/mock/{id}.gif"),
        "dims": [480, 270],
    });
    let tinygif = json!({
        "url": format!("https://media.tenor.com/mock/{id}-preview.gif"),
        "dims": [220, 124],
    });
    let description = format!("Mock GIF {index} for {prefix}");

    match schema {
        Schema::V1 => json!({
            "id": id,
            "content_description": description,
            "media": [{ "gif": gif, "tinygif": tinygif }],
            "created": CREATED_BASE + index as i64,
        }),
        Schema::V2 => json!({
            "id": id,
            "content_description": description,
            "media_formats": { "gif": gif, "tinygif": tinygif },
            "created": (CREATED_BASE + index as i64) as f64,
        }),
    }
}

fn error_response(status: u16, message: &str) -> HttpResponse {
    let status = actix_web::http::StatusCode::from_u16(status)
        .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(json!({
        "error": { "code": status.as_u16(), "message": message }
    }))
}
