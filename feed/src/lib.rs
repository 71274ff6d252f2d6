//! State and control flow behind the infinite GIF wall.
//!
//! - [`coordinator`]: owns items, cursor, loading and error, and allows at
//!   most one request in flight.
//! - [`error`]: turns failures into user-facing messages and a
//!   retryable/terminal decision, plus exponential backoff.
//! - [`trigger`]: debounced "load more" signal driven by sentinel
//!   visibility.
//!
//! Nothing here touches the DOM, so the same code runs in the browser and
//! under `cargo test`.

pub mod coordinator;
pub mod error;
pub mod source;
pub mod time;
pub mod trigger;

pub use coordinator::{
    EMPTY_QUERY_MESSAGE, FetchCoordinator, FetchOutcome, QueryState,
    SubscriptionId,
};
pub use error::{
    BackoffPolicy, Classification, ErrorKind, RawError, classify,
    handle_api_error, is_retryable, retry_with_backoff, user_message,
};
pub use source::GifSource;
pub use trigger::{Observation, ScrollTrigger, Ticket, TriggerConfig};
