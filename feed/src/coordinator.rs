//! The fetch coordinator owns the canonical wall state and is the only
//! thing that mutates it.
//!
//! Every cursor read goes through the shared state at the moment a request
//! starts, never through a value captured when a callback was built, so
//! consecutive `load_more` calls always continue from the latest page.
//!
//! Requests are tagged with a generation. `clear` and every fresh (non
//! append) fetch bump it; a response carrying an older generation is
//! dropped instead of applied.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use payloads::{Cursor, Gif, PageResponse};

use crate::error::{RawError, handle_api_error};
use crate::source::GifSource;

pub const EMPTY_QUERY_MESSAGE: &str = "Search query cannot be empty";

/// Snapshot of the wall state handed to readers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryState {
    pub query_text: String,
    pub page_size: u32,
    /// Opaque token for the next page; `None` once the listing is
    /// exhausted.
    pub cursor: Option<Cursor>,
    /// Arrival order. Duplicate ids across pages are kept.
    pub items: Vec<Gif>,
    pub loading: bool,
    pub error: Option<String>,
}

impl QueryState {
    /// Derived from the cursor so the two can never disagree.
    pub fn has_more(&self) -> bool {
        self.cursor.is_some()
    }
}

/// What a coordinator operation did. The state is still the source of
/// truth; this is for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was applied to the state.
    Applied,
    /// Another request was in flight; nothing happened.
    Busy,
    /// Empty query; the source was not called.
    Invalid,
    /// `load_more` with no further pages.
    Exhausted,
    /// `retry` without a pending error.
    NoError,
    /// The state was cleared or replaced while the request was in flight.
    Stale,
    /// The request failed; the error is in the state.
    Failed,
    /// The upstream answered with an embedded error; the error is in the
    /// state.
    UpstreamError,
}

type Subscriber = Rc<dyn Fn(&QueryState)>;

/// Handle returned by [`FetchCoordinator::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

struct Inner<S> {
    source: S,
    state: RefCell<QueryState>,
    generation: Cell<u64>,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: Cell<u64>,
}

/// Issued when a request starts.
struct Ticket {
    generation: u64,
    cursor: Option<Cursor>,
}

/// Single-threaded coordinator. Clones share the same state.
pub struct FetchCoordinator<S> {
    inner: Rc<Inner<S>>,
}

impl<S> Clone for FetchCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S> PartialEq for FetchCoordinator<S> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<S: GifSource> FetchCoordinator<S> {
    pub fn new(source: S) -> Self {
        Self {
            inner: Rc::new(Inner {
                source,
                state: RefCell::new(QueryState::default()),
                generation: Cell::new(0),
                subscribers: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
            }),
        }
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    pub fn state(&self) -> QueryState {
        self.inner.state.borrow().clone()
    }

    /// Register a callback run after every state change.
    pub fn subscribe(
        &self,
        subscriber: impl Fn(&QueryState) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_subscription.get());
        self.inner.next_subscription.set(id.0 + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(subscriber)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .subscribers
            .borrow_mut()
            .retain(|(subscribed, _)| *subscribed != id);
    }

    /// Search for `query`. With `append` the next page after the stored
    /// cursor is added to the current items; otherwise the first page
    /// replaces them. Ignored while another request is in flight, even
    /// when `query` is empty.
    pub async fn search(
        &self,
        query: &str,
        limit: u32,
        append: bool,
    ) -> FetchOutcome {
        if self.inner.state.borrow().loading {
            tracing::debug!("Request ignored: another request is in flight");
            return FetchOutcome::Busy;
        }
        if query.trim().is_empty() {
            tracing::warn!("Rejected search with an empty query");
            self.update(|state| {
                state.error = Some(EMPTY_QUERY_MESSAGE.to_string())
            });
            return FetchOutcome::Invalid;
        }

        let Some(ticket) = self.begin(query, limit, append) else {
            return FetchOutcome::Busy;
        };
        let result = self
            .inner
            .source
            .search(query, limit, ticket.cursor.as_ref())
            .await;
        self.finish("search", ticket, result, append)
    }

    /// Append the next page of `query`. Does nothing while a request is in
    /// flight or once the listing is exhausted.
    pub async fn load_more(&self, query: &str, limit: u32) -> FetchOutcome {
        {
            let state = self.inner.state.borrow();
            if state.loading {
                tracing::debug!("Load more blocked: request in flight");
                return FetchOutcome::Busy;
            }
            if !state.has_more() {
                tracing::debug!("Load more blocked: no further pages");
                return FetchOutcome::Exhausted;
            }
        }
        tracing::debug!("Loading more GIFs");
        self.search(query, limit, true).await
    }

    /// Re-run `query` from the first page after a failure.
    pub async fn retry(&self, query: &str, limit: u32) -> FetchOutcome {
        if self.inner.state.borrow().error.is_none() {
            return FetchOutcome::NoError;
        }
        self.search(query, limit, false).await
    }

    /// Replace the wall with the curated listing.
    pub async fn featured(&self, limit: u32) -> FetchOutcome {
        let Some(ticket) = self.begin("", limit, false) else {
            return FetchOutcome::Busy;
        };
        let result = self.inner.source.featured(limit).await;
        self.finish("featured", ticket, result, false)
    }

    /// Drop items, error and cursor. A request still in flight completes
    /// but its response is discarded.
    pub fn clear(&self) {
        self.bump_generation();
        self.update(|state| {
            state.items.clear();
            state.error = None;
            state.cursor = None;
        });
    }

    fn bump_generation(&self) -> u64 {
        let generation = self.inner.generation.get() + 1;
        self.inner.generation.set(generation);
        generation
    }

    /// Enter the loading state, or return `None` if already loading.
    fn begin(&self, query: &str, limit: u32, append: bool) -> Option<Ticket> {
        if self.inner.state.borrow().loading {
            tracing::debug!("Request ignored: another request is in flight");
            return None;
        }

        let generation = if append {
            self.inner.generation.get()
        } else {
            self.bump_generation()
        };
        let mut cursor = None;
        self.update(|state| {
            state.loading = true;
            state.error = None;
            state.query_text = query.to_string();
            state.page_size = limit;
            if append {
                cursor = state.cursor.clone();
            }
        });
        Some(Ticket { generation, cursor })
    }

    fn finish<E: std::error::Error>(
        &self,
        operation: &str,
        ticket: Ticket,
        result: Result<PageResponse, E>,
        append: bool,
    ) -> FetchOutcome {
        if ticket.generation != self.inner.generation.get() {
            tracing::debug!(operation, "Discarding stale response");
            self.update(|state| state.loading = false);
            return FetchOutcome::Stale;
        }

        match result {
            Ok(PageResponse {
                error: Some(error), ..
            }) => {
                tracing::warn!(operation, "Upstream reported an error: {error}");
                self.update(|state| {
                    state.error = Some(error);
                    state.loading = false;
                });
                FetchOutcome::UpstreamError
            }
            Ok(page) => {
                tracing::debug!(
                    operation,
                    received = page.items.len(),
                    has_more = page.has_more(),
                    "Applying page"
                );
                self.update(|state| {
                    if append {
                        state.items.extend(page.items);
                    } else {
                        state.items = page.items;
                    }
                    state.cursor = page.next_cursor;
                    state.error = None;
                    state.loading = false;
                });
                FetchOutcome::Applied
            }
            Err(e) => {
                handle_api_error(&RawError::from_error(&e), operation);
                let message = e.to_string();
                self.update(|state| {
                    state.error = Some(message);
                    state.loading = false;
                });
                FetchOutcome::Failed
            }
        }
    }

    fn update(&self, mutate: impl FnOnce(&mut QueryState)) {
        let snapshot = {
            let mut state = self.inner.state.borrow_mut();
            mutate(&mut state);
            state.clone()
        };
        let subscribers: Vec<Subscriber> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, subscriber)| subscriber.clone())
            .collect();
        for subscriber in subscribers {
            subscriber(&snapshot);
        }
    }
}
