use feed::{FetchOutcome, QueryState};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::Coordinator;

/// Read side and operations of the session's coordinator.
pub struct GifFeedHandle {
    pub state: QueryState,
    pub search: Callback<String>,
    pub load_more: Callback<()>,
    /// Re-run the last request from the first page; the featured listing
    /// when no query has been searched.
    pub retry: Callback<()>,
    pub featured: Callback<()>,
    pub clear: Callback<()>,
}

/// Bind the coordinator from context to this component.
///
/// The coordinator pushes a snapshot into component state after every
/// change. Operations read the query and cursor from the coordinator when
/// they start, so callbacks never act on values from an earlier render.
#[hook]
pub fn use_gif_feed() -> GifFeedHandle {
    let coordinator = use_context::<Coordinator>()
        .expect("use_gif_feed must be used below a Coordinator provider");
    let state = use_state(|| coordinator.state());

    {
        let state = state.clone();
        use_effect_with(coordinator.clone(), move |coordinator| {
            state.set(coordinator.state());
            let id = coordinator
                .subscribe(move |snapshot| state.set(snapshot.clone()));
            let coordinator = coordinator.clone();
            move || coordinator.unsubscribe(id)
        });
    }

    let search = use_callback(coordinator.clone(), |query: String, coordinator| {
        let coordinator = coordinator.clone();
        spawn_local(async move {
            let limit = coordinator.source().default_limit();
            let outcome = coordinator.search(&query, limit, false).await;
            log_outcome("search", outcome);
        });
    });

    let load_more = use_callback(coordinator.clone(), |_: (), coordinator| {
        let coordinator = coordinator.clone();
        spawn_local(async move {
            let limit = coordinator.source().default_limit();
            let query = coordinator.state().query_text;
            let outcome = coordinator.load_more(&query, limit).await;
            log_outcome("load_more", outcome);
        });
    });

    let retry = use_callback(coordinator.clone(), |_: (), coordinator| {
        let coordinator = coordinator.clone();
        spawn_local(async move {
            let limit = coordinator.source().default_limit();
            let query = coordinator.state().query_text;
            let outcome = if query.is_empty() {
                coordinator.featured(limit).await
            } else {
                coordinator.retry(&query, limit).await
            };
            log_outcome("retry", outcome);
        });
    });

    let featured = use_callback(coordinator.clone(), |_: (), coordinator| {
        let coordinator = coordinator.clone();
        spawn_local(async move {
            let limit = coordinator.source().default_limit();
            let outcome = coordinator.featured(limit).await;
            log_outcome("featured", outcome);
        });
    });

    let clear = use_callback(coordinator.clone(), |_: (), coordinator| {
        coordinator.clear();
    });

    GifFeedHandle {
        state: (*state).clone(),
        search,
        load_more,
        retry,
        featured,
        clear,
    }
}

fn log_outcome(operation: &str, outcome: FetchOutcome) {
    match outcome {
        FetchOutcome::Applied => {}
        FetchOutcome::Failed | FetchOutcome::UpstreamError => {
            tracing::warn!(operation, ?outcome, "Request did not complete")
        }
        _ => tracing::debug!(operation, ?outcome, "Request skipped"),
    }
}
