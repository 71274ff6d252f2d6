use feed::TriggerConfig;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;
use crate::components::{ErrorDisplay, GifGrid, LoadingSpinner, SearchBar};
use crate::hooks::{use_gif_feed, use_infinite_scroll};

#[derive(Properties, PartialEq)]
pub struct GifWallProps {
    /// The featured listing is shown when absent.
    #[prop_or_default]
    pub query: Option<String>,
}

#[function_component]
pub fn GifWall(props: &GifWallProps) -> Html {
    let feed = use_gif_feed();
    let navigator = use_navigator();
    let state = &feed.state;

    use_effect_with(props.query.clone(), {
        let search = feed.search.clone();
        let featured = feed.featured.clone();
        move |query| match query {
            Some(query) => search.emit(query.clone()),
            None => featured.emit(()),
        }
    });

    let on_search = {
        let search = feed.search.clone();
        Callback::from(move |query: String| {
            let trimmed = query.trim();
            match &navigator {
                Some(navigator) if !trimmed.is_empty() => {
                    navigator.push(&Route::Search {
                        query: trimmed.to_string(),
                    });
                }
                // Empty queries go straight to the coordinator, which
                // rejects them with a message.
                _ => search.emit(query),
            }
        })
    };

    // Featured listings have no query to page with.
    let scroll_enabled = state.has_more()
        && !state.loading
        && state.error.is_none()
        && !state.query_text.is_empty();
    let sentinel = use_infinite_scroll(
        feed.load_more.clone(),
        TriggerConfig::default().with_enabled(scroll_enabled),
    );

    let error = match &state.error {
        Some(message) => html! {
            <div class="mb-6">
                <ErrorDisplay
                    message={message.clone()}
                    on_retry={Some(feed.retry.clone())}
                />
            </div>
        },
        None => html! {},
    };

    let footer = if state.loading {
        html! { <LoadingSpinner /> }
    } else if state.items.is_empty() && state.error.is_none() {
        html! {
            <p class="text-center py-12 text-gray-600 dark:text-gray-400">
                {"No GIFs found"}
            </p>
        }
    } else if !state.has_more() && !state.query_text.is_empty() {
        html! {
            <p class="text-center py-6 text-sm text-gray-500">
                {"You've reached the end"}
            </p>
        }
    } else {
        html! {}
    };

    html! {
        <main class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
            <SearchBar
                initial={props.query.clone().unwrap_or_default()}
                on_search={on_search}
                on_clear={(!state.items.is_empty()).then(|| feed.clear.clone())}
                disabled={state.loading}
            />
            {error}
            <GifGrid items={state.items.clone()} />
            {footer}
            <div ref={sentinel} class="h-px" aria-hidden="true"></div>
        </main>
    }
}
