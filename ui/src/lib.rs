use feed::FetchCoordinator;
use payloads::{ConfigError, TenorClient, TenorConfig};
use yew::prelude::*;
use yew_router::prelude::*;

mod components;
mod hooks;
mod logs;
mod pages;

use components::ErrorDisplay;
use pages::GifWall;

pub use logs::init_logging;

/// The one coordinator per session, shared through context.
pub type Coordinator = FetchCoordinator<TenorClient>;

/// Build the upstream client from values baked in at compile time, e.g.
/// `TENOR_API_KEY=... trunk build`.
pub fn get_tenor_client() -> Result<TenorClient, ConfigError> {
    let config =
        TenorConfig::from_lookup(|key| build_env(key).map(str::to_string))?;
    tracing::info!(
        version = %config.version,
        base_url = %config.base_url,
        "Configured GIF service"
    );
    Ok(TenorClient::new(config))
}

fn build_env(key: &str) -> Option<&'static str> {
    match key {
        "TENOR_API_KEY" => option_env!("TENOR_API_KEY"),
        "TENOR_API_VERSION" => option_env!("TENOR_API_VERSION"),
        "TENOR_API_BASE_URL" => option_env!("TENOR_API_BASE_URL"),
        "TENOR_CLIENT_KEY" => option_env!("TENOR_CLIENT_KEY"),
        "TENOR_COUNTRY" => option_env!("TENOR_COUNTRY"),
        "TENOR_DEFAULT_LIMIT" => option_env!("TENOR_DEFAULT_LIMIT"),
        "TENOR_CONTENT_FILTER" => option_env!("TENOR_CONTENT_FILTER"),
        _ => None,
    }
}

#[function_component]
pub fn App() -> Html {
    let coordinator = use_memo((), |_| {
        get_tenor_client()
            .map(FetchCoordinator::new)
            .map_err(|e| e.to_string())
    });

    let coordinator = match &*coordinator {
        Ok(coordinator) => coordinator.clone(),
        Err(message) => {
            tracing::error!("Configuration error: {message}");
            return html! {
                <main class="max-w-3xl mx-auto px-4 py-8">
                    <ErrorDisplay message={message.clone()} />
                </main>
            };
        }
    };

    html! {
        <ContextProvider<Coordinator> context={coordinator}>
            <BrowserRouter>
                <div class="min-h-screen bg-white dark:bg-gray-900 text-gray-900 dark:text-gray-100">
                    <Switch<Route> render={switch} />
                </div>
            </BrowserRouter>
        </ContextProvider<Coordinator>>
    }
}

#[derive(Clone, Routable, PartialEq)]
pub(crate) enum Route {
    #[at("/")]
    Home,
    #[at("/search/:query")]
    Search { query: String },
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => html! { <GifWall /> },
        Route::Search { query } => html! { <GifWall query={Some(query)} /> },
        Route::NotFound => html! {
            <main class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
                <div class="text-center">
                    <h1 class="text-4xl font-bold text-gray-900 dark:text-white">{"404"}</h1>
                    <p class="text-gray-600 dark:text-gray-300">{"Page not found"}</p>
                </div>
            </main>
        },
    }
}
