use feed::{RawError, classify};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ErrorDisplayProps {
    /// Raw error text from the coordinator; translated before display.
    pub message: String,
    /// Offered only for transient failures.
    #[prop_or_default]
    pub on_retry: Option<Callback<()>>,
}

#[function_component]
pub fn ErrorDisplay(props: &ErrorDisplayProps) -> Html {
    let classification = classify(&RawError::from(props.message.as_str()));

    let retry_button = match &props.on_retry {
        Some(on_retry) if classification.is_retryable() => {
            let on_retry = on_retry.clone();
            let onclick = Callback::from(move |_| on_retry.emit(()));
            html! {
                <button
                    {onclick}
                    class="mt-3 px-3 py-1 text-sm rounded-md bg-red-600 text-white hover:bg-red-700"
                >
                    {"Try again"}
                </button>
            }
        }
        _ => html! {},
    };

    html! {
        <div
            role="alert"
            class="p-4 rounded-md bg-red-50 dark:bg-red-900/20 border border-red-200 dark:border-red-800"
        >
            <p class="text-sm text-red-700 dark:text-red-400">
                {classification.user_message}
            </p>
            {retry_button}
        </div>
    }
}
