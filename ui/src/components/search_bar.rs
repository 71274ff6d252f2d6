use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SearchBarProps {
    #[prop_or_default]
    pub initial: String,
    pub on_search: Callback<String>,
    /// Shows a clear button when set.
    #[prop_or_default]
    pub on_clear: Option<Callback<()>>,
    #[prop_or_default]
    pub disabled: bool,
}

#[function_component]
pub fn SearchBar(props: &SearchBarProps) -> Html {
    let input_ref = use_node_ref();

    let onsubmit = {
        let input_ref = input_ref.clone();
        let on_search = props.on_search.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if let Some(input) = input_ref.cast::<HtmlInputElement>() {
                on_search.emit(input.value());
            }
        })
    };

    let clear_button = match &props.on_clear {
        Some(on_clear) => {
            let on_clear = on_clear.clone();
            let input_ref = input_ref.clone();
            let onclick = Callback::from(move |_| {
                if let Some(input) = input_ref.cast::<HtmlInputElement>() {
                    input.set_value("");
                }
                on_clear.emit(());
            });
            html! {
                <button
                    type="button"
                    {onclick}
                    class="px-4 py-2 rounded-md border border-gray-300 dark:border-gray-600"
                >
                    {"Clear"}
                </button>
            }
        }
        None => html! {},
    };

    html! {
        <form {onsubmit} class="flex gap-2 mb-6">
            <input
                ref={input_ref}
                type="search"
                placeholder="Search GIFs"
                value={props.initial.clone()}
                class="flex-1 px-3 py-2 rounded-md border border-gray-300 dark:border-gray-600 bg-white dark:bg-gray-800"
            />
            <button
                type="submit"
                disabled={props.disabled}
                class="px-4 py-2 rounded-md bg-gray-900 text-white dark:bg-gray-100 dark:text-gray-900 disabled:opacity-50"
            >
                {"Search"}
            </button>
            {clear_button}
        </form>
    }
}
