use yew::prelude::*;

#[function_component]
pub fn LoadingSpinner() -> Html {
    html! {
        <div class="flex justify-center py-6" role="status">
            <div class="h-8 w-8 animate-spin rounded-full border-4 border-gray-300 border-t-gray-600"></div>
            <span class="sr-only">{"Loading..."}</span>
        </div>
    }
}
