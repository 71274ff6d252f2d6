use payloads::Gif;
use yew::prelude::*;

use super::GifItem;

#[derive(Properties, PartialEq)]
pub struct GifGridProps {
    pub items: Vec<Gif>,
}

#[function_component]
pub fn GifGrid(props: &GifGridProps) -> Html {
    html! {
        <div class="grid grid-cols-2 sm:grid-cols-3 lg:grid-cols-4 gap-4">
            // Ids can repeat across pages, so keys include the position.
            {for props.items.iter().enumerate().map(|(index, gif)| html! {
                <GifItem key={format!("{index}-{}", gif.id)} gif={gif.clone()} />
            })}
        </div>
    }
}
