use payloads::Gif;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct GifItemProps {
    pub gif: Gif,
}

#[function_component]
pub fn GifItem(props: &GifItemProps) -> Html {
    let gif = &props.gif;
    // Zero means the upstream did not say; let the browser size it.
    let dimension = |value: u32| (value > 0).then(|| AttrValue::from(value.to_string()));

    html! {
        <a
            href={gif.full_url.clone()}
            target="_blank"
            rel="noopener noreferrer"
            class="block overflow-hidden rounded-lg bg-gray-100 dark:bg-gray-800"
        >
            <img
                src={gif.preview_url.clone()}
                alt={gif.title.clone()}
                title={gif.title.clone()}
                width={dimension(gif.width)}
                height={dimension(gif.height)}
                loading="lazy"
                class="w-full h-auto"
            />
        </a>
    }
}
