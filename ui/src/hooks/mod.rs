pub mod use_gif_feed;
pub mod use_infinite_scroll;

pub use use_gif_feed::{GifFeedHandle, use_gif_feed};
pub use use_infinite_scroll::use_infinite_scroll;
