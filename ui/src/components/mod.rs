pub mod error_display;
pub mod gif_grid;
pub mod gif_item;
pub mod loading_spinner;
pub mod search_bar;

pub use error_display::ErrorDisplay;
pub use gif_grid::GifGrid;
pub use gif_item::GifItem;
pub use loading_spinner::LoadingSpinner;
pub use search_bar::SearchBar;
