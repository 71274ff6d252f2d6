mod gif_wall;

pub use gif_wall::GifWall;
