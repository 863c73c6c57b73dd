pub mod thumbnails;

pub use thumbnails::{Thumbnail, ThumbnailCache};
