pub mod http;
pub mod image;
pub mod loader;

pub use image::{ImageEvent, ImageLoader, ImageState};
pub use loader::{LoadError, Loader};
