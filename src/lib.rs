pub mod css;
pub mod dom;
pub mod html;
pub mod net;
pub mod render;

pub use css::{StyleResolver, StyleSheet};
pub use dom::{Document, StyleError};
