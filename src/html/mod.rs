pub mod translate;

pub use translate::{attr_targets, translate_attributes};
