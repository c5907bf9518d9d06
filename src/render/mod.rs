pub mod color;
pub mod font;
pub mod marker;
pub mod metrics;
pub mod painter;

pub use color::Color;
pub use font::{get_font, FontSpec};
pub use marker::{format_index, ListMarker, MarkerKind};
pub use metrics::{BoxMetrics, Insets};
pub use painter::{DisplayCommand, DisplayList, Rect};
