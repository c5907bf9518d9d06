pub mod attrset;
pub mod parser;
pub mod properties;
pub mod resolve;
pub mod resolved;
pub mod rule;
pub mod selector;
pub mod shorthand;
pub mod stylesheet;
pub mod values;

pub use attrset::AttrSet;
pub use parser::{parse_declaration_block, parse_sheet, SheetItem};
pub use properties::{MarkupAttr, Property};
pub use resolve::{NodeAttributes, StyleResolver};
pub use resolved::{ResolvedStyle, StyleEntry};
pub use rule::Rule;
pub use selector::{clean_selector_string, specificity, SelectorMapping, SelectorToken};
pub use stylesheet::StyleSheet;
pub use values::{CssValue, FontSize, LengthKind, LengthUnit, LengthValue};
