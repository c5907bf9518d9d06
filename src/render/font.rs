//! Font synthesis from resolved attributes.

use crate::css::properties::Property;
use crate::css::resolve::NodeAttributes;
use crate::css::values::CssValue;

/// What the display engine needs to pick a concrete font.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size_pt: f32,
    pub bold: bool,
    pub italic: bool,
}

/// Builds the font for a node from its resolved attributes: family
/// through the font-family list, size through the stylesheet's size
/// model, weight>500 rendered bold, italic/oblique rendered italic.
pub fn get_font(attrs: &NodeAttributes) -> FontSpec {
    let family = match attrs.value(Property::FontFamily) {
        Some(CssValue::FontFamily(f)) => f.name().to_string(),
        _ => "SansSerif".to_string(),
    };
    let bold = matches!(
        attrs.value(Property::FontWeight),
        Some(CssValue::FontWeight(w)) if w.is_bold()
    );
    let italic = matches!(
        attrs.value(Property::FontStyle).as_ref().and_then(|v| v.as_keyword()),
        Some("italic") | Some("oblique")
    );
    FontSpec {
        family,
        size_pt: attrs.font_size_pt(),
        bold,
        italic,
    }
}
