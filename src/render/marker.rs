//! List markers: kind selection from `list-style-type`, index formatting,
//! and the marker paint routine.

use crate::css::properties::Property;
use crate::css::resolve::NodeAttributes;
use crate::css::values::CssValue;

use super::color::Color;
use super::painter::{DisplayCommand, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Disc,
    Circle,
    Square,
    Decimal,
    LowerAlpha,
    UpperAlpha,
    LowerRoman,
    UpperRoman,
    None,
}

impl MarkerKind {
    pub fn from_keyword(keyword: &str) -> Option<MarkerKind> {
        let kind = match keyword {
            "disc" => MarkerKind::Disc,
            "circle" => MarkerKind::Circle,
            "square" => MarkerKind::Square,
            "decimal" => MarkerKind::Decimal,
            "lower-alpha" => MarkerKind::LowerAlpha,
            "upper-alpha" => MarkerKind::UpperAlpha,
            "lower-roman" => MarkerKind::LowerRoman,
            "upper-roman" => MarkerKind::UpperRoman,
            "none" => MarkerKind::None,
            _ => return None,
        };
        Some(kind)
    }

    /// The default marker for a list container when nothing is declared:
    /// ordered lists count, unordered lists get bullets.
    pub fn default_for_tag(tag: &str) -> MarkerKind {
        match tag {
            "ol" => MarkerKind::Decimal,
            "menu" | "dir" | "ul" => MarkerKind::Disc,
            _ => MarkerKind::Disc,
        }
    }

    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            MarkerKind::Decimal
                | MarkerKind::LowerAlpha
                | MarkerKind::UpperAlpha
                | MarkerKind::LowerRoman
                | MarkerKind::UpperRoman
        )
    }
}

/// Formats a 1-based item index for the textual marker kinds, trailing
/// dot included. Shape kinds return `None`.
pub fn format_index(kind: MarkerKind, index: usize) -> Option<String> {
    let text = match kind {
        MarkerKind::Decimal => index.to_string(),
        MarkerKind::LowerAlpha => alpha_numeral(index),
        MarkerKind::UpperAlpha => alpha_numeral(index).to_ascii_uppercase(),
        MarkerKind::LowerRoman => roman_numeral(index),
        MarkerKind::UpperRoman => roman_numeral(index).to_ascii_uppercase(),
        _ => return None,
    };
    Some(format!("{}.", text))
}

fn alpha_numeral(mut n: usize) -> String {
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn roman_numeral(mut n: usize) -> String {
    const NUMERALS: [(usize, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut out = String::new();
    for (value, numeral) in NUMERALS {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}

/// The marker configuration for one list container.
#[derive(Debug, Clone, PartialEq)]
pub struct ListMarker {
    pub kind: MarkerKind,
    /// Overrides the kind when the image has been loaded.
    pub image_url: Option<String>,
}

impl ListMarker {
    /// Reads list-style-type/-image from the container's resolved
    /// attributes, defaulting by tag.
    pub fn from_attrs(attrs: &NodeAttributes, container_tag: &str) -> Self {
        let kind = attrs
            .declared_or_inherited(Property::ListStyleType)
            .and_then(|v| v.as_keyword().and_then(MarkerKind::from_keyword))
            .unwrap_or_else(|| MarkerKind::default_for_tag(container_tag));
        let image_url = match attrs.declared_or_inherited(Property::ListStyleImage) {
            Some(CssValue::BackgroundImage(img)) => img.url,
            _ => None,
        };
        Self { kind, image_url }
    }

    /// Emits the command that draws the marker for item `index` to the
    /// left of the item box. `size_pt` is the item's resolved font size.
    pub fn paint(
        &self,
        x: f32,
        y: f32,
        size_pt: f32,
        index: usize,
        color: Color,
    ) -> Option<DisplayCommand> {
        if let Some(url) = &self.image_url {
            let side = size_pt * 0.8;
            return Some(DisplayCommand::Image {
                rect: Rect::new(x, y, side, side),
                url: url.clone(),
                tile_x: false,
                tile_y: false,
            });
        }
        match self.kind {
            MarkerKind::None => None,
            MarkerKind::Disc | MarkerKind::Square => {
                let side = (size_pt * 0.35).max(2.0);
                Some(DisplayCommand::SolidRect {
                    rect: Rect::new(x, y + (size_pt - side) / 2.0, side, side),
                    color,
                })
            }
            MarkerKind::Circle => {
                let side = (size_pt * 0.35).max(2.0);
                Some(DisplayCommand::Border {
                    rect: Rect::new(x, y + (size_pt - side) / 2.0, side, side),
                    widths: [1.0; 4],
                    color,
                })
            }
            textual => format_index(textual, index).map(|text| DisplayCommand::Text {
                text,
                x,
                y: y + size_pt,
                size_pt,
                color,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::resolve::StyleResolver;
    use crate::css::stylesheet::StyleSheet;
    use crate::dom::Document;
    use std::sync::Arc;

    #[test]
    fn test_roman_numerals() {
        assert_eq!(roman_numeral(1), "i");
        assert_eq!(roman_numeral(4), "iv");
        assert_eq!(roman_numeral(9), "ix");
        assert_eq!(roman_numeral(14), "xiv");
        assert_eq!(roman_numeral(1994), "mcmxciv");
    }

    #[test]
    fn test_alpha_numerals() {
        assert_eq!(alpha_numeral(1), "a");
        assert_eq!(alpha_numeral(26), "z");
        assert_eq!(alpha_numeral(27), "aa");
        assert_eq!(alpha_numeral(52), "az");
    }

    #[test]
    fn test_format_index() {
        assert_eq!(format_index(MarkerKind::Decimal, 3).as_deref(), Some("3."));
        assert_eq!(
            format_index(MarkerKind::UpperRoman, 4).as_deref(),
            Some("IV.")
        );
        assert_eq!(format_index(MarkerKind::Disc, 1), None);
    }

    #[test]
    fn test_marker_from_attrs() {
        let mut doc = Document::new();
        let body = doc.add_element(doc.root, "body", &[]);
        let ol = doc.add_element(body, "ol", &[]);
        let ul = doc.add_element(body, "ul", &[("type", "square")]);

        let sheet = Arc::new(StyleSheet::new());
        sheet.add_rule("ol { list-style-type: upper-roman }");
        let resolver = StyleResolver::new(sheet);

        let marker = ListMarker::from_attrs(&resolver.attributes(&doc, ol), "ol");
        assert_eq!(marker.kind, MarkerKind::UpperRoman);

        // Markup attribute translation feeds the marker too.
        let marker = ListMarker::from_attrs(&resolver.attributes(&doc, ul), "ul");
        assert_eq!(marker.kind, MarkerKind::Square);
    }

    #[test]
    fn test_marker_default_by_tag() {
        let mut doc = Document::new();
        let body = doc.add_element(doc.root, "body", &[]);
        let ol = doc.add_element(body, "ol", &[]);
        let resolver = StyleResolver::new(Arc::new(StyleSheet::new()));
        let marker = ListMarker::from_attrs(&resolver.attributes(&doc, ol), "ol");
        assert_eq!(marker.kind, MarkerKind::Decimal);
    }

    #[test]
    fn test_paint_kinds() {
        let marker = ListMarker {
            kind: MarkerKind::Decimal,
            image_url: None,
        };
        assert!(matches!(
            marker.paint(0.0, 0.0, 12.0, 2, Color::BLACK),
            Some(DisplayCommand::Text { text, .. }) if text == "2."
        ));

        let marker = ListMarker {
            kind: MarkerKind::None,
            image_url: None,
        };
        assert_eq!(marker.paint(0.0, 0.0, 12.0, 1, Color::BLACK), None);

        let marker = ListMarker {
            kind: MarkerKind::Disc,
            image_url: Some("dot.png".to_string()),
        };
        assert!(matches!(
            marker.paint(0.0, 0.0, 12.0, 1, Color::BLACK),
            Some(DisplayCommand::Image { .. })
        ));
    }
}
