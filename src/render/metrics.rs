//! Box metrics: the margin/border/padding insets of a node and the
//! paint routine for its background and border.

use crate::css::properties::Property;
use crate::css::resolve::NodeAttributes;
use crate::css::values::{BorderStyleKind, CssValue};

use super::color::Color;
use super::painter::{DisplayCommand, DisplayList, Rect};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Insets {
    pub fn uniform(v: f32) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }
}

/// Resolved box presentation for one node. Percentage margins and
/// paddings resolve against the containing width given at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxMetrics {
    pub margin: Insets,
    pub border: Insets,
    pub padding: Insets,
    pub background: Option<Color>,
    pub background_image: Option<String>,
    pub tile_x: bool,
    pub tile_y: bool,
    pub border_color: Color,
}

impl BoxMetrics {
    pub fn new(attrs: &NodeAttributes, container_width: f32) -> Self {
        let side = |key: Property| attrs.length_pt(key, container_width).unwrap_or(0.0);

        let margin = Insets {
            top: side(Property::MarginTop),
            right: side(Property::MarginRight),
            bottom: side(Property::MarginBottom),
            left: side(Property::MarginLeft),
        };
        let padding = Insets {
            top: side(Property::PaddingTop),
            right: side(Property::PaddingRight),
            bottom: side(Property::PaddingBottom),
            left: side(Property::PaddingLeft),
        };
        // A border side contributes width only when it has a style.
        let border_side = |style_key: Property, width_key: Property| {
            let styled = !matches!(
                attrs.value(style_key).and_then(|v| v.as_border_style()),
                None | Some(BorderStyleKind::None)
            );
            if styled {
                side(width_key)
            } else {
                0.0
            }
        };
        let border = Insets {
            top: border_side(Property::BorderTopStyle, Property::BorderTopWidth),
            right: border_side(Property::BorderRightStyle, Property::BorderRightWidth),
            bottom: border_side(Property::BorderBottomStyle, Property::BorderBottomWidth),
            left: border_side(Property::BorderLeftStyle, Property::BorderLeftWidth),
        };

        // border-color is not inherited; it falls back to the text color.
        let border_color = attrs
            .value(Property::BorderTopColor)
            .and_then(|v| v.as_color())
            .unwrap_or_else(|| attrs.foreground());

        let (background_image, tile_x, tile_y) = background_tiling(attrs);

        Self {
            margin,
            border,
            padding,
            background: attrs.background(),
            background_image,
            tile_x,
            tile_y,
            border_color,
        }
    }

    /// Total inset on each side: margin + border + padding.
    pub fn total(&self) -> Insets {
        Insets {
            top: self.margin.top + self.border.top + self.padding.top,
            right: self.margin.right + self.border.right + self.padding.right,
            bottom: self.margin.bottom + self.border.bottom + self.padding.bottom,
            left: self.margin.left + self.border.left + self.padding.left,
        }
    }

    /// Emits the background and border commands for a box occupying
    /// `bounds` (margin box).
    pub fn paint(&self, bounds: Rect) -> DisplayList {
        let mut commands = Vec::new();
        let border_box = bounds.inset(
            self.margin.top,
            self.margin.right,
            self.margin.bottom,
            self.margin.left,
        );
        if let Some(color) = self.background {
            commands.push(DisplayCommand::SolidRect {
                rect: border_box,
                color,
            });
        }
        if let Some(url) = &self.background_image {
            commands.push(DisplayCommand::Image {
                rect: border_box,
                url: url.clone(),
                tile_x: self.tile_x,
                tile_y: self.tile_y,
            });
        }
        if self.border != Insets::default() {
            commands.push(DisplayCommand::Border {
                rect: border_box,
                widths: [
                    self.border.top,
                    self.border.right,
                    self.border.bottom,
                    self.border.left,
                ],
                color: self.border_color,
            });
        }
        commands
    }
}

fn background_tiling(attrs: &NodeAttributes) -> (Option<String>, bool, bool) {
    let url = match attrs.value(Property::BackgroundImage) {
        Some(CssValue::BackgroundImage(img)) => img.url,
        _ => None,
    };
    let repeat = attrs
        .value(Property::BackgroundRepeat)
        .and_then(|v| v.as_keyword().map(str::to_string));
    let (tile_x, tile_y) = match repeat.as_deref() {
        Some("repeat-x") => (true, false),
        Some("repeat-y") => (false, true),
        Some("no-repeat") => (false, false),
        _ => (true, true),
    };
    (url, tile_x, tile_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::resolve::StyleResolver;
    use crate::css::stylesheet::StyleSheet;
    use crate::dom::Document;
    use std::sync::Arc;

    fn metrics_for(css: &str) -> BoxMetrics {
        let mut doc = Document::new();
        let body = doc.add_element(doc.root, "body", &[]);
        let div = doc.add_element(body, "div", &[]);
        let sheet = Arc::new(StyleSheet::new());
        sheet.add_rule(css);
        let resolver = StyleResolver::new(sheet);
        BoxMetrics::new(&resolver.attributes(&doc, div), 100.0)
    }

    #[test]
    fn test_margin_and_padding_insets() {
        let m = metrics_for("div { margin: 4pt; padding: 1pt 2pt }");
        assert_eq!(m.margin, Insets::uniform(4.0));
        assert_eq!(m.padding.top, 1.0);
        assert_eq!(m.padding.left, 2.0);
        assert_eq!(m.total().left, 6.0);
    }

    #[test]
    fn test_percentage_margin_resolves_against_container() {
        let m = metrics_for("div { margin-left: 10% }");
        assert_eq!(m.margin.left, 10.0);
    }

    #[test]
    fn test_border_requires_style() {
        // Width declared but no style: border contributes nothing.
        let m = metrics_for("div { border-top-width: 5pt }");
        assert_eq!(m.border.top, 0.0);

        let m = metrics_for("div { border-top-width: 5pt; border-top-style: solid }");
        assert_eq!(m.border.top, 5.0);
    }

    #[test]
    fn test_border_shorthand_metrics() {
        let m = metrics_for("div { border: 2px solid red }");
        assert!(m.border.top > 0.0);
        assert_eq!(m.border_color, Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_border_color_falls_back_to_text_color() {
        let m = metrics_for("div { color: navy; border: 1pt solid }");
        assert_eq!(m.border_color, Color::rgb(0, 0, 128));
    }

    #[test]
    fn test_paint_emits_background_then_border() {
        let m = metrics_for("div { background-color: silver; border: 1pt solid black; margin: 2pt }");
        let commands = m.paint(Rect::new(0.0, 0.0, 50.0, 20.0));
        assert_eq!(commands.len(), 2);
        assert!(matches!(
            &commands[0],
            DisplayCommand::SolidRect { rect, .. } if rect.x == 2.0
        ));
        assert!(matches!(&commands[1], DisplayCommand::Border { .. }));
    }

    #[test]
    fn test_background_tiling_modes() {
        let m = metrics_for("div { background: url(t.png) repeat-x }");
        assert_eq!(m.background_image.as_deref(), Some("t.png"));
        assert!(m.tile_x);
        assert!(!m.tile_y);
    }
}
