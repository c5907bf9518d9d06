//! Legacy markup-attribute translation.
//!
//! Maps presentational markup attributes (`bgcolor`, `size`, `border`,
//! ...) onto the declared-property namespace. Most mappings are static,
//! some fan one attribute out to several properties, and a few are
//! context-sensitive: `size` only means font size on font elements, and
//! table cells derive border and padding from the table two levels up.
//! Unknown attributes are dropped.

use crate::css::attrset::AttrSet;
use crate::css::properties::{
    MarkupAttr, Property, ALL_BORDER_STYLES, ALL_BORDER_WIDTHS, ALL_PADDING,
};
use crate::dom::{Document, ElementData, NodeId};

/// The declared properties a markup attribute feeds. Multi-valued
/// mappings expand one attribute into several longhands.
pub fn attr_targets(attr: MarkupAttr) -> &'static [Property] {
    use MarkupAttr::*;
    match attr {
        Color => &[Property::Color],
        Text => &[Property::Color],
        Clear => &[Property::Clear],
        Background => &[Property::BackgroundImage],
        Bgcolor => &[Property::BackgroundColor],
        Width => &[Property::Width],
        Height => &[Property::Height],
        Border => &ALL_BORDER_WIDTHS,
        Cellpadding => &ALL_PADDING,
        Cellspacing => &[Property::BorderSpacing],
        Marginwidth => &[Property::MarginLeft, Property::MarginRight],
        Marginheight => &[Property::MarginTop, Property::MarginBottom],
        Hspace => &[Property::PaddingLeft, Property::PaddingRight],
        Vspace => &[Property::PaddingTop, Property::PaddingBottom],
        Face => &[Property::FontFamily],
        Size => &[Property::FontSize],
        Valign => &[Property::VerticalAlign],
        Align => &[Property::TextAlign],
        Type => &[Property::ListStyleType],
        Nowrap => &[Property::WhiteSpace],
    }
}

fn is_font_tag(tag: &str) -> bool {
    tag == "font" || tag == "basefont"
}

fn positive_number(value: &str) -> bool {
    value.trim().parse::<f32>().map(|v| v > 0.0).unwrap_or(false)
}

/// The table a cell belongs to: its grandparent element (`td` -> `tr` ->
/// `table`).
fn enclosing_table<'a>(doc: &'a Document, cell: NodeId) -> Option<&'a ElementData> {
    let row = doc.parent_element(cell)?;
    let table = doc.parent_element(row)?;
    let elem = doc.get_node(table)?.as_element()?;
    (elem.tag_name == "table").then_some(elem)
}

/// Translates a node's legacy markup attributes into declared properties.
/// Values go through each target property's markup grammar; untranslatable
/// values are dropped.
pub fn translate_attributes(doc: &Document, node: NodeId) -> AttrSet {
    let mut out = AttrSet::new();
    let Some(elem) = doc.get_node(node).and_then(|n| n.as_element()) else {
        return out;
    };
    let tag = elem.tag_name.as_str();

    for (name, value) in &elem.attributes {
        let Some(attr) = MarkupAttr::from_name(name) else {
            continue;
        };
        match attr {
            // size only means font size on font elements
            MarkupAttr::Size if !is_font_tag(tag) => continue,
            MarkupAttr::Border if tag == "table" => {
                // border="0" turns the table border off entirely
                if positive_number(value) {
                    translate_border(&mut out, value);
                }
                continue;
            }
            _ => {}
        }
        for key in attr_targets(attr) {
            out.add_html(*key, value);
        }
    }

    // Table cells derive their box from the enclosing table's attributes.
    if tag == "td" || tag == "th" {
        if let Some(table) = enclosing_table(doc, node) {
            if table.get_attribute("border").is_some_and(positive_number) {
                translate_border(&mut out, "1");
            }
            if let Some(padding) = table.get_attribute("cellpadding") {
                for key in ALL_PADDING {
                    out.add_html(key, padding);
                }
            }
        }
    }
    out
}

/// A markup border means a visible border: width on all four sides plus a
/// solid style, since the declared-property model paints no border
/// without a style.
fn translate_border(out: &mut AttrSet, width: &str) {
    for key in ALL_BORDER_WIDTHS {
        out.add_html(key, width);
    }
    for key in ALL_BORDER_STYLES {
        out.add_css(key, "solid");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::values::CssValue;

    #[test]
    fn test_font_element_attributes() {
        let mut doc = Document::new();
        let body = doc.add_element(doc.root, "body", &[]);
        let font = doc.add_element(
            body,
            "font",
            &[("color", "red"), ("size", "+1"), ("face", "Helvetica")],
        );
        let attrs = translate_attributes(&doc, font);
        assert_eq!(attrs.get(Property::Color).unwrap().to_css_string(), "#ff0000");
        assert!(attrs.is_defined(Property::FontSize));
        assert!(matches!(
            attrs.get(Property::FontFamily).unwrap(),
            CssValue::FontFamily(f) if f.name() == "Helvetica"
        ));
    }

    #[test]
    fn test_size_ignored_outside_font_tags() {
        let mut doc = Document::new();
        let body = doc.add_element(doc.root, "body", &[]);
        let input = doc.add_element(body, "input", &[("size", "20")]);
        let attrs = translate_attributes(&doc, input);
        assert!(!attrs.is_defined(Property::FontSize));
    }

    #[test]
    fn test_unknown_attributes_dropped() {
        let mut doc = Document::new();
        let body = doc.add_element(doc.root, "body", &[("onload", "init()")]);
        let attrs = translate_attributes(&doc, body);
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_body_colors_and_margins() {
        let mut doc = Document::new();
        let body = doc.add_element(
            doc.root,
            "body",
            &[("bgcolor", "#ffffff"), ("text", "navy"), ("marginwidth", "8")],
        );
        let attrs = translate_attributes(&doc, body);
        assert_eq!(
            attrs.get(Property::BackgroundColor).unwrap().to_css_string(),
            "#ffffff"
        );
        assert_eq!(attrs.get(Property::Color).unwrap().to_css_string(), "#000080");
        assert_eq!(attrs.get(Property::MarginLeft).unwrap().to_css_string(), "8");
        assert_eq!(attrs.get(Property::MarginRight).unwrap().to_css_string(), "8");
        assert!(!attrs.is_defined(Property::MarginTop));
    }

    #[test]
    fn test_table_border_and_zero_border() {
        let mut doc = Document::new();
        let body = doc.add_element(doc.root, "body", &[]);
        let bordered = doc.add_element(body, "table", &[("border", "2")]);
        let attrs = translate_attributes(&doc, bordered);
        assert_eq!(
            attrs.get(Property::BorderTopWidth).unwrap().to_css_string(),
            "2"
        );

        let borderless = doc.add_element(body, "table", &[("border", "0")]);
        let attrs = translate_attributes(&doc, borderless);
        assert!(!attrs.is_defined(Property::BorderTopWidth));
    }

    #[test]
    fn test_cell_derives_from_enclosing_table() {
        let mut doc = Document::new();
        let body = doc.add_element(doc.root, "body", &[]);
        let table = doc.add_element(body, "table", &[("border", "1"), ("cellpadding", "6")]);
        let tr = doc.add_element(table, "tr", &[]);
        let td = doc.add_element(tr, "td", &[]);

        let attrs = translate_attributes(&doc, td);
        assert_eq!(
            attrs.get(Property::BorderLeftWidth).unwrap().to_css_string(),
            "1"
        );
        assert_eq!(attrs.get(Property::PaddingTop).unwrap().to_css_string(), "6");
    }

    #[test]
    fn test_cell_without_table_context() {
        let mut doc = Document::new();
        let body = doc.add_element(doc.root, "body", &[]);
        let td = doc.add_element(body, "td", &[]);
        let attrs = translate_attributes(&doc, td);
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_align_and_nowrap() {
        let mut doc = Document::new();
        let body = doc.add_element(doc.root, "body", &[]);
        let p = doc.add_element(body, "p", &[("align", "center"), ("nowrap", "")]);
        let attrs = translate_attributes(&doc, p);
        assert_eq!(
            attrs.get(Property::TextAlign).unwrap().as_keyword(),
            Some("center")
        );
        assert_eq!(
            attrs.get(Property::WhiteSpace).unwrap().as_keyword(),
            Some("nowrap")
        );
    }

    #[test]
    fn test_list_type_translation() {
        let mut doc = Document::new();
        let body = doc.add_element(doc.root, "body", &[]);
        let ol = doc.add_element(body, "ol", &[("type", "I")]);
        let attrs = translate_attributes(&doc, ol);
        assert_eq!(
            attrs.get(Property::ListStyleType).unwrap().as_keyword(),
            Some("upper-roman")
        );
    }
}
