//! Per-node effective-value resolution.
//!
//! For a document node, the effective value of a property comes from, in
//! order: the node's own translated markup attributes, the matched rule
//! chain (already specificity-ordered), the nearest ancestor defining the
//! property (inheritable properties only), and finally the property's
//! default. Font-size is special: its relative forms resolve against the
//! ancestor's *resolved* point size, so resolution recurses rather than
//! falling back to raw declared values.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::dom::{Document, NodeId};
use crate::html::translate;
use crate::render::color::Color;

use super::attrset::AttrSet;
use super::properties::Property;
use super::resolved::ResolvedStyle;
use super::stylesheet::StyleSheet;
use super::values::{CssValue, FontSize, FALLBACK_FONT_SIZE};

/// Process-wide table of parsed property defaults, built once. Defaults
/// whose text has no typed form (e.g. `transparent`) simply stay absent.
fn parsed_default(key: Property) -> Option<CssValue> {
    static DEFAULTS: OnceLock<HashMap<Property, CssValue>> = OnceLock::new();
    let map = DEFAULTS.get_or_init(|| {
        let mut map = HashMap::new();
        for property in Property::ALL {
            if let Some(value) = property
                .default_value()
                .and_then(|raw| property.parse_css_value(raw))
            {
                map.insert(property, value);
            }
        }
        map
    });
    map.get(&key).cloned()
}

/// Resolves effective per-node attribute values against one stylesheet.
pub struct StyleResolver {
    sheet: Arc<StyleSheet>,
}

impl StyleResolver {
    pub fn new(sheet: Arc<StyleSheet>) -> Self {
        Self { sheet }
    }

    pub fn sheet(&self) -> &Arc<StyleSheet> {
        &self.sheet
    }

    /// The resolution view for one element node.
    pub fn attributes<'a>(&'a self, doc: &'a Document, node: NodeId) -> NodeAttributes<'a> {
        let markup = translate::translate_attributes(doc, node);
        let rule = self.sheet.rule_for_element(doc, node);
        NodeAttributes {
            resolver: self,
            doc,
            node,
            markup,
            rule,
        }
    }
}

/// The effective attributes of one node: markup attributes over the
/// matched rule chain, with inheritance through the resolve parent (the
/// structural parent element).
pub struct NodeAttributes<'a> {
    resolver: &'a StyleResolver,
    doc: &'a Document,
    node: NodeId,
    markup: AttrSet,
    rule: Option<Arc<ResolvedStyle>>,
}

impl NodeAttributes<'_> {
    fn parent(&self) -> Option<NodeAttributes<'_>> {
        self.doc
            .parent_element(self.node)
            .map(|p| self.resolver.attributes(self.doc, p))
    }

    /// A value declared on this node itself: explicit markup attributes
    /// override the cascade.
    fn declared(&self, key: Property) -> Option<CssValue> {
        if let Some(value) = self.markup.get(key) {
            return Some(value.clone());
        }
        self.rule.as_ref().and_then(|rule| rule.get(key))
    }

    /// The effective value after cascade, inheritance, and defaulting.
    pub fn value(&self, key: Property) -> Option<CssValue> {
        if let Some(value) = self.declared(key) {
            return Some(value);
        }
        if key.is_inherited() {
            if let Some(parent) = self.parent() {
                if let Some(value) = parent.value(key) {
                    return Some(value);
                }
            }
        }
        parsed_default(key)
    }

    pub fn is_defined(&self, key: Property) -> bool {
        self.declared(key).is_some()
    }

    /// Like `value`, but without the final fall back to the property
    /// default: `None` means nothing along the resolve chain declared it.
    pub fn declared_or_inherited(&self, key: Property) -> Option<CssValue> {
        if let Some(value) = self.declared(key) {
            return Some(value);
        }
        if key.is_inherited() {
            if let Some(parent) = self.parent() {
                return parent.declared_or_inherited(key);
            }
        }
        None
    }

    /// Resolved font size in points. Relative declarations (%/em/ex and
    /// the larger/smaller steps) resolve against the parent's resolved
    /// size, which requires recursing here rather than reading the
    /// parent's raw declaration.
    pub fn font_size_pt(&self) -> f32 {
        let declared = self
            .declared(Property::FontSize)
            .and_then(|v| v.as_font_size().cloned());
        let parent_pt = self.parent().map(|p| p.font_size_pt());
        let map = self.resolver.sheet.size_map();
        let w3c = self.resolver.sheet.is_w3c_length_units();
        match declared {
            Some(fs) => fs.resolve(parent_pt, &map, w3c),
            None => match parent_pt {
                Some(pt) => pt,
                None => default_font_size()
                    .map(|fs| fs.resolve(None, &map, w3c))
                    .unwrap_or(FALLBACK_FONT_SIZE),
            },
        }
    }

    /// A box length in points; percentages resolve against `percent_base`.
    pub fn length_pt(&self, key: Property, percent_base: f32) -> Option<f32> {
        let value = self.value(key)?;
        let length = value.as_length()?.clone();
        Some(length.resolve(percent_base, self.resolver.sheet.is_w3c_length_units()))
    }

    pub fn keyword(&self, key: Property) -> Option<String> {
        self.value(key)?.as_keyword().map(|k| k.to_string())
    }

    /// Foreground color; inherited, defaults to black.
    pub fn foreground(&self) -> Color {
        self.value(Property::Color)
            .and_then(|v| v.as_color())
            .unwrap_or(Color::BLACK)
    }

    /// Background color, if any was declared on this node. Not inherited;
    /// `None` means transparent.
    pub fn background(&self) -> Option<Color> {
        self.declared(Property::BackgroundColor)
            .and_then(|v| v.as_color())
    }

    pub fn raw_value(&self, key: Property) -> Option<CssValue> {
        self.value(key)
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn document(&self) -> &Document {
        self.doc
    }
}

fn default_font_size() -> Option<FontSize> {
    match parsed_default(Property::FontSize) {
        Some(CssValue::FontSize(fs)) => Some(fs),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(css: &str) -> (Document, NodeId, NodeId, StyleResolver) {
        let mut doc = Document::new();
        let html = doc.add_element(doc.root, "html", &[]);
        let body = doc.add_element(html, "body", &[]);
        let p = doc.add_element(body, "p", &[]);
        let sheet = Arc::new(StyleSheet::new());
        sheet.add_rule(css);
        (doc, body, p, StyleResolver::new(sheet))
    }

    #[test]
    fn test_inherited_property_walks_ancestors() {
        let (doc, _, p, resolver) = setup("body { color: green }");
        let attrs = resolver.attributes(&doc, p);
        assert_eq!(attrs.foreground(), Color::rgb(0, 128, 0));
    }

    #[test]
    fn test_non_inherited_property_uses_default() {
        let (doc, _, p, resolver) = setup("body { margin-top: 10pt }");
        let attrs = resolver.attributes(&doc, p);
        // margin-top is not inherited; p gets the "0" default.
        assert_eq!(attrs.length_pt(Property::MarginTop, 0.0), Some(0.0));
    }

    #[test]
    fn test_own_declaration_wins_over_inherited() {
        let (doc, _, p, resolver) = setup("body { color: green } p { color: red }");
        let attrs = resolver.attributes(&doc, p);
        assert_eq!(attrs.foreground(), Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_default_when_nothing_declared() {
        let (doc, _, p, resolver) = setup("");
        let attrs = resolver.attributes(&doc, p);
        assert_eq!(attrs.foreground(), Color::BLACK);
        assert_eq!(attrs.keyword(Property::WhiteSpace).as_deref(), Some("normal"));
    }

    #[test]
    fn test_percentage_font_size_against_resolved_parent() {
        let (doc, _, p, resolver) = setup("body { font-size: 10pt } p { font-size: 150% }");
        let attrs = resolver.attributes(&doc, p);
        assert_eq!(attrs.font_size_pt(), 15.0);
    }

    #[test]
    fn test_em_font_size_chains_through_parents() {
        // body resolves to 10pt, p to 2em of that.
        let (doc, body, p, resolver) = setup("body { font-size: 10pt } p { font-size: 2em }");
        assert_eq!(resolver.attributes(&doc, body).font_size_pt(), 10.0);
        assert_eq!(resolver.attributes(&doc, p).font_size_pt(), 20.0);
    }

    #[test]
    fn test_font_size_inherits_computed_value() {
        // p has no declaration; it inherits body's computed 150% of default.
        let (doc, _, p, resolver) = setup("body { font-size: 150% }");
        let attrs = resolver.attributes(&doc, p);
        // default medium = 14pt, body = 21pt, p inherits 21pt.
        assert_eq!(attrs.font_size_pt(), 21.0);
    }

    #[test]
    fn test_markup_attribute_overrides_rules() {
        let mut doc = Document::new();
        let html = doc.add_element(doc.root, "html", &[]);
        let body = doc.add_element(html, "body", &[]);
        let font = doc.add_element(body, "font", &[("color", "#00ff00")]);
        let sheet = Arc::new(StyleSheet::new());
        sheet.add_rule("font { color: red }");
        let resolver = StyleResolver::new(sheet);
        let attrs = resolver.attributes(&doc, font);
        assert_eq!(attrs.foreground(), Color::rgb(0, 255, 0));
    }

    #[test]
    fn test_background_not_inherited() {
        let (doc, body, p, resolver) = setup("body { background-color: silver }");
        assert!(resolver.attributes(&doc, body).background().is_some());
        assert_eq!(resolver.attributes(&doc, p).background(), None);
    }
}
