//! Ordered property-to-value sets.

use super::properties::{Property, ALL_BORDER_COLORS, ALL_BORDER_STYLES, ALL_BORDER_WIDTHS, ALL_MARGINS, ALL_PADDING};
use super::shorthand;
use super::values::CssValue;

/// An ordered mapping from property key to declared value.
///
/// Insertion order is preserved (cascade order matters when merging);
/// re-inserting a key replaces its value in place. Values are immutable
/// once stored, updates always swap in a freshly parsed value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttrSet {
    entries: Vec<(Property, CssValue)>,
}

impl AttrSet {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: Property) -> Option<&CssValue> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    pub fn is_defined(&self, key: Property) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }

    pub fn set(&mut self, key: Property, value: CssValue) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn remove(&mut self, key: Property) {
        self.entries.retain(|(k, _)| *k != key);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Property, &CssValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    /// Merges `other` on top of this set; `other`'s values win.
    pub fn merge_from(&mut self, other: &AttrSet) {
        for (key, value) in other.iter() {
            self.set(key, value.clone());
        }
    }

    /// Parses and stores a CSS-syntax declaration. Shorthand properties
    /// expand into their longhands; malformed values are dropped.
    pub fn add_css(&mut self, key: Property, raw: &str) {
        let raw = raw.trim();
        match key {
            Property::Font => shorthand::expand_font(raw, self),
            Property::Background => shorthand::expand_background(raw, self),
            Property::Margin => shorthand::expand_box(raw, self, &ALL_MARGINS),
            Property::Padding => shorthand::expand_box(raw, self, &ALL_PADDING),
            Property::BorderWidth => shorthand::expand_box(raw, self, &ALL_BORDER_WIDTHS),
            Property::BorderColor => shorthand::expand_box(raw, self, &ALL_BORDER_COLORS),
            Property::BorderStyle => shorthand::expand_box(raw, self, &ALL_BORDER_STYLES),
            Property::Border
            | Property::BorderTop
            | Property::BorderRight
            | Property::BorderBottom
            | Property::BorderLeft => shorthand::expand_border(key, raw, self),
            _ => {
                if let Some(value) = key.parse_css_value(raw) {
                    self.set(key, value);
                }
            }
        }
    }

    /// Parses and stores a legacy markup-attribute value.
    pub fn add_html(&mut self, key: Property, raw: &str) {
        if let Some(value) = key.parse_html_value(raw) {
            self.set(key, value);
        }
    }
}
