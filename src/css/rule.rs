//! A named style rule, shared between the selector graph and the cached
//! resolved styles.

use std::sync::RwLock;

use super::attrset::AttrSet;
use super::properties::Property;
use super::values::CssValue;

/// The declarations attached to one selector.
///
/// A rule carries two declaration sets: the local one, and a secondary set
/// holding declarations that arrived from imported/linked sources. Local
/// declarations always win on lookup, so a later local re-declaration
/// overrides an imported one without touching cascade order.
///
/// Declarations are guarded by a lock of their own because rules are
/// shared (`Arc`) with every cached resolved style that references them;
/// re-declaring a selector mutates the rule in place and every resolved
/// style observes the change.
#[derive(Debug)]
pub struct Rule {
    name: String,
    specificity: u32,
    attrs: RwLock<AttrSet>,
    linked_attrs: RwLock<AttrSet>,
}

impl Rule {
    pub fn new(name: &str, specificity: u32) -> Self {
        Self {
            name: name.to_string(),
            specificity,
            attrs: RwLock::new(AttrSet::new()),
            linked_attrs: RwLock::new(AttrSet::new()),
        }
    }

    /// The selector this rule was registered under. Never changes.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn specificity(&self) -> u32 {
        self.specificity
    }

    pub fn get(&self, key: Property) -> Option<CssValue> {
        if let Some(value) = self.attrs.read().unwrap().get(key) {
            return Some(value.clone());
        }
        self.linked_attrs.read().unwrap().get(key).cloned()
    }

    pub fn is_defined(&self, key: Property) -> bool {
        self.attrs.read().unwrap().is_defined(key)
            || self.linked_attrs.read().unwrap().is_defined(key)
    }

    /// Merges a parsed declaration block into the rule.
    pub fn add_declarations(&self, declaration: &AttrSet, linked: bool) {
        let target = if linked { &self.linked_attrs } else { &self.attrs };
        target.write().unwrap().merge_from(declaration);
    }

    /// Snapshot of the effective declarations, local over linked.
    pub fn declarations(&self) -> AttrSet {
        let mut merged = self.linked_attrs.read().unwrap().clone();
        merged.merge_from(&self.attrs.read().unwrap());
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_wins_over_linked() {
        let rule = Rule::new("p", 1);

        let mut linked = AttrSet::new();
        linked.add_css(Property::Color, "blue");
        linked.add_css(Property::FontSize, "10pt");
        rule.add_declarations(&linked, true);

        let mut local = AttrSet::new();
        local.add_css(Property::Color, "red");
        rule.add_declarations(&local, false);

        assert_eq!(rule.get(Property::Color).unwrap().to_css_string(), "#ff0000");
        // Linked-only declarations still visible.
        assert!(rule.is_defined(Property::FontSize));
    }

    #[test]
    fn test_redeclaration_merges() {
        let rule = Rule::new("p", 1);
        let mut first = AttrSet::new();
        first.add_css(Property::Color, "red");
        rule.add_declarations(&first, false);

        let mut second = AttrSet::new();
        second.add_css(Property::MarginTop, "2pt");
        rule.add_declarations(&second, false);

        assert!(rule.is_defined(Property::Color));
        assert!(rule.is_defined(Property::MarginTop));
    }
}
