//! Cached, self-updating resolved styles.
//!
//! Every selector the engine is asked about gets exactly one
//! `ResolvedStyle`. The handle (`Arc`) is what callers keep; the ordered
//! backing list behind it is patched in place as rules are added and
//! removed, so outstanding handles always observe the current cascade.

use std::sync::{Arc, RwLock};

use super::properties::Property;
use super::rule::Rule;
use super::selector::simple_selectors;
use super::values::CssValue;

/// One entry in a resolved style's backing list. Local entries reference
/// rules of the owning sheet; extended entries reference the resolved
/// style for the same selector in a linked sheet (and therefore track that
/// sheet's mutations too). A linked sheet with no match contributes an
/// empty placeholder so the extension region stays index-addressable.
#[derive(Debug, Clone)]
pub enum StyleEntry {
    Rule(Arc<Rule>),
    Extended(Arc<ResolvedStyle>),
    Empty,
}

#[derive(Debug)]
struct ResolvedInner {
    entries: Vec<StyleEntry>,
    /// Start of the extension region: entries[..extended_index] are local
    /// rules in specificity order, the rest mirror the linked sheets.
    extended_index: usize,
}

#[derive(Debug)]
pub struct ResolvedStyle {
    /// The selector this style resolves. Never changes.
    name: String,
    inner: RwLock<ResolvedInner>,
}

impl ResolvedStyle {
    pub fn new(name: &str, entries: Vec<StyleEntry>, extended_index: usize) -> Self {
        Self {
            name: name.to_string(),
            inner: RwLock::new(ResolvedInner {
                entries,
                extended_index,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// First definition wins: the backing list is kept in cascade order,
    /// highest specificity first, linked sheets after local rules.
    pub fn get(&self, key: Property) -> Option<CssValue> {
        let inner = self.inner.read().unwrap();
        for entry in &inner.entries {
            let value = match entry {
                StyleEntry::Rule(rule) => rule.get(key),
                StyleEntry::Extended(style) => style.get(key),
                StyleEntry::Empty => None,
            };
            if value.is_some() {
                return value;
            }
        }
        None
    }

    pub fn is_defined(&self, key: Property) -> bool {
        self.get(key).is_some()
    }

    /// Snapshot of the current backing list.
    pub fn entries(&self) -> Vec<StyleEntry> {
        self.inner.read().unwrap().entries.clone()
    }

    pub fn local_rule_count(&self) -> usize {
        self.inner.read().unwrap().extended_index
    }

    /// Inserts a newly registered rule so the local region stays ordered
    /// by specificity (non-increasing). Ties keep the newer rule first.
    pub(crate) fn insert_style(&self, rule: Arc<Rule>, specificity: u32) {
        let mut inner = self.inner.write().unwrap();
        let mut at = inner.extended_index;
        for (i, entry) in inner.entries[..inner.extended_index].iter().enumerate() {
            if let StyleEntry::Rule(existing) = entry {
                if specificity >= existing.specificity() {
                    at = i;
                    break;
                }
            }
        }
        inner.entries.insert(at, StyleEntry::Rule(rule));
        inner.extended_index += 1;
    }

    /// Unlinks a removed rule. No-op if the rule is not referenced.
    pub(crate) fn remove_style(&self, rule: &Arc<Rule>) {
        let mut inner = self.inner.write().unwrap();
        let found = inner.entries.iter().position(
            |entry| matches!(entry, StyleEntry::Rule(r) if Arc::ptr_eq(r, rule)),
        );
        if let Some(index) = found {
            inner.entries.remove(index);
            if index < inner.extended_index {
                inner.extended_index -= 1;
            }
        }
    }

    /// Splices in a newly linked sheet's contribution at `index` within
    /// the extension region.
    pub(crate) fn insert_extended_at(&self, style: Option<Arc<ResolvedStyle>>, index: usize) {
        let mut inner = self.inner.write().unwrap();
        let at = inner.extended_index + index;
        let entry = match style {
            Some(style) => StyleEntry::Extended(style),
            None => StyleEntry::Empty,
        };
        let pos = at.min(inner.entries.len());
        inner.entries.insert(pos, entry);
    }

    pub(crate) fn remove_extended_at(&self, index: usize) {
        let mut inner = self.inner.write().unwrap();
        let at = inner.extended_index + index;
        if at < inner.entries.len() {
            inner.entries.remove(at);
        }
    }

    /// Whether a rule registered under `selector` participates in this
    /// resolved style's cascade. Comparison is right-to-left over compound
    /// tokens: the rule's trailing token must match ours, and each further
    /// rule token must match some remaining ancestor token (descendant
    /// semantics).
    pub(crate) fn matches(&self, selector: &str) -> bool {
        let sel_tokens = simple_selectors(selector);
        let name_tokens = simple_selectors(&self.name);
        if sel_tokens.is_empty() || name_tokens.is_empty() {
            return false;
        }
        if !token_matches(sel_tokens[sel_tokens.len() - 1], name_tokens[name_tokens.len() - 1]) {
            return false;
        }
        let mut ni = name_tokens.len() - 1;
        for si in (0..sel_tokens.len() - 1).rev() {
            let mut matched = false;
            while ni > 0 {
                ni -= 1;
                if token_matches(sel_tokens[si], name_tokens[ni]) {
                    matched = true;
                    break;
                }
            }
            if !matched {
                return false;
            }
        }
        true
    }
}

/// Compound-token comparison for cache refresh. A qualified rule token
/// requires the same qualifier on ours; when the qualifier starts the rule
/// token (bare `.class`/`#id`) only the qualifier has to line up. An
/// unqualified rule token matches our tag part regardless of qualifiers.
fn token_matches(sel: &str, name: &str) -> bool {
    let sel_dot = sel.find('.');
    let sel_pound = sel.find('#');
    let name_dot = name.find('.');
    let name_pound = name.find('#');

    if let Some(sd) = sel_dot {
        let Some(nd) = name_dot else { return false };
        if sd == 0 {
            return sel == &name[nd..];
        }
        return sel == name;
    }
    if let Some(sp) = sel_pound {
        let Some(np) = name_pound else { return false };
        if sp == 0 {
            return sel == &name[np..];
        }
        return sel == name;
    }
    if let Some(nd) = name_dot {
        return sel == &name[..nd];
    }
    if let Some(np) = name_pound {
        return sel == &name[..np];
    }
    sel == name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::attrset::AttrSet;
    use crate::css::selector::specificity;

    fn rule_with(name: &str, property: Property, value: &str) -> Arc<Rule> {
        let rule = Rule::new(name, specificity(name));
        let mut decl = AttrSet::new();
        decl.add_css(property, value);
        rule.add_declarations(&decl, false);
        Arc::new(rule)
    }

    #[test]
    fn test_first_definition_wins() {
        let specific = rule_with("p.warn", Property::Color, "blue");
        let general = rule_with("p", Property::Color, "red");
        let style = ResolvedStyle::new(
            "html body p.warn",
            vec![StyleEntry::Rule(specific), StyleEntry::Rule(general)],
            2,
        );
        assert_eq!(style.get(Property::Color).unwrap().to_css_string(), "#0000ff");
    }

    #[test]
    fn test_insert_maintains_specificity_order() {
        let general = rule_with("p", Property::Color, "red");
        let style = ResolvedStyle::new("html body p.warn", vec![StyleEntry::Rule(general)], 1);

        // Before the more specific rule arrives, the general one answers.
        assert_eq!(style.get(Property::Color).unwrap().to_css_string(), "#ff0000");

        let specific = rule_with("p.warn", Property::Color, "blue");
        style.insert_style(specific, specificity("p.warn"));
        assert_eq!(style.local_rule_count(), 2);
        assert_eq!(style.get(Property::Color).unwrap().to_css_string(), "#0000ff");
    }

    #[test]
    fn test_remove_style_unlinks() {
        let specific = rule_with("p.warn", Property::Color, "blue");
        let general = rule_with("p", Property::Color, "red");
        let style = ResolvedStyle::new(
            "html body p.warn",
            vec![
                StyleEntry::Rule(specific.clone()),
                StyleEntry::Rule(general),
            ],
            2,
        );
        style.remove_style(&specific);
        assert_eq!(style.local_rule_count(), 1);
        assert_eq!(style.get(Property::Color).unwrap().to_css_string(), "#ff0000");
        // Removing again is harmless.
        style.remove_style(&specific);
        assert_eq!(style.local_rule_count(), 1);
    }

    #[test]
    fn test_extended_region_consulted_after_local() {
        let local = rule_with("p", Property::Color, "red");
        let linked_rule = rule_with("p", Property::FontSize, "10pt");
        let linked = Arc::new(ResolvedStyle::new(
            "p",
            vec![StyleEntry::Rule(linked_rule)],
            1,
        ));
        let style = ResolvedStyle::new("p", vec![StyleEntry::Rule(local)], 1);
        style.insert_extended_at(Some(linked), 0);

        assert_eq!(style.get(Property::Color).unwrap().to_css_string(), "#ff0000");
        assert!(style.is_defined(Property::FontSize));

        style.remove_extended_at(0);
        assert!(!style.is_defined(Property::FontSize));
    }

    #[test]
    fn test_matches_descendant_subsequence() {
        let style = ResolvedStyle::new("html body ol li p", vec![], 0);
        assert!(style.matches("p"));
        assert!(style.matches("ol p"));
        assert!(style.matches("html p"));
        assert!(style.matches("body ol p"));
        assert!(!style.matches("ul p"));
        assert!(!style.matches("li"));
        // Ancestor tokens must appear in order.
        assert!(!style.matches("ol html p"));
    }

    #[test]
    fn test_matches_qualifiers() {
        let style = ResolvedStyle::new("html body p.warn", vec![], 0);
        assert!(style.matches("p.warn"));
        assert!(style.matches(".warn"));
        assert!(style.matches("p"));
        assert!(!style.matches("p.note"));
        assert!(!style.matches("#warn"));

        let style = ResolvedStyle::new("html div#nav", vec![], 0);
        assert!(style.matches("#nav"));
        assert!(style.matches("div#nav"));
        assert!(style.matches("div"));
        assert!(!style.matches("span#nav"));
    }
}
