//! The stylesheet: rule storage, selector matching, and the resolved-style
//! cache.
//!
//! Rules live in an inverted selector graph indexed by trailing compound
//! token. Asking for any selector produces a cached `ResolvedStyle` whose
//! backing list is patched in place as rules and linked sheets come and
//! go, so handles returned earlier keep answering with the current
//! cascade.
//!
//! One logical writer is assumed. All structural mutation and every cache
//! lookup take the sheet's single internal lock, so concurrent readers
//! never observe a half-updated graph or cache.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use url::Url;

use crate::dom::{Document, NodeId};
use crate::net::loader::Loader;

use super::attrset::AttrSet;
use super::parser::{self, SheetItem};
use super::resolved::{ResolvedStyle, StyleEntry};
use super::rule::Rule;
use super::selector::{
    clean_selector_string, simple_selectors, specificity, SelectorMapping, SelectorToken,
};
use super::values::{self, SIZE_MAP_DEFAULT};

/// Pseudo-rule directives accepted by `add_rule` to tweak numeric
/// behavior without going through the CSS grammar.
const BASE_SIZE_DISABLE: &str = "BASE_SIZE_DISABLE";
const BASE_SIZE: &str = "BASE_SIZE ";
const W3C_LENGTH_UNITS_ENABLE: &str = "W3C_LENGTH_UNITS_ENABLE";
const W3C_LENGTH_UNITS_DISABLE: &str = "W3C_LENGTH_UNITS_DISABLE";

struct SheetInner {
    root: SelectorMapping,
    rules_by_name: HashMap<String, Arc<Rule>>,
    resolved: HashMap<String, Arc<ResolvedStyle>>,
    /// Linked sheets, consulted after local rules. Shared, never owned.
    linked: Vec<Arc<StyleSheet>>,
    size_map: [i32; 7],
    w3c_units: bool,
    base: Option<Url>,
}

pub struct StyleSheet {
    inner: Mutex<SheetInner>,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleSheet {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SheetInner {
                root: SelectorMapping::new(0),
                rules_by_name: HashMap::new(),
                resolved: HashMap::new(),
                linked: Vec::new(),
                size_map: SIZE_MAP_DEFAULT,
                w3c_units: false,
                base: None,
            }),
        }
    }

    pub fn with_base(base: Url) -> Self {
        let sheet = Self::new();
        sheet.inner.lock().unwrap().base = Some(base);
        sheet
    }

    pub fn base_url(&self) -> Option<Url> {
        self.inner.lock().unwrap().base.clone()
    }

    pub fn set_base_url(&self, base: Url) {
        self.inner.lock().unwrap().base = Some(base);
    }

    pub fn size_map(&self) -> [i32; 7] {
        self.inner.lock().unwrap().size_map
    }

    pub fn is_w3c_length_units(&self) -> bool {
        self.inner.lock().unwrap().w3c_units
    }

    /// Adds a set of rules in CSS1 syntax. Also accepts the legacy tweak
    /// directives controlling the size table and the unit-scale table.
    pub fn add_rule(&self, rule: &str) {
        if rule == BASE_SIZE_DISABLE {
            self.inner.lock().unwrap().size_map = SIZE_MAP_DEFAULT;
        } else if let Some(base) = rule.strip_prefix(BASE_SIZE) {
            if let Ok(base) = base.trim().parse::<i32>() {
                self.rebase_size_map(base);
            }
        } else if rule == W3C_LENGTH_UNITS_ENABLE {
            self.inner.lock().unwrap().w3c_units = true;
        } else if rule == W3C_LENGTH_UNITS_DISABLE {
            self.inner.lock().unwrap().w3c_units = false;
        } else {
            let base = self.base_url();
            let items = parser::parse_sheet(rule, base.as_ref());
            self.apply_items(items, false);
        }
    }

    /// Bulk ingestion with relative URLs anchored at `base`.
    pub fn load_rules(&self, css: &str, base: Option<&Url>) {
        let items = parser::parse_sheet(css, base);
        self.apply_items(items, false);
    }

    /// Parses inline declaration text (a `style="..."` attribute value).
    pub fn get_declaration(&self, decl: &str) -> AttrSet {
        parser::parse_declaration_block(decl, self.base_url().as_ref())
    }

    fn apply_items(&self, items: Vec<SheetItem>, linked: bool) {
        for item in items {
            match item {
                SheetItem::Import(url) => self.import_style_sheet(&url),
                SheetItem::Rule {
                    selectors,
                    declaration,
                } => {
                    for selector in selectors {
                        self.add_selector_rule(&selector, &declaration, linked);
                    }
                }
            }
        }
    }

    /// Fetches and merges an imported sheet. All failures are swallowed;
    /// the document stays stylable, just unstyled from this source.
    pub fn import_style_sheet(&self, url_text: &str) {
        let base = self.base_url();
        let url = match base.as_ref() {
            Some(base) => base.join(url_text),
            None => Url::parse(url_text),
        };
        let url = match url {
            Ok(url) => url,
            Err(e) => {
                log::warn!("ignoring @import with malformed url {url_text}: {e}");
                return;
            }
        };
        match Loader::new().fetch(&url) {
            Ok(css) => {
                let items = parser::parse_sheet(&css, Some(&url));
                self.apply_items(items, true);
            }
            Err(e) => {
                log::warn!("failed to import style sheet {url}: {e}");
            }
        }
    }

    /// Registers one rule under a chain of simple selector tokens,
    /// ordered outermost first. Declarations merge if the selector is
    /// already known; a genuinely new rule is spliced into every cached
    /// resolved style it matches, at its specificity-correct position.
    pub fn add_selector_rule(&self, selector: &[String], declaration: &AttrSet, linked: bool) {
        if selector.is_empty() {
            return;
        }
        let name = selector.join(" ");
        let mut inner = self.inner.lock().unwrap();

        let existing = inner.rules_by_name.get(&name).cloned();
        let rule = match existing {
            Some(rule) => rule,
            None => {
                let rule = Arc::new(Rule::new(&name, specificity(&name)));
                inner.rules_by_name.insert(name.clone(), rule.clone());

                let node_specificity;
                {
                    let mut node = &mut inner.root;
                    for token in selector.iter().rev() {
                        node = node.child_or_create(token);
                    }
                    node.set_rule(Some(rule.clone()));
                    node_specificity = node.specificity();
                }
                // Patch every cached resolved style the new rule matches.
                for style in inner.resolved.values() {
                    if style.matches(&name) {
                        style.insert_style(rule.clone(), node_specificity);
                    }
                }
                rule
            }
        };
        drop(inner);
        rule.add_declarations(declaration, linked);
    }

    /// Removes a named rule and detaches it from every cached resolved
    /// style that referenced it.
    pub fn remove_style(&self, name: &str) {
        let selector = clean_selector_string(name);
        let tokens: Vec<&str> = simple_selectors(&selector);
        let mut inner = self.inner.lock().unwrap();

        let removed = {
            let mut node = Some(&mut inner.root);
            for token in tokens.iter().rev() {
                node = node.and_then(|n| n.child_mut(token));
            }
            match node {
                Some(node) => {
                    let rule = node.rule().cloned();
                    node.set_rule(None);
                    rule
                }
                None => None,
            }
        };
        if let Some(rule) = removed {
            for style in inner.resolved.values() {
                style.remove_style(&rule);
            }
        }
        inner.rules_by_name.remove(&selector);
    }

    /// Fetches the rule chain that best matches `selector`, a space
    /// separated chain of element names such as `html body p.warn`. The
    /// returned style keeps tracking rule additions and removals.
    pub fn get_rule(&self, selector: &str) -> Arc<ResolvedStyle> {
        let selector = clean_selector_string(selector);
        let mut inner = self.inner.lock().unwrap();
        if let Some(style) = inner.resolved.get(&selector) {
            return style.clone();
        }
        // Leaf-first chain for right-to-left graph descent.
        let chain: Vec<SelectorToken> = simple_selectors(&selector)
            .iter()
            .rev()
            .map(|t| SelectorToken::parse(t))
            .collect();
        self.create_resolved(&mut inner, &selector, &chain)
    }

    /// Fetches the style for an element, using its ancestor chain to
    /// build the fully qualified selector (id preferred over class at
    /// each step).
    pub fn rule_for_element(&self, doc: &Document, node: NodeId) -> Option<Arc<ResolvedStyle>> {
        doc.get_node(node)?.as_element()?;
        let mut chain = vec![node];
        chain.extend(doc.ancestors(node));

        let mut lookup = String::new();
        for &id in chain.iter().rev() {
            let elem = doc.get_node(id)?.as_element()?;
            lookup.push_str(&elem.tag_name);
            if let Some(id_attr) = elem.id() {
                lookup.push('#');
                lookup.push_str(id_attr);
            } else if let Some(class_attr) = elem.class_attr() {
                lookup.push('.');
                lookup.push_str(class_attr);
            }
            lookup.push(' ');
        }
        Some(self.get_rule(lookup.trim_end()))
    }

    fn create_resolved(
        &self,
        inner: &mut SheetInner,
        selector: &str,
        chain: &[SelectorToken],
    ) -> Arc<ResolvedStyle> {
        let mut matched: Vec<(Arc<Rule>, u32)> = Vec::new();
        if !chain.is_empty() {
            let mut visited: HashSet<*const SelectorMapping> = HashSet::new();
            for key in candidate_keys(&chain[0]) {
                if let Some(child) = inner.root.child(&key) {
                    collect_styles(child, chain, 1, &mut matched, &mut visited);
                }
            }
        }

        let local_count = matched.len();
        let mut entries: Vec<StyleEntry> = matched
            .into_iter()
            .map(|(rule, _)| StyleEntry::Rule(rule))
            .collect();
        for sheet in &inner.linked {
            entries.push(StyleEntry::Extended(sheet.get_rule(selector)));
        }

        let style = Arc::new(ResolvedStyle::new(selector, entries, local_count));
        inner.resolved.insert(selector.to_string(), style.clone());
        style
    }

    /// Attaches a secondary sheet, consulted after local rules. The most
    /// recently added sheet wins among the linked ones. Every cached
    /// resolved style is patched in place.
    pub fn add_style_sheet(&self, ss: Arc<StyleSheet>) {
        let mut inner = self.inner.lock().unwrap();
        if inner.linked.iter().any(|s| Arc::ptr_eq(s, &ss)) {
            return;
        }
        inner.linked.insert(0, ss.clone());
        for style in inner.resolved.values() {
            let linked_style = ss.get_rule(style.name());
            style.insert_extended_at(Some(linked_style), 0);
        }
    }

    /// Detaches a previously linked sheet and unpatches the cache.
    pub fn remove_style_sheet(&self, ss: &Arc<StyleSheet>) {
        let mut inner = self.inner.lock().unwrap();
        let Some(index) = inner.linked.iter().position(|s| Arc::ptr_eq(s, ss)) else {
            return;
        };
        inner.linked.remove(index);
        for style in inner.resolved.values() {
            style.remove_extended_at(index);
        }
    }

    pub fn linked_style_sheets(&self) -> Vec<Arc<StyleSheet>> {
        self.inner.lock().unwrap().linked.clone()
    }

    /// Rebases the seven-slot size table proportionally around `base`
    /// points, with a 4pt floor.
    fn rebase_size_map(&self, base: i32) {
        const MINIMAL_FONT_SIZE: i32 = 4;
        let mut inner = self.inner.lock().unwrap();
        let reference = SIZE_MAP_DEFAULT[values::BASE_FONT_INDEX as usize - 1];
        let mut map = [0; 7];
        for (slot, default) in map.iter_mut().zip(SIZE_MAP_DEFAULT) {
            *slot = (base * default / reference).max(MINIMAL_FONT_SIZE);
        }
        inner.size_map = map;
    }

    /// The point size for a 1-7 size index under the active size table.
    pub fn point_size(&self, index: i32) -> f32 {
        values::point_size(index, &self.size_map())
    }

    #[cfg(test)]
    pub(crate) fn resolved_cache_len(&self) -> usize {
        self.inner.lock().unwrap().resolved.len()
    }
}

/// Graph child keys to try for one chain position, most specific last:
/// tag, tag.class, .class, tag#id, #id.
fn candidate_keys(token: &SelectorToken) -> Vec<String> {
    let mut keys = Vec::new();
    if !token.tag.is_empty() {
        keys.push(token.tag.clone());
    }
    if let Some(class) = &token.class {
        if !token.tag.is_empty() {
            keys.push(format!("{}.{}", token.tag, class));
        }
        keys.push(format!(".{}", class));
    }
    if let Some(id) = &token.id {
        if !token.tag.is_empty() {
            keys.push(format!("{}#{}", token.tag, id));
        }
        keys.push(format!("#{}", id));
    }
    keys
}

/// Collects every rule reachable from `mapping` by matching the rest of
/// the ancestor chain (descendant semantics: any remaining position may
/// continue the descent). Each node is visited once.
fn collect_styles(
    mapping: &SelectorMapping,
    chain: &[SelectorToken],
    index: usize,
    matched: &mut Vec<(Arc<Rule>, u32)>,
    visited: &mut HashSet<*const SelectorMapping>,
) {
    if !visited.insert(mapping as *const SelectorMapping) {
        return;
    }
    if let Some(rule) = mapping.rule() {
        add_sorted(matched, rule.clone(), mapping.specificity());
    }
    for position in index..chain.len() {
        let token = &chain[position];
        for key in candidate_keys(token) {
            if let Some(child) = mapping.child(&key) {
                collect_styles(child, chain, position + 1, matched, visited);
            }
        }
    }
}

/// Keeps the match list ordered by specificity, highest first; on ties the
/// newly found rule goes first.
fn add_sorted(matched: &mut Vec<(Arc<Rule>, u32)>, rule: Arc<Rule>, specificity: u32) {
    let at = matched
        .iter()
        .position(|(_, s)| specificity >= *s)
        .unwrap_or(matched.len());
    matched.insert(at, (rule, specificity));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::properties::Property;

    fn sheet_with(rules: &str) -> StyleSheet {
        let sheet = StyleSheet::new();
        sheet.add_rule(rules);
        sheet
    }

    fn color_of(style: &ResolvedStyle) -> String {
        style.get(Property::Color).unwrap().to_css_string()
    }

    #[test]
    fn test_specificity_winner() {
        let sheet = sheet_with("p { color: red } p.warn { color: blue }");
        let warn = sheet.get_rule("html body p.warn");
        assert_eq!(color_of(&warn), "#0000ff");
        let plain = sheet.get_rule("html body p");
        assert_eq!(color_of(&plain), "#ff0000");
    }

    #[test]
    fn test_descendant_matching_skips_levels() {
        let sheet = sheet_with("ol p { color: red }");
        // Any p with an ol ancestor matches, not just a direct child.
        let nested = sheet.get_rule("html body ol li div p");
        assert_eq!(color_of(&nested), "#ff0000");
        let outside = sheet.get_rule("html body ul p");
        assert!(outside.get(Property::Color).is_none());
    }

    #[test]
    fn test_incremental_refresh_of_cached_style() {
        let sheet = sheet_with("p { color: red }");
        let style = sheet.get_rule("html body p.warn");
        assert_eq!(color_of(&style), "#ff0000");

        // Adding a more specific rule afterwards updates the same handle.
        sheet.add_rule("p.warn { color: blue }");
        assert_eq!(color_of(&style), "#0000ff");

        // And a later lookup shares the cache entry.
        let again = sheet.get_rule("html body p.warn");
        assert_eq!(color_of(&again), "#0000ff");
        assert_eq!(sheet.resolved_cache_len(), 1);
    }

    #[test]
    fn test_remove_style_detaches_from_cache() {
        let sheet = sheet_with("p { color: red } p.warn { color: blue }");
        let style = sheet.get_rule("html body p.warn");
        assert_eq!(color_of(&style), "#0000ff");

        sheet.remove_style("p.warn");
        assert_eq!(color_of(&style), "#ff0000");
        sheet.remove_style("p");
        assert!(style.get(Property::Color).is_none());
    }

    #[test]
    fn test_redeclaration_merges_into_same_rule() {
        let sheet = sheet_with("p { color: red }");
        sheet.add_rule("p { margin-top: 4pt }");
        let style = sheet.get_rule("p");
        assert!(style.is_defined(Property::Color));
        assert!(style.is_defined(Property::MarginTop));
    }

    #[test]
    fn test_selector_groups() {
        let sheet = sheet_with("h1, h2, p.note { color: green }");
        assert!(sheet.get_rule("html h1").is_defined(Property::Color));
        assert!(sheet.get_rule("html h2").is_defined(Property::Color));
        assert!(sheet.get_rule("html p.note").is_defined(Property::Color));
        assert!(!sheet.get_rule("html h3").is_defined(Property::Color));
    }

    #[test]
    fn test_id_beats_class() {
        let sheet = sheet_with("#main { color: red } .warn { color: blue } p { color: green }");
        let style = sheet.get_rule("html body p.warn#main");
        assert_eq!(color_of(&style), "#ff0000");
    }

    #[test]
    fn test_linked_sheet_consulted_after_local() {
        let sheet = sheet_with("p { color: red }");
        let extra = Arc::new(sheet_with("p { color: blue; margin-top: 9pt }"));

        let style = sheet.get_rule("html p");
        sheet.add_style_sheet(extra.clone());

        // Local rules win; linked sheet fills in the rest.
        assert_eq!(color_of(&style), "#ff0000");
        assert_eq!(
            style.get(Property::MarginTop).unwrap().to_css_string(),
            "9pt"
        );

        sheet.remove_style_sheet(&extra);
        assert!(style.get(Property::MarginTop).is_none());
    }

    #[test]
    fn test_linked_sheet_tracks_later_rules() {
        let sheet = sheet_with("p { color: red }");
        let extra = Arc::new(StyleSheet::new());
        sheet.add_style_sheet(extra.clone());

        let style = sheet.get_rule("html p");
        assert!(style.get(Property::FontWeight).is_none());

        // Mutating the linked sheet shows through existing handles.
        extra.add_rule("p { font-weight: bold }");
        assert!(style.get(Property::FontWeight).is_some());
    }

    #[test]
    fn test_rule_for_element_builds_qualified_chain() {
        let mut doc = Document::new();
        let html = doc.add_element(doc.root, "html", &[]);
        let body = doc.add_element(html, "body", &[]);
        let p = doc.add_element(body, "p", &[("class", "warn")]);

        let sheet = sheet_with("p { color: red } p.warn { color: blue }");
        let style = sheet.rule_for_element(&doc, p).unwrap();
        assert_eq!(style.name(), "html body p.warn");
        assert_eq!(color_of(&style), "#0000ff");
    }

    #[test]
    fn test_tweak_directives() {
        let sheet = StyleSheet::new();
        assert!(!sheet.is_w3c_length_units());
        sheet.add_rule("W3C_LENGTH_UNITS_ENABLE");
        assert!(sheet.is_w3c_length_units());
        sheet.add_rule("W3C_LENGTH_UNITS_DISABLE");
        assert!(!sheet.is_w3c_length_units());

        sheet.add_rule("BASE_SIZE 28");
        assert_eq!(sheet.point_size(4), 28.0);
        sheet.add_rule("BASE_SIZE_DISABLE");
        assert_eq!(sheet.point_size(4), 14.0);
    }

    #[test]
    fn test_declaration_parsing() {
        let sheet = StyleSheet::new();
        let decl = sheet.get_declaration("color: red; margin: 1pt 2pt");
        assert_eq!(decl.get(Property::Color).unwrap().to_css_string(), "#ff0000");
        assert_eq!(decl.get(Property::MarginLeft).unwrap().to_css_string(), "2pt");
    }
}
