//! Selector strings, specificity, and the inverted selector graph.
//!
//! A selector is a space-separated chain of compound tokens (`tag`,
//! `tag.class`, `tag#id`, `.class`, `#id`). The graph indexes rules by
//! trailing token first: descending from the root follows the chain
//! right-to-left, so `ol p` stores `p` at depth one and `ol` beneath it,
//! and matching an element walks its ancestor chain outward.

use std::collections::HashMap;
use std::sync::Arc;

use super::rule::Rule;

/// Collapses whitespace runs to single spaces and trims the ends, so
/// equivalent selectors share one cache identity.
pub fn clean_selector_string(selector: &str) -> String {
    let mut cleaned = String::with_capacity(selector.len());
    let mut last_was_space = true;
    for c in selector.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                cleaned.push(' ');
                last_was_space = true;
            }
        } else {
            cleaned.push(c);
            last_was_space = false;
        }
    }
    if cleaned.ends_with(' ') {
        cleaned.pop();
    }
    cleaned
}

/// Splits a cleaned selector into its compound tokens.
pub fn simple_selectors(selector: &str) -> Vec<&str> {
    selector.split(' ').filter(|t| !t.is_empty()).collect()
}

/// Specificity weight of one compound token: a bare class or id selector
/// counts only its qualifier; a tagged token counts the tag plus any
/// qualifiers it carries.
pub fn token_specificity(token: &str) -> u32 {
    match token.as_bytes().first() {
        Some(b'.') => 100,
        Some(b'#') => 10_000,
        _ => {
            let mut specificity = 1;
            if token.contains('.') {
                specificity += 100;
            }
            if token.contains('#') {
                specificity += 10_000;
            }
            specificity
        }
    }
}

/// Specificity of a full selector chain: the sum over its tokens. Higher
/// wins in the cascade.
pub fn specificity(selector: &str) -> u32 {
    simple_selectors(selector)
        .iter()
        .map(|t| token_specificity(t))
        .sum()
}

/// One compound token broken into its parts. The tag may be empty for
/// bare `.class`/`#id` selectors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectorToken {
    pub tag: String,
    pub class: Option<String>,
    pub id: Option<String>,
}

impl SelectorToken {
    pub fn parse(token: &str) -> SelectorToken {
        let dot = token.find('.');
        let pound = token.find('#');
        let tag_end = match (dot, pound) {
            (Some(d), Some(p)) => d.min(p),
            (Some(d), None) => d,
            (None, Some(p)) => p,
            (None, None) => token.len(),
        };
        let tag = token[..tag_end].to_string();

        let part_after = |start: usize| {
            let rest = &token[start + 1..];
            let end = rest.find(['.', '#']).unwrap_or(rest.len());
            let part = &rest[..end];
            (!part.is_empty()).then(|| part.to_string())
        };
        SelectorToken {
            tag,
            class: dot.and_then(part_after),
            id: pound.and_then(part_after),
        }
    }
}

/// A node in the inverted selector graph. Each node carries the
/// specificity of the chain that reaches it and, once a rule has been
/// registered for exactly that chain, the rule itself. Children narrow the
/// chain by one more ancestor token. Nodes are owned exclusively by their
/// parent; the graph is a tree.
#[derive(Debug, Default)]
pub struct SelectorMapping {
    specificity: u32,
    rule: Option<Arc<Rule>>,
    children: HashMap<String, SelectorMapping>,
}

impl SelectorMapping {
    pub fn new(specificity: u32) -> Self {
        Self {
            specificity,
            rule: None,
            children: HashMap::new(),
        }
    }

    pub fn specificity(&self) -> u32 {
        self.specificity
    }

    pub fn rule(&self) -> Option<&Arc<Rule>> {
        self.rule.as_ref()
    }

    pub fn set_rule(&mut self, rule: Option<Arc<Rule>>) {
        self.rule = rule;
    }

    pub fn child(&self, token: &str) -> Option<&SelectorMapping> {
        self.children.get(token)
    }

    pub fn child_mut(&mut self, token: &str) -> Option<&mut SelectorMapping> {
        self.children.get_mut(token)
    }

    /// Returns the child for `token`, creating it with the chain's
    /// accumulated specificity if absent.
    pub fn child_or_create(&mut self, token: &str) -> &mut SelectorMapping {
        let specificity = self.specificity + token_specificity(token);
        self.children
            .entry(token.to_string())
            .or_insert_with(|| SelectorMapping::new(specificity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_selector_string() {
        assert_eq!(clean_selector_string("  ol \t p\n"), "ol p");
        assert_eq!(clean_selector_string("p"), "p");
        assert_eq!(clean_selector_string("html  body   p"), "html body p");
    }

    #[test]
    fn test_simple_selectors() {
        assert_eq!(simple_selectors("ol li.item"), vec!["ol", "li.item"]);
    }

    #[test]
    fn test_token_specificity() {
        assert_eq!(token_specificity("p"), 1);
        assert_eq!(token_specificity(".warn"), 100);
        assert_eq!(token_specificity("#main"), 10_000);
        assert_eq!(token_specificity("p.warn"), 101);
        assert_eq!(token_specificity("p#main"), 10_001);
    }

    #[test]
    fn test_chain_specificity() {
        assert_eq!(specificity("ol p"), 2);
        assert_eq!(specificity("ul li.item"), 102);
        assert_eq!(specificity("div#nav a"), 10_002);
    }

    #[test]
    fn test_selector_token_parse() {
        let t = SelectorToken::parse("p.warn");
        assert_eq!(t.tag, "p");
        assert_eq!(t.class.as_deref(), Some("warn"));
        assert_eq!(t.id, None);

        let t = SelectorToken::parse("#main");
        assert_eq!(t.tag, "");
        assert_eq!(t.id.as_deref(), Some("main"));

        let t = SelectorToken::parse("div#nav.menu");
        assert_eq!(t.tag, "div");
        assert_eq!(t.id.as_deref(), Some("nav"));
        assert_eq!(t.class.as_deref(), Some("menu"));
    }

    #[test]
    fn test_graph_specificity_accumulates() {
        let mut root = SelectorMapping::new(0);
        let p = root.child_or_create("p");
        assert_eq!(p.specificity(), 1);
        let ol = p.child_or_create("ol");
        assert_eq!(ol.specificity(), 2);

        let warn = root.child_or_create("p.warn");
        assert_eq!(warn.specificity(), 101);
    }
}
