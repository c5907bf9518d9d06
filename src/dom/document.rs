//! Read-only document view consumed by the style engine.
//!
//! The tree is produced by an external markup parser; the engine only
//! navigates it (attributes, parent chain, tag identity, leaf/branch
//! distinction). A small builder surface exists so producers and tests can
//! assemble trees; incremental parsing, undo, and text storage live with
//! the producer, not here.

use thiserror::Error;

use super::node::{Node, NodeId};

#[derive(Error, Debug)]
pub enum StyleError {
    /// A content-insertion call was made on a document that has no
    /// configured content parser. This is a programming-contract
    /// violation, not a data error.
    #[error("no content parser configured")]
    NoContentParser,
}

/// Hook for the external markup parser. Implementations turn markup text
/// into nodes under the given parent.
pub trait ContentParser: Send + Sync {
    fn parse_into(&self, doc: &mut Document, parent: NodeId, markup: &str);
}

pub struct Document {
    nodes: Vec<Node>,
    pub root: NodeId,
    content_parser: Option<std::sync::Arc<dyn ContentParser>>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes)
            .field("root", &self.root)
            .finish()
    }
}

impl Document {
    pub fn new() -> Self {
        let root = Node::new_document(0);
        Self {
            nodes: vec![root],
            root: 0,
            content_parser: None,
        }
    }

    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        let id = self.nodes.len();
        let node = Node::new_element(id, tag_name.to_lowercase());
        self.nodes.push(node);
        id
    }

    pub fn create_text(&mut self, content: &str) -> NodeId {
        let id = self.nodes.len();
        let node = Node::new_text(id, content.to_string());
        self.nodes.push(node);
        id
    }

    pub fn append_child(&mut self, parent_id: NodeId, child_id: NodeId) {
        if parent_id < self.nodes.len() && child_id < self.nodes.len() {
            self.nodes[child_id].parent = Some(parent_id);
            self.nodes[parent_id].children.push(child_id);
        }
    }

    /// Convenience builder: creates an element, attaches it, and sets its
    /// attributes in one call.
    pub fn add_element(&mut self, parent_id: NodeId, tag_name: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = self.create_element(tag_name);
        for (name, value) in attrs {
            self.set_attribute(id, name, value);
        }
        self.append_child(parent_id, id);
        id
    }

    pub fn set_attribute(&mut self, node_id: NodeId, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(node_id) {
            if let Some(elem) = node.as_element_mut() {
                elem.attributes.insert(name.to_string(), value.to_string());
            }
        }
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        for node in &self.nodes {
            if let Some(elem) = node.as_element() {
                if elem.id() == Some(id) {
                    return Some(node.id);
                }
            }
        }
        None
    }

    pub fn get_elements_by_tag_name(&self, tag_name: &str) -> Vec<NodeId> {
        let tag_lower = tag_name.to_lowercase();
        self.nodes
            .iter()
            .filter_map(|node| {
                if node.tag_name() == Some(&tag_lower) {
                    Some(node.id)
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn children(&self, node_id: NodeId) -> &[NodeId] {
        self.nodes
            .get(node_id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes.get(node_id).and_then(|n| n.parent)
    }

    /// The nearest ancestor that is an element.
    pub fn parent_element(&self, node_id: NodeId) -> Option<NodeId> {
        let mut current = self.parent(node_id);
        while let Some(id) = current {
            if self.nodes.get(id)?.is_element() {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    /// Leaf elements carry no element children; branches do.
    pub fn is_leaf(&self, node_id: NodeId) -> bool {
        self.children(node_id)
            .iter()
            .all(|&c| !self.nodes.get(c).map(Node::is_element).unwrap_or(false))
    }

    /// All element ancestors, nearest first.
    pub fn ancestors(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = self.parent_element(node_id);
        while let Some(ancestor_id) = current {
            result.push(ancestor_id);
            current = self.parent_element(ancestor_id);
        }
        result
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn set_content_parser(&mut self, parser: std::sync::Arc<dyn ContentParser>) {
        self.content_parser = Some(parser);
    }

    /// Inserts markup content under `parent` through the configured
    /// content parser. Calling this without a parser configured is a
    /// contract violation and is the one hard error this crate surfaces.
    pub fn insert_markup(&mut self, parent: NodeId, markup: &str) -> Result<(), StyleError> {
        let parser = self
            .content_parser
            .clone()
            .ok_or(StyleError::NoContentParser)?;
        parser.parse_into(self, parent, markup);
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_doc() -> (Document, NodeId) {
        let mut doc = Document::new();
        let html = doc.add_element(doc.root, "html", &[]);
        let body = doc.add_element(html, "body", &[]);
        let p = doc.add_element(body, "p", &[("class", "warn"), ("id", "intro")]);
        let text = doc.create_text("hello");
        doc.append_child(p, text);
        (doc, p)
    }

    #[test]
    fn test_ancestor_chain() {
        let (doc, p) = sample_doc();
        let chain: Vec<&str> = doc
            .ancestors(p)
            .iter()
            .map(|&id| doc.get_node(id).unwrap().tag_name().unwrap())
            .collect();
        assert_eq!(chain, vec!["body", "html"]);
    }

    #[test]
    fn test_leaf_distinction() {
        let (doc, p) = sample_doc();
        assert!(doc.is_leaf(p));
        let body = doc.get_elements_by_tag_name("body")[0];
        assert!(!doc.is_leaf(body));
    }

    #[test]
    fn test_attribute_lookup() {
        let (doc, p) = sample_doc();
        let elem = doc.get_node(p).unwrap().as_element().unwrap();
        assert_eq!(elem.id(), Some("intro"));
        assert_eq!(elem.class_attr(), Some("warn"));
        assert_eq!(elem.get_attribute("lang"), None);
    }

    #[test]
    fn test_insert_markup_requires_parser() {
        let (mut doc, p) = sample_doc();
        let err = doc.insert_markup(p, "<b>x</b>").unwrap_err();
        assert!(matches!(err, StyleError::NoContentParser));
    }

    #[test]
    fn test_insert_markup_with_parser() {
        struct FakeParser;
        impl ContentParser for FakeParser {
            fn parse_into(&self, doc: &mut Document, parent: NodeId, markup: &str) {
                let id = doc.create_text(markup);
                doc.append_child(parent, id);
            }
        }

        let (mut doc, p) = sample_doc();
        doc.set_content_parser(std::sync::Arc::new(FakeParser));
        doc.insert_markup(p, "inserted").unwrap();
        let last = *doc.children(p).last().unwrap();
        assert_eq!(doc.get_node(last).unwrap().as_text(), Some("inserted"));
    }
}
