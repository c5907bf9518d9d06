pub mod document;
pub mod node;

pub use document::{ContentParser, Document, StyleError};
pub use node::{ElementData, Node, NodeData, NodeId};
