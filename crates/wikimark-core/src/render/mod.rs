//! Renderers, one module per output format.
//!
//! Each renderer is an exhaustive `match` over [`Block`](crate::ast::Block)
//! and [`Inline`](crate::ast::Inline); adding a node variant fails to compile
//! until every format handles it.

use std::collections::BTreeMap;

use serde::Serialize;

pub mod ast;
pub mod html;

/// A node of the AST projection.
///
/// Serializes as `{"type": ..., "text": ..., "children": [...], <params>}`
/// with absent fields left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AstNode {
    /// Node type tag.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Raw or verbatim text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Child nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<AstNode>>,
    /// Type-specific parameters.
    #[serde(flatten)]
    pub params: BTreeMap<&'static str, serde_json::Value>,
}

impl AstNode {
    /// A node with only a type tag.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            text: None,
            children: None,
            params: BTreeMap::new(),
        }
    }

    /// Set the node's text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the node's children.
    pub fn with_children(mut self, children: Vec<AstNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// Add a type-specific parameter.
    pub fn with_param(mut self, key: &'static str, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key, value.into());
        self
    }

    /// Look up a parameter.
    pub fn param(&self, key: &str) -> Option<&serde_json::Value> {
        self.params.get(key)
    }

    /// Depth-first iterator over this node and its descendants.
    pub fn walk(&self) -> impl Iterator<Item = &AstNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            if let Some(children) = &node.children {
                stack.extend(children.iter().rev());
            }
            Some(node)
        })
    }
}
