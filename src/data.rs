//! The nested plain-data representation a [Tree](crate::Tree) is parsed from.

use serde::{Deserialize, Serialize};

/// One level of nested tree data:
///
/// ```text
/// { model: M, index?: number, children?: [ { model: M, children?: [...] }, ... ] }
/// ```
///
/// Only the `index` of the outermost entry is honored by [Tree::parse](crate::Tree::parse);
/// descendants are numbered by their 1-based position among their siblings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData<M> {
    pub model: M,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeData<M>>,
}

impl<M> NodeData<M> {
    pub fn new(model: M) -> Self {
        NodeData {
            model,
            index: None,
            children: vec![],
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_children(mut self, children: Vec<NodeData<M>>) -> Self {
        self.children = children;
        self
    }
}
