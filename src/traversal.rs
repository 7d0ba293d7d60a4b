//! Traversal orders and the iterators implementing them.
//!
//! Depth-first traversal comes in six flavors ([Order]), breadth-first in one. A [Tree](crate::Tree)
//! stores its choice as a [Traversal] strategy which can be swapped at runtime.
//!
//! Note that for an N-ary tree *in-order* has no natural meaning. It is treated as a
//! synonym of *post-order* (a node is emitted after all of its children). The reversed orders are
//! the forward sequences reversed end to end, not separately defined traversals.

use crate::{Node, TreeError};
use itertools::Itertools;
use std::{collections::VecDeque, fmt, str::FromStr};

/// Order of a depth-first traversal
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    PreOrder,
    PostOrder,
    /// Same sequence as [Order::PostOrder]
    #[default]
    InOrder,
    ReversePreOrder,
    ReversePostOrder,
    ReverseInOrder,
}

impl Order {
    pub const ALL: [Order; 6] = [
        Order::PreOrder,
        Order::PostOrder,
        Order::InOrder,
        Order::ReversePreOrder,
        Order::ReversePostOrder,
        Order::ReverseInOrder,
    ];

    /// Whether the sequence is emitted back to front
    pub fn is_reversed(&self) -> bool {
        matches!(self, Order::ReversePreOrder | Order::ReversePostOrder | Order::ReverseInOrder)
    }

    /// Whether a node is emitted before its children (ignoring reversal)
    pub fn is_pre(&self) -> bool {
        matches!(self, Order::PreOrder | Order::ReversePreOrder)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Order::PreOrder => "pre-order",
            Order::PostOrder => "post-order",
            Order::InOrder => "in-order",
            Order::ReversePreOrder => "reverse-pre-order",
            Order::ReversePostOrder => "reverse-post-order",
            Order::ReverseInOrder => "reverse-in-order",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Order {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Order::ALL
            .into_iter()
            .find(|order| order.name() == s)
            .ok_or_else(|| TreeError::UnknownTraversal(s.to_string()))
    }
}

/// The traversal strategy of a [Tree](crate::Tree), used by `all`, `walk` and `insert_child`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Traversal {
    DepthFirst(Order),
    BreadthFirst,
}

impl Default for Traversal {
    fn default() -> Self {
        Traversal::DepthFirst(Order::default())
    }
}

impl Traversal {
    /// Flattens the subtree rooted at `node`
    pub fn apply<M>(&self, node: &Node<M>) -> Vec<Node<M>> {
        match self {
            Traversal::DepthFirst(order) => depth_first(node, *order),
            Traversal::BreadthFirst => breadth_first(node),
        }
    }
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Traversal::DepthFirst(order) => write!(f, "depth-first({order})"),
            Traversal::BreadthFirst => f.write_str("breadth-first"),
        }
    }
}

impl FromStr for Traversal {
    type Err = TreeError;

    /// Accepts `breadth-first`, `depth-first` (in-order) or any [Order] name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breadth-first" => Ok(Traversal::BreadthFirst),
            "depth-first" => Ok(Traversal::default()),
            other => other.parse().map(Traversal::DepthFirst),
        }
    }
}

/// Collects the subtree rooted at `node` in the given depth-first order
pub fn depth_first<M>(node: &Node<M>, order: Order) -> Vec<Node<M>> {
    let mut nodes = if order.is_pre() {
        DepthFirstIterator::pre_order(node).collect_vec()
    } else {
        DepthFirstIterator::post_order(node).collect_vec()
    };
    if order.is_reversed() {
        nodes.reverse();
    }
    nodes
}

/// Collects the subtree rooted at `node` level by level
pub fn breadth_first<M>(node: &Node<M>) -> Vec<Node<M>> {
    BreadthFirstIterator::new(node).collect_vec()
}

/// Lazy depth-first iterator over a subtree.
///
/// Children are snapshotted when their parent is entered; mutations made during
/// iteration are not reflected in the nodes still to come.
pub struct DepthFirstIterator<M> {
    root: Option<Node<M>>,
    stack: Vec<(Node<M>, std::vec::IntoIter<Node<M>>)>,
    post: bool,
}

impl<M> DepthFirstIterator<M> {
    /// Emits each node before its children
    pub fn pre_order(root: &Node<M>) -> Self {
        DepthFirstIterator {
            root: Some(root.clone()),
            stack: Vec::new(),
            post: false,
        }
    }

    /// Emits each node after its children
    pub fn post_order(root: &Node<M>) -> Self {
        DepthFirstIterator {
            root: Some(root.clone()),
            stack: Vec::new(),
            post: true,
        }
    }
}

impl<M> Iterator for DepthFirstIterator<M> {
    type Item = Node<M>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.root.take() {
            self.stack.push((root.clone(), root.children().into_iter()));
            if !self.post {
                return Some(root);
            }
        }
        loop {
            let (_, children) = self.stack.last_mut()?;
            if let Some(child) = children.next() {
                self.stack.push((child.clone(), child.children().into_iter()));
                if !self.post {
                    return Some(child);
                }
            } else {
                let (node, _) = self.stack.pop()?;
                if self.post {
                    return Some(node);
                }
            }
        }
    }
}

impl<M> fmt::Debug for DepthFirstIterator<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DepthFirstIterator")
            .field("depth", &self.stack.len())
            .field("post", &self.post)
            .finish()
    }
}

/// Lazy breadth-first (level order) iterator over a subtree
pub struct BreadthFirstIterator<M> {
    queue: VecDeque<Node<M>>,
}

impl<M> BreadthFirstIterator<M> {
    pub fn new(root: &Node<M>) -> Self {
        BreadthFirstIterator {
            queue: VecDeque::from([root.clone()]),
        }
    }
}

impl<M> Iterator for BreadthFirstIterator<M> {
    type Item = Node<M>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.children());
        Some(node)
    }
}

impl<M> fmt::Debug for BreadthFirstIterator<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreadthFirstIterator")
            .field("queued", &self.queue.len())
            .finish()
    }
}
