//! The tree vertex and all recursive structural algorithms.
//!
//! A [Node] is a shared handle to a vertex. Cloning the handle does not copy the vertex,
//! and two handles compare equal only if they refer to the same vertex (reference identity,
//! regardless of the models). A node owns its children; there is no back reference to the parent.
//! Parents are found by searching downward from an ancestor ([Node::parent]).
//!
//! The structure does not guard against cycles. Adding a node below one of its own
//! descendants makes every subsequent traversal non-terminating.

use crate::{
    data::NodeData,
    predicate::property_eq,
    traversal::{breadth_first, depth_first, BreadthFirstIterator, DepthFirstIterator, Order},
};
use core::fmt;
use serde::Serialize;
use std::{
    cell::{Ref, RefCell, RefMut},
    rc::Rc,
};

struct Vertex<M> {
    /// The user-defined model that the node owns
    model: M,
    /// Informational ordinal, see [Node::index]
    index: usize,
    children: Vec<Node<M>>,
}

/// A handle to a tree vertex holding a model, an index and an ordered list of owned children
pub struct Node<M>(Rc<RefCell<Vertex<M>>>);

impl<M> Node<M> {
    pub fn new(model: M, index: usize) -> Self {
        Node(Rc::new(RefCell::new(Vertex {
            model,
            index,
            children: vec![],
        })))
    }

    /// Borrows the model. Panics if the model is currently borrowed mutably.
    pub fn model(&self) -> Ref<'_, M> {
        Ref::map(self.0.borrow(), |vertex| &vertex.model)
    }

    pub fn model_mut(&self) -> RefMut<'_, M> {
        RefMut::map(self.0.borrow_mut(), |vertex| &mut vertex.model)
    }

    /// Caller or parser assigned ordinal. Purely informational: it does not influence the
    /// order of children. Parsed nodes carry their 1-based position among their siblings.
    pub fn index(&self) -> usize {
        self.0.borrow().index
    }

    pub fn set_index(&self, index: usize) {
        self.0.borrow_mut().index = index;
    }

    /// The direct children in insertion order (handles only, nodes are not copied)
    pub fn children(&self) -> Vec<Node<M>> {
        self.0.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.0.borrow().children.is_empty()
    }

    /// Number of nodes in the subtree, including this one
    pub fn len(&self) -> usize {
        1 + self.0.borrow().children.iter().map(Node::len).sum::<usize>()
    }

    /// Whether both handles refer to the same vertex
    pub fn ptr_eq(&self, other: &Node<M>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Appends `child`. Duplicates are not checked for.
    pub fn add_child(&self, child: Node<M>) {
        let mut vertex = self.0.borrow_mut();
        vertex.children.push(child);
        tracing::trace!(index = vertex.index, count = vertex.children.len(), "added child");
    }

    /// Removes the first occurrence of `child` (by identity). Does nothing if `child` is
    /// not a direct child.
    pub fn remove_child(&self, child: &Node<M>) {
        let mut vertex = self.0.borrow_mut();
        match vertex.children.iter().position(|c| c == child) {
            Some(position) => {
                vertex.children.remove(position);
                tracing::trace!(index = vertex.index, position, "removed child");
            }
            None => tracing::trace!(index = vertex.index, "child to remove not found"),
        }
    }

    /// Detaches `child` from this node and appends it to `new_parent`.
    ///
    /// `child` is attached even if it was not a child of this node. Whether `new_parent` lies in
    /// the subtree of `child` is not checked (that would create a cycle).
    pub fn move_child(&self, child: &Node<M>, new_parent: &Node<M>) {
        self.remove_child(child);
        new_parent.add_child(child.clone());
        tracing::debug!(from = self.index(), to = new_parent.index(), "moved child");
    }

    /// Searches the descendants for the first node satisfying `predicate`.
    ///
    /// Each direct child is tested before its own subtree is searched, i.e., the search runs in
    /// pre-order over the descendants. The node itself is never tested.
    pub fn find_child(&self, predicate: impl Fn(&Node<M>) -> bool) -> Option<Node<M>> {
        self.find_descendant(&predicate)
    }

    fn find_descendant(&self, predicate: &dyn Fn(&Node<M>) -> bool) -> Option<Node<M>> {
        self.0.borrow().children.iter().find_map(|child| {
            if predicate(child) {
                Some(child.clone())
            } else {
                child.find_descendant(predicate)
            }
        })
    }

    /// [Node::find_child] with a predicate comparing the model field `name` to `value`
    pub fn find_child_by_property<V>(&self, name: &str, value: &V) -> Option<Node<M>>
    where
        M: Serialize,
        V: Serialize + ?Sized,
    {
        self.find_child(property_eq(name, value))
    }

    /// The direct children satisfying `predicate`, in child order. Not recursive.
    pub fn find_children(&self, predicate: impl Fn(&Node<M>) -> bool) -> Vec<Node<M>> {
        self.0
            .borrow()
            .children
            .iter()
            .filter(|child| predicate(*child))
            .cloned()
            .collect()
    }

    pub fn find_children_by_property<V>(&self, name: &str, value: &V) -> Vec<Node<M>>
    where
        M: Serialize,
        V: Serialize + ?Sized,
    {
        self.find_children(property_eq(name, value))
    }

    /// Removes all direct children satisfying `predicate` and returns them. The remaining
    /// children keep their order.
    pub fn delete_children(&self, predicate: impl Fn(&Node<M>) -> bool) -> Vec<Node<M>> {
        // The predicate runs without a borrow on this node so it may inspect it.
        let (deleted, kept): (Vec<_>, Vec<_>) = self
            .children()
            .into_iter()
            .partition(|child| predicate(child));
        let mut vertex = self.0.borrow_mut();
        vertex.children = kept;
        tracing::debug!(index = vertex.index, count = deleted.len(), "deleted children");
        deleted
    }

    pub fn delete_children_by_property<V>(&self, name: &str, value: &V) -> Vec<Node<M>>
    where
        M: Serialize,
        V: Serialize + ?Sized,
    {
        self.delete_children(property_eq(name, value))
    }

    /// Inserts `child` in front of the first direct child satisfying `predicate`, or
    /// appends it if none does.
    pub fn insert_child(&self, child: Node<M>, predicate: impl Fn(&Node<M>) -> bool) {
        let position = self.children().iter().position(|c| predicate(c));
        let mut vertex = self.0.borrow_mut();
        match position {
            Some(position) => {
                vertex.children.insert(position, child);
                tracing::debug!(index = vertex.index, position, "inserted child");
            }
            None => {
                vertex.children.push(child);
                tracing::debug!(index = vertex.index, "no sibling matched, appended child");
            }
        }
    }

    pub fn insert_child_by_property<V>(&self, child: Node<M>, name: &str, value: &V)
    where
        M: Serialize,
        V: Serialize + ?Sized,
    {
        self.insert_child(child, property_eq(name, value))
    }

    /// The nodes from this node down to `target` (both inclusive). `None` if `target` is
    /// not in this subtree.
    pub fn path(&self, target: &Node<M>) -> Option<Vec<Node<M>>> {
        let mut path = Vec::new();
        self.collect_path(target, &mut path).then_some(path)
    }

    /// Same as [Node::path] but from `target` up to this node
    pub fn reverse_path(&self, target: &Node<M>) -> Option<Vec<Node<M>>> {
        self.path(target).map(|mut path| {
            path.reverse();
            path
        })
    }

    /// Pre-order search with backtracking
    fn collect_path(&self, target: &Node<M>, path: &mut Vec<Node<M>>) -> bool {
        path.push(self.clone());
        if self == target {
            return true;
        }
        if self.0.borrow().children.iter().any(|child| child.collect_path(target, path)) {
            return true;
        }
        path.pop();
        false
    }

    /// The node in this subtree that owns `child` directly. A node is never its own parent.
    pub fn parent(&self, child: &Node<M>) -> Option<Node<M>> {
        if self == child {
            return None;
        }
        self.0.borrow().children.iter().find_map(|c| {
            if c == child {
                Some(self.clone())
            } else {
                c.parent(child)
            }
        })
    }

    /// Removes `node` from the children of every node in this subtree
    pub(crate) fn purge(&self, node: &Node<M>) {
        let remaining = {
            let mut vertex = self.0.borrow_mut();
            let before = vertex.children.len();
            vertex.children.retain(|c| c != node);
            if vertex.children.len() != before {
                tracing::trace!(index = vertex.index, count = before - vertex.children.len(), "purged node");
            }
            vertex.children.clone()
        };
        remaining.iter().for_each(|child| child.purge(node));
    }

    /// All nodes in this subtree in the given depth-first order
    pub fn depth_first(&self, order: Order) -> Vec<Node<M>> {
        depth_first(self, order)
    }

    /// All nodes in this subtree, level by level
    pub fn breadth_first(&self) -> Vec<Node<M>> {
        breadth_first(self)
    }

    /// Lazy pre-order iteration over this subtree
    pub fn iter_depth(&self) -> DepthFirstIterator<M> {
        DepthFirstIterator::pre_order(self)
    }

    pub fn iter_breadth(&self) -> BreadthFirstIterator<M> {
        BreadthFirstIterator::new(self)
    }

    /// Exports this subtree to its plain nested representation
    pub fn to_data(&self) -> NodeData<M>
    where
        M: Clone,
    {
        let vertex = self.0.borrow();
        NodeData {
            model: vertex.model.clone(),
            index: Some(vertex.index),
            children: vertex.children.iter().map(Node::to_data).collect(),
        }
    }
}

impl<M> Clone for Node<M> {
    fn clone(&self) -> Self {
        Node(Rc::clone(&self.0))
    }
}

impl<M> PartialEq for Node<M> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<M> Eq for Node<M> {}

impl<M> fmt::Debug for Node<M>
where
    M: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vertex = self.0.borrow();
        f.debug_struct("Node")
            .field("index", &vertex.index)
            .field("model", &vertex.model)
            .field("children", &vertex.children)
            .finish()
    }
}

impl<M> fmt::Display for Node<M>
where
    M: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vertex = self.0.borrow();
        write!(
            f,
            "Node {}, children: {}, model: {}",
            vertex.index,
            vertex.children.len(),
            vertex.model
        )
    }
}
