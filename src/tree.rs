//! The tree: an optional root [Node] plus a [Traversal] strategy.
//!
//! All recursive work is delegated to the root node. Operations on an empty tree do nothing
//! and return `None`. Operations given a node that is not part of the tree do nothing as well. The
//! `try_*` variants report these cases as a [TreeError] instead.

use crate::{
    data::NodeData,
    errors::{Result, TreeError},
    predicate::property_eq,
    traversal::{Order, Traversal},
    Node,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

/// An owning wrapper around an optional root node
pub struct Tree<M> {
    root: Option<Node<M>>,
    strategy: Traversal,
}

impl<M> Default for Tree<M> {
    fn default() -> Self {
        Tree {
            root: None,
            strategy: Traversal::default(),
        }
    }
}

impl<M> Tree<M> {
    /// Builds a tree from nested data using the default strategy (depth-first, in-order).
    /// `None` yields an empty tree.
    pub fn new(data: Option<NodeData<M>>) -> Self {
        Self::with_strategy(data, Traversal::default())
    }

    pub fn with_strategy(data: Option<NodeData<M>>, strategy: Traversal) -> Self {
        Tree {
            root: Self::parse(data),
            strategy,
        }
    }

    /// Builds the node graph for `data`.
    ///
    /// The root keeps the index supplied with the data (0 if there is none). Every descendant
    /// is numbered by its 1-based position among its siblings, whatever index the data carries.
    pub fn parse(data: Option<NodeData<M>>) -> Option<Node<M>> {
        let data = data?;
        let index = data.index.unwrap_or_default();
        let root = Self::build(data, index);
        tracing::debug!(index, "parsed tree");
        Some(root)
    }

    fn build(data: NodeData<M>, index: usize) -> Node<M> {
        let node = Node::new(data.model, index);
        data.children
            .into_iter()
            .enumerate()
            .for_each(|(position, child)| node.add_child(Self::build(child, position + 1)));
        node
    }

    /// Parses the nested representation from JSON. `null` yields an empty tree.
    pub fn from_json(json: &str) -> Result<Self>
    where
        M: DeserializeOwned,
    {
        let data: Option<NodeData<M>> = serde_json::from_str(json)?;
        Ok(Self::new(data))
    }

    /// Exports the tree to its nested representation
    pub fn to_data(&self) -> Option<NodeData<M>>
    where
        M: Clone,
    {
        self.root.as_ref().map(Node::to_data)
    }

    pub fn root(&self) -> Option<&Node<M>> {
        self.root.as_ref()
    }

    /// Replaces the root. The previous tree is dropped unless referenced elsewhere.
    pub fn set_root(&mut self, root: Option<Node<M>>) {
        self.root = root;
    }

    pub fn strategy(&self) -> Traversal {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: Traversal) {
        tracing::debug!(%strategy, "traversal strategy changed");
        self.strategy = strategy;
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Total number of nodes, including the root
    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, Node::len)
    }

    /// All nodes flattened by the tree's strategy. `None` if the tree is empty.
    pub fn all(&self) -> Option<Vec<Node<M>>> {
        self.root.as_ref().map(|root| self.strategy.apply(root))
    }

    /// Calls `callback` once for every node. Always depth-first in-order, whatever the
    /// strategy: a parent is visited after all of its descendants.
    pub fn walk(&self, mut callback: impl FnMut(&Node<M>)) {
        if let Some(root) = self.root.as_ref() {
            root.depth_first(Order::InOrder)
                .iter()
                .for_each(|node| callback(node));
        }
    }

    /// First descendant of the root satisfying `predicate`. The root itself is not tested.
    pub fn find(&self, predicate: impl Fn(&Node<M>) -> bool) -> Option<Node<M>> {
        self.root.as_ref()?.find_child(predicate)
    }

    pub fn find_by_property<V>(&self, name: &str, value: &V) -> Option<Node<M>>
    where
        M: Serialize,
        V: Serialize + ?Sized,
    {
        self.find(property_eq(name, value))
    }

    /// The parent of `node`, searched from the root
    pub fn parent(&self, node: &Node<M>) -> Option<Node<M>> {
        self.root.as_ref()?.parent(node)
    }

    /// The nodes from the root down to `node`
    pub fn path(&self, node: &Node<M>) -> Option<Vec<Node<M>>> {
        self.root.as_ref()?.path(node)
    }

    /// The nodes from `node` up to the root
    pub fn reverse_path(&self, node: &Node<M>) -> Option<Vec<Node<M>>> {
        self.root.as_ref()?.reverse_path(node)
    }

    fn contains(&self, node: &Node<M>) -> bool {
        self.path(node).is_some()
    }

    /// Removes `node` with its subtree. Removing the root empties the tree.
    ///
    /// Every node of the tree that lists `node` among its children loses it.
    pub fn remove(&mut self, node: &Node<M>) {
        let Some(root) = self.root.as_ref() else {
            tracing::trace!("remove on empty tree");
            return;
        };
        if root == node {
            tracing::debug!(index = root.index(), "removed root, tree is empty");
            self.root = None;
        } else {
            root.purge(node);
        }
    }

    /// Same as [Tree::remove] but fails if the tree is empty or `node` is not part of it
    pub fn try_remove(&mut self, node: &Node<M>) -> Result<()> {
        if self.is_empty() {
            return Err(TreeError::RootNotSet);
        }
        if !self.contains(node) {
            return Err(TreeError::UnknownNode(node.index().to_string()));
        }
        self.remove(node);
        Ok(())
    }

    /// Detaches `node` from its parent (if it has one in this tree) and appends it to `new_parent`.
    ///
    /// Neither membership of `new_parent` nor the absence of cycles is checked, see
    /// [Tree::try_move_node].
    pub fn move_node(&mut self, node: &Node<M>, new_parent: &Node<M>) {
        let Some(root) = self.root.as_ref() else {
            tracing::trace!("move on empty tree");
            return;
        };
        match root.parent(node) {
            Some(parent) => parent.move_child(node, new_parent),
            None => {
                tracing::trace!(index = node.index(), "moved node has no parent in tree");
                new_parent.add_child(node.clone());
            }
        }
    }

    /// Same as [Tree::move_node] but requires both nodes to be part of the tree and refuses to
    /// move a node below itself (which includes moving the root).
    pub fn try_move_node(&mut self, node: &Node<M>, new_parent: &Node<M>) -> Result<()> {
        let root = self.root.as_ref().ok_or(TreeError::RootNotSet)?;
        if !self.contains(node) {
            return Err(TreeError::UnknownNode(node.index().to_string()));
        }
        let ancestors = root
            .path(new_parent)
            .ok_or_else(|| TreeError::UnknownNode(new_parent.index().to_string()))?;
        if ancestors.contains(node) {
            return Err(TreeError::Ancestry(node.index().to_string()));
        }
        self.move_node(node, new_parent);
        Ok(())
    }

    /// Appends `child` to the first node (in the order of the tree's strategy) satisfying
    /// `predicate`. Does nothing if no node does.
    ///
    /// Unlike [Node::insert_child] this does not insert among the siblings of the matching
    /// node but below it.
    pub fn insert_child(&mut self, child: Node<M>, predicate: impl Fn(&Node<M>) -> bool) {
        match self.all().into_iter().flatten().find(|node| predicate(node)) {
            Some(parent) => {
                tracing::debug!(index = parent.index(), "inserting child");
                parent.add_child(child);
            }
            None => tracing::trace!("no node matched, child not inserted"),
        }
    }

    pub fn insert_child_by_property<V>(&mut self, child: Node<M>, name: &str, value: &V)
    where
        M: Serialize,
        V: Serialize + ?Sized,
    {
        self.insert_child(child, property_eq(name, value))
    }
}

impl<M> fmt::Debug for Tree<M>
where
    M: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("strategy", &self.strategy)
            .field("root", &self.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use itertools::Itertools;
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use test_log;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Entry {
        name: String,
        value: i32,
    }

    fn entry(name: &str, value: i32) -> Entry {
        Entry {
            name: name.to_string(),
            value,
        }
    }

    fn names(nodes: &[Node<Entry>]) -> Vec<String> {
        nodes.iter().map(|n| n.model().name.clone()).collect_vec()
    }

    fn named(tree: &Tree<Entry>, name: &str) -> Node<Entry> {
        tree.find_by_property("name", name)
            .or_else(|| tree.root().filter(|r| r.model().name == name).cloned())
            .unwrap()
    }

    //         home
    //        /    \
    //     docs     src
    //      |      /   \
    //    notes  lib   bin
    //                  |
    //                 main
    fn layout() -> Tree<Entry> {
        Tree::new(Some(
            NodeData::new(entry("home", 0)).with_index(7).with_children(vec![
                NodeData::new(entry("docs", 10)).with_children(vec![NodeData::new(entry("notes", 11))]),
                NodeData::new(entry("src", 20)).with_index(99).with_children(vec![
                    NodeData::new(entry("lib", 21)),
                    NodeData::new(entry("bin", 22)).with_children(vec![NodeData::new(entry("main", 23))]),
                ]),
            ]),
        ))
    }

    #[test_log::test]
    fn test_parse_assigns_positional_indices() {
        let tree = layout();
        let root = tree.root().unwrap();
        assert_eq!(root.index(), 7);
        assert_eq!(tree.len(), 7);

        let src = named(&tree, "src");
        assert_eq!(src.index(), 2);
        assert_eq!(named(&tree, "docs").index(), 1);
        assert_eq!(named(&tree, "bin").index(), 2);
        assert_eq!(named(&tree, "main").index(), 1);

        assert!(Tree::<Entry>::parse(None).is_none());
        let tree = Tree::new(Some(NodeData::new(entry("solo", 1))));
        assert_eq!(tree.root().map(Node::index), Some(0));
    }

    #[test_log::test]
    fn test_empty_tree() {
        let mut tree = Tree::<Entry>::default();
        let stranger = Node::new(entry("stranger", 0), 0);
        let other = Node::new(entry("other", 0), 0);

        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(tree.all().is_none());
        assert!(tree.find(|_| true).is_none());
        assert!(tree.path(&stranger).is_none());
        assert!(tree.reverse_path(&stranger).is_none());
        assert!(tree.parent(&stranger).is_none());

        tree.remove(&stranger);
        tree.move_node(&stranger, &other);
        assert!(other.is_leaf());
        tree.insert_child(stranger.clone(), |_| true);

        let mut visited = 0;
        tree.walk(|_| visited += 1);
        assert_eq!(visited, 0);
        assert!(tree.is_empty());

        assert!(matches!(tree.try_remove(&stranger), Err(TreeError::RootNotSet)));
        assert!(matches!(tree.try_move_node(&stranger, &other), Err(TreeError::RootNotSet)));
    }

    #[test_log::test]
    fn test_all_uses_strategy() {
        let mut tree = layout();
        assert_eq!(
            names(&tree.all().unwrap()),
            &["notes", "docs", "lib", "main", "bin", "src", "home"]
        );

        tree.set_strategy(Traversal::DepthFirst(Order::PreOrder));
        assert_eq!(
            names(&tree.all().unwrap()),
            &["home", "docs", "notes", "src", "lib", "bin", "main"]
        );

        tree.set_strategy(Traversal::BreadthFirst);
        assert_eq!(tree.strategy(), Traversal::BreadthFirst);
        assert_eq!(
            names(&tree.all().unwrap()),
            &["home", "docs", "src", "notes", "lib", "bin", "main"]
        );
    }

    #[test_log::test]
    fn test_walk_visits_children_before_parents() {
        let tree = layout();
        let mut visited = vec![];
        tree.walk(|node| visited.push(node.model().name.clone()));
        assert_eq!(visited.len(), 7);
        assert_eq!(visited.last().map(String::as_str), Some("home"));
        let position = |name: &str| visited.iter().position(|v| v == name).unwrap();
        assert!(position("main") < position("bin"));
        assert!(position("bin") < position("src"));
    }

    #[test_log::test]
    fn test_walk_ignores_strategy() {
        let mut tree = layout();
        tree.set_strategy(Traversal::BreadthFirst);
        let mut visited = vec![];
        tree.walk(|node| visited.push(node.model().name.clone()));
        assert_eq!(visited, &["notes", "docs", "lib", "main", "bin", "src", "home"]);

        tree.set_strategy(Traversal::DepthFirst(Order::PreOrder));
        let mut again = vec![];
        tree.walk(|node| again.push(node.model().name.clone()));
        assert_eq!(again, visited);
    }

    #[test_log::test]
    fn test_remove() {
        let mut tree = layout();
        let bin = named(&tree, "bin");
        let main = named(&tree, "main");

        tree.remove(&bin);
        assert_eq!(tree.len(), 5);
        assert!(tree.path(&main).is_none());

        // Not part of the tree (any more)
        tree.remove(&bin);
        assert_eq!(tree.len(), 5);
        assert!(matches!(tree.try_remove(&bin), Err(TreeError::UnknownNode(_))));

        let docs = named(&tree, "docs");
        tree.try_remove(&docs).unwrap();
        assert_eq!(tree.len(), 3);

        let root = tree.root().cloned().unwrap();
        tree.remove(&root);
        assert!(tree.is_empty());
        assert!(tree.all().is_none());
    }

    #[test_log::test]
    fn test_remove_purges_every_occurrence() {
        let mut tree = layout();
        let lib = named(&tree, "lib");
        let docs = named(&tree, "docs");
        // Break the single-owner rule on purpose
        docs.add_child(lib.clone());

        tree.remove(&lib);
        assert!(tree.all().unwrap().iter().all(|n| n != &lib));
        assert_eq!(tree.len(), 6);
    }

    #[test_log::test]
    fn test_move_node() {
        let mut tree = layout();
        let bin = named(&tree, "bin");
        let docs = named(&tree, "docs");
        let src = named(&tree, "src");

        tree.move_node(&bin, &docs);
        assert_eq!(tree.parent(&bin), Some(docs.clone()));
        assert!(!src.children().contains(&bin));
        assert_eq!(names(&docs.children()), &["notes", "bin"]);
        assert_eq!(tree.len(), 7);

        // A node without parent in the tree is only attached
        let cli = Node::new(entry("cli", 24), 1);
        let main = named(&tree, "main");
        tree.move_node(&cli, &main);
        assert_eq!(tree.len(), 8);
        assert_eq!(
            names(&tree.path(&cli).unwrap()),
            &["home", "docs", "bin", "main", "cli"]
        );
    }

    #[test_log::test]
    fn test_try_move_node() {
        let mut tree = layout();
        let root = tree.root().cloned().unwrap();
        let src = named(&tree, "src");
        let main = named(&tree, "main");
        let docs = named(&tree, "docs");
        let stranger = Node::new(entry("stranger", 0), 0);

        assert!(matches!(tree.try_move_node(&src, &main), Err(TreeError::Ancestry(_))));
        assert!(matches!(tree.try_move_node(&src, &src), Err(TreeError::Ancestry(_))));
        assert!(matches!(tree.try_move_node(&root, &docs), Err(TreeError::Ancestry(_))));
        assert!(matches!(tree.try_move_node(&stranger, &docs), Err(TreeError::UnknownNode(_))));
        assert!(matches!(tree.try_move_node(&docs, &stranger), Err(TreeError::UnknownNode(_))));
        assert!(stranger.is_leaf());

        tree.try_move_node(&main, &docs).unwrap();
        assert_eq!(tree.parent(&main), Some(docs));
    }

    #[test_log::test]
    fn test_insert_child_appends_below_match() {
        let mut tree = layout();
        tree.set_strategy(Traversal::DepthFirst(Order::PreOrder));
        let src = named(&tree, "src");

        tree.insert_child(Node::new(entry("tests", 30), 3), |n| n.model().value >= 20);
        assert_eq!(names(&src.children()), &["lib", "bin", "tests"]);

        // In-order visits the deepest match first
        tree.set_strategy(Traversal::default());
        tree.insert_child_by_property(Node::new(entry("args", 40), 1), "name", "main");
        assert_eq!(names(&named(&tree, "main").children()), &["args"]);

        tree.insert_child(Node::new(entry("target", 50), 1), |n| n.model().value > 100);
        assert_eq!(tree.len(), 9);
    }

    #[test_log::test]
    fn test_json_round_trip() {
        let json = json!({
            "model": { "name": "root", "value": 10 },
            "index": 3,
            "children": [
                { "model": { "name": "child1", "value": 20 }, "index": 42,
                  "children": [ { "model": { "name": "grandchild1", "value": 40 } } ] },
                { "model": { "name": "child2", "value": 30 } }
            ]
        });
        let tree = Tree::<Entry>::from_json(&json.to_string()).unwrap();
        assert_eq!(tree.len(), 4);

        let data = tree.to_data().unwrap();
        assert_eq!(data.index, Some(3));
        assert_eq!(data.children[0].index, Some(1));
        assert_eq!(data.children[1].model, entry("child2", 30));

        let tree = Tree::<Entry>::from_json("null").unwrap();
        assert!(tree.is_empty());
        assert!(tree.to_data().is_none());

        let error = Tree::<Entry>::from_json(r#"{"children": []}"#).unwrap_err();
        assert!(matches!(error, TreeError::Parse(_)));
    }
}
