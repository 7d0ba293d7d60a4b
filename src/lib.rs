//! ## About
//!
//! A generic, in-memory tree container. A [Tree] holds an optional root [Node]; every node
//! owns a user-supplied model, an informational index and an ordered list of children.
//!
//! Trees are built from a nested plain-data representation ([NodeData], also readable from JSON),
//! traversed depth-first in six [Order]s or breadth-first, queried (find, path, parent) and
//! mutated (insert, remove, move). Lookups that find nothing return `None` and mutations
//! involving unknown nodes do nothing; see the `try_*` methods of [Tree] for checked variants.
//!
//! See the [Tree] struct to get started.
//!
//! ```
//! use arbor::{NodeData, Tree};
//!
//! let tree = Tree::new(Some(NodeData::new("root").with_children(vec![
//!     NodeData::new("child1").with_children(vec![NodeData::new("grandchild1")]),
//!     NodeData::new("child2"),
//! ])));
//!
//! let grandchild = tree.find(|node| *node.model() == "grandchild1").unwrap();
//! let path = tree.path(&grandchild).unwrap();
//! assert_eq!(path.iter().map(|node| *node.model()).collect::<Vec<_>>(), ["root", "child1", "grandchild1"]);
//! ```
//!
//! ## Naming conventions
//! * Structs – substantives that indicate entities
//! * Methods – imperative forms with the exception of getters and factories, which
//!             use substantives (i.e., omit a `get_` prefix) much like the standard library.
//!             Property-based variants of predicate methods carry a `_by_property` suffix.

pub mod data;
pub mod errors;
pub mod node;
pub mod predicate;
pub mod traversal;
pub mod tree;

pub use data::NodeData;
pub use errors::{Result, TreeError};
pub use node::Node;
pub use traversal::{
    BreadthFirstIterator, DepthFirstIterator, Order, Traversal,
    Traversal::{BreadthFirst, DepthFirst},
};
pub use tree::Tree;
