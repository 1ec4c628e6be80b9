//! Kinship graph module: adjacency, direct-relation rules, BFS search, hop labels.
//!
//! Everything here is pure and synchronous over an immutable [`FamilyGraph`]
//! snapshot; no function mutates its input or performs I/O.

mod accessor;
mod labeler;
mod relation;
pub mod rules;
mod traversal;

pub use accessor::{FamilyGraph, Parents};
pub use labeler::{label_edge, label_path};
pub use relation::{EdgeKind, EdgeLabel, RelationKind};
pub use rules::{classify, classify_with_rule};
pub use traversal::{relatives_within, shortest_path};
