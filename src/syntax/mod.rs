// Tree inspection API over parsed BigQuery sources
mod cursor;
mod node;
mod tree;

pub use cursor::{TreeCursor, Walk};
pub use node::{Node, NodeId};
pub use tree::Tree;
