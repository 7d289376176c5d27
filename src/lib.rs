pub mod avl_tree;
pub mod bst;
pub mod config;
pub mod equal_paths;
pub mod error;
pub mod node;
pub mod shared_string_writer;

pub use avl_tree::AvlTree;
pub use bst::BinarySearchTree;
pub use error::KeyError;
