#![deny(rust_2018_idioms)]

pub mod red_black_tree;

pub use red_black_tree::{Color, Iter, NodeId, RedBlackTree};
