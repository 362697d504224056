pub mod category;
pub mod data_core;
pub mod graph;
pub mod traversal;
pub mod tree;
