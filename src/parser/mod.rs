//! Input parsing: post-processor arguments and path trees.

mod args;
mod tree;

pub use args::{split_args, PostArgs};
pub use tree::{load_path_tree, parse_path_tree};
