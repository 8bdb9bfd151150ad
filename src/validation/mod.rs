//! Path tree validation.

mod validate;

pub use validate::{validate_node, validate_tree, ValidationResult};
