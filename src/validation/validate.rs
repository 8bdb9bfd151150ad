//! Pre-flight validation of path trees.

use crate::config::PostConfig;
use crate::error::{PostError, Result};
use crate::model::{Command, CommandKind, DrillCycle, ParamCode, PathNode};

/// Validation result with warnings.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Whether validation passed.
    pub passed: bool,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Error messages.
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Create a passing result.
    pub fn ok() -> Self {
        Self {
            passed: true,
            ..Default::default()
        }
    }

    /// Add a warning.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Add an error.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.passed = false;
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
        if !other.passed {
            self.passed = false;
        }
    }
}

/// Validate the top-level objects of an export.
///
/// A top-level object without path data is a hard error; everything else is
/// collected into the result.
pub fn validate_tree(nodes: &[PathNode], config: &PostConfig) -> Result<ValidationResult> {
    let mut result = ValidationResult::ok();

    if nodes.is_empty() {
        result.add_warning("No path objects to post-process");
    }

    for node in nodes {
        if !node.has_path() {
            return Err(PostError::NotAPath {
                label: node.label().to_string(),
            });
        }
        result.merge(validate_node(node, config));
    }

    Ok(result)
}

/// Validate one node and its descendants.
pub fn validate_node(node: &PathNode, config: &PostConfig) -> ValidationResult {
    let mut result = ValidationResult::ok();

    match node {
        PathNode::Group { label, children } => {
            if children.is_empty() {
                result.add_warning(format!("Compound {}: No children", label));
            }
            for child in children {
                result.merge(validate_node(child, config));
            }
        }
        PathNode::Leaf { label, commands } => {
            if commands.is_empty() {
                result.add_warning(format!("Path {}: No commands", label));
            }
            for (idx, command) in commands.iter().enumerate() {
                if let Some(problem) = check_command(command, config) {
                    result.add_error(format!("Path {}, command {}: {}", label, idx + 1, problem));
                }
            }
        }
        PathNode::Other { .. } => {}
    }

    result
}

/// Check a canned cycle has what its expansion needs.
fn check_command(command: &Command, config: &PostConfig) -> Option<String> {
    if !config.translate_drill {
        return None;
    }
    let CommandKind::CannedCycle(cycle) = CommandKind::classify(&command.name, config) else {
        return None;
    };

    if let Some(missing) = cycle
        .required_params()
        .iter()
        .find(|&&code| command.param(code).is_none())
    {
        return Some(
            PostError::MissingParameter {
                command: command.name.clone(),
                param: missing.letter(),
            }
            .to_string(),
        );
    }

    if cycle == DrillCycle::Peck {
        if let Some(step) = command.param(ParamCode::Q) {
            if step.is_nan() || step <= 0.0 {
                return Some(PostError::InvalidPeckStep { step }.to_string());
            }
        }
    }

    None
}
