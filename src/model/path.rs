//! Path object tree supplied by the host application.

use serde::{Deserialize, Serialize};

use super::Command;

/// One node of the path object tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PathNode {
    /// Compound or project: ordered children.
    Group {
        label: String,
        #[serde(default)]
        children: Vec<PathNode>,
    },
    /// A path: ordered commands.
    Leaf {
        label: String,
        #[serde(default)]
        commands: Vec<Command>,
    },
    /// An object without path data, e.g. stock.
    Other { label: String },
}

impl PathNode {
    /// Create a group node.
    pub fn group(label: impl Into<String>, children: Vec<PathNode>) -> Self {
        PathNode::Group {
            label: label.into(),
            children,
        }
    }

    /// Create a leaf node.
    pub fn leaf(label: impl Into<String>, commands: Vec<Command>) -> Self {
        PathNode::Leaf {
            label: label.into(),
            commands,
        }
    }

    /// Get the node label.
    pub fn label(&self) -> &str {
        match self {
            PathNode::Group { label, .. }
            | PathNode::Leaf { label, .. }
            | PathNode::Other { label } => label,
        }
    }

    /// Check if the node carries path data (directly or through children).
    pub fn has_path(&self) -> bool {
        !matches!(self, PathNode::Other { .. })
    }

    /// Count commands in this node and all descendants.
    pub fn command_count(&self) -> usize {
        match self {
            PathNode::Group { children, .. } => children.iter().map(|c| c.command_count()).sum(),
            PathNode::Leaf { commands, .. } => commands.len(),
            PathNode::Other { .. } => 0,
        }
    }
}
