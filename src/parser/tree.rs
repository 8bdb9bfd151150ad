//! Path tree loading from JSON.

use serde::Deserialize;
use std::path::Path;

use crate::error::{PostError, Result};
use crate::model::PathNode;

/// A tree file holds either a list of top-level objects or a single object.
#[derive(Deserialize)]
#[serde(untagged)]
enum TreeDocument {
    Many(Vec<PathNode>),
    One(PathNode),
}

/// Parse a path tree from JSON text.
pub fn parse_path_tree(json: &str) -> Result<Vec<PathNode>> {
    let document: TreeDocument =
        serde_json::from_str(json).map_err(|e| PostError::ParseError {
            message: e.to_string(),
        })?;

    Ok(match document {
        TreeDocument::Many(nodes) => nodes,
        TreeDocument::One(node) => vec![node],
    })
}

/// Load a path tree from a JSON file.
pub fn load_path_tree(path: &Path) -> Result<Vec<PathNode>> {
    if !path.exists() {
        return Err(PostError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path)?;

    if content.trim().is_empty() {
        return Err(PostError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    parse_path_tree(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_and_single() {
        let many = parse_path_tree(
            r#"[{"type": "leaf", "label": "A"}, {"type": "other", "label": "Stock"}]"#,
        )
        .unwrap();
        assert_eq!(many.len(), 2);
        assert_eq!(many[1].label(), "Stock");

        let one = parse_path_tree(r#"{"type": "group", "label": "Job"}"#).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].command_count(), 0);
    }

    #[test]
    fn test_parse_error() {
        let err = parse_path_tree(r#"{"type": "folder"}"#).unwrap_err();
        assert!(matches!(err, PostError::ParseError { .. }));
    }

    #[test]
    fn test_missing_and_empty_file() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            load_path_tree(&missing),
            Err(PostError::FileNotFound { .. })
        ));

        let empty = dir.path().join("empty.json");
        std::fs::write(&empty, "  \n").unwrap();
        assert!(matches!(
            load_path_tree(&empty),
            Err(PostError::EmptyFile { .. })
        ));
    }
}
