//! Optional review of the generated program before it is written.

use std::io::Write;
use std::process::Command;

use tracing::{info, warn};

use crate::error::{PostError, Result};
use crate::parser::split_args;

/// A step that may edit the generated program before it is written.
pub trait Review {
    /// Return the text to write.
    fn review(&self, gcode: String) -> Result<String>;
}

/// Writes the program unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl Review for Passthrough {
    fn review(&self, gcode: String) -> Result<String> {
        Ok(gcode)
    }
}

/// Opens the program in an external text editor.
///
/// The editor runs synchronously on a scratch file. If it exits with a
/// failure status the original text is kept, like cancelling a dialog.
#[derive(Debug, Clone)]
pub struct ExternalEditor {
    program: String,
}

impl ExternalEditor {
    /// Use the given editor program. It may carry arguments, e.g. `code --wait`,
    /// and is split with shell quoting, so paths with spaces can be quoted.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Review for ExternalEditor {
    fn review(&self, gcode: String) -> Result<String> {
        let words = split_args(&self.program).map_err(|e| PostError::Review {
            message: e.to_string(),
        })?;
        let Some((editor, editor_args)) = words.split_first() else {
            return Err(PostError::Review {
                message: "no editor program given".to_string(),
            });
        };

        let mut file = tempfile::Builder::new()
            .prefix("grbl-post-")
            .suffix(".nc")
            .tempfile()?;
        file.write_all(gcode.as_bytes())?;
        file.flush()?;

        info!("Opening {} for review", editor);
        let status = Command::new(editor)
            .args(editor_args)
            .arg(file.path())
            .status()
            .map_err(|e| PostError::Review {
                message: format!("failed to start {}: {}", editor, e),
            })?;

        if !status.success() {
            warn!("Editor exited with {}, keeping the generated program", status);
            return Ok(gcode);
        }

        Ok(std::fs::read_to_string(file.path())?)
    }
}
