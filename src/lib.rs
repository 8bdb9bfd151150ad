//! grbl-post - G-code post-processor for GRBL controllers.
//!
//! Turns a tree of tool path objects into a G-code program. Commands are
//! serialized with GRBL's parameter order and number formatting, and canned
//! drilling cycles (G81, G82, G83), which GRBL lacks, are expanded into
//! equivalent G0/G1 moves.
//!
//! # Example
//!
//! ```no_run
//! use grbl_post::{export, load_path_tree};
//! use std::path::Path;
//!
//! let nodes = load_path_tree(Path::new("job.json")).unwrap();
//! export(&nodes, Path::new("job.nc"), "--no-show-editor --line-numbers").unwrap();
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod parser;
pub mod review;
pub mod validation;

use std::path::Path;

use tracing::{error, info, warn};

// Re-exports for convenience
pub use config::{MachineConfig, PostConfig, Units};
pub use error::{PostError, Result};
pub use generator::{generate_program, serialize, GcodeWriter, MachineContext};
pub use model::{Command, CommandKind, DrillCycle, ParamCode, Parameters, PathNode};
pub use parser::{load_path_tree, parse_path_tree};
pub use review::{ExternalEditor, Passthrough, Review};
pub use validation::{validate_tree, ValidationResult};

/// Post-process path objects into a G-code file.
///
/// `argstring` holds the post-processor options (see [`parser::PostArgs`]).
/// Uses the default machine settings and no interactive review.
pub fn export(nodes: &[PathNode], output_path: &Path, argstring: &str) -> Result<()> {
    export_with(
        nodes,
        output_path,
        argstring,
        &MachineConfig::default(),
        &Passthrough,
    )
}

/// Post-process path objects with explicit machine settings and review step.
pub fn export_with(
    nodes: &[PathNode],
    output_path: &Path,
    argstring: &str,
    machine: &MachineConfig,
    reviewer: &dyn Review,
) -> Result<()> {
    let config = PostConfig::from_args(argstring, machine)?;

    info!("Post-processing {} object(s)", nodes.len());

    let validation = validate_tree(nodes, &config)?;
    for warning in &validation.warnings {
        warn!("{}", warning);
    }
    for err in &validation.errors {
        error!("{}", err);
    }

    write_program(nodes, output_path, &config, reviewer)
}

/// Generate, review and write the program for an already parsed configuration.
///
/// The output file is only touched once the whole program has been generated.
pub fn write_program(
    nodes: &[PathNode],
    output_path: &Path,
    config: &PostConfig,
    reviewer: &dyn Review,
) -> Result<()> {
    let gcode = generate_program(nodes, config)?;

    let gcode = if config.show_editor {
        reviewer.review(gcode)?
    } else {
        gcode
    };

    std::fs::write(output_path, gcode)?;
    info!("Done post-processing: {}", output_path.display());

    Ok(())
}
