//! Data model types for tool path post-processing.

mod command;
mod path;

pub use command::{Command, CommandKind, DrillCycle, ParamCode, Parameters, MESSAGE};
pub use path::PathNode;
