//! G-code generator module.

mod context;
mod drill;
mod format;
mod gcode;
mod program;
mod serializer;

pub use context::{MachineContext, MotionMode, Plane, RetractMode};
pub use drill::{expand, resolve_cycle, ResolvedCycle};
pub use format::{comment, format_number, format_token, join_line, join_words, NumberFormat};
pub use gcode::GcodeWriter;
pub use program::{generate_program, generate_program_at};
pub use serializer::serialize;
