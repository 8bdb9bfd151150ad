//! Full program generation: header, preamble, operations, postamble.

use chrono::{Local, NaiveDateTime};
use tracing::debug;

use crate::config::{PostConfig, GENERATOR_NAME, POST_PROCESSOR_NAME};
use crate::error::{PostError, Result};
use crate::model::PathNode;

use super::context::MachineContext;
use super::gcode::GcodeWriter;
use super::serializer::serialize;

/// Generate the G-code program for a list of top-level path objects.
pub fn generate_program(nodes: &[PathNode], config: &PostConfig) -> Result<String> {
    generate_program_at(nodes, config, Local::now().naive_local())
}

/// Generate the G-code program with a fixed header timestamp.
///
/// One machine context and one line counter cover the whole program, so
/// modes and positions carry over from one operation to the next.
pub fn generate_program_at(
    nodes: &[PathNode],
    config: &PostConfig,
    output_time: NaiveDateTime,
) -> Result<String> {
    if let Some(node) = nodes.iter().find(|n| !n.has_path()) {
        return Err(PostError::NotAPath {
            label: node.label().to_string(),
        });
    }

    let mut writer = GcodeWriter::new(config.line_numbers);
    let mut ctx = MachineContext::new();

    if config.header {
        writer.write_comment(&format!("Exported by {}", GENERATOR_NAME));
        writer.write_comment(&format!("Post Processor: {}", POST_PROCESSOR_NAME));
        writer.write_comment(&format!(
            "Output Time:{}",
            output_time.format("%Y-%m-%d %H:%M:%S")
        ));
    }

    if config.comments {
        writer.write_comment("begin preamble");
    }
    writer.write_block(&config.preamble);
    writer.write_line(config.units.gcode());

    for node in nodes {
        if config.comments {
            writer.write_comment(&format!("begin operation: {}", node.label()));
        }
        writer.write_block(&config.pre_operation);

        write_node(&mut writer, &mut ctx, node, config)?;

        if config.comments {
            writer.write_comment(&format!("finish operation: {}", node.label()));
        }
        writer.write_block(&config.post_operation);
    }

    if config.comments {
        writer.write_comment("begin postamble");
    }
    writer.write_block(&config.postamble);

    Ok(writer.take_output())
}

/// Write one node and its descendants in pre-order.
fn write_node(
    writer: &mut GcodeWriter,
    ctx: &mut MachineContext,
    node: &PathNode,
    config: &PostConfig,
) -> Result<()> {
    match node {
        PathNode::Group { label, children } => {
            if config.comments {
                writer.write_comment(&format!("compound: {}", label));
            }
            for child in children {
                write_node(writer, ctx, child, config)?;
            }
        }
        PathNode::Leaf { label, commands } => {
            debug!("Serializing path {} ({} commands)", label, commands.len());
            if config.comments {
                writer.write_comment(&format!("Path: {}", label));
            }
            for command in commands {
                let lines = serialize(command, ctx, config)?;
                writer.write_lines(lines);
            }
        }
        PathNode::Other { label } => {
            debug!("Skipping {}: no path data", label);
        }
    }
    Ok(())
}
