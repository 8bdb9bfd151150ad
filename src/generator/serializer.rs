//! Command serialization: one tool path command to zero or more G-code lines.

use crate::config::{PostConfig, COMMENT_MARKER};
use crate::error::Result;
use crate::model::{Command, CommandKind, ParamCode};

use super::context::MachineContext;
use super::drill;
use super::format::{comment, format_token, join_words};

/// Serialize one command, updating the machine context.
///
/// Returned lines carry no line number and no terminator; the caller writes
/// them through a [`GcodeWriter`](super::GcodeWriter) in order.
pub fn serialize(
    command: &Command,
    ctx: &mut MachineContext,
    config: &PostConfig,
) -> Result<Vec<String>> {
    let name = command.name.as_str();
    let kind = CommandKind::classify(name, config);

    let mut words = vec![name.to_string()];
    if config.modal && ctx.last_command.as_deref() == Some(name) {
        words.clear();
    }
    words.extend(parameter_words(command, kind, config));

    ctx.last_command = Some(name.to_string());

    match kind {
        CommandKind::MotionMode(mode) => ctx.motion_mode = mode,
        CommandKind::RetractMode(mode) => ctx.retract_mode = mode,
        CommandKind::PlaneSelect(plane) => ctx.plane = plane,
        _ => {}
    }

    let mut lines = Vec::new();

    if let CommandKind::CannedCycle(cycle) = kind {
        if config.translate_drill {
            let expansion = drill::expand(command, cycle, ctx, config)?;
            if config.comments {
                lines.push(comment(&join_words(&words)));
            }
            lines.extend(expansion);
            words.clear();
        }
    }

    // Axis tracking always follows the command as written, never the expansion
    ctx.record_position(&command.parameters);

    match kind {
        CommandKind::ToolChange => {
            if config.comments {
                lines.push(comment("begin toolchange"));
            }
            if config.output_tool_change {
                lines.extend(config.tool_change.lines().map(str::to_string));
            } else {
                words.insert(0, COMMENT_MARKER.to_string());
            }
        }
        CommandKind::Message => {
            if !config.comments {
                return Ok(Vec::new());
            }
            words.clear();
            if let Some(text) = command.text.as_deref() {
                words.push(comment(text));
            }
        }
        _ => {}
    }

    if config.is_suppressed(name) {
        words.insert(0, COMMENT_MARKER.to_string());
    }

    if !words.is_empty() {
        lines.push(join_words(&words));
    }

    Ok(lines)
}

/// Parameter words of a command in emission order.
fn parameter_words(command: &Command, kind: CommandKind, config: &PostConfig) -> Vec<String> {
    command
        .parameters
        .iter()
        .filter(|&(code, _)| !(code == ParamCode::F && kind == CommandKind::Rapid))
        .map(|(code, value)| {
            format_token(code.letter(), value, code.number_format(config.precision))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{MotionMode, RetractMode};
    use pretty_assertions::assert_eq;
    use ParamCode::*;

    fn run(commands: &[Command], config: &PostConfig) -> Vec<String> {
        let mut ctx = MachineContext::new();
        commands
            .iter()
            .flat_map(|c| serialize(c, &mut ctx, config).unwrap())
            .collect()
    }

    #[test]
    fn test_feed_omitted_on_rapid_moves() {
        let config = PostConfig::default();
        let lines = run(
            &[
                Command::with_params("G0", &[(X, 1.0), (F, 500.0)]),
                Command::with_params("G00", &[(Y, 2.0), (F, 500.0)]),
                Command::with_params("G1", &[(X, 3.0), (F, 500.0)]),
            ],
            &config,
        );
        assert_eq!(lines, vec!["G0 X1.000", "G00 Y2.000", "G1 X3.000 F500.00"]);
    }

    #[test]
    fn test_canonical_parameter_order() {
        let config = PostConfig::default();
        let cmd = Command::with_params(
            "G2",
            &[(F, 10.0), (J, 0.5), (I, -0.5), (Z, 1.0), (Y, 2.0), (X, 3.0)],
        );
        assert_eq!(
            run(&[cmd], &config),
            vec!["G2 X3.000 Y2.000 Z1.000 I-0.500 J0.500 F10.00"]
        );
    }

    #[test]
    fn test_tool_number_is_integer() {
        let config = PostConfig {
            comments: false,
            output_tool_change: true,
            ..Default::default()
        };
        let lines = run(&[Command::with_params("M6", &[(T, 2.0)])], &config);
        assert_eq!(lines, vec!["M6 T2"]);
    }

    #[test]
    fn test_modal_suppression() {
        let cmds = [
            Command::with_params("G1", &[(X, 1.0)]),
            Command::with_params("G1", &[(X, 2.0)]),
            Command::with_params("G0", &[(Z, 5.0)]),
            Command::with_params("G1", &[(X, 3.0)]),
        ];

        let modal = PostConfig {
            modal: true,
            ..Default::default()
        };
        assert_eq!(
            run(&cmds, &modal),
            vec!["G1 X1.000", "X2.000", "G0 Z5.000", "G1 X3.000"]
        );

        let plain = PostConfig::default();
        assert_eq!(
            run(&cmds, &plain),
            vec!["G1 X1.000", "G1 X2.000", "G0 Z5.000", "G1 X3.000"]
        );
    }

    #[test]
    fn test_suppressed_commands_are_commented_out() {
        let config = PostConfig::default();
        let lines = run(&[Command::new("G98"), Command::new("G80"), Command::new("G99")], &config);
        assert_eq!(lines, vec!["; G98", "; G80", "G99"]);
    }

    #[test]
    fn test_mode_tracking() {
        let config = PostConfig::default();
        let mut ctx = MachineContext::new();
        serialize(&Command::new("G91"), &mut ctx, &config).unwrap();
        serialize(&Command::new("G99"), &mut ctx, &config).unwrap();
        assert_eq!(ctx.motion_mode, MotionMode::Relative);
        assert_eq!(ctx.retract_mode, RetractMode::RPlane);
        assert_eq!(ctx.last_command.as_deref(), Some("G99"));
    }

    #[test]
    fn test_tool_change_commented_out_by_default() {
        let config = PostConfig::default();
        let lines = run(&[Command::with_params("M6", &[(T, 3.0)])], &config);
        assert_eq!(lines, vec!["(begin toolchange)", "; M6 T3"]);
    }

    #[test]
    fn test_tool_change_text_precedes_command() {
        let config = PostConfig {
            output_tool_change: true,
            tool_change: "M5\nG0 Z20".to_string(),
            ..Default::default()
        };
        let lines = run(&[Command::with_params("M6", &[(T, 1.0)])], &config);
        assert_eq!(lines, vec!["(begin toolchange)", "M5", "G0 Z20", "M6 T1"]);
    }

    #[test]
    fn test_message() {
        let cmds = [
            Command::with_params("G0", &[(Z, 5.0)]),
            Command::message("check clamps"),
            Command::with_params("G1", &[(Z, 0.0)]),
        ];

        let with_comments = PostConfig::default();
        assert_eq!(
            run(&cmds, &with_comments),
            vec!["G0 Z5.000", "(check clamps)", "G1 Z0.000"]
        );

        // Only the message itself disappears
        let without_comments = PostConfig {
            comments: false,
            ..Default::default()
        };
        assert_eq!(run(&cmds, &without_comments), vec!["G0 Z5.000", "G1 Z0.000"]);
    }

    #[test]
    fn test_drill_translation_with_comment() {
        let config = PostConfig::default();
        let mut ctx = MachineContext::new();
        serialize(&Command::with_params("G0", &[(Z, 0.0)]), &mut ctx, &config).unwrap();

        let cmd = Command::with_params(
            "G81",
            &[(X, 10.0), (Y, 5.0), (Z, -3.0), (R, 2.0), (F, 100.0)],
        );
        let lines = serialize(&cmd, &mut ctx, &config).unwrap();

        assert_eq!(
            lines,
            vec![
                "(G81 X10.000 Y5.000 Z-3.000 F100.00 R2.000)",
                "G0 Z2.000",
                "G0 X10.000 Y5.000",
                "G1 Z-3.000 F100.00",
                "G0 Z2.000",
            ]
        );
        // the drilled depth, not the retract height
        assert_eq!(ctx.last_z, Some(-3.0));
        assert_eq!(ctx.last_x, Some(10.0));
        assert_eq!(ctx.last_command.as_deref(), Some("G81"));
    }

    #[test]
    fn test_drill_translation_without_comment() {
        let config = PostConfig {
            comments: false,
            ..Default::default()
        };
        let cmd = Command::with_params(
            "G81",
            &[(X, 1.0), (Y, 1.0), (Z, -1.0), (R, 1.0), (F, 10.0)],
        );
        let lines = run(&[cmd], &config);
        assert!(lines.iter().all(|l| !l.starts_with('(')));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_drill_passthrough_when_translation_disabled() {
        let config = PostConfig {
            translate_drill: false,
            ..Default::default()
        };
        let cmd = Command::with_params(
            "G81",
            &[(X, 1.0), (Y, 1.0), (Z, -1.0), (R, 1.0), (F, 10.0)],
        );
        assert_eq!(
            run(&[cmd], &config),
            vec!["G81 X1.000 Y1.000 Z-1.000 F10.00 R1.000"]
        );
    }

    #[test]
    fn test_position_tracked_for_every_command() {
        let config = PostConfig {
            translate_drill: false,
            ..Default::default()
        };
        let mut ctx = MachineContext::new();
        serialize(&Command::with_params("G1", &[(X, 4.0), (Z, -1.0)]), &mut ctx, &config)
            .unwrap();
        serialize(&Command::with_params("G0", &[(Y, 7.0)]), &mut ctx, &config).unwrap();
        assert_eq!((ctx.last_x, ctx.last_y, ctx.last_z), (Some(4.0), Some(7.0), Some(-1.0)));
    }
}
