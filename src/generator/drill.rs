//! Canned drilling cycle expansion (G81, G82, G83) into G0/G1 moves.
//!
//! GRBL has no canned cycles, so each cycle is replayed as rapid and linear
//! moves in absolute coordinates. Only the XY plane (G17) is handled exactly:
//! with G18/G19 active the math still works on Z alone and a warning is logged.

use tracing::{debug, warn};

use crate::config::{PostConfig, FEED_PRECISION};
use crate::error::{PostError, Result};
use crate::model::{Command, DrillCycle, ParamCode};

use super::context::{MachineContext, MotionMode, Plane, RetractMode};
use super::format::{format_token, join_words, NumberFormat};

/// Rapid positioning command used in expansions.
const RAPID: &str = "G0";
/// Linear feed command used in expansions.
const LINEAR: &str = "G1";
/// Dwell command used in expansions.
const DWELL: &str = "G4";

/// Hole position and heights, resolved to absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedCycle {
    pub x: f64,
    pub y: f64,
    /// Final hole depth.
    pub z: f64,
    /// Effective retract plane.
    pub retract: f64,
    pub feed: f64,
}

/// Resolve the cycle target against the current motion and retract modes.
pub fn resolve_cycle(command: &Command, ctx: &MachineContext) -> Result<ResolvedCycle> {
    let x = required(command, ParamCode::X)?;
    let y = required(command, ParamCode::Y)?;
    let z = required(command, ParamCode::Z)?;
    let r = required(command, ParamCode::R)?;
    let feed = required(command, ParamCode::F)?;

    let mut resolved = match ctx.motion_mode {
        MotionMode::Absolute => ResolvedCycle {
            x,
            y,
            z,
            retract: r,
            feed,
        },
        MotionMode::Relative => {
            let prior_x = known(command, ctx.last_x, 'X')?;
            let prior_y = known(command, ctx.last_y, 'Y')?;
            let prior_z = known(command, ctx.last_z, 'Z')?;
            ResolvedCycle {
                x: prior_x + x,
                y: prior_y + y,
                z: prior_z + z,
                retract: prior_z + r,
                feed,
            }
        }
    };

    // G98 never retracts below where the tool already was
    if ctx.retract_mode == RetractMode::InitialHeight {
        if let Some(prior_z) = ctx.last_z {
            if prior_z >= resolved.retract {
                resolved.retract = prior_z;
            }
        }
    }

    Ok(resolved)
}

/// Expand a canned cycle into primitive moves.
///
/// The context is only read; the caller records the command's own axis words
/// afterwards. The commented original command is added by the serializer.
pub fn expand(
    command: &Command,
    cycle: DrillCycle,
    ctx: &MachineContext,
    config: &PostConfig,
) -> Result<Vec<String>> {
    for &code in cycle.required_params() {
        required(command, code)?;
    }

    if ctx.plane != Plane::Xy {
        warn!(
            "{} expanded with {:?} plane active: only XY-plane cycles are exact",
            command.name, ctx.plane
        );
    }

    let target = resolve_cycle(command, ctx)?;
    let relative = ctx.motion_mode == MotionMode::Relative;
    let prior_z = ctx.last_z;

    debug!(
        "Translating {} at X{} Y{} to Z{} (retract {})",
        cycle.name(),
        target.x,
        target.y,
        target.z,
        target.retract
    );

    let mut moves = Moves::new(config.precision);

    if relative {
        moves.push(MotionMode::Absolute.gcode());
    }

    // Approach: retract height first if below it, then the hole position
    if prior_z.map_or(true, |z| z < target.retract) {
        moves.rapid_z(target.retract);
    }
    moves.rapid_xy(target.x, target.y);
    if prior_z.is_some_and(|z| z > target.retract) {
        moves.rapid_z(target.retract);
    }

    match cycle {
        DrillCycle::Simple => {
            moves.feed_z(target.z, target.feed);
            moves.rapid_z(target.retract);
        }
        DrillCycle::Dwell => {
            moves.feed_z(target.z, target.feed);
            moves.dwell(required(command, ParamCode::P)?);
            moves.rapid_z(target.retract);
        }
        DrillCycle::Peck => {
            let step = required(command, ParamCode::Q)?;
            if step.is_nan() || step <= 0.0 {
                return Err(PostError::InvalidPeckStep { step });
            }

            // Stops are computed from the retract plane, not accumulated, and
            // compared at output precision so the last one never repeats the depth
            let depth = round_to(target.z, config.precision);
            let mut pecks: u32 = 1;
            loop {
                let stop = target.retract - f64::from(pecks) * step;
                if round_to(stop, config.precision) <= depth {
                    break;
                }
                moves.feed_z(stop, target.feed);
                moves.rapid_z(target.retract);
                pecks += 1;
            }
            moves.feed_z(target.z, target.feed);
            moves.rapid_z(target.retract);
        }
    }

    if relative {
        moves.push(MotionMode::Relative.gcode());
    }

    Ok(moves.lines)
}

fn required(command: &Command, code: ParamCode) -> Result<f64> {
    command
        .param(code)
        .ok_or_else(|| PostError::MissingParameter {
            command: command.name.clone(),
            param: code.letter(),
        })
}

/// Round a value to the number of fractional digits it is printed with.
fn round_to(value: f64, precision: usize) -> f64 {
    let scale = 10f64.powi(precision as i32);
    (value * scale).round() / scale
}

fn known(command: &Command, value: Option<f64>, axis: char) -> Result<f64> {
    value.ok_or_else(|| PostError::UnknownPosition {
        command: command.name.clone(),
        axis,
    })
}

/// Accumulates expansion lines.
struct Moves {
    precision: usize,
    lines: Vec<String>,
}

impl Moves {
    fn new(precision: usize) -> Self {
        Self {
            precision,
            lines: Vec::new(),
        }
    }

    fn push(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn coord(&self, letter: char, value: f64) -> String {
        format_token(letter, value, NumberFormat::Fixed(self.precision))
    }

    fn rapid_z(&mut self, z: f64) {
        let line = join_words(&[RAPID.to_string(), self.coord('Z', z)]);
        self.lines.push(line);
    }

    fn rapid_xy(&mut self, x: f64, y: f64) {
        let line = join_words(&[RAPID.to_string(), self.coord('X', x), self.coord('Y', y)]);
        self.lines.push(line);
    }

    fn feed_z(&mut self, z: f64, feed: f64) {
        let line = join_words(&[
            LINEAR.to_string(),
            self.coord('Z', z),
            format_token('F', feed, NumberFormat::Fixed(FEED_PRECISION)),
        ]);
        self.lines.push(line);
    }

    fn dwell(&mut self, seconds: f64) {
        let line = join_words(&[DWELL.to_string(), self.coord('P', seconds)]);
        self.lines.push(line);
    }
}
