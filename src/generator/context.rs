//! Machine state threaded through serialization.

use crate::model::{ParamCode, Parameters};

/// Interpretation of axis words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionMode {
    /// G90.
    #[default]
    Absolute,
    /// G91.
    Relative,
}

impl MotionMode {
    /// The G-code selecting this mode.
    pub fn gcode(self) -> &'static str {
        match self {
            MotionMode::Absolute => "G90",
            MotionMode::Relative => "G91",
        }
    }
}

/// Where canned cycles retract to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetractMode {
    /// G98: back to the initial height, never below the R plane.
    #[default]
    InitialHeight,
    /// G99: back to the R plane.
    RPlane,
}

/// Active working plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Plane {
    /// G17.
    #[default]
    Xy,
    /// G18.
    Zx,
    /// G19.
    Yz,
}

/// Mutable machine state for one export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MachineContext {
    /// Last commanded X, unset until first specified.
    pub last_x: Option<f64>,
    /// Last commanded Y.
    pub last_y: Option<f64>,
    /// Last commanded Z.
    pub last_z: Option<f64>,
    /// Absolute or relative motion.
    pub motion_mode: MotionMode,
    /// Canned cycle retract mode.
    pub retract_mode: RetractMode,
    /// Working plane.
    pub plane: Plane,
    /// Name of the previous command, for modal suppression.
    pub last_command: Option<String>,
}

impl MachineContext {
    /// Create a context in the power-on state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the axis words of a command.
    ///
    /// Stores the raw commanded values; axes the command does not mention keep
    /// their previous value.
    pub fn record_position(&mut self, params: &Parameters) {
        if let Some(x) = params.get(ParamCode::X) {
            self.last_x = Some(x);
        }
        if let Some(y) = params.get(ParamCode::Y) {
            self.last_y = Some(y);
        }
        if let Some(z) = params.get(ParamCode::Z) {
            self.last_z = Some(z);
        }
    }
}
