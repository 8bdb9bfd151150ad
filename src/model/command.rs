//! Tool path commands and their parameters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::{PostConfig, FEED_PRECISION};
use crate::generator::{MotionMode, NumberFormat, Plane, RetractMode};

/// Parameter letters understood by the post-processor.
///
/// Declaration order is the emission order on every output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamCode {
    X,
    Y,
    Z,
    A,
    B,
    I,
    J,
    F,
    S,
    T,
    Q,
    R,
    L,
    P,
}

impl ParamCode {
    /// All codes in emission order.
    pub const ORDER: [ParamCode; 14] = [
        ParamCode::X,
        ParamCode::Y,
        ParamCode::Z,
        ParamCode::A,
        ParamCode::B,
        ParamCode::I,
        ParamCode::J,
        ParamCode::F,
        ParamCode::S,
        ParamCode::T,
        ParamCode::Q,
        ParamCode::R,
        ParamCode::L,
        ParamCode::P,
    ];

    /// Parse a parameter letter (case-insensitive).
    pub fn from_letter(c: char) -> Option<Self> {
        let upper = c.to_ascii_uppercase();
        Self::ORDER.into_iter().find(|code| code.letter() == upper)
    }

    /// The letter written on output.
    pub fn letter(self) -> char {
        match self {
            ParamCode::X => 'X',
            ParamCode::Y => 'Y',
            ParamCode::Z => 'Z',
            ParamCode::A => 'A',
            ParamCode::B => 'B',
            ParamCode::I => 'I',
            ParamCode::J => 'J',
            ParamCode::F => 'F',
            ParamCode::S => 'S',
            ParamCode::T => 'T',
            ParamCode::Q => 'Q',
            ParamCode::R => 'R',
            ParamCode::L => 'L',
            ParamCode::P => 'P',
        }
    }

    /// How values of this parameter are rendered.
    pub fn number_format(self, precision: usize) -> NumberFormat {
        match self {
            ParamCode::F => NumberFormat::Fixed(FEED_PRECISION),
            ParamCode::T => NumberFormat::Integer,
            _ => NumberFormat::Fixed(precision),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Parameter values of one command, keyed by [`ParamCode`].
///
/// Absent means "not specified", which is different from zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, f64>",
    into = "BTreeMap<String, f64>"
)]
pub struct Parameters {
    values: [Option<f64>; 14],
}

impl Parameters {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, code: ParamCode, value: f64) -> Self {
        self.set(code, value);
        self
    }

    /// Get a parameter value.
    pub fn get(&self, code: ParamCode) -> Option<f64> {
        self.values[code.index()]
    }

    /// Set a parameter value.
    pub fn set(&mut self, code: ParamCode, value: f64) {
        self.values[code.index()] = Some(value);
    }

    /// Present parameters in emission order.
    pub fn iter(&self) -> impl Iterator<Item = (ParamCode, f64)> + '_ {
        ParamCode::ORDER
            .into_iter()
            .filter_map(|code| self.get(code).map(|v| (code, v)))
    }

    /// Check if no parameter is present.
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}

impl From<BTreeMap<String, f64>> for Parameters {
    fn from(map: BTreeMap<String, f64>) -> Self {
        let mut params = Parameters::new();
        for (key, value) in map {
            let mut chars = key.chars();
            match (chars.next().and_then(ParamCode::from_letter), chars.next()) {
                (Some(code), None) => params.set(code, value),
                _ => tracing::warn!("Ignoring unsupported parameter {}={}", key, value),
            }
        }
        params
    }
}

impl From<Parameters> for BTreeMap<String, f64> {
    fn from(params: Parameters) -> Self {
        params
            .iter()
            .map(|(code, value)| (code.letter().to_string(), value))
            .collect()
    }
}

/// One tool path command: a name plus its parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Command word, e.g. "G1", "G81", "M6" or "message".
    pub name: String,
    /// Parameter values.
    #[serde(default, skip_serializing_if = "Parameters::is_empty")]
    pub parameters: Parameters,
    /// Free text carried by the `message` pseudo-command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Command {
    /// Create a command without parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create a command with parameters.
    pub fn with_params(name: impl Into<String>, params: &[(ParamCode, f64)]) -> Self {
        let mut parameters = Parameters::new();
        for &(code, value) in params {
            parameters.set(code, value);
        }
        Self {
            name: name.into(),
            parameters,
            text: None,
        }
    }

    /// Create a `message` pseudo-command.
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            name: MESSAGE.to_string(),
            parameters: Parameters::new(),
            text: Some(text.into()),
        }
    }

    /// Get a parameter value.
    pub fn param(&self, code: ParamCode) -> Option<f64> {
        self.parameters.get(code)
    }
}

/// Name of the message pseudo-command.
pub const MESSAGE: &str = "message";

/// Canned drilling cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillCycle {
    /// G81: drill to depth, retract.
    Simple,
    /// G82: drill to depth, dwell, retract.
    Dwell,
    /// G83: peck drill.
    Peck,
}

impl DrillCycle {
    /// Parse a canned cycle command word.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "G81" => Some(DrillCycle::Simple),
            "G82" => Some(DrillCycle::Dwell),
            "G83" => Some(DrillCycle::Peck),
            _ => None,
        }
    }

    /// The command word of this cycle.
    pub fn name(self) -> &'static str {
        match self {
            DrillCycle::Simple => "G81",
            DrillCycle::Dwell => "G82",
            DrillCycle::Peck => "G83",
        }
    }

    /// Parameters the expansion cannot do without.
    pub fn required_params(self) -> &'static [ParamCode] {
        use ParamCode::*;
        match self {
            DrillCycle::Simple => &[X, Y, Z, R, F],
            DrillCycle::Dwell => &[X, Y, Z, R, F, P],
            DrillCycle::Peck => &[X, Y, Z, R, F, Q],
        }
    }
}

/// What a command means to the serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Non-cutting positioning move.
    Rapid,
    /// G90 / G91.
    MotionMode(MotionMode),
    /// G98 / G99.
    RetractMode(RetractMode),
    /// G17 / G18 / G19.
    PlaneSelect(Plane),
    /// G81 / G82 / G83.
    CannedCycle(DrillCycle),
    /// M6.
    ToolChange,
    /// Comment text, not a machine command.
    Message,
    /// Anything else, emitted as given.
    Passthrough,
}

impl CommandKind {
    /// Classify a command word.
    pub fn classify(name: &str, config: &PostConfig) -> Self {
        if name == MESSAGE {
            return CommandKind::Message;
        }
        if config.is_rapid(name) {
            return CommandKind::Rapid;
        }
        if let Some(cycle) = DrillCycle::from_name(name) {
            return CommandKind::CannedCycle(cycle);
        }
        match name {
            "G90" => CommandKind::MotionMode(MotionMode::Absolute),
            "G91" => CommandKind::MotionMode(MotionMode::Relative),
            "G98" => CommandKind::RetractMode(RetractMode::InitialHeight),
            "G99" => CommandKind::RetractMode(RetractMode::RPlane),
            "G17" => CommandKind::PlaneSelect(Plane::Xy),
            "G18" => CommandKind::PlaneSelect(Plane::Zx),
            "G19" => CommandKind::PlaneSelect(Plane::Yz),
            "M6" | "M06" => CommandKind::ToolChange,
            _ => CommandKind::Passthrough,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_order_is_canonical() {
        let params = Parameters::new()
            .with(ParamCode::P, 1.0)
            .with(ParamCode::F, 100.0)
            .with(ParamCode::X, 2.0)
            .with(ParamCode::R, 3.0);
        let order: Vec<char> = params.iter().map(|(c, _)| c.letter()).collect();
        assert_eq!(order, vec!['X', 'F', 'R', 'P']);
    }

    #[test]
    fn test_param_from_letter() {
        assert_eq!(ParamCode::from_letter('x'), Some(ParamCode::X));
        assert_eq!(ParamCode::from_letter('Q'), Some(ParamCode::Q));
        assert_eq!(ParamCode::from_letter('K'), None);
    }

    #[test]
    fn test_parameters_deserialize() {
        let params: Parameters = serde_json::from_str(r#"{"x": 1.5, "Z": -2, "K": 4}"#).unwrap();
        assert_eq!(params.get(ParamCode::X), Some(1.5));
        assert_eq!(params.get(ParamCode::Z), Some(-2.0));
        assert_eq!(params.get(ParamCode::Y), None);
        assert_eq!(params.iter().count(), 2);
    }

    #[test]
    fn test_command_deserialize() {
        let cmd: Command =
            serde_json::from_str(r#"{"name": "G1", "parameters": {"X": 10, "F": 200}}"#).unwrap();
        assert_eq!(cmd.name, "G1");
        assert_eq!(cmd.param(ParamCode::F), Some(200.0));
        assert!(cmd.text.is_none());

        let msg: Command = serde_json::from_str(r#"{"name": "message", "text": "hi"}"#).unwrap();
        assert!(msg.parameters.is_empty());
        assert_eq!(msg.text.as_deref(), Some("hi"));
    }

    #[test]
    fn test_classify() {
        let config = PostConfig::default();
        assert_eq!(CommandKind::classify("G0", &config), CommandKind::Rapid);
        assert_eq!(CommandKind::classify("G1", &config), CommandKind::Passthrough);
        assert_eq!(
            CommandKind::classify("G91", &config),
            CommandKind::MotionMode(MotionMode::Relative)
        );
        assert_eq!(
            CommandKind::classify("G99", &config),
            CommandKind::RetractMode(RetractMode::RPlane)
        );
        assert_eq!(
            CommandKind::classify("G83", &config),
            CommandKind::CannedCycle(DrillCycle::Peck)
        );
        assert_eq!(CommandKind::classify("M6", &config), CommandKind::ToolChange);
        assert_eq!(CommandKind::classify("message", &config), CommandKind::Message);
    }

    #[test]
    fn test_required_params() {
        assert!(DrillCycle::Peck.required_params().contains(&ParamCode::Q));
        assert!(!DrillCycle::Simple.required_params().contains(&ParamCode::P));
        assert_eq!(DrillCycle::from_name("G82"), Some(DrillCycle::Dwell));
        assert_eq!(DrillCycle::Dwell.name(), "G82");
    }
}
