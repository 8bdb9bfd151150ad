//! Configuration constants and settings for the post-processor.

/// Default number of fractional digits for coordinates.
pub const DEFAULT_PRECISION: usize = 3;

/// Fractional digits for feed rates, independent of the coordinate precision.
pub const FEED_PRECISION: usize = 2;

/// Line number counter starting value. The first numbered line is base + step.
pub const LINE_NUMBER_BASE: u32 = 100;

/// Line number increment.
pub const LINE_NUMBER_STEP: u32 = 10;

/// Separator between words on an output line.
pub const COMMAND_SPACE: &str = " ";

/// Marker prepended to lines that are commented out instead of dropped.
pub const COMMENT_MARKER: &str = ";";

/// Commands issued before the first operation.
pub const DEFAULT_PREAMBLE: &str = "G17\nG90";

/// Commands issued after the last operation.
pub const DEFAULT_POSTAMBLE: &str = "M5\nG17 G90\nM2";

/// Commands treated as rapid (non-cutting) moves.
pub const RAPID_MOVES: [&str; 2] = ["G0", "G00"];

/// Commands GRBL does not understand; they are commented out.
pub const SUPPRESS_COMMANDS: [&str; 2] = ["G98", "G80"];

/// Name reported in the output header.
pub const POST_PROCESSOR_NAME: &str = "grbl_post";

/// Generator reported in the output header.
pub const GENERATOR_NAME: &str = concat!("grbl-post ", env!("CARGO_PKG_VERSION"));

/// Highest accepted coordinate precision.
pub const MAX_PRECISION: usize = 12;

/// Unit system of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    /// Parse a unit system name.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "mm" => Some(Units::Metric),
            "imperial" | "inch" | "in" => Some(Units::Imperial),
            _ => None,
        }
    }

    /// Get the G-code selecting this unit system.
    pub fn gcode(&self) -> &'static str {
        match self {
            Units::Metric => "G21",
            Units::Imperial => "G20",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Units::Metric => write!(f, "metric"),
            Units::Imperial => write!(f, "imperial"),
        }
    }
}

/// Machine settings owned by the host rather than the post-processor arguments.
#[derive(Debug, Clone, Default)]
pub struct MachineConfig {
    /// Unit system declared after the preamble.
    pub units: Units,
}

impl MachineConfig {
    /// Create a machine configuration with the given units.
    pub fn new(units: Units) -> Self {
        Self { units }
    }
}

/// Everything the serializer and document generator read.
///
/// Built once per export from the argument string and the machine settings,
/// then passed by reference; nothing here changes while the export runs.
#[derive(Debug, Clone)]
pub struct PostConfig {
    /// Emit the header comment block.
    pub header: bool,
    /// Emit comments (operation markers, translated cycles, messages).
    pub comments: bool,
    /// Prefix every line with `N<counter>`.
    pub line_numbers: bool,
    /// Offer the generated text to the review step before writing.
    pub show_editor: bool,
    /// Fractional digits for coordinates and most parameters.
    pub precision: usize,
    /// Text issued before the first operation.
    pub preamble: String,
    /// Text issued after the last operation.
    pub postamble: String,
    /// Expand G81/G82/G83 into G0/G1 moves.
    pub translate_drill: bool,
    /// Drop the command word when it repeats the previous command.
    pub modal: bool,
    /// Emit tool change commands instead of commenting them out.
    pub output_tool_change: bool,
    /// Commands treated as rapid moves (feed rate omitted).
    pub rapid_moves: Vec<String>,
    /// Commands commented out on output.
    pub suppress_commands: Vec<String>,
    /// Text inserted before every operation.
    pub pre_operation: String,
    /// Text inserted after every operation.
    pub post_operation: String,
    /// Text inserted before a tool change when tool changes are emitted.
    pub tool_change: String,
    /// Unit system declared after the preamble.
    pub units: Units,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            header: true,
            comments: true,
            line_numbers: false,
            show_editor: true,
            precision: DEFAULT_PRECISION,
            preamble: DEFAULT_PREAMBLE.to_string(),
            postamble: DEFAULT_POSTAMBLE.to_string(),
            translate_drill: true,
            modal: false,
            output_tool_change: false,
            rapid_moves: RAPID_MOVES.iter().map(|s| s.to_string()).collect(),
            suppress_commands: SUPPRESS_COMMANDS.iter().map(|s| s.to_string()).collect(),
            pre_operation: String::new(),
            post_operation: String::new(),
            tool_change: String::new(),
            units: Units::Metric,
        }
    }
}

impl PostConfig {
    /// Check if a command is a rapid move.
    pub fn is_rapid(&self, name: &str) -> bool {
        self.rapid_moves.iter().any(|r| r == name)
    }

    /// Check if a command is commented out on output.
    pub fn is_suppressed(&self, name: &str) -> bool {
        self.suppress_commands.iter().any(|s| s == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units() {
        assert_eq!(Units::from_name("mm"), Some(Units::Metric));
        assert_eq!(Units::from_name(" Imperial "), Some(Units::Imperial));
        assert_eq!(Units::from_name("furlong"), None);
        assert_eq!(Units::Metric.gcode(), "G21");
        assert_eq!(Units::Imperial.gcode(), "G20");
    }

    #[test]
    fn test_default_post_config() {
        let config = PostConfig::default();
        assert!(config.header);
        assert!(config.comments);
        assert!(!config.line_numbers);
        assert!(config.translate_drill);
        assert_eq!(config.precision, 3);
        assert!(config.is_rapid("G0"));
        assert!(config.is_rapid("G00"));
        assert!(!config.is_rapid("G1"));
        assert!(config.is_suppressed("G98"));
        assert!(config.is_suppressed("G80"));
        assert!(!config.is_suppressed("G99"));
    }
}
