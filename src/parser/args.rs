//! Post-processor argument string parsing.
//!
//! The host hands over a single string such as
//! `--no-header --precision 4 --preamble "G17\nG90"`. It is split the way a
//! POSIX shell would and then parsed with clap.

use clap::Parser;

use crate::config::{MachineConfig, PostConfig, DEFAULT_PRECISION, MAX_PRECISION};
use crate::error::{PostError, Result};

/// Options accepted in the post-processor argument string.
#[derive(Parser, Debug)]
#[command(
    name = "grbl",
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct PostArgs {
    /// Output headers (default)
    #[arg(long)]
    pub header: bool,

    /// Suppress header output
    #[arg(long)]
    pub no_header: bool,

    /// Output comments (default)
    #[arg(long)]
    pub comments: bool,

    /// Suppress comment output
    #[arg(long)]
    pub no_comments: bool,

    /// Prefix with line numbers
    #[arg(long)]
    pub line_numbers: bool,

    /// Don't prefix with line numbers (default)
    #[arg(long)]
    pub no_line_numbers: bool,

    /// Pop up editor before writing output (default)
    #[arg(long)]
    pub show_editor: bool,

    /// Don't pop up editor before writing output
    #[arg(long)]
    pub no_show_editor: bool,

    /// Number of digits of precision
    #[arg(long, default_value_t = DEFAULT_PRECISION, value_parser = parse_precision)]
    pub precision: usize,

    /// Commands to be issued before the first command
    #[arg(long, allow_hyphen_values = true)]
    pub preamble: Option<String>,

    /// Commands to be issued after the last command
    #[arg(long, allow_hyphen_values = true)]
    pub postamble: Option<String>,

    /// Translate drill cycles G81, G82 & G83 into G0/G1 movements (default)
    #[arg(long = "translate_drill")]
    pub translate_drill: bool,

    /// Don't translate drill cycles G81, G82 & G83 into G0/G1 movements
    #[arg(long = "no-translate_drill")]
    pub no_translate_drill: bool,

    /// Drop repeated command words
    #[arg(long)]
    pub modal: bool,

    /// Always write the command word (default)
    #[arg(long)]
    pub no_modal: bool,

    /// Emit tool change commands
    #[arg(long)]
    pub tool_change: bool,

    /// Comment out tool change commands (default)
    #[arg(long)]
    pub no_tool_change: bool,
}

impl PostArgs {
    /// Parse an argument string.
    pub fn parse_str(argstring: &str) -> Result<Self> {
        let words = split_args(argstring)?;
        PostArgs::try_parse_from(words).map_err(|e| PostError::InvalidArguments {
            message: e.to_string().trim().to_string(),
        })
    }
}

impl PostConfig {
    /// Build the configuration for one export.
    pub fn from_args(argstring: &str, machine: &MachineConfig) -> Result<Self> {
        let mut config = PostConfig {
            units: machine.units,
            ..Default::default()
        };
        config.apply_args(argstring)?;
        Ok(config)
    }

    /// Apply an argument string on top of the current settings.
    ///
    /// When both forms of a switch are given the positive one wins.
    pub fn apply_args(&mut self, argstring: &str) -> Result<()> {
        let args = PostArgs::parse_str(argstring)?;

        apply_switch(&mut self.header, args.header, args.no_header);
        apply_switch(&mut self.comments, args.comments, args.no_comments);
        apply_switch(&mut self.line_numbers, args.line_numbers, args.no_line_numbers);
        apply_switch(&mut self.show_editor, args.show_editor, args.no_show_editor);
        apply_switch(&mut self.translate_drill, args.translate_drill, args.no_translate_drill);
        apply_switch(&mut self.modal, args.modal, args.no_modal);
        apply_switch(&mut self.output_tool_change, args.tool_change, args.no_tool_change);

        self.precision = args.precision;
        if let Some(preamble) = args.preamble {
            self.preamble = unescape_newlines(&preamble);
        }
        if let Some(postamble) = args.postamble {
            self.postamble = unescape_newlines(&postamble);
        }

        tracing::debug!(
            "Post arguments: precision={} translate_drill={} line_numbers={}",
            self.precision,
            self.translate_drill,
            self.line_numbers
        );
        Ok(())
    }
}

fn apply_switch(target: &mut bool, on: bool, off: bool) {
    if off {
        *target = false;
    }
    if on {
        *target = true;
    }
}

fn parse_precision(s: &str) -> std::result::Result<usize, String> {
    let value: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number of digits", s))?;
    if value > MAX_PRECISION {
        return Err(format!("precision must be at most {}", MAX_PRECISION));
    }
    Ok(value)
}

/// Turn literal `\n` sequences into line breaks.
fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

/// Split a string into words using POSIX shell quoting rules.
pub fn split_args(input: &str) -> Result<Vec<String>> {
    shlex::split(input).ok_or_else(|| PostError::InvalidArguments {
        message: format!("unbalanced quoting in '{}'", input),
    })
}
