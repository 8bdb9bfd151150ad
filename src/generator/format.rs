//! Number and word formatting for G-code output.

use crate::config::COMMAND_SPACE;

/// How a numeric value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    /// Fixed-point with the given number of fractional digits.
    Fixed(usize),
    /// Plain integer, no decimal point.
    Integer,
}

/// Format a value with exactly `precision` fractional digits.
pub fn format_number(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, value)
}

/// Format a parameter word such as `X12.700` or `T3`.
pub fn format_token(letter: char, value: f64, format: NumberFormat) -> String {
    match format {
        NumberFormat::Fixed(precision) => format!("{}{}", letter, format_number(value, precision)),
        NumberFormat::Integer => format!("{}{}", letter, value.round() as i64),
    }
}

/// Join words into one output line.
pub fn join_line<S: AsRef<str>>(tokens: &[S], separator: &str) -> String {
    let mut line = String::new();
    for token in tokens {
        line.push_str(token.as_ref());
        line.push_str(separator);
    }
    line.trim().to_string()
}

/// Join words with the standard command separator.
pub fn join_words<S: AsRef<str>>(tokens: &[S]) -> String {
    join_line(tokens, COMMAND_SPACE)
}

/// Wrap text in a G-code comment.
///
/// Parentheses inside the text would end the comment early, so they become brackets.
pub fn comment(text: &str) -> String {
    format!("({})", text.replace('(', "[").replace(')', "]"))
}
