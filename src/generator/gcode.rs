//! G-code output buffer with line numbering.

use crate::config::{LINE_NUMBER_BASE, LINE_NUMBER_STEP};

use super::format::comment;

/// G-code writer with optional line numbering.
///
/// The counter is advanced before each numbered line, so with the default
/// base the first line is `N110`. It is never reset while the writer lives.
pub struct GcodeWriter {
    /// Whether lines get an `N` prefix.
    numbering: bool,
    /// Last line number handed out.
    line_number: u32,
    /// Line number increment.
    increment: u32,
    /// Output buffer.
    buffer: String,
}

impl GcodeWriter {
    /// Create a new G-code writer.
    pub fn new(numbering: bool) -> Self {
        Self::with_start(numbering, LINE_NUMBER_BASE)
    }

    /// Create a new G-code writer counting from a specific base.
    pub fn with_start(numbering: bool, start: u32) -> Self {
        Self {
            numbering,
            line_number: start,
            increment: LINE_NUMBER_STEP,
            buffer: String::new(),
        }
    }

    /// Get the last line number handed out.
    pub fn current_line(&self) -> u32 {
        self.line_number
    }

    /// Get the generated G-code.
    pub fn output(&self) -> &str {
        &self.buffer
    }

    /// Take the generated G-code.
    pub fn take_output(self) -> String {
        self.buffer
    }

    /// Next line prefix: `N<counter> ` when numbering, empty otherwise.
    pub fn next_line_number(&mut self) -> String {
        if !self.numbering {
            return String::new();
        }
        self.line_number += self.increment;
        format!("N{} ", self.line_number)
    }

    /// Write a (possibly numbered) line.
    pub fn write_line(&mut self, content: &str) {
        let prefix = self.next_line_number();
        self.buffer.push_str(&prefix);
        self.buffer.push_str(content);
        self.buffer.push('\n');
    }

    /// Write several lines in order.
    pub fn write_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.write_line(line.as_ref());
        }
    }

    /// Write a comment line.
    pub fn write_comment(&mut self, text: &str) {
        self.write_line(&comment(text));
    }

    /// Write every line of a multi-line text block (preamble, postamble...).
    pub fn write_block(&mut self, text: &str) {
        self.write_lines(text.lines());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_numbers() {
        let mut writer = GcodeWriter::new(true);
        writer.write_line("G17");
        writer.write_line("G90");
        writer.write_comment("begin operation: Drill");

        assert_eq!(
            writer.output(),
            "N110 G17\nN120 G90\nN130 (begin operation: Drill)\n"
        );
        assert_eq!(writer.current_line(), 130);
    }

    #[test]
    fn test_no_line_numbers() {
        let mut writer = GcodeWriter::new(false);
        writer.write_block("M5\nG17 G90\nM2\n");
        assert_eq!(writer.take_output(), "M5\nG17 G90\nM2\n");
    }

    #[test]
    fn test_empty_block() {
        let mut writer = GcodeWriter::new(true);
        writer.write_block("");
        assert_eq!(writer.output(), "");
        assert_eq!(writer.next_line_number(), "N110 ");
    }
}
