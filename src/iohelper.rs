/**
 * Helper functions for input and output.
 */
use std::cmp;
use std::io;
use std::io::Write;

use colored::*;
use rustyline::error::ReadlineError;

use super::common::{DrillError, Result};

#[macro_export]
macro_rules! my_writeln {
    ($dst:expr, $($arg:tt)*) => (
        writeln!($dst, $($arg)*).map_err($crate::common::DrillError::Io)
    );
}

#[macro_export]
macro_rules! my_write {
    ($dst:expr, $($arg:tt)*) => (
        write!($dst, $($arg)*).map_err($crate::common::DrillError::Io)
    );
}


/// Source of lines of user input. Implemented for `rustyline::Editor` for interactive
/// use, and by scripted readers in the tests.
pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> Result<String>;
}

impl<H: rustyline::Helper> LineReader for rustyline::Editor<H> {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        match self.readline(&format!("{}", prompt.white())) {
            Ok(s) => {
                self.add_history_entry(s.as_str());
                Ok(s)
            }
            Err(ReadlineError::Interrupted) => Err(DrillError::ReadlineInterrupted),
            Err(ReadlineError::Eof) => Err(DrillError::ReadlineEof),
            _ => Err(DrillError::ReadlineOther),
        }
    }
}


/// Display a prompt and read a line from the reader. Surrounding whitespace is removed,
/// so an empty line comes back as `Ok(Some(""))`. If the user presses Ctrl+D then
/// `Ok(None)` is returned; Ctrl+C is returned as `Err(DrillError::ReadlineInterrupted)`.
pub fn prompt<R: LineReader>(reader: &mut R, message: &str) -> Result<Option<String>> {
    match reader.read_line(message) {
        Ok(response) => Ok(Some(response.trim().to_string())),
        Err(DrillError::ReadlineEof) => Ok(None),
        Err(e) => Err(e),
    }
}


/// Prompt the user with a yes-no question and return `true` if they enter yes. Ctrl+D
/// counts as no; Ctrl+C is passed through like in `prompt`.
pub fn confirm<R: LineReader>(reader: &mut R, message: &str) -> Result<bool> {
    let response = prompt(reader, message)?;
    Ok(response.map_or(false, |r| r.to_lowercase().starts_with("y")))
}


/// Print `message` to `writer`, breaking lines according to the current width of the
/// terminal. Prepend `prefix` to the first line and indent all subsequent lines by its
/// length.
pub fn prettyprint<W: io::Write>(writer: &mut W, message: &str, prefix: Option<&str>) -> Result<()> {
    prettyprint_colored(writer, message, prefix, None, None)
}


pub fn prettyprint_colored<W: io::Write>(
    writer: &mut W,
    message: &str,
    prefix: Option<&str>,
    message_color: Option<Color>,
    prefix_color: Option<Color>,
) -> Result<()> {
    let prefix = prefix.unwrap_or("");
    let prefix_width = prefix.chars().count();
    let width = cmp::max(textwrap::termwidth().saturating_sub(prefix_width), 20);
    let mut lines = textwrap::wrap_iter(message, width);

    if let Some(first_line) = lines.next() {
        let colored_prefix = color_optional(&prefix, prefix_color);
        let colored_line = color_optional(&first_line, message_color);
        my_writeln!(writer, "{}{}", colored_prefix, colored_line)?;
    }

    let indent = " ".repeat(prefix_width);
    for line in lines {
        let colored_line = color_optional(&line, message_color);
        my_writeln!(writer, "{}{}", indent, colored_line)?;
    }
    Ok(())
}


fn color_optional(text: &str, color: Option<Color>) -> ColoredString {
    if let Some(color) = color {
        text.color(color)
    } else {
        text.normal()
    }
}
