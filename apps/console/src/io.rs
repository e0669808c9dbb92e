//! # Terminal I/O
//!
//! The console never touches stdin/stdout directly. It reads through an
//! [`InputSource`] and writes through an [`OutputSink`], so tests can drive
//! the menus with a script and inspect what was printed.
//!
//! ```text
//! ┌──────────────┐   read_line(prompt)   ┌───────────┐   write_line   ┌──────────────┐
//! │ InputSource  │ ────────────────────► │  Console  │ ─────────────► │ OutputSink   │
//! │ Stdin /      │   None = end of input │           │   clear        │ Stdout /     │
//! │ ScriptedInput│                       └───────────┘                │ BufferOutput │
//! └──────────────┘                                                    └──────────────┘
//! ```

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Source of user input lines.
pub trait InputSource {
    /// Shows `prompt` and reads one line without its trailing newline.
    ///
    /// ## Returns
    /// * `Some(line)` - A line was read (may be empty)
    /// * `None` - End of input; the console exits
    fn read_line(&mut self, prompt: &str) -> Option<String>;
}

/// Destination for console output.
pub trait OutputSink {
    fn write_line(&mut self, line: &str);

    /// Clears the screen between menus.
    fn clear(&mut self);
}

// =============================================================================
// Terminal implementations
// =============================================================================

/// Reads lines from stdin, printing the prompt to stdout first.
#[derive(Debug, Default)]
pub struct StdinInput;

impl InputSource for StdinInput {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        let mut stdout = io::stdout();
        let _ = write!(stdout, "{}", prompt);
        let _ = stdout.flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read from stdin");
                None
            }
        }
    }
}

/// Writes lines to stdout. Clearing uses the ANSI "erase screen" sequence.
#[derive(Debug, Default)]
pub struct StdoutOutput;

impl OutputSink for StdoutOutput {
    fn write_line(&mut self, line: &str) {
        println!("{}", line);
    }

    fn clear(&mut self) {
        print!("\x1B[2J\x1B[1;1H");
        let _ = io::stdout().flush();
    }
}

// =============================================================================
// Test implementations
// =============================================================================

/// Replays a fixed list of lines, then reports end of input.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedInput {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts shown so far, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Lines not consumed yet.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl InputSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.prompts.push(prompt.to_string());
        self.lines.pop_front()
    }
}

/// Collects every written line in memory.
#[derive(Debug, Default)]
pub struct BufferOutput {
    lines: Vec<String>,
    clears: usize,
}

impl BufferOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All output joined with newlines.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// True if any written line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }

    pub fn clear_count(&self) -> usize {
        self.clears
    }
}

impl OutputSink for BufferOutput {
    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn clear(&mut self) {
        self.clears += 1;
    }
}
