//! The side-effect boundary between the interpreter and the outside world.
//!
//! The evaluator never touches stdin/stdout or the clock directly; it calls
//! a [`Host`]. [`Terminal`] drives a real console through crossterm,
//! [`Buffer`] captures everything in memory for tests and embedding.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::time::Duration;

use crossterm::{
    cursor, queue,
    style::{self, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use crate::ast::Color;

/// One piece of a `write` command.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Switch the output color; `None` resets it.
    Color(Option<Color>),
    Text(String),
}

pub trait Host {
    /// Show `message` and read one line of input (without the line ending).
    fn prompt(&mut self, message: &str) -> io::Result<String>;

    /// Emit fragments with no separators and no trailing newline.
    /// Any color set by the fragments is reset afterwards.
    fn write(&mut self, fragments: &[Fragment]) -> io::Result<()>;

    fn newline(&mut self) -> io::Result<()>;

    /// Block the calling thread.
    fn wait(&mut self, duration: Duration);

    /// Wait for `delay`, then clear the visible output.
    fn clear(&mut self, delay: Duration) -> io::Result<()>;

    /// A line of interpreter-generated text (not script output).
    fn diagnostic(&mut self, message: &str) -> io::Result<()>;
}

impl<H: Host + ?Sized> Host for &mut H {
    fn prompt(&mut self, message: &str) -> io::Result<String> {
        (**self).prompt(message)
    }

    fn write(&mut self, fragments: &[Fragment]) -> io::Result<()> {
        (**self).write(fragments)
    }

    fn newline(&mut self) -> io::Result<()> {
        (**self).newline()
    }

    fn wait(&mut self, duration: Duration) {
        (**self).wait(duration)
    }

    fn clear(&mut self, delay: Duration) -> io::Result<()> {
        (**self).clear(delay)
    }

    fn diagnostic(&mut self, message: &str) -> io::Result<()> {
        (**self).diagnostic(message)
    }
}

fn to_crossterm(color: Color) -> style::Color {
    match color {
        Color::Red => style::Color::DarkRed,
        Color::Green => style::Color::DarkGreen,
        Color::Blue => style::Color::DarkBlue,
        Color::Purple => style::Color::DarkMagenta,
    }
}

// ---------------------------------------------------------------------------
// Terminal
// ---------------------------------------------------------------------------

/// A real console: stdout for output, stdin for prompts.
pub struct Terminal {
    out: io::Stdout,
    /// Emit ANSI color sequences for color codes.
    pub color: bool,
}

impl Terminal {
    pub fn new(color: bool) -> Self {
        Self {
            out: io::stdout(),
            color,
        }
    }
}

impl Host for Terminal {
    fn prompt(&mut self, message: &str) -> io::Result<String> {
        queue!(self.out, Print(message))?;
        self.out.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for a prompt answer",
            ));
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    fn write(&mut self, fragments: &[Fragment]) -> io::Result<()> {
        let mut colored = false;
        for fragment in fragments {
            match fragment {
                Fragment::Text(text) => queue!(self.out, Print(text))?,
                Fragment::Color(_) if !self.color => {}
                Fragment::Color(Some(c)) => {
                    colored = true;
                    queue!(self.out, SetForegroundColor(to_crossterm(*c)))?;
                }
                Fragment::Color(None) => queue!(self.out, ResetColor)?,
            }
        }
        if colored {
            queue!(self.out, ResetColor)?;
        }
        self.out.flush()
    }

    fn newline(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        self.out.flush()
    }

    fn wait(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn clear(&mut self, delay: Duration) -> io::Result<()> {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        queue!(self.out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        self.out.flush()
    }

    fn diagnostic(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", message)?;
        self.out.flush()
    }
}

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// An in-memory host. Output is captured, prompts are answered from a
/// queue of scripted inputs, waits are recorded instead of slept.
#[derive(Debug, Default)]
pub struct Buffer {
    /// Everything written, including prompt messages and diagnostics.
    pub output: String,
    /// Answers handed out to prompts, front first.
    pub inputs: VecDeque<String>,
    /// Every wait and non-zero clear delay, in order.
    pub waits: Vec<Duration>,
    /// Color switches seen by `write`, in order.
    pub colors: Vec<Option<Color>>,
    /// Number of screen clears.
    pub clears: usize,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inputs<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

impl Host for Buffer {
    fn prompt(&mut self, message: &str) -> io::Result<String> {
        self.output.push_str(message);
        self.inputs.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted input left")
        })
    }

    fn write(&mut self, fragments: &[Fragment]) -> io::Result<()> {
        for fragment in fragments {
            match fragment {
                Fragment::Text(text) => self.output.push_str(text),
                Fragment::Color(c) => self.colors.push(*c),
            }
        }
        Ok(())
    }

    fn newline(&mut self) -> io::Result<()> {
        self.output.push('\n');
        Ok(())
    }

    fn wait(&mut self, duration: Duration) {
        self.waits.push(duration);
    }

    fn clear(&mut self, delay: Duration) -> io::Result<()> {
        if !delay.is_zero() {
            self.waits.push(delay);
        }
        self.clears += 1;
        Ok(())
    }

    fn diagnostic(&mut self, message: &str) -> io::Result<()> {
        self.output.push_str(message);
        self.output.push('\n');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_concatenates_without_separators() {
        let mut buf = Buffer::new();
        buf.write(&[
            Fragment::Color(Some(Color::Red)),
            Fragment::Text("a".into()),
            Fragment::Text("b".into()),
        ])
        .unwrap();
        buf.newline().unwrap();
        assert_eq!(buf.output, "ab\n");
        assert_eq!(buf.colors, vec![Some(Color::Red)]);
    }

    #[test]
    fn buffer_prompt_runs_out_of_input() {
        let mut buf = Buffer::with_inputs(["yes"]);
        assert_eq!(buf.prompt("? ").unwrap(), "yes");
        let err = buf.prompt("? ").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(buf.output, "? ? ");
    }

    #[test]
    fn buffer_records_clear_delays() {
        let mut buf = Buffer::new();
        buf.clear(Duration::ZERO).unwrap();
        buf.clear(Duration::from_millis(500)).unwrap();
        assert_eq!(buf.clears, 2);
        assert_eq!(buf.waits, vec![Duration::from_millis(500)]);
    }
}
