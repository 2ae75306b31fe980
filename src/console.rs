//! Line oriented I/O used by `print(...)` and `input(...)`.
//!
//! The evaluator never touches stdin/stdout directly; it talks to an
//! injected [`Console`], so embedding code and tests can script input and
//! capture output.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use log::debug;

pub trait Console {
    /// Print `prompt` (when present and non‑empty) and read one line.
    ///
    /// The returned line has its terminator removed and is otherwise
    /// untouched. End of input is reported as `UnexpectedEof`.
    fn read_line(&self, prompt: Option<&str>) -> io::Result<String>;

    /// Write `text` followed by a newline.
    fn print(&self, text: &str) -> io::Result<()>;
}

fn strip_terminator(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

fn end_of_input() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "end of input")
}

/// Process stdin/stdout.
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn read_line(&self, prompt: Option<&str>) -> io::Result<String> {
        if let Some(prompt) = prompt.filter(|p| !p.is_empty()) {
            let mut stdout = io::stdout().lock();
            write!(stdout, "{}", prompt)?;
            stdout.flush()?;
        }

        let mut line = String::new();

        if io::stdin().lock().read_line(&mut line)? == 0 {
            debug!("stdin reached end of input");
            return Err(end_of_input());
        }

        Ok(strip_terminator(line))
    }

    fn print(&self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", text)
    }
}

/// In‑memory console: scripted input lines, captured output and prompts.
#[derive(Debug, Default)]
pub struct BufferedConsole {
    input: RefCell<VecDeque<String>>,
    output: RefCell<Vec<String>>,
    prompts: RefCell<Vec<String>>,
}

impl BufferedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Console that answers `read_line` with `lines`, in order.
    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: RefCell::new(lines.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Every line printed so far.
    pub fn output(&self) -> Vec<String> {
        self.output.borrow().clone()
    }

    /// Every non‑empty prompt shown so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl Console for BufferedConsole {
    fn read_line(&self, prompt: Option<&str>) -> io::Result<String> {
        if let Some(prompt) = prompt.filter(|p| !p.is_empty()) {
            self.prompts.borrow_mut().push(prompt.to_owned());
        }

        self.input
            .borrow_mut()
            .pop_front()
            .map(strip_terminator)
            .ok_or_else(end_of_input)
    }

    fn print(&self, text: &str) -> io::Result<()> {
        self.output.borrow_mut().push(text.to_owned());
        Ok(())
    }
}
