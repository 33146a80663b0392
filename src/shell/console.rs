use std::error::Error;
use std::io::{self, Write};

use colored::Colorize;
use snafu::Report;

use crate::shell::{MENU, Reply};

const BANNER: &str = "Folder Tree CLI";
const FAREWELL: &str = "Goodbye!";

/// Styled output for the interactive shell. Whether styles turn into
/// escape codes is decided globally through `colored::control`.
#[derive(Debug)]
pub struct Console<W: Write> {
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn banner(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", BANNER.bold())
    }

    pub fn menu(&mut self) -> io::Result<()> {
        writeln!(self.out, "{MENU}")
    }

    pub fn prompt(&mut self, location: &str) -> io::Result<()> {
        write!(self.out, "{}> ", location.cyan())?;
        self.out.flush()
    }

    pub fn reply(&mut self, reply: &Reply) -> io::Result<()> {
        match reply {
            Reply::Success(message) => writeln!(self.out, "{}", message.as_str().green()),
            Reply::Notice(message) => writeln!(self.out, "{}", message.as_str().yellow()),
            Reply::Output(text) => writeln!(self.out, "{}", text.trim_end_matches('\n')),
            Reply::Exit => writeln!(self.out, "{FAREWELL}"),
        }
    }

    /// Prints `error` with its chain of causes.
    pub fn failure<E: Error>(&mut self, error: E) -> io::Result<()> {
        let report = Report::from_error(error).to_string();
        writeln!(self.out, "{}", report.as_str().red())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
