use std::io::{BufRead, Write};

use snafu::prelude::*;
use tracing::{debug, info};

use crate::shell::{Command, Console, ParseError, Reply, Session};

/// Reads commands line by line and runs them until `exit` or end of input.
#[derive(Debug)]
pub struct Shell<W: Write> {
    session: Session,
    console: Console<W>,
    show_menu: bool,
}

impl<W: Write> Shell<W> {
    pub fn new(session: Session, console: Console<W>, show_menu: bool) -> Self {
        Self {
            session,
            console,
            show_menu,
        }
    }

    pub fn into_parts(self) -> (Session, Console<W>) {
        (self.session, self.console)
    }

    pub async fn run(&mut self, input: impl BufRead) -> Result<(), ShellError> {
        self.console.banner().context(OutputSnafu)?;
        if self.show_menu {
            self.console.menu().context(OutputSnafu)?;
        }

        let mut lines = input.lines();
        loop {
            self.console
                .prompt(&self.session.current_path())
                .context(OutputSnafu)?;

            let Some(line) = lines.next() else {
                info!("Input closed, leaving the shell");
                break;
            };
            let line = line.context(InputSnafu)?;

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(ParseError::EmptyInput) => continue,
                Err(error) => {
                    self.console.failure(&error).context(OutputSnafu)?;
                    continue;
                }
            };

            debug!("Executing {:?}", command);
            match self.session.execute(command).await {
                Ok(Reply::Exit) => {
                    self.console.reply(&Reply::Exit).context(OutputSnafu)?;
                    break;
                }
                Ok(reply) => self.console.reply(&reply).context(OutputSnafu)?,
                Err(error) => {
                    debug!("Command failed: {error}");
                    self.console.failure(&error).context(OutputSnafu)?;
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ShellError {
    #[snafu(display("Failed to read a command"))]
    InputError { source: std::io::Error },
    #[snafu(display("Failed to write to the console"))]
    OutputError { source: std::io::Error },
}
