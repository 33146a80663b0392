//! Command façade over the folder tree: parsing, session state, console
//! output and the interactive loop.

mod command;
mod console;
mod session;
mod shell_loop;

pub use command::{Command, MENU, ParseError};
pub use console::Console;
pub use session::{Reply, Session, SessionError};
pub use shell_loop::{Shell, ShellError};
