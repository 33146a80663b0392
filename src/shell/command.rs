use std::str::{FromStr, SplitWhitespace};

use snafu::{OptionExt, Snafu, ensure};

/// The menu printed at startup and by `help`.
pub const MENU: &str = "\
Commands:
1. add-file [name] [content]        ==> 1 [name] [content]
2. add-folder [name]                ==> 2 [name]
3. remove [name]                    ==> 3 [name]
4. display                          ==> 4
5. search [name]                    ==> 5 [name]
6. cd [path] / cd ..                ==> 6 cd [path] / 6 cd ..
7. exit                             ==> 7
   rename-folder [old] [new]
   rename-file [old] [new]
   read-file [name]
   pwd
   help";

/// One parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddFile { name: String, content: String },
    AddFolder { name: String },
    RenameFolder { from: String, to: String },
    RenameFile { from: String, to: String },
    Remove { name: String },
    Display,
    Search { name: String },
    ReadFile { name: String },
    Navigate { target: String },
    Pwd,
    Help,
    Exit,
}

impl Command {
    /// Whether a successful run changes the tree and must be persisted.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::AddFile { .. }
                | Command::AddFolder { .. }
                | Command::RenameFolder { .. }
                | Command::RenameFile { .. }
                | Command::Remove { .. }
        )
    }
}

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum ParseError {
    #[snafu(display("Nothing to run"))]
    EmptyInput,
    #[snafu(display("Invalid command \"{}\". Type \"help\" to list commands.", command))]
    UnknownCommand { command: String },
    #[snafu(display("\"{}\" needs a {} argument", command, argument))]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[snafu(display("Invalid command. Use \"6 cd <folder>\" to navigate."))]
    InvalidNavigation,
}

/// Command words, after resolving the numeric aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    AddFile,
    AddFolder,
    Remove,
    Display,
    Search,
    Navigate,
    Exit,
    RenameFolder,
    RenameFile,
    ReadFile,
    Pwd,
    Help,
}

impl Verb {
    fn name(self) -> &'static str {
        match self {
            Verb::AddFile => "add-file",
            Verb::AddFolder => "add-folder",
            Verb::Remove => "remove",
            Verb::Display => "display",
            Verb::Search => "search",
            Verb::Navigate => "cd",
            Verb::Exit => "exit",
            Verb::RenameFolder => "rename-folder",
            Verb::RenameFile => "rename-file",
            Verb::ReadFile => "read-file",
            Verb::Pwd => "pwd",
            Verb::Help => "help",
        }
    }
}

/// Whitespace-separated arguments following the command word.
struct Arguments<'a> {
    verb: Verb,
    tokens: SplitWhitespace<'a>,
}

impl Arguments<'_> {
    fn required(&mut self, argument: &'static str) -> Result<String, ParseError> {
        self.tokens
            .next()
            .map(str::to_string)
            .context(MissingArgumentSnafu {
                command: self.verb.name(),
                argument,
            })
    }

    /// Everything left, joined by single spaces. May be empty.
    fn rest(self) -> String {
        self.tokens.collect::<Vec<_>>().join(" ")
    }

    fn required_rest(self, argument: &'static str) -> Result<String, ParseError> {
        let command = self.verb.name();
        let rest = self.rest();
        ensure!(!rest.is_empty(), MissingArgumentSnafu { command, argument });
        Ok(rest)
    }
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let word = tokens.next().context(EmptyInputSnafu)?;
        let verb = match word {
            "1" | "add-file" => Verb::AddFile,
            "2" | "add-folder" => Verb::AddFolder,
            "3" | "remove" => Verb::Remove,
            "4" | "display" => Verb::Display,
            "5" | "search" => Verb::Search,
            "6" => {
                ensure!(tokens.next() == Some("cd"), InvalidNavigationSnafu);
                Verb::Navigate
            }
            "cd" | "navigate" => Verb::Navigate,
            "7" | "exit" => Verb::Exit,
            "rename-folder" => Verb::RenameFolder,
            "rename-file" => Verb::RenameFile,
            "read-file" => Verb::ReadFile,
            "pwd" => Verb::Pwd,
            "help" => Verb::Help,
            other => return UnknownCommandSnafu { command: other }.fail(),
        };

        let mut args = Arguments { verb, tokens };
        let command = match verb {
            Verb::AddFile => Command::AddFile {
                name: args.required("name")?,
                content: args.rest(),
            },
            Verb::AddFolder => Command::AddFolder {
                name: args.required("name")?,
            },
            Verb::Remove => Command::Remove {
                name: args.required("name")?,
            },
            Verb::Display => Command::Display,
            Verb::Search => Command::Search {
                name: args.required("name")?,
            },
            Verb::Navigate => Command::Navigate {
                target: args.required_rest("target")?,
            },
            Verb::Exit => Command::Exit,
            Verb::RenameFolder => Command::RenameFolder {
                from: args.required("old name")?,
                to: args.required("new name")?,
            },
            Verb::RenameFile => Command::RenameFile {
                from: args.required("old name")?,
                to: args.required("new name")?,
            },
            Verb::ReadFile => Command::ReadFile {
                name: args.required("name")?,
            },
            Verb::Pwd => Command::Pwd,
            Verb::Help => Command::Help,
        };
        Ok(command)
    }
}
