use crate::word::Word;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    /// Blank or zero-length line.
    Empty,
    /// Line that could not be tokenized or has a malformed redirection.
    Invalid { line: String },
    Command(Command),
    /// Standard output of `command` goes to the file named by `target`.
    Redirect {
        command: Command,
        target: Word,
        mode: RedirectMode,
    },
}

impl Ast {
    pub fn invalid(line: &str) -> Self {
        Ast::Invalid {
            line: line.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: Word,
    args: Vec<Word>,
}

impl Command {
    /// Returns `None` for an empty command name.
    pub fn new(name: Word, args: Vec<Word>) -> Option<Self> {
        if name.is_empty() {
            None
        } else {
            Some(Self { name, args })
        }
    }

    pub fn name(&self) -> &Word {
        &self.name
    }

    pub fn args(&self) -> &[Word] {
        &self.args
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    Truncate, // >, 1>
    Append,   // >>, 1>>
}
