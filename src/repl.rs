use crate::completion::Completer;
use crate::executor::Executor;
use crate::parser::parse;
use crate::types::{Outcome, ShellError};
use log::trace;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::collections::VecDeque;

/// Supplies input lines. `None` means the input is exhausted.
pub trait LineSource {
    fn next_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError>;
}

/// Interactive terminal input with command and path completion.
pub struct Terminal {
    editor: Editor<Completer, DefaultHistory>,
}

impl Terminal {
    pub fn new(completer: Completer) -> Result<Self, ShellError> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(completer));
        Ok(Self { editor })
    }
}

impl LineSource for Terminal {
    fn next_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            // Ctrl-C drops the line being edited.
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Fixed list of lines, used for scripted input.
pub struct Script {
    lines: VecDeque<String>,
}

impl Script {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for Script {
    fn next_line(&mut self, _prompt: &str) -> Result<Option<String>, ShellError> {
        Ok(self.lines.pop_front())
    }
}

/// Read, parse and execute lines until `exit` or end of input. Returns the
/// status the process should exit with.
pub fn run(source: &mut dyn LineSource, executor: &mut Executor) -> Result<i32, ShellError> {
    let prompt = executor.config().prompt.clone();
    while let Some(line) = source.next_line(&prompt)? {
        trace!("read {:?}", line);
        if let Outcome::Terminate(code) = executor.execute(parse(&line)) {
            return Ok(code);
        }
    }
    Ok(0)
}
