use std::io;
use std::path::PathBuf;

/// Why a line could not be tokenized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseFailure {
    #[error("unterminated quote")]
    UnterminatedQuote,
    #[error("backslash at end of input")]
    TrailingBackslash,
}

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("{}: {source}", path.display())]
    Redirect { path: PathBuf, source: io::Error },
    #[error("{}: {source}", program.display())]
    Spawn { program: PathBuf, source: io::Error },
    #[error("line editor: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// What the driver should do after a line has been executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Terminate(i32),
}

pub type ExecuteResult = Result<Outcome, ShellError>;
