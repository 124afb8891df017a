use crate::ast::{Ast, RedirectMode};
use crate::types::ShellError;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Destination for one command's output, written a line at a time.
pub trait LineSink {
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Flush and let go of the underlying handle. Called exactly once, after
    /// the line has finished executing.
    fn release(&mut self) -> io::Result<()>;
}

pub struct ConsoleSink<'a> {
    out: &'a mut dyn Write,
}

impl<'a> ConsoleSink<'a> {
    pub fn new(out: &'a mut dyn Write) -> Self {
        Self { out }
    }
}

impl LineSink for ConsoleSink<'_> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{}", line)?;
        self.out.flush()
    }

    fn release(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

pub struct FileSink {
    file: Option<BufWriter<File>>,
}

impl FileSink {
    pub fn open(path: &Path, mode: RedirectMode) -> Result<Self, ShellError> {
        let mut options = OpenOptions::new();
        options.write(true).create(true);
        match mode {
            RedirectMode::Truncate => options.truncate(true),
            RedirectMode::Append => options.append(true),
        };
        let file = options.open(path).map_err(|source| ShellError::Redirect {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            file: Some(BufWriter::new(file)),
        })
    }
}

impl LineSink for FileSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => writeln!(file, "{}", line),
            None => Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink already released")),
        }
    }

    fn release(&mut self) -> io::Result<()> {
        match self.file.take() {
            Some(mut file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

/// Where a line's standard output goes. Standard error is always the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination<'a> {
    Console,
    File { path: &'a Path, mode: RedirectMode },
}

impl<'a> Destination<'a> {
    pub fn for_ast(ast: &'a Ast) -> Self {
        match ast {
            Ast::Redirect { target, mode, .. } => Destination::File {
                path: Path::new(target.as_str()),
                mode: *mode,
            },
            _ => Destination::Console,
        }
    }

    pub fn open<'c>(self, console: &'c mut dyn Write) -> Result<Box<dyn LineSink + 'c>, ShellError> {
        Ok(match self {
            Destination::Console => Box::new(ConsoleSink::new(console)),
            Destination::File { path, mode } => Box::new(FileSink::open(path, mode)?),
        })
    }
}
