use crate::ast::{Ast, Command};
use crate::builtins::{self, Builtin, BuiltinContext};
use crate::config::ShellConfig;
use crate::process;
use crate::router::{ConsoleSink, Destination, LineSink};
use crate::types::{ExecuteResult, Outcome};
use crate::utils::search_cmd;
use crate::word::Word;
use log::debug;
use std::io::{self, Write};

/// The console streams commands write to when not redirected.
pub struct Console {
    pub out: Box<dyn Write>,
    pub err: Box<dyn Write>,
}

impl Console {
    pub fn stdio() -> Self {
        Self {
            out: Box::new(io::stdout()),
            err: Box::new(io::stderr()),
        }
    }
}

pub struct Executor {
    config: ShellConfig,
    console: Console,
}

impl Executor {
    pub fn new(config: ShellConfig, console: Console) -> Self {
        Self { config, console }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Run one parsed line. Nothing that goes wrong here stops the shell;
    /// failures are reported on the console error stream.
    pub fn execute(&mut self, ast: Ast) -> Outcome {
        let command = match &ast {
            Ast::Empty => return Outcome::Continue,
            Ast::Invalid { line } => {
                let _ = writeln!(self.console.err, "{}: invalid command line", line);
                return Outcome::Continue;
            }
            Ast::Command(command) | Ast::Redirect { command, .. } => command,
        };

        let Console { out, err } = &mut self.console;
        let mut stderr = ConsoleSink::new(err.as_mut());
        let mut stdout = match Destination::for_ast(&ast).open(out.as_mut()) {
            Ok(sink) => sink,
            Err(e) => {
                let _ = stderr.write_line(&e.to_string());
                return Outcome::Continue;
            }
        };

        let result = dispatch(&self.config, command, stdout.as_mut(), &mut stderr);
        let released = stdout.release();
        settle(command.name().as_str(), result, released, &mut stderr)
    }
}

/// Report what went wrong with a finished command. A failed release is
/// reported whether or not the command itself failed.
fn settle(
    name: &str,
    result: ExecuteResult,
    released: io::Result<()>,
    stderr: &mut dyn LineSink,
) -> Outcome {
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            let _ = stderr.write_line(&format!("{}: {}", name, e));
            Outcome::Continue
        }
    };
    if let Err(e) = released {
        let _ = stderr.write_line(&e.to_string());
    }
    outcome
}

fn dispatch(
    config: &ShellConfig,
    command: &Command,
    stdout: &mut dyn LineSink,
    stderr: &mut dyn LineSink,
) -> ExecuteResult {
    let name = command.name().as_str();
    if let Some(builtin) = Builtin::from_name(name) {
        let ctx = BuiltinContext {
            config,
            stdout,
            stderr,
        };
        return builtins::execute_builtin(builtin, command.args(), ctx);
    }

    match search_cmd(name, config.search_path.as_deref()) {
        Some(program) => {
            let args = command.args().iter().map(Word::as_str);
            let status = process::run(&program, name, args, stdout, stderr)?;
            debug!("{} finished: {}", name, status);
        }
        None => stdout.write_line(&format!("{}: command not found", name))?,
    }
    Ok(Outcome::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ShellError;

    fn settled(result: ExecuteResult, released: io::Result<()>) -> (Outcome, String) {
        let mut err = Vec::new();
        let outcome = settle("cat", result, released, &mut ConsoleSink::new(&mut err));
        (outcome, String::from_utf8(err).unwrap())
    }

    #[test]
    fn release_failure_is_reported_after_command_failure() {
        let failed = Err(ShellError::Io(io::Error::other("write failed")));
        let (outcome, err) = settled(failed, Err(io::Error::other("flush failed")));
        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(err, "cat: write failed\nflush failed\n");
    }

    #[test]
    fn release_failure_keeps_the_outcome() {
        let (outcome, err) = settled(Ok(Outcome::Terminate(3)), Err(io::Error::other("flush failed")));
        assert_eq!(outcome, Outcome::Terminate(3));
        assert_eq!(err, "flush failed\n");
    }
}
