use crate::config::ShellConfig;
use crate::router::LineSink;
use crate::types::{ExecuteResult, Outcome};
use crate::utils::{is_builtin, search_cmd};
use crate::word::Word;
use log::debug;
use std::env;
use std::path::PathBuf;

pub const BUILTINS: [&str; 5] = ["exit", "echo", "type", "pwd", "cd"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Exit,
    Echo,
    Type,
    Pwd,
    Cd,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "exit" => Builtin::Exit,
            "echo" => Builtin::Echo,
            "type" => Builtin::Type,
            "pwd" => Builtin::Pwd,
            "cd" => Builtin::Cd,
            _ => return None,
        })
    }
}

/// Everything a builtin may touch while it runs.
pub struct BuiltinContext<'a> {
    pub config: &'a ShellConfig,
    pub stdout: &'a mut dyn LineSink,
    pub stderr: &'a mut dyn LineSink,
}

pub fn execute_builtin(builtin: Builtin, args: &[Word], mut ctx: BuiltinContext<'_>) -> ExecuteResult {
    match builtin {
        Builtin::Exit => exit(args, ctx),
        Builtin::Echo => {
            let line = args.iter().map(Word::as_str).collect::<Vec<_>>().join(" ");
            ctx.stdout.write_line(&line)?;
            Ok(Outcome::Continue)
        }
        Builtin::Type => {
            for name in args {
                let name = name.as_str();
                let report = if is_builtin(name) {
                    format!("{} is a shell builtin", name)
                } else if let Some(path) = search_cmd(name, ctx.config.search_path.as_deref()) {
                    format!("{} is {}", name, path.display())
                } else {
                    format!("{}: not found", name)
                };
                ctx.stdout.write_line(&report)?;
            }
            Ok(Outcome::Continue)
        }
        Builtin::Pwd => {
            let cwd = env::current_dir()?;
            ctx.stdout.write_line(&cwd.display().to_string())?;
            Ok(Outcome::Continue)
        }
        Builtin::Cd => cd(args, ctx),
    }
}

fn exit(args: &[Word], mut ctx: BuiltinContext<'_>) -> ExecuteResult {
    let Some(arg) = args.first() else {
        return Ok(Outcome::Terminate(0));
    };
    match arg.as_str().parse::<i32>() {
        Ok(code) => Ok(Outcome::Terminate(code & 255)), // POSIX requires 8-bit exit codes
        Err(_) => {
            let _ = ctx
                .stderr
                .write_line(&format!("exit: {}: numeric argument required", arg));
            Ok(Outcome::Terminate(2))
        }
    }
}

fn cd(args: &[Word], mut ctx: BuiltinContext<'_>) -> ExecuteResult {
    let arg = args.first().map(Word::as_str);
    let target = match arg {
        None | Some("~") => ctx.config.home.clone(),
        Some(path) => match path.strip_prefix("~/") {
            Some(sub) => ctx.config.home.as_ref().map(|home| home.join(sub)),
            None => Some(PathBuf::from(path)),
        },
    };
    let Some(target) = target else {
        ctx.stderr.write_line("cd: HOME not set")?;
        return Ok(Outcome::Continue);
    };

    if !target.is_dir() {
        let shown = arg.map_or_else(|| target.display().to_string(), str::to_string);
        ctx.stderr
            .write_line(&format!("cd: {}: No such file or directory", shown))?;
        return Ok(Outcome::Continue);
    }
    if let Err(e) = env::set_current_dir(&target) {
        ctx.stderr
            .write_line(&format!("cd: {}: {}", target.display(), e))?;
        return Ok(Outcome::Continue);
    }
    debug!("cwd is now {}", target.display());
    Ok(Outcome::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct Broken;

    impl LineSink for Broken {
        fn write_line(&mut self, _line: &str) -> io::Result<()> {
            Err(io::Error::other("closed"))
        }

        fn release(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn exit_terminates_even_when_the_diagnostic_cannot_be_written() {
        let config = ShellConfig::default();
        let ctx = BuiltinContext {
            config: &config,
            stdout: &mut Broken,
            stderr: &mut Broken,
        };
        let outcome = execute_builtin(Builtin::Exit, &[Word::from("soon")], ctx).unwrap();
        assert_eq!(outcome, Outcome::Terminate(2));
    }
}
