mod ast;
mod builtins;
mod completion;
mod config;
mod executor;
mod logging;
mod parser;
mod process;
mod repl;
mod router;
mod tokenizer;
mod types;
mod utils;
mod word;

#[cfg(test)]
mod tests;

use anyhow::Context;
use completion::Completer;
use config::ShellConfig;
use executor::{Console, Executor};
use log::warn;
use repl::Terminal;

fn main() -> anyhow::Result<()> {
    let config = ShellConfig::from_env();
    logging::init(&config);

    // A foreground child gets SIGINT from the terminal; the shell stays up.
    if let Err(e) = ctrlc::set_handler(|| {}) {
        warn!("cannot install SIGINT handler: {}", e);
    }

    let completer = Completer::new(config.search_path.as_deref());
    let mut terminal = Terminal::new(completer).context("starting line editor")?;
    let mut executor = Executor::new(config, Console::stdio());

    let code = repl::run(&mut terminal, &mut executor)?;
    drop(terminal);
    std::process::exit(code);
}
