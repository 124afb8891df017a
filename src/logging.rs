use crate::config::ShellConfig;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};
use std::fs::OpenOptions;

/// Install the global logger. Logging is off unless configured, and a broken
/// log file falls back to stderr rather than stopping the shell.
pub fn init(config: &ShellConfig) {
    if config.log_level == LevelFilter::Off {
        return;
    }

    if let Some(path) = &config.log_file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                let _ = WriteLogger::init(config.log_level, Config::default(), file);
                return;
            }
            Err(e) => eprintln!("tinysh: cannot open log file {}: {}", path.display(), e),
        }
    }

    let _ = TermLogger::init(
        config.log_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}
