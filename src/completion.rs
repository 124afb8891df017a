use std::env;
use std::ffi::OsStr;
use std::fs;
use rustyline::{
    Helper,
    completion::Completer as RustylineCompleter,
    highlight::Highlighter,
    hint::Hinter,
    validate::Validator,
    completion::Pair,
    Context,
    Result,
};
use crate::builtins::BUILTINS;
use crate::utils::is_executable;

pub struct Completer {
    commands: Vec<String>,
}

impl Completer {
    pub fn new(search_path: Option<&OsStr>) -> Self {
        Self {
            commands: Self::find_commands(search_path),
        }
    }

    fn find_commands(search_path: Option<&OsStr>) -> Vec<String> {
        let mut commands: Vec<String> = BUILTINS.iter().map(|&cmd| cmd.to_string()).collect();

        for dir in search_path.map(|path| env::split_paths(path)).into_iter().flatten() {
            let Ok(entries) = fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries.filter_map(|r| r.ok()) {
                if !is_executable(&entry.path()) {
                    continue;
                }
                if let Some(name) = entry.file_name().to_str() {
                    commands.push(name.to_string());
                }
            }
        }

        commands.sort();
        commands.dedup();
        commands
    }

    /// Candidates for the word ending at the cursor. The first word completes
    /// to command names, later words to file paths.
    pub fn candidates(&self, line: &str) -> Vec<String> {
        let is_first_word = !line.trim_start().contains(char::is_whitespace);
        let prefix = line.rsplit(char::is_whitespace).next().unwrap_or("");
        if is_first_word {
            self.complete_command(prefix)
        } else {
            complete_path(prefix)
        }
    }

    fn complete_command(&self, prefix: &str) -> Vec<String> {
        self.commands
            .iter()
            .filter(|cmd| cmd.starts_with(prefix))
            .map(|cmd| format!("{} ", cmd))
            .collect()
    }
}

fn complete_path(prefix: &str) -> Vec<String> {
    let (dir, file_prefix) = match prefix.rfind('/') {
        Some(slash) => prefix.split_at(slash + 1),
        None => ("", prefix),
    };
    let Ok(entries) = fs::read_dir(if dir.is_empty() { "." } else { dir }) else {
        return Vec::new();
    };

    let mut completions: Vec<String> = entries
        .filter_map(|r| r.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            if !name.starts_with(file_prefix) {
                return None;
            }
            let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
            Some(format!("{}{}{}", dir, name, if is_dir { "/" } else { " " }))
        })
        .collect();
    completions.sort();
    completions
}

// Implement the required traits for rustyline
impl Helper for Completer {}

impl RustylineCompleter for Completer {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Pair>)> {
        let start = line[..pos].rfind(char::is_whitespace).map_or(0, |i| i + 1);

        let pairs: Vec<Pair> = self
            .candidates(&line[..pos])
            .into_iter()
            .map(|s| Pair {
                display: s.trim_end().to_string(),
                replacement: s,
            })
            .collect();

        Ok((start, pairs))
    }
}

impl Highlighter for Completer {}
impl Hinter for Completer {
    type Hint = String;
}
impl Validator for Completer {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    #[test]
    fn completes_builtins_and_path_commands() {
        let dir = TempDir::new().unwrap();
        let tool = dir.path().join("echolocate");
        fs::write(&tool, "").unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
        fs::write(dir.path().join("echo_notes"), "").unwrap();

        let completer = Completer::new(Some(dir.path().as_os_str()));
        assert_eq!(completer.candidates("ech"), vec!["echo ", "echolocate "]);
        assert_eq!(completer.candidates("  ty"), vec!["type "]);
        assert!(completer.candidates("zzz").is_empty());
    }

    #[test]
    fn later_words_complete_paths() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let completer = Completer::new(None);
        let base = format!("{}/n", dir.path().display());
        let got = completer.candidates(&format!("cat {}", base));
        assert_eq!(
            got,
            vec![
                format!("{}/nested/", dir.path().display()),
                format!("{}/notes.txt ", dir.path().display()),
            ]
        );
    }
}
