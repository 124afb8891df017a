use log::trace;
use nix::unistd::{access, AccessFlags};
use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Resolve a command name to an executable.
///
/// Names containing a slash are checked directly; anything else is looked up
/// in each `search_path` directory in order and the first executable wins.
pub fn search_cmd(cmd: &str, search_path: Option<&OsStr>) -> Option<PathBuf> {
    if cmd.is_empty() {
        return None;
    }
    if cmd.contains('/') {
        let path = Path::new(cmd);
        return is_executable(path).then(|| path.to_path_buf());
    }

    for dir in env::split_paths(search_path?) {
        if dir.as_os_str().is_empty() {
            continue;
        }
        let candidate = dir.join(cmd);
        if is_executable(&candidate) {
            trace!("resolved {} to {}", cmd, candidate.display());
            return Some(candidate);
        }
    }
    None
}

pub fn is_executable(path: &Path) -> bool {
    path.is_file() && access(path, AccessFlags::X_OK).is_ok()
}

pub fn is_builtin(cmd: &str) -> bool {
    crate::builtins::BUILTINS.contains(&cmd)
}
