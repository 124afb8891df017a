use simplelog::LevelFilter;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

pub const PROMPT: &str = "$ ";
pub const LOG_LEVEL_VAR: &str = "TINYSH_LOG";
pub const LOG_FILE_VAR: &str = "TINYSH_LOG_FILE";

/// Settings captured from the environment once at startup.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub prompt: String,
    /// Raw `PATH` value, split on use.
    pub search_path: Option<OsString>,
    pub home: Option<PathBuf>,
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: PROMPT.to_string(),
            search_path: None,
            home: None,
            log_level: LevelFilter::Off,
            log_file: None,
        }
    }
}

impl ShellConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var_os(key))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let log_level = non_empty(LOG_LEVEL_VAR)
            .and_then(|value| value.to_str()?.parse().ok())
            .unwrap_or(LevelFilter::Off);
        Self {
            prompt: PROMPT.to_string(),
            search_path: non_empty("PATH"),
            home: non_empty("HOME").map(PathBuf::from),
            log_level,
            log_file: non_empty(LOG_FILE_VAR).map(PathBuf::from),
        }
    }

    pub fn with_search_path(mut self, path: impl Into<OsString>) -> Self {
        self.search_path = Some(path.into());
        self
    }

    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let vars: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn reads_path_and_home() {
        let config = ShellConfig::from_lookup(lookup(&[("PATH", "/bin:/usr/bin"), ("HOME", "/home/me")]));
        assert_eq!(config.search_path, Some(OsString::from("/bin:/usr/bin")));
        assert_eq!(config.home, Some(PathBuf::from("/home/me")));
        assert_eq!(config.log_level, LevelFilter::Off);
        assert_eq!(config.prompt, "$ ");
    }

    #[test]
    fn empty_home_counts_as_unset() {
        let config = ShellConfig::from_lookup(lookup(&[("HOME", "")]));
        assert_eq!(config.home, None);
        assert_eq!(config.search_path, None);
    }

    #[test]
    fn log_level_parses_or_stays_off() {
        let config = ShellConfig::from_lookup(lookup(&[(LOG_LEVEL_VAR, "debug")]));
        assert_eq!(config.log_level, LevelFilter::Debug);

        let config = ShellConfig::from_lookup(lookup(&[(LOG_LEVEL_VAR, "loud")]));
        assert_eq!(config.log_level, LevelFilter::Off);
    }
}
