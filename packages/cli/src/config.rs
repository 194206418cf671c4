use std::path::PathBuf;

use recall_algo::{SchedulerParams, DEFAULT_RELEARN_MINUTES};

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `<deck>.json` files
    pub deck_dir: PathBuf,
    /// SQLite review store
    pub db_path: PathBuf,
    pub log_level: String,
    /// Rolling file log directory, when file logging is enabled
    pub log_dir: Option<PathBuf>,
    /// Relearning step after a failed recall
    pub relearn_minutes: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deck_dir: PathBuf::from("./json"),
            db_path: PathBuf::from("./db.sqlite"),
            log_level: "warn".to_string(),
            log_dir: None,
            relearn_minutes: DEFAULT_RELEARN_MINUTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let deck_dir = std::env::var("FLASHCARDS_DECK_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.deck_dir);

        let db_path = std::env::var("FLASHCARDS_DB")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let log_level = std::env::var("RUST_LOG").unwrap_or(defaults.log_level);

        let log_dir = file_log_dir(
            std::env::var("ENABLE_FILE_LOGS").ok().as_deref(),
            std::env::var("LOG_DIR").ok().as_deref(),
        );

        let relearn_minutes = std::env::var("FLASHCARDS_RELEARN_MINUTES")
            .ok()
            .and_then(|value| parse_relearn_minutes(&value))
            .unwrap_or(defaults.relearn_minutes);

        Self {
            deck_dir,
            db_path,
            log_level,
            log_dir,
            relearn_minutes,
        }
    }

    /// Command-line flags win over the environment
    pub fn with_overrides(mut self, deck_dir: Option<PathBuf>, db_path: Option<PathBuf>) -> Self {
        if let Some(dir) = deck_dir {
            self.deck_dir = dir;
        }
        if let Some(path) = db_path {
            self.db_path = path;
        }
        self
    }
}

/// `ENABLE_FILE_LOGS=true|1` turns on the file log, in `LOG_DIR` or `./logs`
fn file_log_dir(enabled: Option<&str>, dir: Option<&str>) -> Option<PathBuf> {
    if !matches!(enabled, Some("true" | "1")) {
        return None;
    }
    let dir = dir.filter(|d| !d.trim().is_empty()).unwrap_or("./logs");
    Some(PathBuf::from(dir))
}

/// Minutes the scheduler can represent as a relearning step, else `None`
fn parse_relearn_minutes(value: &str) -> Option<i64> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|minutes| SchedulerParams::default().with_relearn_minutes(*minutes).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_log_dir() {
        assert_eq!(file_log_dir(None, Some("/var/log/fc")), None);
        assert_eq!(file_log_dir(Some("no"), None), None);
        assert_eq!(file_log_dir(Some("1"), None), Some(PathBuf::from("./logs")));
        assert_eq!(
            file_log_dir(Some("true"), Some("/var/log/fc")),
            Some(PathBuf::from("/var/log/fc"))
        );
    }

    #[test]
    fn test_relearn_minutes_parsing() {
        assert_eq!(parse_relearn_minutes(" 15 "), Some(15));
        assert_eq!(parse_relearn_minutes("0"), Some(0));
        assert_eq!(parse_relearn_minutes("-5"), None);
        assert_eq!(parse_relearn_minutes("ten"), None);
        assert_eq!(parse_relearn_minutes("1000000000000000"), None);
        assert_eq!(parse_relearn_minutes(&i64::MAX.to_string()), None);
    }

    #[test]
    fn test_overrides_replace_paths() {
        let config = Config::default().with_overrides(
            Some(PathBuf::from("/tmp/decks")),
            Some(PathBuf::from("/tmp/review.sqlite")),
        );
        assert_eq!(config.deck_dir, PathBuf::from("/tmp/decks"));
        assert_eq!(config.db_path, PathBuf::from("/tmp/review.sqlite"));
        assert_eq!(config.relearn_minutes, DEFAULT_RELEARN_MINUTES);
    }

    #[test]
    fn test_missing_overrides_keep_defaults() {
        let config = Config::default().with_overrides(None, None);
        assert_eq!(config.deck_dir, PathBuf::from("./json"));
        assert_eq!(config.db_path, PathBuf::from("./db.sqlite"));
    }
}
