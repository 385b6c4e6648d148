//! Runtime configuration for the board editor.
//!
//! Every value has a compile-time default and can be overridden through a
//! dedicated environment variable.

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_CONFIG_DIR: &str = ".config/board-editor/data";
const DEV_DATA_DIR: &str = "./data";

/// Delay of the built-in analysis provider, in milliseconds.
const DEFAULT_ANALYSIS_DELAY_MS: u64 = 2000;

/// Delay of the built-in image recognizer, in milliseconds.
const DEFAULT_RECOGNITION_DELAY_MS: u64 = 1500;

/// Get the data directory for saved positions.
///
/// Priority:
/// 1. `BOARD_EDITOR_DATA_DIR` env variable if set
/// 2. `$HOME/.config/board-editor/data` if a home directory is known
/// 3. `./data` as fallback
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("BOARD_EDITOR_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(DEFAULT_CONFIG_DIR);
    }

    PathBuf::from(DEV_DATA_DIR)
}

/// Get the directory the terminal UI writes its log files to.
///
/// Priority:
/// 1. `BOARD_EDITOR_LOG_DIR` env variable if set
/// 2. a `logs` directory next to the data directory
pub fn get_log_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("BOARD_EDITOR_LOG_DIR") {
        return PathBuf::from(dir);
    }

    let data_dir = get_data_dir();
    match data_dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join("logs"),
        _ => PathBuf::from("logs"),
    }
}

/// Get the simulated analysis latency.
///
/// `BOARD_EDITOR_ANALYSIS_DELAY_MS` overrides the 2000 ms default; values that
/// do not parse as `u64` fall back to the default.
pub fn get_analysis_delay() -> Duration {
    Duration::from_millis(env_millis(
        "BOARD_EDITOR_ANALYSIS_DELAY_MS",
        DEFAULT_ANALYSIS_DELAY_MS,
    ))
}

/// Get the simulated image-recognition latency.
///
/// `BOARD_EDITOR_RECOGNITION_DELAY_MS` overrides the 1500 ms default.
pub fn get_recognition_delay() -> Duration {
    Duration::from_millis(env_millis(
        "BOARD_EDITOR_RECOGNITION_DELAY_MS",
        DEFAULT_RECOGNITION_DELAY_MS,
    ))
}

fn env_millis(var: &str, default: u64) -> u64 {
    parse_millis(std::env::var(var).ok().as_deref(), default)
}

fn parse_millis(value: Option<&str>, default: u64) -> u64 {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_data_dir_fallback() {
        // Returns the env override when BOARD_EDITOR_DATA_DIR is set, which is
        // also correct behaviour.
        let dir = get_data_dir();
        assert!(!dir.as_os_str().is_empty());
    }

    #[test]
    fn test_get_log_dir_is_not_empty() {
        assert!(!get_log_dir().as_os_str().is_empty());
    }

    #[test]
    fn test_parse_millis() {
        assert_eq!(parse_millis(Some("250"), 10), 250);
        assert_eq!(parse_millis(Some(" 5 "), 10), 5);
        assert_eq!(parse_millis(Some("soon"), 10), 10);
        assert_eq!(parse_millis(Some("-1"), 10), 10);
        assert_eq!(parse_millis(None, 10), 10);
    }

    // Env-var overrides are not exercised here to avoid cross-test pollution.
}
