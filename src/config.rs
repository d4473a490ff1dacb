//! Settings file loading.
//!
//! Settings are read once at startup and never written back.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ConfigError;
use crate::types::Settings;

/// Settings filename within the config directory.
const SETTINGS_FILENAME: &str = "settings.json";

/// Returns the default settings path.
///
/// On Linux: ~/.config/teamdraw/settings.json
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("teamdraw")
        .join(SETTINGS_FILENAME)
}

/// Parse settings from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or is not valid JSON.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve settings for this session.
///
/// An explicit path must exist. Without one, the default path is used
/// if present and built-in defaults otherwise.
///
/// # Errors
/// Returns an error if the chosen file exists but cannot be loaded.
pub fn resolve_settings(explicit: Option<&Path>) -> Result<Settings, ConfigError> {
    if let Some(path) = explicit {
        return load_settings(path);
    }

    let path = default_settings_path();
    match load_settings(&path) {
        Ok(settings) => {
            debug!(path = %path.display(), "settings loaded");
            Ok(settings)
        }
        Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            Ok(Settings::default())
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_path_ends_with_settings_file() {
        let path = default_settings_path();
        assert!(path.ends_with("teamdraw/settings.json"));
    }

    #[test]
    fn load_reads_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "allow_repeat": true, "grouping_delay_ms": 0 }}"#).unwrap();

        let settings = load_settings(file.path()).unwrap();
        assert!(settings.allow_repeat);
        assert_eq!(settings.grouping_delay_ms, 0);
        assert_eq!(settings.group_size, 4);
    }

    #[test]
    fn load_rejects_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "group_size = 4").unwrap();
        assert!(matches!(load_settings(file.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let result = resolve_settings(Some(Path::new("/nonexistent/settings.json")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
