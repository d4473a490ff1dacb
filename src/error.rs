//! Error types, one enum per concern.
//!
//! None of these are fatal: callers report them and carry on with the
//! state they had before the failing operation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn an uploaded file into name entries.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read input: {0}")]
    Read(#[from] io::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Failure to produce or write an export of a group set.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer flush failed: {0}")]
    Flush(#[from] io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Failure to load a settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read settings {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid settings in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_name_the_path() {
        let err = IngestError::Io {
            path: PathBuf::from("/tmp/names.csv"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/names.csv"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn config_parse_error_names_the_path() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ConfigError::Parse {
            path: PathBuf::from("settings.json"),
            source,
        };
        assert!(err.to_string().starts_with("invalid settings in settings.json"));
    }

    #[test]
    fn invalid_utf8_export_is_reported() {
        let source = String::from_utf8(vec![0xff]).unwrap_err();
        let err = ExportError::from(source);
        assert!(matches!(err, ExportError::Utf8(_)));
        assert!(err.to_string().starts_with("CSV output is not valid UTF-8"));
    }
}
