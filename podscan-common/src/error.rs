// podscan-common/src/error.rs
use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum PodscanError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Resource Not Found: {0}")]
    NotFound(String),

    #[error("Unable to find a specification for '{name}'{}", version_suffix(.version))]
    SpecNotFound {
        name: String,
        version: Option<String>,
    },

    #[error("No subspec named '{subspec}' in specification for '{pod}'")]
    SubspecNotFound { pod: String, subspec: String },

    #[error("Version error: {0}")]
    VersionError(String),

    #[error("Parsing Error in {0}: {1}")]
    ParseError(&'static str, String),
}

fn version_suffix(version: &Option<String>) -> String {
    match version {
        Some(v) => format!(" ({v})"),
        None => String::new(),
    }
}

impl From<std::io::Error> for PodscanError {
    fn from(err: std::io::Error) -> Self {
        PodscanError::Io(Arc::new(err))
    }
}

impl From<serde_json::Error> for PodscanError {
    fn from(err: serde_json::Error) -> Self {
        PodscanError::Json(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, PodscanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_not_found_message_includes_constraint() {
        let err = PodscanError::SpecNotFound {
            name: "Masonry".to_string(),
            version: Some("~> 1.0".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Unable to find a specification for 'Masonry' (~> 1.0)"
        );

        let err = PodscanError::SpecNotFound {
            name: "Masonry".to_string(),
            version: None,
        };
        assert_eq!(err.to_string(), "Unable to find a specification for 'Masonry'");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: PodscanError = io.into();
        assert!(matches!(err, PodscanError::Io(_)));
    }
}
