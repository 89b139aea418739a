use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostbuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid glob pattern '{pattern}': {source}")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Minification error: {message}")]
    Minify {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("Compression error: {0}")]
    Compression(String),

    #[error("Processor '{0}' is not enabled or does not exist")]
    ProcessorNotEnabled(String),

    #[error("timed out after {0}s")]
    Timeout(u64),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PostbuildError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a minification error tied to a file
    pub fn minify_at(message: impl Into<String>, path: &Path) -> Self {
        Self::Minify {
            message: message.into(),
            path: Some(path.to_path_buf()),
        }
    }

    pub fn glob(pattern: impl Into<String>, source: globset::Error) -> Self {
        Self::Glob {
            pattern: pattern.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PostbuildError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message() {
        assert_eq!(PostbuildError::Timeout(30).to_string(), "timed out after 30s");
    }

    #[test]
    fn test_not_enabled_message_names_processor() {
        let err = PostbuildError::ProcessorNotEnabled("brotli".to_string());
        assert_eq!(err.to_string(), "Processor 'brotli' is not enabled or does not exist");
    }

    #[test]
    fn test_minify_message_names_file() {
        let err = PostbuildError::minify_at("Unexpected token", Path::new("dist/app.js"));
        let message = err.to_string();
        assert!(message.contains("Unexpected token"));
        assert!(message.contains("dist/app.js"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: PostbuildError = io.into();
        assert!(matches!(err, PostbuildError::Io(_)));
    }
}
