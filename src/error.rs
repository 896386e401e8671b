use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShimError>;

#[derive(Error, Debug)]
pub enum ShimError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(
        "one or more install target parameters are invalid:\n  {}\n\nCorrect usage: binshim run my-binary https://example.com/releases/my-binary.tar.gz",
        .errors.join("\n  ")
    )]
    Validation { errors: Vec<String> },

    #[error("error fetching release: {message}")]
    Transport {
        message: String,
        status: Option<u16>,
    },

    #[error("extraction failed: {message}")]
    Extraction { message: String },

    #[error("failed to launch {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("home directory not found")]
    HomeDirectoryNotFound,

    #[error("binary not installed: {name}")]
    BinaryNotFound { name: String },
}

impl ShimError {
    pub fn transport<S: Into<String>>(message: S) -> Self {
        ShimError::Transport {
            message: message.into(),
            status: None,
        }
    }

    pub fn extraction<S: Into<String>>(message: S) -> Self {
        ShimError::Extraction {
            message: message.into(),
        }
    }
}

impl From<ureq::Error> for ShimError {
    fn from(error: ureq::Error) -> Self {
        match error {
            ureq::Error::StatusCode(code) => ShimError::Transport {
                message: format!("HTTP {code}"),
                status: Some(code),
            },
            other => ShimError::Transport {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_lists_every_error() {
        let err = ShimError::Validation {
            errors: vec![
                "you must specify the name of your binary".to_string(),
                "url must be an absolute URL".to_string(),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("you must specify the name of your binary"));
        assert!(msg.contains("url must be an absolute URL"));
        assert!(msg.contains("Correct usage"));
    }

    #[test]
    fn transport_carries_status() {
        let err: ShimError = ureq::Error::StatusCode(404).into();
        match err {
            ShimError::Transport { status, .. } => assert_eq!(status, Some(404)),
            other => panic!("expected Transport, got {other:?}"),
        }
    }
}
