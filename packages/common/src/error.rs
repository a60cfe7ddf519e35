use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by shared infrastructure (file access)
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Generic error: {0}")]
    Generic(String),
}

impl CommonError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            CommonError::FileNotFound(path)
        } else {
            CommonError::Io { path, source }
        }
    }
}

impl From<String> for CommonError {
    fn from(s: String) -> Self {
        CommonError::Generic(s)
    }
}

impl From<&str> for CommonError {
    fn from(s: &str) -> Self {
        CommonError::Generic(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_file_not_found() {
        let err = CommonError::io(
            "missing.js",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, CommonError::FileNotFound(_)));
        assert_eq!(err.to_string(), "File not found: missing.js");
    }

    #[test]
    fn test_other_io_errors_keep_source() {
        let err = CommonError::io(
            "locked.js",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "IO error on locked.js: denied");
    }
}
