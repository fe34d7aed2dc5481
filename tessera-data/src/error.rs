use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum DataError {
    Io {
        path: PathBuf,
        error: Arc<std::io::Error>,
    },
    Malformed {
        path: PathBuf,
        message: String,
    },
    Serialize {
        path: PathBuf,
        message: String,
    },
    UnknownMetaType(String),
}

impl DataError {
    pub fn io(
        path: impl Into<PathBuf>,
        error: std::io::Error,
    ) -> Self {
        DataError::Io {
            path: path.into(),
            error: Arc::new(error),
        }
    }

    pub fn is_malformed(&self) -> bool {
        match self {
            DataError::Malformed { .. } => true,
            _ => false,
        }
    }

    /// Error for reading descriptor text. Contents that aren't UTF-8 are malformed, not an I/O failure.
    pub fn read(
        path: impl Into<PathBuf>,
        error: std::io::Error,
    ) -> Self {
        if error.kind() == std::io::ErrorKind::InvalidData {
            DataError::Malformed {
                path: path.into(),
                message: error.to_string(),
            }
        } else {
            DataError::io(path, error)
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            DataError::Io { error, .. } => error.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            DataError::Io { ref error, .. } => Some(&**error),
            _ => None,
        }
    }
}

impl core::fmt::Display for DataError {
    fn fmt(
        &self,
        fmt: &mut core::fmt::Formatter,
    ) -> core::fmt::Result {
        match *self {
            DataError::Io {
                ref path,
                ref error,
            } => write!(fmt, "{}: {}", path.display(), error),
            DataError::Malformed {
                ref path,
                ref message,
            } => write!(fmt, "{}: malformed descriptor: {}", path.display(), message),
            DataError::Serialize {
                ref path,
                ref message,
            } => write!(fmt, "{}: could not serialize descriptor: {}", path.display(), message),
            DataError::UnknownMetaType(ref ty) => write!(fmt, "Unknown descriptor type {:?}", ty),
        }
    }
}

pub type DataResult<T> = Result<T, DataError>;
