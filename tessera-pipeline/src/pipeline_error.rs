use std::path::PathBuf;
use std::sync::Arc;
use tessera_codegen::CodegenError;
use tessera_data::DataError;

#[derive(Debug, Clone)]
pub enum PipelineError {
    StringError(String),
    DataError(DataError),
    CodegenError(CodegenError),
    IoError {
        path: Option<PathBuf>,
        error: Arc<std::io::Error>,
    },
    JsonError(Arc<serde_json::Error>),
    GlobError(Arc<globwalk::GlobError>),
}

impl PipelineError {
    pub fn io(
        path: impl Into<PathBuf>,
        error: std::io::Error,
    ) -> Self {
        PipelineError::IoError {
            path: Some(path.into()),
            error: Arc::new(error),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            PipelineError::StringError(_) => None,
            PipelineError::DataError(ref e) => Some(e),
            PipelineError::CodegenError(ref e) => Some(e),
            PipelineError::IoError { ref error, .. } => Some(&**error),
            PipelineError::JsonError(ref e) => Some(&**e),
            PipelineError::GlobError(ref e) => Some(&**e),
        }
    }
}

impl core::fmt::Display for PipelineError {
    fn fmt(
        &self,
        fmt: &mut core::fmt::Formatter,
    ) -> core::fmt::Result {
        match *self {
            PipelineError::StringError(ref e) => write!(fmt, "{}", e),
            PipelineError::DataError(ref e) => write!(fmt, "{}", e),
            PipelineError::CodegenError(ref e) => write!(fmt, "{}", e),
            PipelineError::IoError {
                path: Some(ref path),
                ref error,
            } => write!(fmt, "{}: {}", path.display(), error),
            PipelineError::IoError {
                path: None,
                ref error,
            } => write!(fmt, "{}", error),
            PipelineError::JsonError(ref e) => write!(fmt, "{}", e),
            PipelineError::GlobError(ref e) => write!(fmt, "{}", e),
        }
    }
}

impl From<&str> for PipelineError {
    fn from(str: &str) -> Self {
        PipelineError::StringError(str.to_string())
    }
}

impl From<String> for PipelineError {
    fn from(string: String) -> Self {
        PipelineError::StringError(string)
    }
}

impl From<DataError> for PipelineError {
    fn from(error: DataError) -> Self {
        PipelineError::DataError(error)
    }
}

impl From<CodegenError> for PipelineError {
    fn from(error: CodegenError) -> Self {
        PipelineError::CodegenError(error)
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(error: std::io::Error) -> Self {
        PipelineError::IoError {
            path: None,
            error: Arc::new(error),
        }
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(error: serde_json::Error) -> Self {
        PipelineError::JsonError(Arc::new(error))
    }
}

impl From<globwalk::GlobError> for PipelineError {
    fn from(error: globwalk::GlobError) -> Self {
        PipelineError::GlobError(Arc::new(error))
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
