/// Result type alias for the application
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the application
#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    InvalidConfig(String),
    InvalidPattern { pattern: String, reason: String },
    UnknownFramework(String),
    FrameworkNotDetected,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "IO error: {}", e),
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::InvalidPattern { pattern, reason } => {
                write!(f, "Invalid path pattern '{}': {}", pattern, reason)
            }
            Error::UnknownFramework(name) => write!(
                f,
                "Unknown framework '{}' (supported: spring)",
                name
            ),
            Error::FrameworkNotDetected => write!(f, "No supported web framework detected"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

/// Reason a single endpoint was skipped during extraction.
///
/// These never abort a run: the engine logs them and continues with the next
/// method of the chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// A declaration node the strategy relies on is absent or incomplete
    MissingData { method: String, reason: String },
}

impl ExtractError {
    pub fn missing(method: &str, reason: impl Into<String>) -> Self {
        ExtractError::MissingData {
            method: method.to_string(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ExtractError::MissingData { method, reason } => {
                write!(f, "skipping endpoint {}: {}", method, reason)
            }
        }
    }
}

impl std::error::Error for ExtractError {}
