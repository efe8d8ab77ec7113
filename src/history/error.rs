/// Persistence failure. This core treats storage as best-effort: callers
/// log the error and keep operating on in-memory state.
#[derive(Debug, Clone)]
pub enum StoreError {
    Io { message: String },
    Serialize { message: String },
}

impl StoreError {
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn serialize(message: impl Into<String>) -> Self {
        Self::Serialize {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Io { message } | Self::Serialize { message } => message,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialize(err.to_string())
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { message } => write!(f, "Io: {}", message),
            Self::Serialize { message } => write!(f, "Serialize: {}", message),
        }
    }
}

impl std::error::Error for StoreError {}
