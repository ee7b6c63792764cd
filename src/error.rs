use thiserror::Error;

#[derive(Debug, Error)]
pub enum MedscanError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Decode error: {0}")]
    DecodeError(String),
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Remote error: {0}")]
    RemoteError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl MedscanError {
    /// True for failures that happen before anything is sent to the model.
    pub fn is_local(&self) -> bool {
        !matches!(self, MedscanError::RemoteError(_))
    }
}

impl From<std::io::Error> for MedscanError {
    fn from(err: std::io::Error) -> Self {
        MedscanError::IoError(err.to_string())
    }
}

impl From<image::ImageError> for MedscanError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => MedscanError::IoError(e.to_string()),
            other => MedscanError::DecodeError(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for MedscanError {
    fn from(err: reqwest::Error) -> Self {
        MedscanError::RemoteError(err.to_string())
    }
}

impl From<serde_json::Error> for MedscanError {
    fn from(err: serde_json::Error) -> Self {
        MedscanError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MedscanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_errors_map_to_decode() {
        let err = image::load_from_memory(b"not an image").unwrap_err();
        assert!(matches!(MedscanError::from(err), MedscanError::DecodeError(_)));
    }

    #[test]
    fn test_is_local() {
        assert!(MedscanError::DecodeError("x".into()).is_local());
        assert!(!MedscanError::RemoteError("x".into()).is_local());
    }
}
