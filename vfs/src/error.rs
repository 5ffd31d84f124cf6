use thiserror::Error;

/// Errors that can occur while loading assets.
///
/// `Clone` so one failed load can be reported to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VfsError {
    /// The transport answered with an error status (404 for a missing file).
    #[error("failed to load {uri}: status {status}: {message}")]
    Load {
        uri: String,
        status: u16,
        message: String,
    },
    /// The request never produced a status (network or IO failure).
    #[error("transport error while loading {uri}: {message}")]
    Transport { uri: String, message: String },
    /// The URI names no asset or climbs out of the asset root with `..`.
    #[error("invalid path: {0}")]
    InvalidPath(String),
    /// The payload was loaded but could not be decoded.
    #[error("failed to decode {uri}: {message}")]
    Decode { uri: String, message: String },
    /// The URI is already cached as a value of another type.
    #[error("asset {uri} is cached with a different type")]
    TypeMismatch { uri: String },
}

impl VfsError {
    /// A missing asset.
    pub fn not_found(uri: impl Into<String>) -> Self {
        Self::Load {
            uri: uri.into(),
            status: 404,
            message: "not found".into(),
        }
    }

    /// Status code reported by the transport, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Load { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub(crate) fn from_io(uri: &str, err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(uri),
            std::io::ErrorKind::PermissionDenied => Self::Load {
                uri: uri.to_owned(),
                status: 403,
                message: err.to_string(),
            },
            _ => Self::Transport {
                uri: uri.to_owned(),
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_has_status() {
        let err = VfsError::not_found("model/cube.tml");
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.to_string(),
            "failed to load model/cube.tml: status 404: not found"
        );
    }

    #[test]
    fn io_errors_map_to_status() {
        let missing = std::io::Error::from(std::io::ErrorKind::NotFound);
        assert_eq!(VfsError::from_io("a", &missing).status(), Some(404));

        let other = std::io::Error::other("disk on fire");
        assert!(matches!(
            VfsError::from_io("a", &other),
            VfsError::Transport { .. }
        ));
    }
}
