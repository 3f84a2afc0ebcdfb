//! Error types for resource API calls

/// Failure of one resource API call
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 404
    #[error("not found: {path}")]
    NotFound {
        /// Requested path
        path: String,
    },

    /// 401 or 403
    #[error("forbidden: {path}")]
    Forbidden {
        /// Requested path
        path: String,
    },

    /// Any other non-success status
    #[error("HTTP {status} for {path}: {message}")]
    Status {
        /// Requested path
        path: String,
        /// Status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Connection, TLS or timeout failure
    #[error("transport error for {path}: {message}")]
    Transport {
        /// Requested path
        path: String,
        /// Underlying error text
        message: String,
    },

    /// Body did not match the expected schema
    #[error("failed to decode {path}: {source}")]
    Decode {
        /// Requested path
        path: String,
        /// Decoder error
        #[source]
        source: serde_json::Error,
    },

    /// Client could not be constructed
    #[error("client configuration error: {0}")]
    Config(String),

    /// Request limiter was shut down
    #[error("request limiter closed")]
    Closed,
}

impl ApiError {
    /// Not found or forbidden: the feature is treated as absent, not failed
    #[inline]
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Forbidden { .. })
    }

    /// Build the error for an HTTP status code
    #[must_use]
    pub fn from_status(path: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        let path = path.into();
        match status {
            404 => Self::NotFound { path },
            401 | 403 => Self::Forbidden { path },
            _ => Self::Status {
                path,
                status,
                message: message.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_statuses() {
        assert!(ApiError::from_status("orgs/acme", 404, "").is_absent());
        assert!(ApiError::from_status("orgs/acme", 403, "").is_absent());
        assert!(ApiError::from_status("orgs/acme", 401, "").is_absent());
        assert!(!ApiError::from_status("orgs/acme", 500, "boom").is_absent());
        assert!(!ApiError::Closed.is_absent());
    }
}
