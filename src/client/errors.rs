use thiserror::Error;

/// Failure of a single transport call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// The server answered with a status outside 200..=299.
    #[error("{status} {status_text}")]
    Http { status: u16, status_text: String },
    /// No response was obtained at all.
    #[error("network failure: {cause}")]
    Network { cause: String },
    /// A successful response whose body is not JSON.
    #[error("invalid response body: {reason}")]
    InvalidBody { reason: String },
}

impl FlowError {
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Network { .. } | Self::InvalidBody { .. } => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::FlowError;

    #[test]
    fn http_error_displays_status_and_reason() {
        let err = FlowError::Http {
            status: 401,
            status_text: "Unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "401 Unauthorized");
        assert!(err.is_unauthorized());
        assert!(!err.is_network());
    }

    #[test]
    fn network_error_has_no_status() {
        let err = FlowError::Network {
            cause: "connection refused".to_string(),
        };
        assert_eq!(err.status(), None);
        assert!(err.is_network());
        assert_eq!(err.to_string(), "network failure: connection refused");
    }
}
