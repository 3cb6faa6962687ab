/// Uniform failure value for every API call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The request never produced an HTTP response (DNS, TLS, timeout, ...).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Input was rejected before any request was sent.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A 2xx body did not decode into the expected shape.
    #[error("decode failed: {0}")]
    Decode(String),
}

impl ClientError {
    /// Human-facing reason recorded in a status slot.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::Network(message) | Self::Validation(message) | Self::Decode(message) => message,
            Self::Api { message, .. } => message,
        }
    }
}

impl From<wire::WireError> for ClientError {
    fn from(err: wire::WireError) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
