/// Result alias that carries the custom [`PluckyError`] type.
pub type Result<T> = std::result::Result<T, PluckyError>;

/// Common error type for the core crate.
///
/// Only the configuration provider and the command line boundary produce
/// errors. The animation engine itself is pure arithmetic and never fails.
#[derive(Debug, thiserror::Error)]
pub enum PluckyError {
    /// A configuration value is outside the range the engine expects.
    #[error("invalid `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
    /// The attribute name does not correspond to a configuration field.
    #[error("unknown attribute `{0}`")]
    UnknownAttribute(String),
    /// The attribute value could not be read as a number.
    #[error("attribute `{name}` expects a number, got `{value}`")]
    InvalidNumber { name: String, value: String },
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Wrapper around JSON (de)serialisation errors.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl PluckyError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for PluckyError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for PluckyError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_invalid_config() {
        let err = PluckyError::InvalidConfig {
            field: "pull-duration",
            reason: "must be positive",
        };
        assert_eq!(format!("{err}"), "invalid `pull-duration`: must be positive");
    }

    #[test]
    fn converts_plain_strings() {
        let err: PluckyError = "boom".into();
        assert!(matches!(err, PluckyError::Message(ref m) if m == "boom"));
    }
}
