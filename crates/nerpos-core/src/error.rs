use thiserror::Error;

/// Top-level error type for the nerpos-core crate and dependents.
///
/// Alignment itself never fails; these variants cover configuration
/// validation and loading only.
#[derive(Debug, Error)]
pub enum NerPosError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, NerPosError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_message() {
        let err = NerPosError::InvalidConfig("threshold must be within [0, 1]".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: threshold must be within [0, 1]"
        );
    }

    #[test]
    fn serde_error_converts() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json");
        let err: NerPosError = parse.unwrap_err().into();
        assert!(matches!(err, NerPosError::Serialization(_)));
    }
}
