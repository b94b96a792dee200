use thiserror::Error;

/// Unified error type for the bashwrap library.
///
/// Only configuration loading and saving produce errors. The wrap decision
/// and the encoder are total.
#[derive(Debug, Error)]
pub enum BashwrapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BashwrapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BashwrapError = io_err.into();
        assert!(matches!(err, BashwrapError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn config_parse_error_displays_message() {
        let toml_err = toml::from_str::<toml::Value>("enabled = ").unwrap_err();
        let err: BashwrapError = toml_err.into();
        assert!(err.to_string().starts_with("Config parse error: "));
    }

    #[test]
    fn config_parse_error_converts() {
        let toml_err = toml::from_str::<toml::Value>("[invalid").unwrap_err();
        let err: BashwrapError = toml_err.into();
        assert!(matches!(err, BashwrapError::ConfigParse(_)));
    }

    #[test]
    fn json_error_converts() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: BashwrapError = json_err.into();
        assert!(matches!(err, BashwrapError::Json(_)));
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BashwrapError>();
    }
}
