use std::path::PathBuf;

/// Errors raised while loading, saving or validating [`crate::Settings`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, SettingsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_error_display() {
        let err = SettingsError::Invalid("bombs must be at least 1".to_string());
        assert_eq!(err.to_string(), "invalid settings: bombs must be at least 1");
    }

    #[test]
    fn read_error_display_names_path() {
        let err = SettingsError::Read {
            path: PathBuf::from("options.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            err.to_string(),
            "failed to read settings file options.json: denied"
        );
    }
}
