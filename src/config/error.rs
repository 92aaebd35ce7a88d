use std::path::PathBuf;

/// Errors that can occur while loading, saving or validating a project file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Project file could not be read or written
    #[error("Failed to access project file {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or schema error
    #[error("Failed to parse project file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration could not be rendered as TOML
    #[error("Failed to serialize project file: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Semantically invalid setting
    #[error("Invalid setting {field}: {message}")]
    Invalid {
        /// Dotted setting name
        field: &'static str,
        /// What is wrong
        message: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            message: message.into(),
        }
    }
}
