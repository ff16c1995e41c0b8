use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid configuration for `{setting}`: `{value}` is not a recognized value")]
    InvalidConfiguration { setting: &'static str, value: String },
    #[error("domain validation failed: {message}")]
    Validation { message: String },
}

impl DomainError {
    pub fn invalid_configuration(setting: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            setting,
            value: value.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
