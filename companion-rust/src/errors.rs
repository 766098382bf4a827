use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?} (expected whole seconds)")]
    InvalidDuration { name: &'static str, value: String },
    #[error("{name} must be greater than zero")]
    ZeroDuration { name: &'static str },
}
