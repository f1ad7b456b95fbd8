// Crate-level error type.
// Only configuration loading and saving can fail; tick functions never do.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// A value that breaks a rig precondition (e.g. min distance above max distance).
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
