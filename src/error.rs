//! Error types for the ad-insertion core

use thiserror::Error;

/// Result type alias for ad-insertion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a player around an ad break
#[derive(Error, Debug)]
pub enum Error {
    /// The host refused or failed a play request
    #[error("Playback failed: {0}")]
    Playback(String),

    /// The host could not seek to the requested position
    #[error("Seek to {0}s failed")]
    Seek(f64),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A replay scenario could not be applied
    #[error("Invalid scenario: {0}")]
    Scenario(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_detail() {
        assert_eq!(Error::Seek(12.5).to_string(), "Seek to 12.5s failed");
        assert_eq!(
            Error::Playback("blocked".into()).to_string(),
            "Playback failed: blocked"
        );
    }
}
