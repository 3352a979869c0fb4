use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Target '{asset}' not found in config. Sections found: {available:?}")]
    ConfigNotFound {
        asset: String,
        available: Vec<String>,
    },

    #[error("Invalid hex byte string: {0}")]
    InvalidHex(String),

    #[error("Invalid sentinel: {0}")]
    InvalidSentinel(String),

    #[error("Failed to start scanner '{program}': {message}")]
    ScannerSpawn { program: String, message: String },

    #[error("Malformed scanner response: {0}")]
    ScannerIo(String),

    #[error("Payload production failed: {0}")]
    PayloadProduction(String),

    #[error("Failed to write {len} bytes at address {address:#x}: {message}")]
    WriteFailed {
        address: u64,
        len: usize,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Fatal errors abort the run before any memory write is attempted.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::WriteFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_failures_are_not_fatal() {
        let err = Error::WriteFailed {
            address: 0x1002,
            len: 4,
            message: "short write".to_string(),
        };
        assert!(!err.is_fatal());
        assert!(Error::ProcessNotFound("wasm4-linux".to_string()).is_fatal());
    }

    #[test]
    fn config_not_found_names_available_sections() {
        let err = Error::ConfigNotFound {
            asset: "src/missing.png".to_string(),
            available: vec!["src/sprite.png".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("src/missing.png"));
        assert!(message.contains("src/sprite.png"));
    }
}
