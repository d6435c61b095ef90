//! Error types returned by the resolver and its stores.
use std::path::PathBuf;

/// Errors reported to callers of the spell-check service.
///
/// Every variant carries a stable numeric [`code`](SmartKeyError::code) and a
/// stable message; success is `Ok(..)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SmartKeyError {
    /// Unspecified internal failure, including failed saves
    #[error("General failure")]
    Failure,

    /// The service has been switched off
    #[error("Service disabled")]
    Disabled,

    /// An allocation could not be satisfied
    #[error("Insufficient memory")]
    NoMemory,

    /// The feature is not available for the active locale
    #[error("Unsupported feature")]
    Unsupported,

    /// A required argument was not supplied
    #[error("Missing parameter")]
    MissingParam,

    /// An argument was supplied but is unusable
    #[error("Invalid parameter")]
    BadParam,

    /// A word or entry failed content validation
    #[error("Invalid word")]
    BadWord,

    /// The word is already stored
    #[error("Word already exists")]
    WordExists,

    /// Nothing matched the request
    #[error("No matching words")]
    NoMatchingWords,
}

impl SmartKeyError {
    /// Stable numeric code. `0` is reserved for success.
    pub const fn code(&self) -> u32 {
        match self {
            SmartKeyError::Failure => 1,
            SmartKeyError::Disabled => 2,
            SmartKeyError::NoMemory => 3,
            SmartKeyError::Unsupported => 4,
            SmartKeyError::MissingParam => 5,
            SmartKeyError::BadParam => 6,
            SmartKeyError::WordExists => 7,
            SmartKeyError::NoMatchingWords => 8,
            SmartKeyError::BadWord => 9,
        }
    }
}

/// Errors raised while reading or writing a store file.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The file exists but could not be read
    #[error("Failed to read '{}'", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The temporary file could not be created or written
    #[error("Failed to write '{}'", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The temporary file could not be moved over the target
    #[error("Failed to replace '{}'", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(SmartKeyError::Failure.code(), 1);
        assert_eq!(SmartKeyError::NoMatchingWords.code(), 8);
        assert_eq!(SmartKeyError::BadWord.code(), 9);
    }

    #[test]
    fn messages() {
        assert_eq!(SmartKeyError::BadParam.to_string(), "Invalid parameter");
        assert_eq!(SmartKeyError::WordExists.to_string(), "Word already exists");
        assert_eq!(SmartKeyError::Disabled.to_string(), "Service disabled");
    }
}
