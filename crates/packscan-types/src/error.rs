use camino::Utf8PathBuf;
use thiserror::Error;

/// Everything that can go wrong while reading or writing packscan files.
///
/// Absent optional files (settings, ledgers) never produce an error.
#[derive(Debug, Error)]
pub enum Error {
    /// Settings or manifest content that is present but malformed.
    #[error("invalid configuration in {path}: {message}")]
    Config { path: String, message: String },

    /// Deprecated-references ledger with an unexpected shape.
    #[error("invalid deprecated references in {path}: {message}")]
    LedgerFormat { path: String, message: String },

    #[error("io error on {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn config(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn ledger(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::LedgerFormat {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
