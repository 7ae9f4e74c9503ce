use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Could not read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed command: {0}")]
    MalformedCommand(String),

    #[error("Hex decode error: {0}")]
    HexDecode(String),

    #[error("Message is not ASCII: byte 0x{byte:02x} at offset {offset}")]
    Encoding { offset: usize, byte: u8 },

    #[error("PEM error: {0}")]
    Pem(String),

    #[error("Key rejected: {0}")]
    KeyRejected(String),

    #[error("Key has no private exponent (d), it cannot sign")]
    MissingPrivateExponent,

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Input ended before the prompt was answered")]
    EndOfInput,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Maps an IO failure on `path` to `FileNotFound` or `FileRead`.
    pub(crate) fn reading(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound { path }
        } else {
            Error::FileRead { path, source }
        }
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::HexDecode(err.to_string())
    }
}

impl From<rsa::pkcs1::Error> for Error {
    fn from(err: rsa::pkcs1::Error) -> Self {
        Error::Pem(err.to_string())
    }
}

impl From<rsa::pkcs8::Error> for Error {
    fn from(err: rsa::pkcs8::Error) -> Self {
        Error::Pem(err.to_string())
    }
}

impl From<rsa::pkcs8::spki::Error> for Error {
    fn from(err: rsa::pkcs8::spki::Error) -> Self {
        Error::Pem(err.to_string())
    }
}

impl From<rsa::Error> for Error {
    fn from(err: rsa::Error) -> Self {
        Error::Crypto(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_maps_not_found() {
        let err = Error::reading(
            "missing.pem",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, Error::FileNotFound { .. }));
        assert_eq!(err.to_string(), "File not found: missing.pem");

        let err = Error::reading(
            "locked.pem",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, Error::FileRead { .. }));
        assert!(err.to_string().starts_with("Could not read locked.pem"));
    }

    #[test]
    fn test_hex_error_conversion() {
        let err: Error = hex::decode("abc").unwrap_err().into();
        assert!(matches!(err, Error::HexDecode(_)));
    }
}
