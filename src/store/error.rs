//! Record decoding errors
//!
//! Every error aborts the whole decode call; no partial records are returned.

use serde_json::error::Category;
use thiserror::Error;

/// Record decode error type
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The discriminator is missing or not registered
    #[error("unknown protocol: {0:?}")]
    UnknownProtocol(String),

    /// The buffer is not valid JSON
    #[error("malformed record: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The descriptor variant is not the one registered for its protocol
    #[error("descriptor does not match protocol {0:?}")]
    ProtocolMismatch(String),

    /// Valid JSON whose structure does not match the expected record shape
    #[error("invalid {context}: {source}")]
    Shape {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    /// Shape error with a description of where it happened
    pub fn shape(context: impl Into<String>, source: serde_json::Error) -> Self {
        DecodeError::Shape {
            context: context.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => DecodeError::shape("record", err),
            Category::Io | Category::Syntax | Category::Eof => DecodeError::Malformed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_json_errors() {
        let syntax = serde_json::from_slice::<serde_json::Value>(b"{\"servers\": [").unwrap_err();
        assert!(matches!(DecodeError::from(syntax), DecodeError::Malformed(_)));

        let data = serde_json::from_str::<u16>("\"text\"").unwrap_err();
        assert!(matches!(DecodeError::from(data), DecodeError::Shape { .. }));
    }

    #[test]
    fn test_display() {
        let err = DecodeError::UnknownProtocol("gopher".to_string());
        assert_eq!(err.to_string(), "unknown protocol: \"gopher\"");
    }
}
