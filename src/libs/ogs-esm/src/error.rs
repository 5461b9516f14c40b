//! ESM codec error types

use thiserror::Error;

/// ESM codec error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NasError {
    /// Buffer shorter than the minimum length of the message
    #[error("Malformed input: expected at least {minimum} bytes, got {actual}")]
    MalformedInput { minimum: usize, actual: usize },

    /// IEI not valid for this message type
    #[error("Unexpected IEI: {0:#04x}")]
    UnexpectedIei(u8),

    /// IE sub-codec failed to decode its value
    #[error("Failed to decode {ie}: {reason}")]
    SubIeDecode { ie: &'static str, reason: String },

    /// IE sub-codec failed to encode its value
    #[error("Failed to encode {ie}: {reason}")]
    SubIeEncode { ie: &'static str, reason: String },

    /// IE decoded on the optional path carries another IEI
    #[error("Wrong IEI for {ie}: expected {expected:#04x}, got {actual:#04x}")]
    WrongIei { ie: &'static str, expected: u8, actual: u8 },

    /// Output buffer capacity is insufficient
    #[error("Buffer too small: needed {needed} bytes, available {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// IE received after one that follows it in the message definition
    #[error("Out of order IE: {ie}")]
    OutOfOrderIe { ie: &'static str },
}

impl NasError {
    pub(crate) fn decode(ie: &'static str, reason: impl Into<String>) -> Self {
        Self::SubIeDecode { ie, reason: reason.into() }
    }

    pub(crate) fn encode(ie: &'static str, reason: impl Into<String>) -> Self {
        Self::SubIeEncode { ie, reason: reason.into() }
    }
}

/// ESM codec result type
pub type NasResult<T> = Result<T, NasError>;
