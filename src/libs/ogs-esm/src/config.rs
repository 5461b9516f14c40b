//! Decoder configuration
//!
//! Deserializable so it can sit in the NAS section of an application's YAML
//! configuration.

use serde::{Deserialize, Serialize};

/// Optional IE decoding behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Reject optional IEs that are repeated or appear before an IE they
    /// follow in the message definition. Off by default: peers sending IEs
    /// out of order are accepted.
    pub strict_order: bool,
}

impl DecodeConfig {
    /// Lenient decoding
    pub const fn lenient() -> Self {
        Self { strict_order: false }
    }

    /// Decoding that enforces the message definition order
    pub const fn strict() -> Self {
        Self { strict_order: true }
    }
}
