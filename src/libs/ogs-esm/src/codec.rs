//! Optional IE scan loop and encode driver
//!
//! Decoding follows the order IEs appear on the wire; encoding follows the
//! catalog order, whatever the bit numbering of the presence mask.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use log::{debug, trace};

use crate::catalog::IeCatalog;
use crate::config::DecodeConfig;
use crate::error::{NasError, NasResult};
use crate::presence::PresenceMask;

/// ESM message body: mandatory fields followed by optional IEs
pub trait EsmMessageBody: Default + Sized + 'static {
    /// Message name used in logs
    const NAME: &'static str;
    /// Message type (TS 24.301 Section 9.8), tagged on decode/encode logs
    const MESSAGE_TYPE: u8;
    /// Length of the mandatory fields, excluding the ESM header
    const MINIMUM_LENGTH: usize;

    /// Optional IE catalog
    fn catalog() -> &'static IeCatalog<Self>;

    fn presence(&self) -> PresenceMask;

    fn presence_mut(&mut self) -> &mut PresenceMask;

    /// Decode the mandatory fields. `buf` holds at least `MINIMUM_LENGTH` bytes.
    fn decode_mandatory(&mut self, _buf: &mut Bytes) -> NasResult<usize> {
        Ok(0)
    }

    /// Encode the mandatory fields. `buf` has room for `MINIMUM_LENGTH` bytes.
    fn encode_mandatory(&self, _buf: &mut dyn BufMut) -> NasResult<usize> {
        Ok(0)
    }

    /// Decode from `buf`, returning the number of bytes consumed
    fn decode(&mut self, buf: &mut Bytes) -> NasResult<usize> {
        decode_message(self, buf, &DecodeConfig::default())
    }

    /// Decode from `buf` with an explicit configuration
    fn decode_with(&mut self, buf: &mut Bytes, config: &DecodeConfig) -> NasResult<usize> {
        decode_message(self, buf, config)
    }

    /// Encode into `buf`, returning the number of bytes written
    fn encode(&self, buf: &mut dyn BufMut) -> NasResult<usize> {
        encode_message(self, buf)
    }

    /// Decode a whole message body
    fn from_bytes(mut buf: Bytes) -> NasResult<Self> {
        let mut msg = Self::default();
        msg.decode(&mut buf)?;
        Ok(msg)
    }

    /// Encode into a new buffer
    fn to_bytes(&self) -> NasResult<BytesMut> {
        let mut buf = BytesMut::new();
        self.encode(&mut buf)?;
        Ok(buf)
    }
}

/// Decode mandatory fields then optional IEs.
///
/// On error `msg` may be partially filled; presence bits of IEs not reached
/// stay unset.
pub fn decode_message<M: EsmMessageBody>(
    msg: &mut M,
    buf: &mut Bytes,
    config: &DecodeConfig,
) -> NasResult<usize> {
    let len = buf.remaining();
    if len < M::MINIMUM_LENGTH {
        debug!("[{}] ({:#04x}) Malformed input: {} bytes, minimum {}", M::NAME, M::MESSAGE_TYPE, len, M::MINIMUM_LENGTH);
        return Err(NasError::MalformedInput { minimum: M::MINIMUM_LENGTH, actual: len });
    }

    let mut decoded = msg.decode_mandatory(buf)?;
    decoded += decode_optional_ies(msg, buf, config)?;
    Ok(decoded)
}

/// Scan optional IEs until `buf` is exhausted
pub fn decode_optional_ies<M: EsmMessageBody>(
    msg: &mut M,
    buf: &mut Bytes,
    config: &DecodeConfig,
) -> NasResult<usize> {
    let catalog = M::catalog();
    let mut decoded = 0;
    let mut last_index: Option<usize> = None;

    while buf.has_remaining() {
        let raw = buf.chunk()[0];
        let Some((index, entry)) = catalog.lookup(raw) else {
            debug!("[{}] ({:#04x}) Unexpected IEI {:#04x} at offset {}", M::NAME, M::MESSAGE_TYPE, raw, decoded);
            return Err(NasError::UnexpectedIei(raw));
        };

        if config.strict_order && last_index.is_some_and(|last| index <= last) {
            debug!("[{}] ({:#04x}) {} out of order at offset {}", M::NAME, M::MESSAGE_TYPE, entry.name, decoded);
            return Err(NasError::OutOfOrderIe { ie: entry.name });
        }

        let before = buf.remaining();
        if let Err(err) = (entry.decode)(msg, buf) {
            debug!("[{}] ({:#04x}) {} decode failed at offset {}: {}", M::NAME, M::MESSAGE_TYPE, entry.name, decoded, err);
            return Err(err);
        }
        let consumed = before - buf.remaining();
        if consumed == 0 {
            return Err(NasError::decode(entry.name, "no bytes consumed"));
        }

        trace!("[{}] {} ({} bytes)", M::NAME, entry.name, consumed);
        decoded += consumed;
        msg.presence_mut().set(entry.presence_bit);
        last_index = Some(index);
    }

    Ok(decoded)
}

/// Encode mandatory fields then present optional IEs
pub fn encode_message<M: EsmMessageBody>(msg: &M, buf: &mut dyn BufMut) -> NasResult<usize> {
    let available = buf.remaining_mut();
    if available < M::MINIMUM_LENGTH {
        return Err(NasError::BufferTooSmall { needed: M::MINIMUM_LENGTH, available });
    }

    let mut encoded = msg.encode_mandatory(buf)?;
    encoded += encode_optional_ies(msg, buf)?;
    Ok(encoded)
}

/// Encode every optional IE whose presence bit is set, in catalog order
pub fn encode_optional_ies<M: EsmMessageBody>(msg: &M, buf: &mut dyn BufMut) -> NasResult<usize> {
    let presence = msg.presence();
    let mut encoded = 0;

    for entry in M::catalog().entries() {
        if !presence.contains(entry.presence_bit) {
            continue;
        }
        let written = (entry.encode)(msg, buf).map_err(|err| {
            debug!("[{}] ({:#04x}) {} encode failed: {}", M::NAME, M::MESSAGE_TYPE, entry.name, err);
            err
        })?;
        trace!("[{}] {} ({} bytes)", M::NAME, entry.name, written);
        encoded += written;
    }

    Ok(encoded)
}
