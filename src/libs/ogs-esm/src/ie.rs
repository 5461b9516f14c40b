//! ESM Information Elements
//!
//! Sub-codecs for the IEs carried in the optional part of ESM messages.
//! Based on 3GPP TS 24.301 Section 9.9.4 and TS 24.008 Section 10.5.6.3

use bytes::{Buf, BufMut, Bytes};
use crate::error::{NasError, NasResult};

/// IE format (TS 24.007 Section 11.2.1.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IeFormat {
    /// Type 1 TV: 4-bit IEI in the high nibble, value in the low nibble
    TypeOnly,
    /// Type 4 TLV: 1-octet length
    Tlv,
    /// Type 6 TLV-E: 2-octet length
    TlvE,
}

impl IeFormat {
    /// Octets taken by the IEI and length fields on the optional path
    pub const fn header_len(&self) -> usize {
        match self {
            IeFormat::TypeOnly => 0,
            IeFormat::Tlv => 2,
            IeFormat::TlvE => 3,
        }
    }
}

/// Effective IEI of a raw IEI octet.
///
/// From 0x80 upwards only the high nibble identifies the IE, the low nibble
/// carries its value.
pub const fn effective_iei(raw: u8) -> u8 {
    if raw >= 0x80 { raw & 0xF0 } else { raw }
}

/// Decode/encode contract of a single IE.
///
/// `iei` is `Some` on the optional path: the IEI octet is present in the
/// buffer and must match. `None` decodes the mandatory form (no IEI).
pub trait InformationElement: Sized {
    /// IE name used in errors and logs
    const NAME: &'static str;
    /// Wire format on the optional path
    const FORMAT: IeFormat;

    /// Decode the IE, advancing `buf` past it
    fn decode_ie(buf: &mut Bytes, iei: Option<u8>) -> NasResult<Self>;

    /// Encode the IE, returning the number of bytes written
    fn encode_ie(&self, buf: &mut dyn BufMut, iei: Option<u8>) -> NasResult<usize>;
}

/// Consume and check the IEI octet on the optional path.
pub(crate) fn decode_iei(buf: &mut Bytes, iei: Option<u8>, ie: &'static str) -> NasResult<()> {
    let Some(expected) = iei else {
        return Ok(());
    };
    if !buf.has_remaining() {
        return Err(NasError::decode(ie, "missing IEI"));
    }
    let actual = buf.chunk()[0];
    if effective_iei(actual) != expected {
        return Err(NasError::WrongIei { ie, expected, actual });
    }
    buf.advance(1);
    Ok(())
}

/// Fail with `BufferTooSmall` unless `needed` bytes fit.
pub(crate) fn ensure_capacity(buf: &dyn BufMut, needed: usize) -> NasResult<()> {
    let available = buf.remaining_mut();
    if available < needed {
        return Err(NasError::BufferTooSmall { needed, available });
    }
    Ok(())
}

/// Decode a value with a 1-octet length prefix
fn decode_lv(buf: &mut Bytes, ie: &'static str, min: usize, max: usize) -> NasResult<Bytes> {
    if !buf.has_remaining() {
        return Err(NasError::decode(ie, "missing length"));
    }
    let len = buf.get_u8() as usize;
    decode_value(buf, ie, len, min, max)
}

/// Encode a value with a 1-octet length prefix, IEI first on the optional path
fn encode_lv(
    buf: &mut dyn BufMut,
    iei: Option<u8>,
    ie: &'static str,
    value: &[u8],
    min: usize,
    max: usize,
) -> NasResult<usize> {
    let len = value.len();
    if !(min..=max).contains(&len) {
        return Err(NasError::encode(ie, format!("invalid value length {len}")));
    }
    let needed = usize::from(iei.is_some()) + 1 + len;
    ensure_capacity(buf, needed)?;

    if let Some(iei) = iei {
        buf.put_u8(iei);
    }
    buf.put_u8(len as u8);
    buf.put_slice(value);
    Ok(needed)
}

/// Decode a value with a 2-octet length prefix
fn decode_lve(buf: &mut Bytes, ie: &'static str, min: usize, max: usize) -> NasResult<Bytes> {
    if buf.remaining() < 2 {
        return Err(NasError::decode(ie, "missing length"));
    }
    let len = buf.get_u16() as usize;
    decode_value(buf, ie, len, min, max)
}

fn decode_value(buf: &mut Bytes, ie: &'static str, len: usize, min: usize, max: usize) -> NasResult<Bytes> {
    if len < min || len > max {
        return Err(NasError::decode(ie, format!("invalid length {len}, allowed {min}..={max}")));
    }
    if buf.remaining() < len {
        return Err(NasError::decode(
            ie,
            format!("truncated value: length {len}, {} bytes left", buf.remaining()),
        ));
    }
    Ok(buf.copy_to_bytes(len))
}

/// PCO configuration protocol: PPP for use with IP PDP type or IP PDN type
pub const PCO_CONFIGURATION_PROTOCOL_PPP: u8 = 0;
/// PCO extension bit, always set
pub const PCO_EXT: u8 = 0x80;

/// PCO protocol and container identifiers (TS 24.008 Table 10.5.154)
pub mod pco_id {
    pub const IPCP: u16 = 0x8021;
    pub const PAP: u16 = 0xC023;
    pub const CHAP: u16 = 0xC223;
    pub const P_CSCF_IPV6_ADDRESS_REQUEST: u16 = 0x0001;
    pub const DNS_SERVER_IPV6_ADDRESS_REQUEST: u16 = 0x0003;
    pub const IP_ADDRESS_ALLOCATION_VIA_NAS_SIGNALLING: u16 = 0x000A;
    pub const P_CSCF_IPV4_ADDRESS_REQUEST: u16 = 0x000C;
    pub const DNS_SERVER_IPV4_ADDRESS_REQUEST: u16 = 0x000D;
    pub const IPV4_LINK_MTU_REQUEST: u16 = 0x0010;
}

/// One protocol or container entry of a PCO value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PcoContainer {
    /// Protocol or container identifier
    pub id: u16,
    /// Contents, at most 255 octets
    pub contents: Bytes,
}

impl PcoContainer {
    pub fn new(id: u16, contents: impl Into<Bytes>) -> Self {
        Self { id, contents: contents.into() }
    }
}

/// Parse the configuration protocol octet followed by the container list
fn parse_containers(value: &[u8], ie: &'static str) -> NasResult<Vec<PcoContainer>> {
    let mut buf = Bytes::copy_from_slice(value);
    if !buf.has_remaining() {
        return Err(NasError::decode(ie, "empty value"));
    }
    buf.advance(1);

    let mut containers = Vec::new();
    while buf.has_remaining() {
        if buf.remaining() < 3 {
            return Err(NasError::decode(ie, "truncated container header"));
        }
        let id = buf.get_u16();
        let len = buf.get_u8() as usize;
        if buf.remaining() < len {
            return Err(NasError::decode(
                ie,
                format!("container {id:#06x} truncated: length {len}, {} bytes left", buf.remaining()),
            ));
        }
        containers.push(PcoContainer { id, contents: buf.copy_to_bytes(len) });
    }
    Ok(containers)
}

/// Build a value from the configuration protocol octet and containers
fn build_value(
    containers: &[PcoContainer],
    max: usize,
    ie: &'static str,
) -> NasResult<Bytes> {
    let mut value = Vec::with_capacity(1 + containers.iter().map(|c| 3 + c.contents.len()).sum::<usize>());
    value.push(PCO_EXT | PCO_CONFIGURATION_PROTOCOL_PPP);
    for container in containers {
        if container.contents.len() > u8::MAX as usize {
            return Err(NasError::encode(
                ie,
                format!("container {:#06x} too long: {}", container.id, container.contents.len()),
            ));
        }
        value.put_u16(container.id);
        value.put_u8(container.contents.len() as u8);
        value.put_slice(&container.contents);
    }
    if value.len() > max {
        return Err(NasError::encode(ie, format!("value too long: {}, maximum {max}", value.len())));
    }
    Ok(Bytes::from(value))
}

/// Protocol configuration options (TS 24.008 Section 10.5.6.3)
///
/// The value is kept as received so that payloads this crate does not
/// interpret are re-encoded unchanged. [`Self::containers`] gives the
/// structured view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProtocolConfigurationOptions {
    /// Value octets (configuration protocol octet and containers)
    pub value: Bytes,
}

impl ProtocolConfigurationOptions {
    /// Minimum value length
    pub const MIN_LEN: usize = 1;
    /// Maximum value length (IE is at most 253 octets)
    pub const MAX_LEN: usize = 251;

    /// Wrap raw value octets
    pub fn new(value: impl Into<Bytes>) -> Self {
        Self { value: value.into() }
    }

    /// Build PPP configuration protocol options from containers
    pub fn from_containers(containers: &[PcoContainer]) -> NasResult<Self> {
        Ok(Self { value: build_value(containers, Self::MAX_LEN, Self::NAME)? })
    }

    /// Configuration protocol, `None` for an empty value
    pub fn configuration_protocol(&self) -> Option<u8> {
        self.value.first().map(|octet| octet & 0x07)
    }

    /// Parse the protocol and container list
    pub fn containers(&self) -> NasResult<Vec<PcoContainer>> {
        parse_containers(&self.value, Self::NAME)
    }

    /// Encoded length on the optional path
    pub fn encoded_len(&self) -> usize {
        IeFormat::Tlv.header_len() + self.value.len()
    }
}

impl InformationElement for ProtocolConfigurationOptions {
    const NAME: &'static str = "protocol configuration options";
    const FORMAT: IeFormat = IeFormat::Tlv;

    fn decode_ie(buf: &mut Bytes, iei: Option<u8>) -> NasResult<Self> {
        decode_iei(buf, iei, Self::NAME)?;
        let value = decode_lv(buf, Self::NAME, Self::MIN_LEN, Self::MAX_LEN)?;
        Ok(Self { value })
    }

    fn encode_ie(&self, buf: &mut dyn BufMut, iei: Option<u8>) -> NasResult<usize> {
        encode_lv(buf, iei, Self::NAME, &self.value, Self::MIN_LEN, Self::MAX_LEN)
    }
}

/// Extended protocol configuration options (TS 24.301 Section 9.9.4.26)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtendedProtocolConfigurationOptions {
    /// Value octets (configuration protocol octet and containers)
    pub value: Bytes,
}

impl ExtendedProtocolConfigurationOptions {
    /// Minimum value length
    pub const MIN_LEN: usize = 1;
    /// Maximum value length (IE is at most 65538 octets)
    pub const MAX_LEN: usize = 65535;

    pub fn new(value: impl Into<Bytes>) -> Self {
        Self { value: value.into() }
    }

    pub fn from_containers(containers: &[PcoContainer]) -> NasResult<Self> {
        Ok(Self { value: build_value(containers, Self::MAX_LEN, Self::NAME)? })
    }

    pub fn configuration_protocol(&self) -> Option<u8> {
        self.value.first().map(|octet| octet & 0x07)
    }

    pub fn containers(&self) -> NasResult<Vec<PcoContainer>> {
        parse_containers(&self.value, Self::NAME)
    }

    pub fn encoded_len(&self) -> usize {
        IeFormat::TlvE.header_len() + self.value.len()
    }
}

impl InformationElement for ExtendedProtocolConfigurationOptions {
    const NAME: &'static str = "extended protocol configuration options";
    const FORMAT: IeFormat = IeFormat::TlvE;

    fn decode_ie(buf: &mut Bytes, iei: Option<u8>) -> NasResult<Self> {
        decode_iei(buf, iei, Self::NAME)?;
        let value = decode_lve(buf, Self::NAME, Self::MIN_LEN, Self::MAX_LEN)?;
        Ok(Self { value })
    }

    fn encode_ie(&self, buf: &mut dyn BufMut, iei: Option<u8>) -> NasResult<usize> {
        let len = self.value.len();
        if !(Self::MIN_LEN..=Self::MAX_LEN).contains(&len) {
            return Err(NasError::encode(Self::NAME, format!("invalid value length {len}")));
        }
        let needed = usize::from(iei.is_some()) + 2 + len;
        ensure_capacity(buf, needed)?;

        if let Some(iei) = iei {
            buf.put_u8(iei);
        }
        buf.put_u16(len as u16);
        buf.put_slice(&self.value);
        Ok(needed)
    }
}

/// NBIFOM container (TS 24.008 Section 10.5.6.21)
///
/// Network-based IP flow mobility parameters, carried opaquely.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NbifomContainer {
    /// Value octets
    pub value: Bytes,
}

impl NbifomContainer {
    /// Minimum value length
    pub const MIN_LEN: usize = 1;
    /// Maximum value length (IE is at most 257 octets)
    pub const MAX_LEN: usize = 255;

    pub fn new(value: impl Into<Bytes>) -> Self {
        Self { value: value.into() }
    }
}

impl InformationElement for NbifomContainer {
    const NAME: &'static str = "NBIFOM container";
    const FORMAT: IeFormat = IeFormat::Tlv;

    fn decode_ie(buf: &mut Bytes, iei: Option<u8>) -> NasResult<Self> {
        decode_iei(buf, iei, Self::NAME)?;
        let value = decode_lv(buf, Self::NAME, Self::MIN_LEN, Self::MAX_LEN)?;
        Ok(Self { value })
    }

    fn encode_ie(&self, buf: &mut dyn BufMut, iei: Option<u8>) -> NasResult<usize> {
        encode_lv(buf, iei, Self::NAME, &self.value, Self::MIN_LEN, Self::MAX_LEN)
    }
}
