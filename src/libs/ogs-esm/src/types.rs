//! ESM value types
//!
//! Based on 3GPP TS 24.301 Section 9.9.4 and TS 24.008 Section 10.5.7

use std::time::Duration;

use bytes::{Buf, BufMut, Bytes};
use crate::error::{NasError, NasResult};
use crate::ie::{decode_iei, ensure_capacity, IeFormat, InformationElement};

/// ESM cause values (TS 24.301 Section 9.9.4.4)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EsmCause {
    OperatorDeterminedBarring = 8,
    InsufficientResources = 26,
    MissingOrUnknownApn = 27,
    UnknownPdnType = 28,
    UserAuthenticationFailed = 29,
    RequestRejectedBySgwOrPgw = 30,
    RequestRejectedUnspecified = 31,
    ServiceOptionNotSupported = 32,
    RequestedServiceOptionNotSubscribed = 33,
    ServiceOptionTemporarilyOutOfOrder = 34,
    PtiAlreadyInUse = 35,
    RegularDeactivation = 36,
    EpsQosNotAccepted = 37,
    NetworkFailure = 38,
    ReactivationRequested = 39,
    SemanticErrorInTheTftOperation = 41,
    SyntacticalErrorInTheTftOperation = 42,
    InvalidEpsBearerIdentity = 43,
    SemanticErrorsInPacketFilters = 44,
    SyntacticalErrorsInPacketFilters = 45,
    PtiMismatch = 47,
    LastPdnDisconnectionNotAllowed = 49,
    PdnTypeIpv4OnlyAllowed = 50,
    PdnTypeIpv6OnlyAllowed = 51,
    SingleAddressBearersOnlyAllowed = 52,
    EsmInformationNotReceived = 53,
    PdnConnectionDoesNotExist = 54,
    MultiplePdnConnectionsForAGivenApnNotAllowed = 55,
    CollisionWithNetworkInitiatedRequest = 56,
    PdnTypeIpv4v6OnlyAllowed = 57,
    PdnTypeNonIpOnlyAllowed = 58,
    UnsupportedQciValue = 59,
    BearerHandlingNotSupported = 60,
    MaximumNumberOfEpsBearersReached = 65,
    RequestedApnNotSupportedInCurrentRatAndPlmnCombination = 66,
    InvalidPtiValue = 81,
    SemanticallyIncorrectMessage = 95,
    InvalidMandatoryInformation = 96,
    MessageTypeNonExistent = 97,
    MessageTypeNotCompatible = 98,
    InformationElementNonExistent = 99,
    ConditionalIeError = 100,
    MessageNotCompatible = 101,
    ProtocolErrorUnspecified = 111,
    ApnRestrictionValueIncompatible = 112,
    MultipleAccessesToAPdnConnectionNotAllowed = 113,
}

impl TryFrom<u8> for EsmCause {
    type Error = NasError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            8 => Ok(Self::OperatorDeterminedBarring),
            26 => Ok(Self::InsufficientResources),
            27 => Ok(Self::MissingOrUnknownApn),
            28 => Ok(Self::UnknownPdnType),
            29 => Ok(Self::UserAuthenticationFailed),
            30 => Ok(Self::RequestRejectedBySgwOrPgw),
            31 => Ok(Self::RequestRejectedUnspecified),
            32 => Ok(Self::ServiceOptionNotSupported),
            33 => Ok(Self::RequestedServiceOptionNotSubscribed),
            34 => Ok(Self::ServiceOptionTemporarilyOutOfOrder),
            35 => Ok(Self::PtiAlreadyInUse),
            36 => Ok(Self::RegularDeactivation),
            37 => Ok(Self::EpsQosNotAccepted),
            38 => Ok(Self::NetworkFailure),
            39 => Ok(Self::ReactivationRequested),
            41 => Ok(Self::SemanticErrorInTheTftOperation),
            42 => Ok(Self::SyntacticalErrorInTheTftOperation),
            43 => Ok(Self::InvalidEpsBearerIdentity),
            44 => Ok(Self::SemanticErrorsInPacketFilters),
            45 => Ok(Self::SyntacticalErrorsInPacketFilters),
            47 => Ok(Self::PtiMismatch),
            49 => Ok(Self::LastPdnDisconnectionNotAllowed),
            50 => Ok(Self::PdnTypeIpv4OnlyAllowed),
            51 => Ok(Self::PdnTypeIpv6OnlyAllowed),
            52 => Ok(Self::SingleAddressBearersOnlyAllowed),
            53 => Ok(Self::EsmInformationNotReceived),
            54 => Ok(Self::PdnConnectionDoesNotExist),
            55 => Ok(Self::MultiplePdnConnectionsForAGivenApnNotAllowed),
            56 => Ok(Self::CollisionWithNetworkInitiatedRequest),
            57 => Ok(Self::PdnTypeIpv4v6OnlyAllowed),
            58 => Ok(Self::PdnTypeNonIpOnlyAllowed),
            59 => Ok(Self::UnsupportedQciValue),
            60 => Ok(Self::BearerHandlingNotSupported),
            65 => Ok(Self::MaximumNumberOfEpsBearersReached),
            66 => Ok(Self::RequestedApnNotSupportedInCurrentRatAndPlmnCombination),
            81 => Ok(Self::InvalidPtiValue),
            95 => Ok(Self::SemanticallyIncorrectMessage),
            96 => Ok(Self::InvalidMandatoryInformation),
            97 => Ok(Self::MessageTypeNonExistent),
            98 => Ok(Self::MessageTypeNotCompatible),
            99 => Ok(Self::InformationElementNonExistent),
            100 => Ok(Self::ConditionalIeError),
            101 => Ok(Self::MessageNotCompatible),
            111 => Ok(Self::ProtocolErrorUnspecified),
            112 => Ok(Self::ApnRestrictionValueIncompatible),
            113 => Ok(Self::MultipleAccessesToAPdnConnectionNotAllowed),
            _ => Err(NasError::decode("ESM cause", format!("unknown value {value}"))),
        }
    }
}

/// GPRS timer 3 (TS 24.008 Section 10.5.7.4a)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GprsTimer3 {
    /// Timer unit (3 bits)
    pub unit: u8,
    /// Timer value (5 bits)
    pub value: u8,
}

impl GprsTimer3 {
    /// Timer unit: 10 minutes
    pub const UNIT_10_MINUTES: u8 = 0;
    /// Timer unit: 1 hour
    pub const UNIT_1_HOUR: u8 = 1;
    /// Timer unit: 10 hours
    pub const UNIT_10_HOURS: u8 = 2;
    /// Timer unit: 2 seconds
    pub const UNIT_2_SECONDS: u8 = 3;
    /// Timer unit: 30 seconds
    pub const UNIT_30_SECONDS: u8 = 4;
    /// Timer unit: 1 minute
    pub const UNIT_1_MINUTE: u8 = 5;
    /// Timer unit: 320 hours
    pub const UNIT_320_HOURS: u8 = 6;
    /// Timer unit: deactivated
    pub const UNIT_DEACTIVATED: u8 = 7;

    /// Create a new GPRS timer 3
    pub fn new(unit: u8, value: u8) -> Self {
        Self {
            unit: unit & 0x07,
            value: value & 0x1F,
        }
    }

    /// Timer value octet
    pub fn to_octet(&self) -> u8 {
        ((self.unit & 0x07) << 5) | (self.value & 0x1F)
    }

    /// Parse the timer value octet
    pub fn from_octet(octet: u8) -> Self {
        Self::new(octet >> 5, octet)
    }

    /// Timer duration, `None` if the timer is deactivated
    pub fn duration(&self) -> Option<Duration> {
        let value = u64::from(self.value & 0x1F);
        let secs = match self.unit & 0x07 {
            Self::UNIT_10_MINUTES => value * 600,
            Self::UNIT_1_HOUR => value * 3_600,
            Self::UNIT_10_HOURS => value * 36_000,
            Self::UNIT_2_SECONDS => value * 2,
            Self::UNIT_30_SECONDS => value * 30,
            Self::UNIT_1_MINUTE => value * 60,
            Self::UNIT_320_HOURS => value * 1_152_000,
            _ => return None,
        };
        Some(Duration::from_secs(secs))
    }
}

impl InformationElement for GprsTimer3 {
    const NAME: &'static str = "GPRS timer 3";
    const FORMAT: IeFormat = IeFormat::Tlv;

    fn decode_ie(buf: &mut Bytes, iei: Option<u8>) -> NasResult<Self> {
        decode_iei(buf, iei, Self::NAME)?;
        if buf.remaining() < 2 {
            return Err(NasError::decode(Self::NAME, "truncated"));
        }
        let len = buf.get_u8();
        if len != 1 {
            return Err(NasError::decode(Self::NAME, format!("invalid length {len}")));
        }
        Ok(Self::from_octet(buf.get_u8()))
    }

    fn encode_ie(&self, buf: &mut dyn BufMut, iei: Option<u8>) -> NasResult<usize> {
        let needed = usize::from(iei.is_some()) + 2;
        ensure_capacity(buf, needed)?;
        if let Some(iei) = iei {
            buf.put_u8(iei);
        }
        buf.put_u8(1);
        buf.put_u8(self.to_octet());
        Ok(needed)
    }
}

/// WLAN offload acceptability (TS 24.301 Section 9.9.4.27)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WlanOffloadAcceptability {
    /// Offloading the traffic of the PDN connection via WLAN when in S1 mode is acceptable
    pub e_utran: bool,
    /// Offloading the traffic of the PDN connection via WLAN when in Iu mode is acceptable
    pub utran: bool,
}

impl WlanOffloadAcceptability {
    /// Encode to half-byte
    pub fn encode(&self) -> u8 {
        let mut byte = 0u8;
        if self.e_utran { byte |= 0x01; }
        if self.utran { byte |= 0x02; }
        byte
    }

    /// Decode from half-byte
    pub fn decode(byte: u8) -> Self {
        Self {
            e_utran: (byte & 0x01) != 0,
            utran: (byte & 0x02) != 0,
        }
    }
}

impl InformationElement for WlanOffloadAcceptability {
    const NAME: &'static str = "WLAN offload indication";
    const FORMAT: IeFormat = IeFormat::TypeOnly;

    fn decode_ie(buf: &mut Bytes, iei: Option<u8>) -> NasResult<Self> {
        if !buf.has_remaining() {
            return Err(NasError::decode(Self::NAME, "truncated"));
        }
        let octet = buf.chunk()[0];
        // IEI and value share the octet
        decode_iei(buf, iei, Self::NAME)?;
        if iei.is_none() {
            buf.advance(1);
        }
        Ok(Self::decode(octet & 0x0F))
    }

    fn encode_ie(&self, buf: &mut dyn BufMut, iei: Option<u8>) -> NasResult<usize> {
        ensure_capacity(buf, 1)?;
        buf.put_u8((iei.unwrap_or(0) & 0xF0) | self.encode());
        Ok(1)
    }
}
