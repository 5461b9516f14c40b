//! ESM messages with optional IEs
//!
//! Based on 3GPP TS 24.301 Section 8.3

use bytes::{Buf, BufMut, Bytes};
use crate::catalog::{IeCatalog, IeEntry};
use crate::codec::EsmMessageBody;
use crate::error::{NasError, NasResult};
use crate::ie::{
    ensure_capacity, ExtendedProtocolConfigurationOptions, InformationElement, NbifomContainer,
    ProtocolConfigurationOptions,
};
use crate::presence::PresenceMask;
use crate::types::{EsmCause, GprsTimer3, WlanOffloadAcceptability};

/// ESM message type: Deactivate EPS Bearer Context Request
pub const DEACTIVATE_EPS_BEARER_CONTEXT_REQUEST: u8 = 0xCD;
/// ESM message type: Deactivate EPS Bearer Context Accept
pub const DEACTIVATE_EPS_BEARER_CONTEXT_ACCEPT: u8 = 0xCE;

/// Deactivate EPS Bearer Context Accept message (TS 24.301 Section 8.3.11)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeactivateEpsBearerContextAccept {
    /// Presence mask
    pub presencemask: PresenceMask,
    /// Protocol configuration options
    pub protocol_configuration_options: ProtocolConfigurationOptions,
}

impl DeactivateEpsBearerContextAccept {
    pub const PROTOCOL_CONFIGURATION_OPTIONS_IEI: u8 = 0x27;

    pub const PROTOCOL_CONFIGURATION_OPTIONS_PRESENT: u8 = 0;

    /// Protocol configuration options, if present
    pub fn protocol_configuration_options(&self) -> Option<&ProtocolConfigurationOptions> {
        self.presencemask
            .contains(Self::PROTOCOL_CONFIGURATION_OPTIONS_PRESENT)
            .then_some(&self.protocol_configuration_options)
    }

    /// Set protocol configuration options
    pub fn set_protocol_configuration_options(&mut self, pco: ProtocolConfigurationOptions) {
        self.protocol_configuration_options = pco;
        self.presencemask.set(Self::PROTOCOL_CONFIGURATION_OPTIONS_PRESENT);
    }
}

fn accept_decode_pco(msg: &mut DeactivateEpsBearerContextAccept, buf: &mut Bytes) -> NasResult<()> {
    msg.protocol_configuration_options = ProtocolConfigurationOptions::decode_ie(
        buf,
        Some(DeactivateEpsBearerContextAccept::PROTOCOL_CONFIGURATION_OPTIONS_IEI),
    )?;
    Ok(())
}

fn accept_encode_pco(msg: &DeactivateEpsBearerContextAccept, buf: &mut dyn BufMut) -> NasResult<usize> {
    msg.protocol_configuration_options.encode_ie(
        buf,
        Some(DeactivateEpsBearerContextAccept::PROTOCOL_CONFIGURATION_OPTIONS_IEI),
    )
}

static ACCEPT_IES: [IeEntry<DeactivateEpsBearerContextAccept>; 1] = [IeEntry {
    name: ProtocolConfigurationOptions::NAME,
    iei: DeactivateEpsBearerContextAccept::PROTOCOL_CONFIGURATION_OPTIONS_IEI,
    format: ProtocolConfigurationOptions::FORMAT,
    presence_bit: DeactivateEpsBearerContextAccept::PROTOCOL_CONFIGURATION_OPTIONS_PRESENT,
    decode: accept_decode_pco,
    encode: accept_encode_pco,
}];

static ACCEPT_CATALOG: IeCatalog<DeactivateEpsBearerContextAccept> = IeCatalog::new(&ACCEPT_IES);

impl EsmMessageBody for DeactivateEpsBearerContextAccept {
    const NAME: &'static str = "Deactivate EPS Bearer Context Accept";
    const MESSAGE_TYPE: u8 = DEACTIVATE_EPS_BEARER_CONTEXT_ACCEPT;
    const MINIMUM_LENGTH: usize = 0;

    fn catalog() -> &'static IeCatalog<Self> {
        &ACCEPT_CATALOG
    }

    fn presence(&self) -> PresenceMask {
        self.presencemask
    }

    fn presence_mut(&mut self) -> &mut PresenceMask {
        &mut self.presencemask
    }
}

/// Deactivate EPS Bearer Context Request message (TS 24.301 Section 8.3.12)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeactivateEpsBearerContextRequest {
    /// ESM cause, kept raw so that unknown values round-trip
    pub esm_cause: u8,
    /// Presence mask
    pub presencemask: PresenceMask,
    /// Protocol configuration options
    pub protocol_configuration_options: ProtocolConfigurationOptions,
    /// T3396 value
    pub t3396_value: GprsTimer3,
    /// WLAN offload indication
    pub wlan_offload_indication: WlanOffloadAcceptability,
    /// NBIFOM container
    pub nbifom_container: NbifomContainer,
    /// Extended protocol configuration options
    pub extended_protocol_configuration_options: ExtendedProtocolConfigurationOptions,
}

impl DeactivateEpsBearerContextRequest {
    pub const PROTOCOL_CONFIGURATION_OPTIONS_IEI: u8 = 0x27;
    pub const T3396_VALUE_IEI: u8 = 0x37;
    pub const WLAN_OFFLOAD_INDICATION_IEI: u8 = 0xC0;
    pub const NBIFOM_CONTAINER_IEI: u8 = 0x33;
    pub const EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS_IEI: u8 = 0x7B;

    pub const PROTOCOL_CONFIGURATION_OPTIONS_PRESENT: u8 = 0;
    pub const T3396_VALUE_PRESENT: u8 = 1;
    pub const WLAN_OFFLOAD_INDICATION_PRESENT: u8 = 2;
    pub const EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS_PRESENT: u8 = 3;
    pub const NBIFOM_CONTAINER_PRESENT: u8 = 4;

    /// Create a request with the given cause and no optional IE
    pub fn new(esm_cause: EsmCause) -> Self {
        Self {
            esm_cause: esm_cause as u8,
            ..Default::default()
        }
    }

    /// ESM cause, if it is a known value
    pub fn cause(&self) -> NasResult<EsmCause> {
        EsmCause::try_from(self.esm_cause)
    }

    pub fn protocol_configuration_options(&self) -> Option<&ProtocolConfigurationOptions> {
        self.presencemask
            .contains(Self::PROTOCOL_CONFIGURATION_OPTIONS_PRESENT)
            .then_some(&self.protocol_configuration_options)
    }

    pub fn set_protocol_configuration_options(&mut self, pco: ProtocolConfigurationOptions) {
        self.protocol_configuration_options = pco;
        self.presencemask.set(Self::PROTOCOL_CONFIGURATION_OPTIONS_PRESENT);
    }

    pub fn t3396_value(&self) -> Option<&GprsTimer3> {
        self.presencemask
            .contains(Self::T3396_VALUE_PRESENT)
            .then_some(&self.t3396_value)
    }

    pub fn set_t3396_value(&mut self, timer: GprsTimer3) {
        self.t3396_value = timer;
        self.presencemask.set(Self::T3396_VALUE_PRESENT);
    }

    pub fn wlan_offload_indication(&self) -> Option<&WlanOffloadAcceptability> {
        self.presencemask
            .contains(Self::WLAN_OFFLOAD_INDICATION_PRESENT)
            .then_some(&self.wlan_offload_indication)
    }

    pub fn set_wlan_offload_indication(&mut self, indication: WlanOffloadAcceptability) {
        self.wlan_offload_indication = indication;
        self.presencemask.set(Self::WLAN_OFFLOAD_INDICATION_PRESENT);
    }

    pub fn nbifom_container(&self) -> Option<&NbifomContainer> {
        self.presencemask
            .contains(Self::NBIFOM_CONTAINER_PRESENT)
            .then_some(&self.nbifom_container)
    }

    pub fn set_nbifom_container(&mut self, nbifom: NbifomContainer) {
        self.nbifom_container = nbifom;
        self.presencemask.set(Self::NBIFOM_CONTAINER_PRESENT);
    }

    pub fn extended_protocol_configuration_options(
        &self,
    ) -> Option<&ExtendedProtocolConfigurationOptions> {
        self.presencemask
            .contains(Self::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS_PRESENT)
            .then_some(&self.extended_protocol_configuration_options)
    }

    pub fn set_extended_protocol_configuration_options(
        &mut self,
        epco: ExtendedProtocolConfigurationOptions,
    ) {
        self.extended_protocol_configuration_options = epco;
        self.presencemask.set(Self::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS_PRESENT);
    }
}

type Request = DeactivateEpsBearerContextRequest;

fn request_decode_pco(msg: &mut Request, buf: &mut Bytes) -> NasResult<()> {
    msg.protocol_configuration_options =
        ProtocolConfigurationOptions::decode_ie(buf, Some(Request::PROTOCOL_CONFIGURATION_OPTIONS_IEI))?;
    Ok(())
}

fn request_encode_pco(msg: &Request, buf: &mut dyn BufMut) -> NasResult<usize> {
    msg.protocol_configuration_options
        .encode_ie(buf, Some(Request::PROTOCOL_CONFIGURATION_OPTIONS_IEI))
}

fn request_decode_t3396(msg: &mut Request, buf: &mut Bytes) -> NasResult<()> {
    msg.t3396_value = GprsTimer3::decode_ie(buf, Some(Request::T3396_VALUE_IEI))?;
    Ok(())
}

fn request_encode_t3396(msg: &Request, buf: &mut dyn BufMut) -> NasResult<usize> {
    msg.t3396_value.encode_ie(buf, Some(Request::T3396_VALUE_IEI))
}

fn request_decode_wlan(msg: &mut Request, buf: &mut Bytes) -> NasResult<()> {
    msg.wlan_offload_indication =
        WlanOffloadAcceptability::decode_ie(buf, Some(Request::WLAN_OFFLOAD_INDICATION_IEI))?;
    Ok(())
}

fn request_encode_wlan(msg: &Request, buf: &mut dyn BufMut) -> NasResult<usize> {
    msg.wlan_offload_indication
        .encode_ie(buf, Some(Request::WLAN_OFFLOAD_INDICATION_IEI))
}

fn request_decode_nbifom(msg: &mut Request, buf: &mut Bytes) -> NasResult<()> {
    msg.nbifom_container = NbifomContainer::decode_ie(buf, Some(Request::NBIFOM_CONTAINER_IEI))?;
    Ok(())
}

fn request_encode_nbifom(msg: &Request, buf: &mut dyn BufMut) -> NasResult<usize> {
    msg.nbifom_container.encode_ie(buf, Some(Request::NBIFOM_CONTAINER_IEI))
}

fn request_decode_epco(msg: &mut Request, buf: &mut Bytes) -> NasResult<()> {
    msg.extended_protocol_configuration_options = ExtendedProtocolConfigurationOptions::decode_ie(
        buf,
        Some(Request::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS_IEI),
    )?;
    Ok(())
}

fn request_encode_epco(msg: &Request, buf: &mut dyn BufMut) -> NasResult<usize> {
    msg.extended_protocol_configuration_options
        .encode_ie(buf, Some(Request::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS_IEI))
}

// Bit numbers are fixed per IE; entry order follows the message definition
static REQUEST_IES: [IeEntry<Request>; 5] = [
    IeEntry {
        name: ProtocolConfigurationOptions::NAME,
        iei: Request::PROTOCOL_CONFIGURATION_OPTIONS_IEI,
        format: ProtocolConfigurationOptions::FORMAT,
        presence_bit: Request::PROTOCOL_CONFIGURATION_OPTIONS_PRESENT,
        decode: request_decode_pco,
        encode: request_encode_pco,
    },
    IeEntry {
        name: "T3396 value",
        iei: Request::T3396_VALUE_IEI,
        format: GprsTimer3::FORMAT,
        presence_bit: Request::T3396_VALUE_PRESENT,
        decode: request_decode_t3396,
        encode: request_encode_t3396,
    },
    IeEntry {
        name: WlanOffloadAcceptability::NAME,
        iei: Request::WLAN_OFFLOAD_INDICATION_IEI,
        format: WlanOffloadAcceptability::FORMAT,
        presence_bit: Request::WLAN_OFFLOAD_INDICATION_PRESENT,
        decode: request_decode_wlan,
        encode: request_encode_wlan,
    },
    IeEntry {
        name: NbifomContainer::NAME,
        iei: Request::NBIFOM_CONTAINER_IEI,
        format: NbifomContainer::FORMAT,
        presence_bit: Request::NBIFOM_CONTAINER_PRESENT,
        decode: request_decode_nbifom,
        encode: request_encode_nbifom,
    },
    IeEntry {
        name: ExtendedProtocolConfigurationOptions::NAME,
        iei: Request::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS_IEI,
        format: ExtendedProtocolConfigurationOptions::FORMAT,
        presence_bit: Request::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS_PRESENT,
        decode: request_decode_epco,
        encode: request_encode_epco,
    },
];

static REQUEST_CATALOG: IeCatalog<Request> = IeCatalog::new(&REQUEST_IES);

impl EsmMessageBody for DeactivateEpsBearerContextRequest {
    const NAME: &'static str = "Deactivate EPS Bearer Context Request";
    const MESSAGE_TYPE: u8 = DEACTIVATE_EPS_BEARER_CONTEXT_REQUEST;
    const MINIMUM_LENGTH: usize = 1;

    fn catalog() -> &'static IeCatalog<Self> {
        &REQUEST_CATALOG
    }

    fn presence(&self) -> PresenceMask {
        self.presencemask
    }

    fn presence_mut(&mut self) -> &mut PresenceMask {
        &mut self.presencemask
    }

    fn decode_mandatory(&mut self, buf: &mut Bytes) -> NasResult<usize> {
        if !buf.has_remaining() {
            return Err(NasError::MalformedInput { minimum: Self::MINIMUM_LENGTH, actual: 0 });
        }
        self.esm_cause = buf.get_u8();
        Ok(1)
    }

    fn encode_mandatory(&self, buf: &mut dyn BufMut) -> NasResult<usize> {
        ensure_capacity(buf, 1)?;
        buf.put_u8(self.esm_cause);
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;
    use crate::config::DecodeConfig;
    use crate::ie::{pco_id, IeFormat, PcoContainer};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_catalogs_are_consistent() {
        assert_eq!(DeactivateEpsBearerContextAccept::catalog().validate(), Ok(()));
        assert_eq!(DeactivateEpsBearerContextRequest::catalog().validate(), Ok(()));
        assert_eq!(DeactivateEpsBearerContextRequest::catalog().presence_mask().bits(), 0x1F);
    }

    #[test]
    fn test_message_types() {
        assert_eq!(DeactivateEpsBearerContextRequest::MESSAGE_TYPE, 0xCD);
        assert_eq!(DeactivateEpsBearerContextAccept::MESSAGE_TYPE, 0xCE);
    }

    #[test]
    fn test_catalog_formats_match_iei_range() {
        for entry in DeactivateEpsBearerContextRequest::catalog().entries() {
            assert_eq!(entry.format == IeFormat::TypeOnly, entry.iei >= 0x80, "{}", entry.name);
        }
    }

    #[test]
    fn test_accept_decode_pco() {
        init_logger();
        let mut msg = DeactivateEpsBearerContextAccept::default();
        let mut buf = Bytes::from_static(&[0x27, 0x03, 0x01, 0x02, 0x03]);
        let decoded = msg.decode(&mut buf).unwrap();

        assert_eq!(decoded, 5);
        assert!(buf.is_empty());
        assert!(msg.presencemask.contains(DeactivateEpsBearerContextAccept::PROTOCOL_CONFIGURATION_OPTIONS_PRESENT));
        assert_eq!(
            msg.protocol_configuration_options().map(|pco| pco.value.as_ref()),
            Some(&[0x01, 0x02, 0x03][..])
        );
    }

    #[test]
    fn test_accept_decode_empty() {
        let mut msg = DeactivateEpsBearerContextAccept::default();
        let mut buf = Bytes::new();
        assert_eq!(msg.decode(&mut buf).unwrap(), 0);
        assert!(msg.presencemask.is_empty());
        assert!(msg.protocol_configuration_options().is_none());
    }

    #[test]
    fn test_accept_unexpected_iei_type_only_range() {
        init_logger();
        let mut msg = DeactivateEpsBearerContextAccept::default();
        let mut buf = Bytes::from_static(&[0x99, 0x01, 0x02]);
        let err = msg.decode(&mut buf).unwrap_err();

        assert_eq!(err, NasError::UnexpectedIei(0x99));
        // Nothing consumed
        assert_eq!(buf.len(), 3);
        assert!(msg.presencemask.is_empty());
    }

    #[test]
    fn test_accept_unexpected_iei_after_pco() {
        let mut msg = DeactivateEpsBearerContextAccept::default();
        let mut buf = Bytes::from_static(&[0x27, 0x01, 0x80, 0x37, 0x01, 0x00]);
        let err = msg.decode(&mut buf).unwrap_err();

        assert_eq!(err, NasError::UnexpectedIei(0x37));
        // IEs processed before the failure keep their presence bit
        assert!(msg.protocol_configuration_options().is_some());
        assert_eq!(buf.as_ref(), &[0x37, 0x01, 0x00]);
    }

    #[test]
    fn test_accept_truncated_pco_propagated() {
        let mut msg = DeactivateEpsBearerContextAccept::default();
        let mut buf = Bytes::from_static(&[0x27, 0x04, 0x80, 0x00]);
        let err = msg.decode(&mut buf).unwrap_err();

        assert!(matches!(
            err,
            NasError::SubIeDecode { ie: ProtocolConfigurationOptions::NAME, .. }
        ));
        assert!(msg.presencemask.is_empty());
    }

    #[test]
    fn test_accept_encode() {
        let mut msg = DeactivateEpsBearerContextAccept::default();
        msg.set_protocol_configuration_options(ProtocolConfigurationOptions::new(vec![0x01, 0x02, 0x03]));

        let mut buf = BytesMut::new();
        assert_eq!(msg.encode(&mut buf).unwrap(), 5);
        assert_eq!(buf.as_ref(), &[0x27, 0x03, 0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_accept_encode_nothing_present() {
        let mut msg = DeactivateEpsBearerContextAccept::default();
        // Slot content without its presence bit is not encoded
        msg.protocol_configuration_options = ProtocolConfigurationOptions::new(vec![0x80]);
        assert!(msg.to_bytes().unwrap().is_empty());
    }

    #[test]
    fn test_accept_encode_into_slice() {
        let mut msg = DeactivateEpsBearerContextAccept::default();
        msg.set_protocol_configuration_options(ProtocolConfigurationOptions::new(vec![0x80]));

        let mut storage = [0u8; 8];
        let mut out = &mut storage[..];
        assert_eq!(msg.encode(&mut out).unwrap(), 3);
        assert_eq!(&storage[..3], &[0x27, 0x01, 0x80]);

        let mut small = [0u8; 2];
        let mut out = &mut small[..];
        assert_eq!(
            msg.encode(&mut out).unwrap_err(),
            NasError::BufferTooSmall { needed: 3, available: 2 }
        );
    }

    #[test]
    fn test_accept_pco_containers_roundtrip() {
        let pco = ProtocolConfigurationOptions::from_containers(&[
            PcoContainer::new(pco_id::DNS_SERVER_IPV4_ADDRESS_REQUEST, Bytes::new()),
            PcoContainer::new(pco_id::P_CSCF_IPV4_ADDRESS_REQUEST, Bytes::new()),
        ])
        .unwrap();
        let mut msg = DeactivateEpsBearerContextAccept::default();
        msg.set_protocol_configuration_options(pco);

        let bytes = msg.to_bytes().unwrap().freeze();
        let decoded = DeactivateEpsBearerContextAccept::from_bytes(bytes).unwrap();
        assert_eq!(decoded, msg);

        let containers = decoded.protocol_configuration_options().unwrap().containers().unwrap();
        assert_eq!(containers.len(), 2);
        assert_eq!(containers[1].id, pco_id::P_CSCF_IPV4_ADDRESS_REQUEST);
    }

    #[test]
    fn test_request_decode_all_ies() {
        init_logger();
        let mut msg = DeactivateEpsBearerContextRequest::default();
        let mut buf = Bytes::from_static(&[
            0x24, // ESM cause: regular deactivation
            0x27, 0x01, 0x80, // PCO
            0x37, 0x01, 0x65, // T3396 value
            0xC1, // WLAN offload indication
            0x33, 0x02, 0x01, 0x00, // NBIFOM container
            0x7B, 0x00, 0x01, 0x80, // Extended PCO
        ]);
        assert_eq!(msg.decode(&mut buf).unwrap(), 16);

        assert_eq!(msg.cause().unwrap(), EsmCause::RegularDeactivation);
        assert_eq!(msg.presencemask.bits(), 0x1F);
        assert_eq!(msg.protocol_configuration_options().unwrap().value.as_ref(), &[0x80]);
        assert_eq!(msg.t3396_value(), Some(&GprsTimer3::new(GprsTimer3::UNIT_2_SECONDS, 5)));
        assert_eq!(
            msg.wlan_offload_indication(),
            Some(&WlanOffloadAcceptability { e_utran: true, utran: false })
        );
        assert_eq!(msg.nbifom_container().unwrap().value.as_ref(), &[0x01, 0x00]);
        assert_eq!(
            msg.extended_protocol_configuration_options().unwrap().value.as_ref(),
            &[0x80]
        );
    }

    #[test]
    fn test_request_cause_only() {
        let msg = DeactivateEpsBearerContextRequest::from_bytes(Bytes::from_static(&[0x26])).unwrap();
        assert_eq!(msg.cause().unwrap(), EsmCause::NetworkFailure);
        assert!(msg.presencemask.is_empty());
    }

    #[test]
    fn test_request_unknown_cause_roundtrip() {
        let msg = DeactivateEpsBearerContextRequest::from_bytes(Bytes::from_static(&[0xFE])).unwrap();
        assert!(msg.cause().is_err());
        assert_eq!(msg.to_bytes().unwrap().as_ref(), &[0xFE]);
    }

    #[test]
    fn test_request_malformed_input() {
        let mut msg = DeactivateEpsBearerContextRequest::default();
        let mut buf = Bytes::new();
        assert_eq!(
            msg.decode(&mut buf).unwrap_err(),
            NasError::MalformedInput { minimum: 1, actual: 0 }
        );
    }

    #[test]
    fn test_request_wire_order_tolerated() {
        let mut msg = DeactivateEpsBearerContextRequest::default();
        let mut buf = Bytes::from_static(&[0x24, 0xC2, 0x37, 0x01, 0x65, 0x27, 0x01, 0x80]);
        assert_eq!(msg.decode(&mut buf).unwrap(), 8);
        assert_eq!(msg.presencemask.count(), 3);

        // Re-encoded in message definition order
        assert_eq!(
            msg.to_bytes().unwrap().as_ref(),
            &[0x24, 0x27, 0x01, 0x80, 0x37, 0x01, 0x65, 0xC2]
        );
    }

    #[test]
    fn test_request_strict_order() {
        let strict = DecodeConfig::strict();

        let mut msg = DeactivateEpsBearerContextRequest::default();
        let mut buf = Bytes::from_static(&[0x24, 0xC2, 0x27, 0x01, 0x80]);
        assert_eq!(
            msg.decode_with(&mut buf, &strict).unwrap_err(),
            NasError::OutOfOrderIe { ie: ProtocolConfigurationOptions::NAME }
        );

        let mut msg = DeactivateEpsBearerContextRequest::default();
        let mut buf = Bytes::from_static(&[0x24, 0x27, 0x01, 0x80, 0x27, 0x01, 0x80]);
        assert!(matches!(
            msg.decode_with(&mut buf, &strict),
            Err(NasError::OutOfOrderIe { .. })
        ));

        let mut msg = DeactivateEpsBearerContextRequest::default();
        let mut buf = Bytes::from_static(&[0x24, 0x7B, 0x00, 0x01, 0x80, 0x33, 0x01, 0x00]);
        assert_eq!(
            msg.decode_with(&mut buf, &strict).unwrap_err(),
            NasError::OutOfOrderIe { ie: NbifomContainer::NAME }
        );

        let mut msg = DeactivateEpsBearerContextRequest::default();
        let mut buf = Bytes::from_static(&[0x24, 0x27, 0x01, 0x80, 0xC2]);
        assert_eq!(msg.decode_with(&mut buf, &strict).unwrap(), 5);
    }

    #[test]
    fn test_request_duplicate_ie_lenient() {
        let mut msg = DeactivateEpsBearerContextRequest::default();
        let mut buf = Bytes::from_static(&[0x24, 0x37, 0x01, 0x65, 0x37, 0x01, 0xAA]);
        assert_eq!(msg.decode(&mut buf).unwrap(), 7);
        // Last occurrence wins
        assert_eq!(msg.t3396_value(), Some(&GprsTimer3::from_octet(0xAA)));
    }

    #[test]
    fn test_request_encode() {
        let mut msg = DeactivateEpsBearerContextRequest::new(EsmCause::ReactivationRequested);
        msg.set_wlan_offload_indication(WlanOffloadAcceptability { e_utran: true, utran: true });
        msg.set_t3396_value(GprsTimer3::new(GprsTimer3::UNIT_1_MINUTE, 10));
        msg.set_extended_protocol_configuration_options(ExtendedProtocolConfigurationOptions::new(vec![0x80]));
        msg.set_nbifom_container(NbifomContainer::new(vec![0x05]));

        // NBIFOM container precedes extended PCO despite its higher bit
        assert_eq!(
            msg.to_bytes().unwrap().as_ref(),
            &[0x27, 0x37, 0x01, 0xAA, 0xC3, 0x33, 0x01, 0x05, 0x7B, 0x00, 0x01, 0x80]
        );
    }

    #[test]
    fn test_request_encode_buffer_too_small() {
        let msg = DeactivateEpsBearerContextRequest::new(EsmCause::RegularDeactivation);
        let mut empty: [u8; 0] = [];
        let mut out = &mut empty[..];
        assert_eq!(
            msg.encode(&mut out).unwrap_err(),
            NasError::BufferTooSmall { needed: 1, available: 0 }
        );
    }

    #[test]
    fn test_request_encode_error_propagated() {
        let mut msg = DeactivateEpsBearerContextRequest::new(EsmCause::RegularDeactivation);
        // Empty PCO value cannot be encoded
        msg.set_protocol_configuration_options(ProtocolConfigurationOptions::default());
        assert!(matches!(
            msg.to_bytes(),
            Err(NasError::SubIeEncode { ie: ProtocolConfigurationOptions::NAME, .. })
        ));
    }

    #[test]
    fn test_decode_is_idempotent() {
        let bytes = Bytes::from_static(&[0x24, 0x27, 0x02, 0x80, 0x00, 0xC1]);
        let first = DeactivateEpsBearerContextRequest::from_bytes(bytes.clone()).unwrap();
        let second = DeactivateEpsBearerContextRequest::from_bytes(bytes).unwrap();
        assert_eq!(first, second);
    }
}
