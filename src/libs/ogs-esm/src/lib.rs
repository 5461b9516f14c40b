//! NextGCore ESM Optional IE Codec
//!
//! This crate decodes and encodes the optional information elements of EPS
//! Session Management messages as specified in 3GPP TS 24.301 and TS 24.007.
//!
//! # Features
//!
//! - Static per-message IE catalogs keyed by IEI
//! - TLV scan loop for the optional part of a message
//! - Presence mask recording which optional IEs were decoded
//! - Encode driver emitting present IEs in message definition order
//! - PCO, extended PCO, NBIFOM container, GPRS timer 3 and WLAN offload
//!   indication IEs
//!
//! # Example
//!
//! ```rust
//! use bytes::Bytes;
//! use ogs_esm::prelude::*;
//!
//! let mut msg = DeactivateEpsBearerContextAccept::default();
//! let mut buf = Bytes::from_static(&[0x27, 0x03, 0x01, 0x02, 0x03]);
//! assert_eq!(msg.decode(&mut buf).unwrap(), 5);
//! assert!(msg.protocol_configuration_options().is_some());
//!
//! let encoded = msg.to_bytes().unwrap();
//! assert_eq!(encoded.as_ref(), &[0x27, 0x03, 0x01, 0x02, 0x03]);
//! ```

pub mod error;
pub mod presence;
pub mod ie;
pub mod types;
pub mod catalog;
pub mod config;
pub mod codec;
pub mod message;


pub use error::{NasError, NasResult};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{NasError, NasResult};
    pub use crate::presence::PresenceMask;
    pub use crate::ie::{
        IeFormat,
        InformationElement,
        PcoContainer,
        ProtocolConfigurationOptions,
        ExtendedProtocolConfigurationOptions,
        NbifomContainer,
    };
    pub use crate::types::{EsmCause, GprsTimer3, WlanOffloadAcceptability};
    pub use crate::catalog::{IeCatalog, IeEntry, CatalogError};
    pub use crate::config::DecodeConfig;
    pub use crate::codec::EsmMessageBody;
    pub use crate::message::{
        DeactivateEpsBearerContextAccept,
        DeactivateEpsBearerContextRequest,
    };
}
