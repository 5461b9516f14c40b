//! Optional IE catalog of a message type
//!
//! Maps an IEI octet to the routines decoding and encoding the IE into a
//! message slot, and to the presence bit recording it. Catalogs are static
//! and read-only; entry order is the order IEs are encoded in.

use bytes::{BufMut, Bytes};
use thiserror::Error;

use crate::error::NasResult;
use crate::ie::{effective_iei, IeFormat};
use crate::presence::PresenceMask;

/// Decode an IE from the front of `buf` into its message slot
pub type DecodeFn<M> = fn(&mut M, &mut Bytes) -> NasResult<()>;

/// Encode the IE from its message slot, returning the bytes written
pub type EncodeFn<M> = fn(&M, &mut dyn BufMut) -> NasResult<usize>;

/// Catalog entry of one optional IE
pub struct IeEntry<M: 'static> {
    /// IE name
    pub name: &'static str,
    /// IEI; high nibble only for type-only IEs
    pub iei: u8,
    /// Wire format
    pub format: IeFormat,
    /// Presence bit index
    pub presence_bit: u8,
    pub decode: DecodeFn<M>,
    pub encode: EncodeFn<M>,
}

/// Inconsistency found in a catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Duplicate IEI {iei:#04x} ({ie})")]
    DuplicateIei { ie: &'static str, iei: u8 },

    #[error("Duplicate presence bit {bit} ({ie})")]
    DuplicatePresenceBit { ie: &'static str, bit: u8 },

    #[error("Presence bit {bit} out of range ({ie})")]
    PresenceBitOutOfRange { ie: &'static str, bit: u8 },

    #[error("IEI {iei:#04x} does not match format {format:?} ({ie})")]
    IeiFormatMismatch { ie: &'static str, iei: u8, format: IeFormat },
}

/// Optional IE catalog of message type `M`
pub struct IeCatalog<M: 'static> {
    entries: &'static [IeEntry<M>],
}

impl<M: 'static> IeCatalog<M> {
    pub const fn new(entries: &'static [IeEntry<M>]) -> Self {
        Self { entries }
    }

    /// Entries in encoding order
    pub fn entries(&self) -> &'static [IeEntry<M>] {
        self.entries
    }

    /// Find the entry of a raw IEI octet, with its position in the catalog
    pub fn lookup(&self, raw: u8) -> Option<(usize, &'static IeEntry<M>)> {
        let iei = effective_iei(raw);
        self.entries
            .iter()
            .enumerate()
            .find(|(_, entry)| entry.iei == iei)
    }

    /// Union of all presence bits of the catalog
    pub fn presence_mask(&self) -> PresenceMask {
        let mut mask = PresenceMask::new();
        for entry in self.entries {
            mask.set(entry.presence_bit);
        }
        mask
    }

    /// Check IEI uniqueness, presence bit uniqueness and IEI/format consistency
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut ieis = [false; 256];
        let mut bits = 0u64;

        for entry in self.entries {
            let type_only = entry.format == IeFormat::TypeOnly;
            let iei_ok = if type_only {
                entry.iei >= 0x80 && entry.iei & 0x0F == 0
            } else {
                entry.iei < 0x80
            };
            if !iei_ok {
                return Err(CatalogError::IeiFormatMismatch {
                    ie: entry.name,
                    iei: entry.iei,
                    format: entry.format,
                });
            }

            if ieis[entry.iei as usize] {
                return Err(CatalogError::DuplicateIei { ie: entry.name, iei: entry.iei });
            }
            ieis[entry.iei as usize] = true;

            if entry.presence_bit >= PresenceMask::CAPACITY {
                return Err(CatalogError::PresenceBitOutOfRange {
                    ie: entry.name,
                    bit: entry.presence_bit,
                });
            }
            let flag = PresenceMask::flag(entry.presence_bit);
            if bits & flag != 0 {
                return Err(CatalogError::DuplicatePresenceBit {
                    ie: entry.name,
                    bit: entry.presence_bit,
                });
            }
            bits |= flag;
        }

        Ok(())
    }
}
