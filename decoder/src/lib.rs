//! A decoder for IANA Time Zone Database binary records, the TZif files
//! found in `/usr/share/zoneinfo` or `/etc/localtime`.
//!
//! The decoder recovers the local time types ("zones") and the transition
//! history of a record into a [`Location`]:
//!
//! ```rust
//! let data = std::fs::read("/usr/share/zoneinfo/Etc/GMT+5");
//! # let Ok(data) = data else { return };
//! let location = tzif_decoder::decode("Etc/GMT+5", &data).unwrap();
//! assert_eq!(location.zones[0].name, "-05");
//! assert_eq!(location.zones[0].offset, -5 * 3600);
//! assert_eq!(location.transitions.len(), 1);
//! ```
//!
//! Leap seconds, the standard/wall and UT/local indicators, and the POSIX
//! footer of version 2+ records are read past and discarded.

#![no_std]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod parser;
mod reader;
mod types;

pub use parser::{decode, decode_header, TzifCounts, TzifHeader, TzifVersion};
pub use types::{Location, Zone, ZoneTransition, BEGINNING_OF_TIME};

/// The error returned for data that is not a valid TZif record.
///
/// The variants only exist for diagnostics. Any of them means the whole
/// buffer must be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TzifError {
    /// The buffer does not start with `TZif`.
    InvalidMagic,
    /// The version byte is not NUL, `2` or `3`.
    UnsupportedVersion(u8),
    /// The buffer ended before the data its header describes.
    UnexpectedEof,
    /// A header count does not fit in a native size.
    CountOutOfRange,
    /// The record defines no local time types.
    NoLocalTimeTypes,
    /// A local time type points outside of the designation table.
    InvalidDesignationIndex(u8),
    /// A transition points to a local time type that does not exist.
    InvalidTransitionType(u8),
}

impl core::fmt::Display for TzifError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("malformed time zone data: ")?;
        match self {
            Self::InvalidMagic => f.write_str("missing TZif magic"),
            Self::UnsupportedVersion(v) => write!(f, "unsupported version byte {v:#04x}"),
            Self::UnexpectedEof => f.write_str("unexpected end of data"),
            Self::CountOutOfRange => f.write_str("header count out of range"),
            Self::NoLocalTimeTypes => f.write_str("no local time types"),
            Self::InvalidDesignationIndex(idx) => {
                write!(f, "designation index {idx} out of bounds")
            }
            Self::InvalidTransitionType(idx) => {
                write!(f, "transition type {idx} out of bounds")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TzifError {}
