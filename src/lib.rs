//! The `moment_packer` crate converts IANA Time Zone Database records into
//! the packed zone strings of [moment-timezone][moment].
//!
//! ```rust
//! let data = std::fs::read("/usr/share/zoneinfo/Etc/GMT+5");
//! # let Ok(data) = data else { return };
//! let packed = moment_packer::convert("Etc/GMT+5", &data).unwrap();
//! assert_eq!(packed, "Etc/GMT+5|-05|50|0|");
//! ```
//!
//! Decoding is done by [`tzif_decoder`], whose types are re-exported here.
//! Packing a decoded [`Location`] reproduces the output of moment's own data
//! builder, including how it clips history to the signed 32-bit range and
//! picks the zone in effect before the first transition.
//!
//! With the `tzdb` feature, the [`tzdb`] module reads records from a
//! zoneinfo directory or from the database bundled by `jiff-tzdb`.
//!
//! [moment]: https://momentjs.com/timezone/
#![no_std]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod base60;

mod packed;
mod packer;

#[cfg(feature = "tzdb")]
pub mod tzdb;

use alloc::string::String;

#[doc(inline)]
pub use tzif_decoder::{
    decode, decode_header, Location, TzifCounts, TzifError, TzifHeader, TzifVersion, Zone,
    ZoneTransition, BEGINNING_OF_TIME,
};

pub use packed::{PackedParseError, PackedZone, PackedZoneType};
pub use packer::{pack, try_pack, InvariantError, ALPHA32, OMEGA32};

/// Decodes a TZif record and packs it under `name`.
pub fn convert(name: &str, data: &[u8]) -> Result<String, TzifError> {
    decode(name, data).map(|location| pack(&location))
}
