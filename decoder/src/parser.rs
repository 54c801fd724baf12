//! Decoding of the TZif binary layout.
//!
//! The layout is described by [RFC 8536][rfc8536]. All values are big-endian.
//! A version 1 record holds a single data block of 32-bit times; version 2
//! and 3 records follow it with a second header and an authoritative data
//! block of 64-bit times. Only the authoritative block is decoded.
//!
//! [rfc8536]: https://datatracker.ietf.org/doc/html/rfc8536

use alloc::{string::String, vec::Vec};

use crate::{
    reader::{DataReader, TimeWidth},
    types::{Location, Zone, ZoneTransition, BEGINNING_OF_TIME},
    TzifError,
};

const MAGIC: &[u8; 4] = b"TZif";

/// Magic, version and reserved padding preceding the counts of a header.
const HEADER_PREFIX_LEN: usize = 20;

/// A local time type record: offset, DST indicator, designation index.
const LOCAL_TIME_TYPE_LEN: usize = 6;

/// The version of a TZif record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TzifVersion {
    V1,
    V2,
    V3,
}

impl TzifVersion {
    fn from_byte(byte: u8) -> Result<Self, TzifError> {
        match byte {
            0 => Ok(Self::V1),
            b'2' => Ok(Self::V2),
            b'3' => Ok(Self::V3),
            other => Err(TzifError::UnsupportedVersion(other)),
        }
    }

    /// Whether the record carries a second, 64-bit data block.
    pub fn has_v2_block(self) -> bool {
        !matches!(self, Self::V1)
    }
}

/// The six counts of a TZif header, in file order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TzifCounts {
    /// Number of UT/local indicators.
    pub isutcnt: usize,
    /// Number of standard/wall indicators.
    pub isstdcnt: usize,
    /// Number of leap second records.
    pub leapcnt: usize,
    /// Number of transition times.
    pub timecnt: usize,
    /// Number of local time type records.
    pub typecnt: usize,
    /// Number of bytes in the designation table.
    pub charcnt: usize,
}

impl TzifCounts {
    fn read(reader: &mut DataReader<'_>) -> Result<Self, TzifError> {
        let isutcnt = read_count(reader)?;
        let isstdcnt = read_count(reader)?;
        let leapcnt = read_count(reader)?;
        let timecnt = read_count(reader)?;
        let typecnt = read_count(reader)?;
        let charcnt = read_count(reader)?;
        Ok(Self {
            isutcnt,
            isstdcnt,
            leapcnt,
            timecnt,
            typecnt,
            charcnt,
        })
    }

    /// The length in bytes of the data block these counts describe.
    fn data_block_len(&self, width: TimeWidth) -> Result<usize, TzifError> {
        let time = width.bytes();
        [
            self.timecnt.checked_mul(time),
            Some(self.timecnt),
            self.typecnt.checked_mul(LOCAL_TIME_TYPE_LEN),
            Some(self.charcnt),
            self.leapcnt.checked_mul(time + 4),
            Some(self.isstdcnt),
            Some(self.isutcnt),
        ]
        .into_iter()
        .try_fold(0usize, |total, len| total.checked_add(len?))
        .ok_or(TzifError::CountOutOfRange)
    }
}

/// Counts must fit the native signed size so no later size computation wraps.
fn read_count(reader: &mut DataReader<'_>) -> Result<usize, TzifError> {
    let count = reader.read_u32()?;
    isize::try_from(count)
        .ok()
        .and_then(|count| usize::try_from(count).ok())
        .ok_or(TzifError::CountOutOfRange)
}

fn checked_len(count: usize, size: usize) -> Result<usize, TzifError> {
    count.checked_mul(size).ok_or(TzifError::CountOutOfRange)
}

/// The header that describes the data block a decoder reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TzifHeader {
    pub version: TzifVersion,
    /// For version 2+ records these are the counts of the 64-bit block.
    pub counts: TzifCounts,
}

impl TzifHeader {
    fn read(reader: &mut DataReader<'_>) -> Result<Self, TzifError> {
        if reader.read(MAGIC.len())? != MAGIC {
            return Err(TzifError::InvalidMagic);
        }
        let version = TzifVersion::from_byte(reader.read_u8()?)?;
        // Reserved for future use.
        reader.skip(15)?;
        let counts = TzifCounts::read(reader)?;
        Ok(Self { version, counts })
    }

    /// Reads the first header and, for version 2+, moves past the 32-bit
    /// block to the counts of the 64-bit block.
    fn read_authoritative(reader: &mut DataReader<'_>) -> Result<(Self, TimeWidth), TzifError> {
        let header = Self::read(reader)?;
        if !header.version.has_v2_block() {
            return Ok((header, TimeWidth::Four));
        }
        reader.skip(header.counts.data_block_len(TimeWidth::Four)?)?;
        // The second header repeats the magic and version, only its counts are used.
        reader.skip(HEADER_PREFIX_LEN)?;
        let counts = TzifCounts::read(reader)?;
        Ok((
            Self {
                version: header.version,
                counts,
            },
            TimeWidth::Eight,
        ))
    }
}

/// Decodes only the header of the data block [`decode`] would read.
pub fn decode_header(data: &[u8]) -> Result<TzifHeader, TzifError> {
    let mut reader = DataReader::new(data);
    TzifHeader::read_authoritative(&mut reader).map(|(header, _)| header)
}

/// Decodes a TZif record into a [`Location`] named `name`.
///
/// Leap second records, standard/wall and UT/local indicators, and the
/// version 2+ footer are skipped. A record without transitions gets a single
/// transition at [`BEGINNING_OF_TIME`] into its first local time type.
///
/// Decoding is all or nothing: any defect in `data` yields a [`TzifError`].
pub fn decode(name: &str, data: &[u8]) -> Result<Location, TzifError> {
    let result = decode_location(name, data);
    #[cfg(feature = "log")]
    {
        if let Err(err) = &result {
            log::debug!("rejected TZif data for {name}: {err}");
        }
    }
    result
}

fn decode_location(name: &str, data: &[u8]) -> Result<Location, TzifError> {
    let mut reader = DataReader::new(data);
    let (header, width) = TzifHeader::read_authoritative(&mut reader)?;
    let counts = header.counts;

    #[cfg(feature = "log")]
    log::debug!("decoding {name}: {:?} {counts:?}", header.version);

    if counts.typecnt == 0 {
        return Err(TzifError::NoLocalTimeTypes);
    }

    let times = reader.read(checked_len(counts.timecnt, width.bytes())?)?;
    let time_types = reader.read(counts.timecnt)?;
    let records = reader.read(checked_len(counts.typecnt, LOCAL_TIME_TYPE_LEN)?)?;
    let designations = reader.read(counts.charcnt)?;
    reader.skip(checked_len(counts.leapcnt, width.bytes() + 4)?)?;
    reader.skip(counts.isstdcnt)?;
    reader.skip(counts.isutcnt)?;

    let mut records = DataReader::new(records);
    let zones = (0..counts.typecnt)
        .map(|_| read_zone(&mut records, designations))
        .collect::<Result<Vec<_>, _>>()?;

    let mut times = DataReader::new(times);
    let mut transitions = time_types
        .iter()
        .map(|&zone_index| {
            let when = times.read_time(width)?;
            if usize::from(zone_index) >= zones.len() {
                return Err(TzifError::InvalidTransitionType(zone_index));
            }
            Ok(ZoneTransition { when, zone_index })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if transitions.is_empty() {
        transitions.push(ZoneTransition {
            when: BEGINNING_OF_TIME,
            zone_index: 0,
        });
    }

    Ok(Location::from_parts(name, zones, transitions))
}

fn read_zone(records: &mut DataReader<'_>, designations: &[u8]) -> Result<Zone, TzifError> {
    let offset = records.read_i32()?;
    let is_dst = records.read_u8()? != 0;
    let index = records.read_u8()?;
    Ok(Zone {
        name: designation_at(designations, index)?,
        offset,
        is_dst,
    })
}

/// Reads the NUL terminated designation starting at `index`.
fn designation_at(table: &[u8], index: u8) -> Result<String, TzifError> {
    let tail = table
        .get(usize::from(index)..)
        .filter(|tail| !tail.is_empty())
        .ok_or(TzifError::InvalidDesignationIndex(index))?;
    let name = tail.split(|&byte| byte == 0).next().unwrap_or(tail);
    Ok(String::from_utf8_lossy(name).into_owned())
}
