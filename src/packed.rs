//! The packed zone string of moment-timezone.
//!
//! A packed zone is five `|` separated fields:
//!
//! ```text
//! <name>|<abbreviations>|<offsets>|<indices>|<untils>
//! ```
//!
//! Offsets are minutes west of UTC, indices are one base-60 digit per
//! transition, and untils are the differences between consecutive
//! transition times, starting from the epoch, for every transition but the
//! first.

use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use core::{fmt, str::FromStr};

use crate::base60::{digit_value, encode_base60, pack_seconds, unpack_seconds};

/// A single entry of a packed zone's abbreviation and offset lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackedZoneType {
    pub abbreviation: String,
    /// Seconds east of UTC. Rendered negated, as moment stores offsets west.
    pub utc_offset: i64,
}

/// A zone in the moment-timezone packed format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedZone {
    pub name: String,
    pub zones: Vec<PackedZoneType>,
    /// The index into `zones` for each transition, starting with the zone in
    /// effect from the beginning of time.
    pub indices: Vec<usize>,
    /// Seconds between consecutive transitions, the first relative to the epoch.
    pub untils: Vec<i64>,
}

impl PackedZone {
    /// The absolute times of every transition after the first.
    pub fn transition_times(&self) -> impl Iterator<Item = i64> + '_ {
        self.untils.iter().scan(0i64, |time, delta| {
            *time = time.saturating_add(*delta);
            Some(*time)
        })
    }

    /// Compares two packed zones while allowing their zone lists to be
    /// ordered differently.
    ///
    /// Both must have the same name, the same untils and the same set of
    /// zones, and their indices must agree once mapped onto the other's
    /// zone order.
    pub fn is_equivalent(&self, other: &Self) -> bool {
        if self.name != other.name
            || self.untils != other.untils
            || self.zones.len() != other.zones.len()
            || self.indices.len() != other.indices.len()
        {
            return false;
        }
        let Some(order) = self
            .zones
            .iter()
            .map(|zone| other.zones.iter().position(|candidate| candidate == zone))
            .collect::<Option<Vec<_>>>()
        else {
            return false;
        };
        self.indices
            .iter()
            .zip(&other.indices)
            .all(|(&ours, &theirs)| order.get(ours) == Some(&theirs))
    }
}

fn write_joined<T, I>(f: &mut fmt::Formatter<'_>, items: I, separator: &str) -> fmt::Result
where
    I: IntoIterator<Item = T>,
    T: fmt::Display,
{
    for (position, item) in items.into_iter().enumerate() {
        if position > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for PackedZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|", self.name)?;
        write_joined(f, self.zones.iter().map(|zone| &zone.abbreviation), " ")?;
        f.write_str("|")?;
        write_joined(
            f,
            self.zones.iter().map(|zone| pack_seconds(zone.utc_offset.saturating_neg())),
            " ",
        )?;
        f.write_str("|")?;
        write_joined(
            f,
            self.indices.iter().map(|&index| encode_base60(index as i64)),
            "",
        )?;
        f.write_str("|")?;
        write_joined(f, self.untils.iter().map(|&until| pack_seconds(until)), " ")
    }
}

/// The error returned when parsing a packed zone string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackedParseError {
    /// Fewer than five `|` separated fields.
    MissingField,
    /// A field holds a value that is not valid base-60.
    InvalidNumber(String),
    /// The abbreviation and offset lists differ in length.
    LengthMismatch,
    /// An index refers past the end of the zone list.
    IndexOutOfRange(usize),
}

impl fmt::Display for PackedParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField => f.write_str("packed zone needs five fields"),
            Self::InvalidNumber(value) => write!(f, "invalid base-60 value '{value}'"),
            Self::LengthMismatch => f.write_str("abbreviation and offset counts differ"),
            Self::IndexOutOfRange(index) => write!(f, "zone index {index} out of range"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PackedParseError {}

/// Splits a space separated list, treating an empty field as an empty list.
fn split_list(field: &str) -> impl Iterator<Item = &str> {
    field.split(' ').filter(|item| !item.is_empty())
}

fn unpack(value: &str) -> Result<i64, PackedParseError> {
    unpack_seconds(value).ok_or_else(|| PackedParseError::InvalidNumber(value.to_string()))
}

impl FromStr for PackedZone {
    type Err = PackedParseError;

    /// Parses a packed zone. Fields after the fifth, such as the population
    /// column of moment's data files, are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split('|');
        let (Some(name), Some(abbreviations), Some(offsets), Some(indices), Some(untils)) = (
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
        ) else {
            return Err(PackedParseError::MissingField);
        };

        let abbreviations: Vec<_> = split_list(abbreviations).collect();
        let offsets = split_list(offsets)
            .map(unpack)
            .collect::<Result<Vec<_>, _>>()?;
        if abbreviations.len() != offsets.len() {
            return Err(PackedParseError::LengthMismatch);
        }
        let zones: Vec<_> = abbreviations
            .into_iter()
            .zip(offsets)
            .map(|(abbreviation, offset)| PackedZoneType {
                abbreviation: abbreviation.into(),
                utc_offset: offset.saturating_neg(),
            })
            .collect();

        let indices = indices
            .bytes()
            .map(|digit| {
                let index = digit_value(digit)
                    .map(usize::from)
                    .ok_or_else(|| PackedParseError::InvalidNumber(char::from(digit).into()))?;
                if index >= zones.len() {
                    return Err(PackedParseError::IndexOutOfRange(index));
                }
                Ok(index)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let untils = split_list(untils)
            .map(unpack)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: name.into(),
            zones,
            indices,
            untils,
        })
    }
}
