//! The decoded representation of a TZif record.

use alloc::{string::String, vec::Vec};

/// The transition time synthesized for records that carry no transitions.
///
/// Fixed offset zones such as `Etc/GMT+5` are stored without any
/// transition, so their single local time type applies from here on.
pub const BEGINNING_OF_TIME: i64 = i64::MIN;

/// A local time type: a named UTC offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Zone {
    /// The time zone designation, e.g. "PST".
    pub name: String,
    /// Seconds east of UTC.
    pub offset: i32,
    /// Whether this local time type is daylight saving time.
    pub is_dst: bool,
}

impl Zone {
    /// The pair two zones are compared by when deduplicating.
    ///
    /// The DST flag is not part of a zone's identity.
    pub fn identity(&self) -> (&str, i32) {
        (self.name.as_str(), self.offset)
    }
}

/// A point in time where the zone in effect changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZoneTransition {
    /// Epoch seconds at which the transition occurs.
    pub when: i64,
    /// Index into the owning [`Location::zones`].
    pub zone_index: u8,
}

/// The complete decoded data for one time zone identifier.
///
/// A `Location` is built in one piece by [`decode`][crate::decode] and is not
/// meant to be mutated afterwards: every `zone_index` of its transitions is
/// valid for its zone list.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// The caller supplied identifier, e.g. "America/Los_Angeles".
    pub name: String,
    /// Local time types in file order.
    pub zones: Vec<Zone>,
    /// Transitions in file order, which is ascending by time.
    pub transitions: Vec<ZoneTransition>,
}

impl Location {
    /// Creates a `Location` from already decoded parts.
    ///
    /// No validation is performed; the packer reports transitions that
    /// reference a nonexistent zone as an invariant violation.
    pub fn from_parts(
        name: impl Into<String>,
        zones: Vec<Zone>,
        transitions: Vec<ZoneTransition>,
    ) -> Self {
        Self {
            name: name.into(),
            zones,
            transitions,
        }
    }

    /// Returns the zone a transition switches to.
    pub fn zone_for(&self, transition: &ZoneTransition) -> Option<&Zone> {
        self.zones.get(usize::from(transition.zone_index))
    }
}
