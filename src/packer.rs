//! Conversion of a decoded [`Location`] into a [`PackedZone`].
//!
//! The conversion reproduces the output of the long-standing moment-timezone
//! data builder, including its quirks:
//!
//!  - zones are deduplicated by name and offset, ignoring the DST flag.
//!  - transitions are clipped to the signed 32-bit range. Transitions that
//!    are superseded before the range begins are dropped, the last one
//!    before it is moved to its start, and everything after it is dropped.
//!  - when nothing starts at the beginning of the range, a start of time
//!    zone is chosen that avoids DST where possible.
//!  - only zones that are in effect at some point are kept, ordered by
//!    first use, and repeated transitions into the same zone are collapsed.

use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use core::fmt;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;
use tzif_decoder::{Location, Zone, ZoneTransition};

use crate::packed::{PackedZone, PackedZoneType};

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// The earliest transition time the packed format represents.
pub const ALPHA32: i64 = i32::MIN as i64;

/// The latest transition time the packed format represents.
pub const OMEGA32: i64 = i32::MAX as i64;

/// A transition that references a zone its [`Location`] does not have.
///
/// This is never produced for a `Location` returned by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvariantError {
    /// The offending zone index.
    pub zone_index: usize,
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transition references unknown zone index {}",
            self.zone_index
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvariantError {}

/// The zones of a location with duplicate `(name, offset)` pairs removed.
struct DedupZones<'a> {
    /// First occurrence of each identity, in file order.
    zones: FxIndexMap<(&'a str, i32), &'a Zone>,
    /// The deduplicated index for each original zone index.
    mapping: Vec<usize>,
}

impl<'a> DedupZones<'a> {
    fn new(zones: &'a [Zone]) -> Self {
        let mut dedup = FxIndexMap::default();
        let mapping = zones
            .iter()
            .map(|zone| {
                let entry = dedup.entry(zone.identity());
                let index = entry.index();
                entry.or_insert(zone);
                index
            })
            .collect();
        Self {
            zones: dedup,
            mapping,
        }
    }

    fn resolve(&self, transition: &ZoneTransition) -> Result<usize, InvariantError> {
        let zone_index = usize::from(transition.zone_index);
        self.mapping
            .get(zone_index)
            .copied()
            .ok_or(InvariantError { zone_index })
    }

    fn get(&self, index: usize) -> Option<&'a Zone> {
        self.zones.get_index(index).map(|(_, zone)| *zone)
    }

    fn is_dst(&self, index: usize) -> bool {
        self.get(index).is_some_and(|zone| zone.is_dst)
    }
}

/// A transition inside of the 32-bit range, pointing at a deduplicated zone.
#[derive(Debug, Clone, Copy)]
struct ClippedTransition {
    when: i64,
    zone: usize,
}

/// Clips `transitions` to `ALPHA32..=OMEGA32`, returning the survivors and
/// the deduplicated zones they use in order of first use.
fn clip_transitions(
    transitions: &[ZoneTransition],
    dedup: &DedupZones<'_>,
) -> Result<(Vec<ClippedTransition>, FxIndexSet<usize>), InvariantError> {
    let mut clipped = Vec::with_capacity(transitions.len());
    let mut used = FxIndexSet::default();
    for (position, transition) in transitions.iter().enumerate() {
        let zone = dedup.resolve(transition)?;
        // Superseded before the range even starts.
        if transitions
            .get(position + 1)
            .is_some_and(|next| next.when < ALPHA32)
        {
            continue;
        }
        if transition.when > OMEGA32 {
            break;
        }
        clipped.push(ClippedTransition {
            when: transition.when.max(ALPHA32),
            zone,
        });
        used.insert(zone);
    }
    Ok((clipped, used))
}

/// Chooses the zone in effect from `ALPHA32` when no transition starts there.
///
/// In order of preference: the first zone when nothing uses it yet, the
/// nearest earlier standard time zone when the first transition is into
/// DST, the first standard time zone, and finally the first zone.
fn start_of_time_zone(
    dedup: &DedupZones<'_>,
    first: Option<&ClippedTransition>,
    used: &FxIndexSet<usize>,
) -> (usize, &'static str) {
    if !used.contains(&0) {
        return (0, "first zone is unused");
    }
    if let Some(first) = first.filter(|first| dedup.is_dst(first.zone)) {
        if let Some(index) = (0..first.zone).rev().find(|&index| !dedup.is_dst(index)) {
            return (index, "standard time before first transition");
        }
    }
    match dedup.zones.values().position(|zone| !zone.is_dst) {
        Some(index) => (index, "first standard time zone"),
        None => (0, "no standard time zone"),
    }
}

/// Converts `location` into a [`PackedZone`].
pub fn try_pack(location: &Location) -> Result<PackedZone, InvariantError> {
    let result = pack_location(location);
    #[cfg(feature = "log")]
    {
        if let Err(err) = &result {
            log::error!("{}: {err}", location.name);
        }
    }
    result
}

fn pack_location(location: &Location) -> Result<PackedZone, InvariantError> {
    let dedup = DedupZones::new(&location.zones);
    let (clipped, used) = clip_transitions(&location.transitions, &dedup)?;

    let start = match clipped.first() {
        Some(first) if first.when == ALPHA32 => None,
        first => {
            let (start, _rule) = start_of_time_zone(&dedup, first, &used);
            #[cfg(feature = "log")]
            log::trace!(
                "{}: zone {start} is in effect from the beginning of time ({_rule})",
                location.name
            );
            Some(start)
        }
    };

    // The start of time zone counts as the first use.
    let order: FxIndexSet<usize> = start.into_iter().chain(used).collect();

    let timeline = start
        .map(|zone| ClippedTransition {
            when: ALPHA32,
            zone,
        })
        .into_iter()
        .chain(clipped);

    let mut indices = Vec::new();
    let mut times = Vec::new();
    for transition in timeline {
        let index = order
            .get_index_of(&transition.zone)
            .ok_or(InvariantError {
                zone_index: transition.zone,
            })?;
        if indices.last() == Some(&index) {
            continue;
        }
        indices.push(index);
        times.push(transition.when);
    }

    // The first transition covers everything before it and has no until.
    let mut previous = 0;
    let untils = times
        .iter()
        .skip(1)
        .map(|&when| {
            let until = when - previous;
            previous = when;
            until
        })
        .collect();

    let zones = order
        .iter()
        .map(|&index| {
            dedup
                .get(index)
                .map(|zone| PackedZoneType {
                    abbreviation: zone.name.clone(),
                    utc_offset: i64::from(zone.offset),
                })
                .ok_or(InvariantError { zone_index: index })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PackedZone {
        name: location.name.clone(),
        zones,
        indices,
        untils,
    })
}

/// Packs `location` into a moment-timezone packed string.
///
/// # Panics
///
/// Panics if a transition references a zone that `location` does not have,
/// which cannot happen for a `Location` produced by the decoder.
pub fn pack(location: &Location) -> String {
    match try_pack(location) {
        Ok(packed) => packed.to_string(),
        Err(err) => panic!("cannot pack {}: {err}", location.name),
    }
}
