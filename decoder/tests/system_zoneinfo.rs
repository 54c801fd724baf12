#![cfg(not(target_os = "windows"))]

use std::path::Path;

use tzif_decoder::{decode, decode_header, TzifVersion};

const ZONEINFO_DIR: &str = "/usr/share/zoneinfo";

const IDENTIFIERS: [&str; 12] = [
    "America/Los_Angeles",
    "America/New_York",
    "America/Chicago",
    "Australia/Sydney",
    "Australia/Lord_Howe",
    "Antarctica/Troll",
    "Europe/Dublin",
    "Europe/Moscow",
    "Asia/Kolkata",
    "Pacific/Chatham",
    "Etc/GMT-14",
    "UTC",
];

fn compare_with_tzif_crate(identifier: &str) {
    let path = Path::new(ZONEINFO_DIR).join(identifier);
    let bytes = std::fs::read(&path).unwrap();
    let location = decode(identifier, &bytes).unwrap();

    let data = tzif::parse_tzif_file(&path).unwrap();
    let block = data.data_block2.unwrap();

    assert_eq!(location.zones.len(), block.local_time_type_records.len());
    for (zone, record) in location.zones.iter().zip(&block.local_time_type_records) {
        assert_eq!(i64::from(zone.offset), record.utoff.0, "{identifier}");
        assert_eq!(zone.is_dst, record.is_dst, "{identifier}");
        assert!(!zone.name.is_empty(), "{identifier}");
    }

    if block.transition_times.is_empty() {
        assert_eq!(location.transitions.len(), 1);
        assert_eq!(location.transitions[0].when, i64::MIN);
        assert_eq!(location.transitions[0].zone_index, 0);
        return;
    }

    assert_eq!(location.transitions.len(), block.transition_times.len());
    for ((transition, time), time_type) in location
        .transitions
        .iter()
        .zip(&block.transition_times)
        .zip(&block.transition_types)
    {
        assert_eq!(transition.when, time.0, "{identifier}");
        assert_eq!(usize::from(transition.zone_index), *time_type, "{identifier}");
    }
}

#[test]
fn matches_tzif_crate() {
    for identifier in IDENTIFIERS {
        compare_with_tzif_crate(identifier);
    }
}

#[test]
fn transitions_are_ascending() {
    for identifier in IDENTIFIERS {
        let bytes = std::fs::read(Path::new(ZONEINFO_DIR).join(identifier)).unwrap();
        let location = decode(identifier, &bytes).unwrap();
        assert!(location
            .transitions
            .windows(2)
            .all(|pair| pair[0].when <= pair[1].when));
    }
}

#[test]
fn system_files_are_version_two_or_later() {
    let bytes = std::fs::read(Path::new(ZONEINFO_DIR).join("America/Los_Angeles")).unwrap();
    let header = decode_header(&bytes).unwrap();
    assert_ne!(header.version, TzifVersion::V1);
    assert!(header.counts.timecnt > 0);
}

#[test]
fn los_angeles_zone_table() {
    let bytes = std::fs::read(Path::new(ZONEINFO_DIR).join("America/Los_Angeles")).unwrap();
    let location = decode("America/Los_Angeles", &bytes).unwrap();
    let names: Vec<_> = location.zones.iter().map(|z| z.name.as_str()).collect();
    for expected in ["LMT", "PST", "PDT", "PWT", "PPT"] {
        assert!(names.contains(&expected), "missing {expected}");
    }
    // LMT is the first local time type of every zic compiled zone.
    assert_eq!(location.zones[0].name, "LMT");
    assert_eq!(location.zones[0].offset, -28378);
}
