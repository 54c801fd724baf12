#![cfg(not(target_os = "windows"))]

use std::path::Path;

use moment_packer::{decode, pack, try_pack, tzdb::TzdbSource, PackedZone, ALPHA32, OMEGA32};

const ZONEINFO_DIR: &str = "/usr/share/zoneinfo";

const LOS_ANGELES: &str = "America/Los_Angeles|PST PDT PWT PPT|80 70 70 70|010102301010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010|-261q0 1nX0 11B0 1nX0 SgN0 8x10 iy0 5Wp1 1VaX 3dA0 WM0 1qM0 11A0 1o00 11A0 1o00 11A0 1o00 11A0 1o00 11A0 1qM0 11A0 1o00 11A0 1o00 11A0 1o00 11A0 1o00 11A0 1qM0 WM0 1qM0 1cM0 1cM0 1cM0 1cM0 1cM0 1cM0 1fA0 1a00 1fA0 1cN0 1cL0 1cN0 1cL0 1cN0 1cL0 1cN0 1cL0 1cN0 1fz0 1cN0 1cL0 1cN0 1cL0 s10 1Vz0 LB0 1BX0 1cN0 1fz0 1a10 1fz0 1cN0 1cL0 1cN0 1cL0 1cN0 1cL0 1cN0 1cL0 1cN0 1fz0 1a10 1fz0 1cN0 1cL0 1cN0 1cL0 1cN0 1cL0 14p0 1lb0 14p0 1nX0 11B0 1nX0 11B0 1nX0 14p0 1lb0 14p0 1lb0 14p0 1nX0 11B0 1nX0 11B0 1nX0 14p0 1lb0 14p0 1lb0 14p0 1lb0 14p0 1nX0 11B0 1nX0 11B0 1nX0 14p0 1lb0 14p0 1lb0 14p0 1nX0 11B0 1nX0 11B0 1nX0 Rd0 1zb0 Op0 1zb0 Op0 1zb0 Rd0 1zb0 Op0 1zb0 Op0 1zb0 Op0 1zb0 Op0 1zb0 Op0 1zb0 Rd0 1zb0 Op0 1zb0 Op0 1zb0 Op0 1zb0 Op0 1zb0 Rd0 1zb0 Op0 1zb0 Op0 1zb0 Op0 1zb0 Op0 1zb0 Op0 1zb0 Rd0 1zb0 Op0 1zb0 Op0 1zb0 Op0 1zb0 Op0 1zb0 Rd0 1zb0 Op0 1zb0 Op0 1zb0 Op0 1zb0 Op0 1zb0 Op0 1zb0";

const MOSCOW: &str = "Europe/Moscow|MMT MMT MST MDST MSD MSK +05 EET EEST MSK|-2u.h -2v.j -3v.j -4v.j -40 -30 -50 -20 -30 -40|012132345464575454545454545454545458754545454545454545454545454545454545454595|-2ag2u.h 2pyW.W 1bA0 11X0 GN0 1Hb0 c4v.j ik0 3DA0 dz0 15A0 c10 2q10 iM10 23CL0 1db0 1cN0 1db0 1cN0 1db0 1dd0 1cO0 1cM0 1cM0 1cM0 1cM0 1cM0 1cM0 1cM0 1cM0 1cM0 1cM0 1cM0 1fA0 1cM0 1cN0 IM0 rX0 1cM0 1cM0 1cM0 1cM0 1cM0 1cM0 1cM0 1fA0 1o00 11A0 1o00 11A0 1o00 11A0 1qM0 WM0 1qM0 WM0 1qM0 11A0 1o00 11A0 1o00 11A0 1qM0 WM0 1qM0 WM0 1qM0 WM0 1qM0 11A0 1o00 11A0 1o00 11A0 1qM0 WM0 8Hz0";

const DAVIS: &str =
    "Antarctica/Davis|-00 +07 +05|0 -70 -50|01012121|-vyo0 iXt0 alj0 1D7v0 VB0 3Wn0 KN0";

const NOUMEA: &str =
    "Pacific/Noumea|LMT +11 +12|-b5.M -b0 -c0|01212121|-2l9n5.M 2EqM5.M xX0 1PB0 yn0 HeP0 Ao0";

fn pack_system_zone(identifier: &str) -> PackedZone {
    let data = std::fs::read(Path::new(ZONEINFO_DIR).join(identifier)).unwrap();
    let location = decode(identifier, &data).unwrap();
    try_pack(&location).unwrap()
}

fn assert_reference(expected: &str) {
    let expected: PackedZone = expected.parse().unwrap();
    let packed = pack_system_zone(&expected.name);
    assert!(
        packed.is_equivalent(&expected),
        "\n packed: {packed}\n expected: {expected}"
    );
}

#[test]
fn los_angeles() {
    assert_reference(LOS_ANGELES);
}

#[test]
fn moscow() {
    assert_reference(MOSCOW);
}

#[test]
fn davis() {
    assert_reference(DAVIS);
}

#[test]
fn noumea() {
    assert_reference(NOUMEA);
}

#[test]
fn fixed_offset() {
    let data = std::fs::read(Path::new(ZONEINFO_DIR).join("Etc/GMT+5")).unwrap();
    let location = decode("Etc/GMT+5", &data).unwrap();
    assert_eq!(pack(&location), "Etc/GMT+5|-05|50|0|");
}

#[test]
fn every_system_zone_packs() {
    let source = TzdbSource::Directory(ZONEINFO_DIR.into());
    let zones = source.identifiers().unwrap();
    assert!(zones.iter().any(|zone| zone == "America/Los_Angeles"));

    for identifier in zones {
        let location = source.location(&identifier).unwrap();
        let packed = try_pack(&location).unwrap();

        for (i, zone) in packed.zones.iter().enumerate() {
            assert!(
                !packed.zones[i + 1..].contains(zone),
                "{identifier}: duplicate zone {zone:?}"
            );
        }
        assert!(
            packed.indices.windows(2).all(|pair| pair[0] != pair[1]),
            "{identifier}: repeated index"
        );
        assert!(packed.indices.iter().all(|&index| index < packed.zones.len()));
        assert_eq!(packed.indices.len(), packed.untils.len() + 1, "{identifier}");
        assert!(
            packed
                .transition_times()
                .all(|time| (ALPHA32..=OMEGA32).contains(&time)),
            "{identifier}: transition outside of the 32-bit range"
        );

        let rendered = packed.to_string();
        assert_eq!(rendered, pack(&location), "{identifier}: not deterministic");
        assert_eq!(
            rendered.parse::<PackedZone>().unwrap(),
            packed,
            "{identifier}: does not parse back"
        );
    }
}
