use std::{env, path::PathBuf, process::ExitCode};

use moment_packer::{decode_header, try_pack, tzdb::TzdbSource, BEGINNING_OF_TIME};

macro_rules! format_line(
    ($arr:ident[$i:expr], $($args:expr),*) => {
        let string = stringify!($arr);
        let array = format!("{}[{}]", string, $i);
        format_line!(array, $($args),*)
    };
    ($a:expr, $b:expr, $c: expr, $d: expr) => {
        println!("{:<25} {:<20} {:<5} {}", $a, $b, $c, $d)
    };
    ($a:expr, $b:expr, $c: expr) => {
        println!("{:<25} {:<20} {}", $a, $b, $c)
    };
    ($a:expr, $b:expr) => {
        println!("{:<25} {}", $a, $b)
    };
);

fn main() -> ExitCode {
    let Some(identifier) = env::args().nth(1) else {
        eprintln!("usage: tzif-inspect <identifier> [zoneinfo dir]");
        return ExitCode::FAILURE;
    };
    let source = env::args()
        .nth(2)
        .map_or_else(TzdbSource::default, |dir| {
            TzdbSource::Directory(PathBuf::from(dir))
        });

    let data = match source.read(&identifier) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    let (header, location) = match decode_header(&data)
        .and_then(|header| Ok((header, moment_packer::decode(&identifier, &data)?)))
    {
        Ok(decoded) => decoded,
        Err(err) => {
            eprintln!("{identifier}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let counts = header.counts;
    format_line!("Version", format!("{:?}", header.version));
    format_line!("isutcnt", counts.isutcnt);
    format_line!("isstdcnt", counts.isstdcnt);
    format_line!("leapcnt", counts.leapcnt);
    format_line!("timecnt", counts.timecnt);
    format_line!("typecnt", counts.typecnt);
    format_line!("charcnt", counts.charcnt);

    println!();

    format_line!("Index", "Name", "DST", "Offset");
    for (index, zone) in location.zones.iter().enumerate() {
        format_line!(zones[index], &zone.name, zone.is_dst, zone.offset);
    }

    println!();

    format_line!("Index", "Transition", "Zone", "Name");
    for (index, transition) in location.transitions.iter().enumerate() {
        let when = if transition.when == BEGINNING_OF_TIME {
            "-inf".to_string()
        } else {
            transition.when.to_string()
        };
        let name = location
            .zone_for(transition)
            .map_or("?", |zone| zone.name.as_str());
        format_line!(transitions[index], when, transition.zone_index, name);
    }

    println!();

    match try_pack(&location) {
        Ok(packed) => println!("{packed}"),
        Err(err) => eprintln!("{identifier}: {err}"),
    }
    ExitCode::SUCCESS
}
