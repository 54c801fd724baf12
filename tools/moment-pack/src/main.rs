//! Packs time zones into moment-timezone's packed zone strings.
//!
//! ```text
//! moment-pack America/Los_Angeles Europe/Moscow
//! moment-pack --embedded --json > latest.json
//! ```
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

use std::{io::Write, path::PathBuf};

use clap::Parser;
use color_eyre::{eyre::WrapErr, Result};
use log::{debug, info};
use moment_packer::{try_pack, tzdb::TzdbSource};
use serde::Serialize;

const UNIX_ZONEINFO: &str = "/usr/share/zoneinfo";

#[derive(Debug, clap::Parser)]
#[command(about = "Packs TZif records into moment-timezone zone strings")]
struct Args {
    /// The zoneinfo / tzdata directory to read records from
    #[arg(short = 'i', long, default_value = UNIX_ZONEINFO)]
    zoneinfo_dir: PathBuf,

    /// Read records from the database compiled into this binary instead
    #[arg(long, conflicts_with = "zoneinfo_dir")]
    embedded: bool,

    /// Print a moment-timezone data bundle instead of one zone per line
    #[arg(long)]
    json: bool,

    /// The tzdata version written to the data bundle
    #[arg(long, requires = "json")]
    data_version: Option<String>,

    /// The zones to pack, every zone of the source when empty
    identifiers: Vec<String>,
}

/// The `{"version": ..., "zones": [...]}` bundle moment-timezone loads.
#[derive(Debug, Serialize)]
struct Bundle {
    version: String,
    zones: Vec<String>,
}

/// Program entry point.
fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let args = Args::parse();
    let source = if args.embedded {
        TzdbSource::Embedded
    } else {
        TzdbSource::Directory(args.zoneinfo_dir)
    };

    let identifiers = if args.identifiers.is_empty() {
        source
            .identifiers()
            .wrap_err_with(|| format!("listing the zones of {source:?}"))?
    } else {
        args.identifiers
    };
    info!("Packing {} zones from {source:?}", identifiers.len());

    let zones = pack_zones(&source, &identifiers);
    if zones.len() != identifiers.len() {
        info!("Skipped {} zones", identifiers.len() - zones.len());
    }

    let mut stdout = std::io::stdout().lock();
    if args.json {
        let version = args
            .data_version
            .or_else(|| source.version())
            .unwrap_or_else(|| "unknown".into());
        let bundle = Bundle { version, zones };
        serde_json::to_writer_pretty(&mut stdout, &bundle)?;
        writeln!(stdout)?;
    } else {
        for zone in zones {
            writeln!(stdout, "{zone}")?;
        }
    }
    Ok(())
}

/// Packs every zone that can be loaded, reporting the others on stderr.
fn pack_zones(source: &TzdbSource, identifiers: &[String]) -> Vec<String> {
    identifiers
        .iter()
        .filter_map(|identifier| {
            debug!("Packing {identifier}");
            let packed = source
                .location(identifier)
                .map_err(|err| err.to_string())
                .and_then(|location| try_pack(&location).map_err(|err| err.to_string()));
            match packed {
                Ok(packed) => Some(packed.to_string()),
                Err(err) => {
                    eprintln!("skipping {identifier}: {err}");
                    None
                }
            }
        })
        .collect()
}
