//! Loading TZif records by time zone identifier.
//!
//! Records come either from a zoneinfo directory, such as the system's
//! `/usr/share/zoneinfo`, or from the database bundled with `jiff-tzdb`.

use std::{
    fmt, fs, io,
    path::{Component, Path, PathBuf},
};

use alloc::{
    borrow::ToOwned,
    string::{String, ToString},
    vec::Vec,
};

use walkdir::WalkDir;

use crate::{decode, Location, TzifError};

#[cfg(unix)]
const ZONEINFO_DIR: &str = "/usr/share/zoneinfo";

/// The `zic` source file that `tzdata` installs with its version header.
const TZDATA_ZI: &str = "tzdata.zi";

/// Directory entries that are not zones of their own: the `posix` and
/// `right` trees repeat the database under a prefix.
const SKIPPED_ENTRIES: [&str; 3] = ["posix", "right", "posixrules"];

const MAGIC: &[u8; 4] = b"TZif";

/// The error returned when a record cannot be loaded.
#[derive(Debug)]
pub enum SourceError {
    /// Reading from the zoneinfo directory failed.
    Io(io::Error),
    /// The source has no record for the identifier.
    UnknownIdentifier(String),
    /// The record exists but is not valid TZif data.
    Format(TzifError),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "cannot read time zone data: {err}"),
            Self::UnknownIdentifier(identifier) => {
                write!(f, "unknown time zone identifier '{identifier}'")
            }
            Self::Format(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Format(err) => Some(err),
            Self::UnknownIdentifier(_) => None,
        }
    }
}

impl From<io::Error> for SourceError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<TzifError> for SourceError {
    fn from(value: TzifError) -> Self {
        Self::Format(value)
    }
}

/// Where TZif records are loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TzdbSource {
    /// A zoneinfo directory holding one file per identifier.
    Directory(PathBuf),
    /// The database compiled into `jiff-tzdb`.
    Embedded,
}

impl Default for TzdbSource {
    /// The system zoneinfo directory where there is one, the embedded
    /// database otherwise.
    fn default() -> Self {
        #[cfg(unix)]
        {
            let dir = Path::new(ZONEINFO_DIR);
            if dir.is_dir() {
                return Self::Directory(dir.to_path_buf());
            }
        }
        Self::Embedded
    }
}

impl TzdbSource {
    /// Returns the raw TZif record of `identifier`.
    pub fn read(&self, identifier: &str) -> Result<Vec<u8>, SourceError> {
        let unknown = || SourceError::UnknownIdentifier(identifier.to_owned());
        match self {
            Self::Directory(dir) => {
                if !is_relative_identifier(identifier) {
                    return Err(unknown());
                }
                match fs::read(dir.join(identifier)) {
                    Ok(data) => Ok(data),
                    Err(err) if err.kind() == io::ErrorKind::NotFound => Err(unknown()),
                    Err(err) => Err(err.into()),
                }
            }
            Self::Embedded => jiff_tzdb::get(identifier)
                .map(|(_, data)| data.to_vec())
                .ok_or_else(unknown),
        }
    }

    /// Reads and decodes the record of `identifier`.
    pub fn location(&self, identifier: &str) -> Result<Location, SourceError> {
        let data = self.read(identifier)?;
        Ok(decode(identifier, &data)?)
    }

    /// Lists every identifier the source has a record for, sorted.
    pub fn identifiers(&self) -> Result<Vec<String>, SourceError> {
        let mut identifiers = match self {
            Self::Directory(dir) => walk_zoneinfo(dir)?,
            Self::Embedded => jiff_tzdb::available().map(ToString::to_string).collect(),
        };
        identifiers.sort_unstable();
        Ok(identifiers)
    }

    /// The tzdata release of the source, such as `2025b`.
    ///
    /// Directories only know their release when `tzdata.zi` was installed
    /// alongside the compiled records.
    pub fn version(&self) -> Option<String> {
        match self {
            Self::Directory(dir) => {
                let zi = fs::read_to_string(dir.join(TZDATA_ZI)).ok()?;
                parse_version_header(&zi)
            }
            Self::Embedded => jiff_tzdb::VERSION.map(ToString::to_string),
        }
    }
}

/// Only plain relative paths may be joined onto the zoneinfo directory.
fn is_relative_identifier(identifier: &str) -> bool {
    !identifier.is_empty()
        && Path::new(identifier)
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}

fn parse_version_header(zi: &str) -> Option<String> {
    let version = zi.lines().next()?.strip_prefix("# version")?.trim();
    (!version.is_empty()).then(|| version.to_string())
}

/// Walks a zoneinfo directory, following symbolic links, and returns the
/// identifiers of every file that starts with the TZif magic.
///
/// Entries that cannot be read are left out instead of failing the walk.
fn walk_zoneinfo(root: &Path) -> io::Result<Vec<String>> {
    // A missing or unreadable root is an error, not an empty database.
    fs::read_dir(root)?;

    let identifiers = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !SKIPPED_ENTRIES
                    .iter()
                    .any(|skipped| entry.file_name() == *skipped)
        })
        .flatten()
        .filter(|entry| entry.file_type().is_file() && has_tzif_magic(entry.path()))
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(root).ok()?;
            let identifier = relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            Some(identifier)
        })
        .collect();
    Ok(identifiers)
}

fn has_tzif_magic(path: &Path) -> bool {
    use std::io::Read;

    let mut magic = [0u8; 4];
    fs::File::open(path)
        .and_then(|mut file| file.read_exact(&mut magic))
        .is_ok_and(|()| &magic == MAGIC)
}
