//! # Hosts File Editor
//!
//! Line-oriented edits of a hosts-style file (`ip hostname [# comment]` per line).
//!
//! Every edit follows the same read, transform, atomic-replace cycle
//! ([`HostsFile::rewrite`]): the new content is written to a temporary file in the
//! same directory and renamed over the original, so readers such as the system
//! resolver see either the old file or the new one, never a torn write.
//!
//! Lines this module does not manage are carried over byte-for-byte and in order.
//! Concurrent editors in other processes are not coordinated with; the last
//! rename wins.

use std::fs;
use std::io::{self, Write};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use hostalias_common::AliasError;
use hostalias_common::network::HostEntry;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Storage for hosts-file records.
pub trait HostsStore: Send + Sync {
    /// True if the IP's textual form occurs anywhere in the store.
    fn exists(&self, ip: IpAddr) -> Result<bool, AliasError>;

    /// Appends a record for `entry`. Fails with `AlreadyPresent` if the IP is already mentioned.
    fn add_entry(&self, entry: &HostEntry, comment: &str) -> Result<(), AliasError>;

    /// Removes records that are exactly `entry`. Returns whether anything was removed.
    fn remove_entry(&self, entry: &HostEntry) -> Result<bool, AliasError>;
}

#[derive(Clone, Debug)]
pub struct HostsFile {
    path: PathBuf,
}

impl HostsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The raw file content. No encoding is assumed.
    pub fn read(&self) -> Result<Vec<u8>, AliasError> {
        fs::read(&self.path).map_err(|e| AliasError::file_io(&self.path, e))
    }

    /// Reads the file, hands its content to `transform` and atomically replaces the
    /// file with the result. When `transform` returns `None` the file is left alone.
    pub fn rewrite<F>(&self, transform: F) -> Result<bool, AliasError>
    where
        F: FnOnce(&[u8]) -> Result<Option<Vec<u8>>, AliasError>,
    {
        let current = self.read()?;
        match transform(&current)? {
            Some(updated) => {
                atomic_write(&self.path, &updated).map_err(|e| AliasError::file_io(&self.path, e))?;
                debug!(path = %self.path.display(), bytes = updated.len(), "hosts file replaced");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl HostsStore for HostsFile {
    fn exists(&self, ip: IpAddr) -> Result<bool, AliasError> {
        Ok(contains_ip(&self.read()?, ip))
    }

    fn add_entry(&self, entry: &HostEntry, comment: &str) -> Result<(), AliasError> {
        info!("Adding hosts entry {entry}");
        self.rewrite(|content| {
            if contains_ip(content, entry.ip()) {
                return Err(AliasError::AlreadyPresent {
                    path: self.path.clone(),
                    ip: entry.ip(),
                });
            }
            Ok(Some(append_line(content, &entry.to_line(comment))))
        })?;
        Ok(())
    }

    fn remove_entry(&self, entry: &HostEntry) -> Result<bool, AliasError> {
        info!("Removing hosts entry {entry}");
        self.rewrite(|content| {
            let (updated, removed) = remove_lines(content, entry);
            Ok(removed.then_some(updated))
        })
    }
}

/// Coarse membership check: a plain substring search for the IP's text.
///
/// An IP that only appears inside a comment, or as a prefix of a longer address
/// (`10.0.0.5` inside `10.0.0.50`), still counts as present.
pub fn contains_ip(content: &[u8], ip: IpAddr) -> bool {
    let needle = ip.to_string();
    let needle = needle.as_bytes();
    content.windows(needle.len()).any(|window| window == needle)
}

/// Splits `content` into lines, each keeping its `\n` terminator if it has one.
pub fn lines(content: &[u8]) -> impl Iterator<Item = &[u8]> {
    content.split_inclusive(|&b| b == b'\n')
}

/// True only for a record that is exactly `<entry.ip> <entry.host>`, ignoring
/// surrounding whitespace, the line terminator and any trailing comment.
///
/// Lines with more than one hostname are never matched, even if one of them is ours.
/// Bytes outside ASCII never match but are otherwise harmless.
pub fn is_entry_line(line: &[u8], entry: &HostEntry) -> bool {
    let data = match line.iter().position(|&b| b == b'#') {
        Some(hash) => &line[..hash],
        None => line,
    };
    let mut fields = data
        .split(|b| b.is_ascii_whitespace())
        .filter(|field| !field.is_empty());
    match (fields.next(), fields.next(), fields.next()) {
        (Some(ip), Some(host), None) => {
            ip == entry.ip().to_string().as_bytes() && host == entry.host().as_bytes()
        }
        _ => false,
    }
}

/// Appends `line` as a new record, terminating the previous last line if needed.
pub fn append_line(content: &[u8], line: &str) -> Vec<u8> {
    let mut output = Vec::with_capacity(content.len() + line.len() + 2);
    output.extend_from_slice(content);
    if !output.is_empty() && !output.ends_with(b"\n") {
        output.push(b'\n');
    }
    output.extend_from_slice(line.as_bytes());
    output.push(b'\n');
    output
}

/// Drops every line matching `entry`, copying all other lines through unchanged,
/// line endings included. Returns the new content and whether anything was dropped.
pub fn remove_lines(content: &[u8], entry: &HostEntry) -> (Vec<u8>, bool) {
    let mut output = Vec::with_capacity(content.len());
    let mut removed = false;
    for line in lines(content) {
        if is_entry_line(line, entry) {
            removed = true;
        } else {
            output.extend_from_slice(line);
        }
    }
    (output, removed)
}

fn atomic_write(path: &Path, contents: &[u8]) -> io::Result<()> {
    // Replace the file a symlink points at rather than the link itself.
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let dir = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.as_file().set_permissions(permissions_for(&target)?)?;
    tmp.persist(&target).map_err(|e| e.error)?;
    sync_dir(dir)
}

/// Flushes the directory entry so the rename survives a crash.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

fn permissions_for(path: &Path) -> io::Result<fs::Permissions> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.permissions()),
        #[cfg(unix)]
        Err(_) => {
            use std::os::unix::fs::PermissionsExt;
            Ok(fs::Permissions::from_mode(0o644))
        }
        #[cfg(not(unix))]
        Err(e) => Err(e),
    }
}
