//! `@`-delimited record files
//!
//! One record per line; lines are trimmed before splitting. Malformed lines
//! are skipped, never fatal.

use super::digest::NameDigest;
use crate::error::IdentityError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Field separator in every record file
pub const SEPARATOR: char = '@';

/// Two-field record: `key@value`
///
/// Used for both `id@name` students and `id@group` assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairRecord {
    /// Left field
    pub key: String,
    /// Everything after the first `@`
    pub value: String,
}

impl PairRecord {
    /// Parse one line; `None` when it has no separator
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let (key, value) = line.trim().split_once(SEPARATOR)?;
        Some(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// Three-field record: `id@hash@group`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedRecord {
    /// Student id
    pub id: String,
    /// Digest of the student's normalized name
    pub digest: NameDigest,
    /// Project group directory name
    pub group: String,
}

impl HashedRecord {
    /// Parse one line; `None` unless it has exactly three fields and a valid digest
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.trim().split(SEPARATOR);
        let (id, hash, group) = (fields.next()?, fields.next()?, fields.next()?);
        if fields.next().is_some() {
            return None;
        }
        let digest = hash.parse().ok()?;
        Some(Self {
            id: id.to_string(),
            digest,
            group: group.to_string(),
        })
    }

    /// Render as a record line (without newline)
    #[must_use]
    pub fn to_line(&self) -> String {
        format!("{}{SEPARATOR}{}{SEPARATOR}{}", self.id, self.digest, self.group)
    }
}

/// Scan a record file and return the first record accepted by `find`
///
/// The file is read fresh on each call.
///
/// # Errors
/// [`IdentityError::MissingRecordFile`] when the file does not exist, IO
/// errors otherwise
pub fn scan<T, P, F>(path: &Path, parse: P, mut find: F) -> Result<Option<T>, IdentityError>
where
    P: Fn(&str) -> Option<T>,
    F: FnMut(&T) -> bool,
{
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(IdentityError::MissingRecordFile(path.to_path_buf()));
        }
        Err(e) => return Err(IdentityError::io_error(path, e)),
    };

    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| IdentityError::io_error(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        match parse(&line) {
            Some(record) if find(&record) => return Ok(Some(record)),
            Some(_) => {}
            None => tracing::debug!("Skipping malformed record at {}:{}", path.display(), number + 1),
        }
    }
    Ok(None)
}
