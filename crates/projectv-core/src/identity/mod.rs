//! Student name → project group resolution
//!
//! Two record schemes are supported:
//! - **Plain**: `$DLAB_ROOT/.private/students` holds `id@name`, and
//!   `$PROJECT_DEV_ROOT/id-projects` holds `id@group`
//! - **Hashed**: `$DLAB_ROOT/.private/id-hash-projects` holds `id@hash@group`
//!   where `hash` is a [`NameDigest`]
//!
//! Every lookup reads the files fresh; the first exact match wins.

use crate::config::{IdentityConfig, IdentityScheme};
use crate::error::IdentityError;
use std::path::{Path, PathBuf};

mod digest;
mod records;

pub use digest::{normalize, DigestError, NameDigest};
pub use records::{scan, HashedRecord, PairRecord, SEPARATOR};

/// Plain students file, relative to `DLAB_ROOT`
pub const STUDENTS_FILE: &str = ".private/students";
/// Hashed record file, relative to `DLAB_ROOT`
pub const HASHED_FILE: &str = ".private/id-hash-projects";
/// Plain assignments file, relative to `PROJECT_DEV_ROOT`
pub const ASSIGNMENTS_FILE: &str = "id-projects";

/// A resolved student
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Student id from the record file
    pub student_id: String,
    /// Project directory name under the dev root
    pub project_group: String,
}

/// Resolves names against the record files under two roots
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    dlab_root: PathBuf,
    dev_root: PathBuf,
    config: IdentityConfig,
}

impl IdentityResolver {
    /// Create a resolver over the identity and dev roots
    pub fn new(dlab_root: impl Into<PathBuf>, dev_root: impl Into<PathBuf>, config: IdentityConfig) -> Self {
        Self {
            dlab_root: dlab_root.into(),
            dev_root: dev_root.into(),
            config,
        }
    }

    /// The scheme a lookup would use right now
    #[must_use]
    pub fn effective_scheme(&self) -> IdentityScheme {
        match self.config.scheme {
            IdentityScheme::Auto if self.hashed_file().is_file() => IdentityScheme::Hashed,
            IdentityScheme::Auto => IdentityScheme::Plain,
            explicit => explicit,
        }
    }

    /// Resolve a free-text name
    ///
    /// # Errors
    /// Empty name, missing record file, no matching student or assignment
    pub fn resolve(&self, name: &str) -> Result<Resolution, IdentityError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(IdentityError::EmptyName);
        }

        match self.effective_scheme() {
            IdentityScheme::Hashed => self.resolve_hashed(name),
            _ => self.resolve_plain(name),
        }
    }

    fn resolve_plain(&self, name: &str) -> Result<Resolution, IdentityError> {
        let student = scan(&self.students_file(), PairRecord::parse, |r| r.value == name)?
            .ok_or_else(|| IdentityError::StudentNotFound(name.to_string()))?;
        let student_id = student.key;

        let assignment = scan(&self.assignments_file(), PairRecord::parse, |r| r.key == student_id)?
            .ok_or_else(|| IdentityError::ProjectNotFound(student_id.clone()))?;

        tracing::debug!("Resolved student {} to {}", student_id, assignment.value);
        Ok(Resolution {
            student_id,
            project_group: assignment.value,
        })
    }

    fn resolve_hashed(&self, name: &str) -> Result<Resolution, IdentityError> {
        let digest = NameDigest::of_name(name, &self.config.salt);
        let record = scan(&self.hashed_file(), HashedRecord::parse, |r| r.digest == digest)?
            .ok_or_else(|| IdentityError::StudentNotFound(name.to_string()))?;

        tracing::debug!("Resolved digest {} to {}", digest.short(), record.group);
        Ok(Resolution {
            student_id: record.id,
            project_group: record.group,
        })
    }

    /// Path of the plain students file
    #[must_use]
    pub fn students_file(&self) -> PathBuf {
        self.dlab_root.join(STUDENTS_FILE)
    }

    /// Path of the hashed record file
    #[must_use]
    pub fn hashed_file(&self) -> PathBuf {
        self.dlab_root.join(HASHED_FILE)
    }

    /// Path of the plain assignments file
    #[must_use]
    pub fn assignments_file(&self) -> PathBuf {
        self.dev_root.join(ASSIGNMENTS_FILE)
    }

    /// Identity root
    #[must_use]
    pub fn dlab_root(&self) -> &Path {
        &self.dlab_root
    }
}
