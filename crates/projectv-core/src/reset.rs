//! Public working copy reset
//!
//! A reset pulls the dev root, removes every previous project directory from
//! the public root and copies the resolved project tree in. Nothing is rolled
//! back on partial failure. Callers must obtain confirmation first.

use crate::config::ToolConfig;
use crate::error::ResetError;
use crate::process::{CommandSpec, ProcessRunner, RunStatus};
use crate::project::{is_plain_name, is_project_name, project_dirs};
use std::fs;
use std::path::{Path, PathBuf};

/// What to reset
#[derive(Debug, Clone)]
pub struct ResetPlan<'a> {
    /// Project directory name under the dev root
    pub project_group: &'a str,
    /// Source repository
    pub dev_root: &'a Path,
    /// Student working directory
    pub public_root: &'a Path,
}

/// Result of the `git pull` step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullOutcome {
    /// Exit code zero
    Updated,
    /// Ran but exited non-zero
    Failed(RunStatus),
    /// Could not be started
    NotRun(String),
}

/// What a reset did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetReport {
    /// `git pull` result
    pub pull: PullOutcome,
    /// Project directories removed from the public root
    pub removed: Vec<PathBuf>,
    /// New project directory
    pub copied_to: PathBuf,
    /// Regular files and links copied
    pub files_copied: usize,
}

impl ResetPlan<'_> {
    /// `dev_root/<group>`
    #[must_use]
    pub fn source(&self) -> PathBuf {
        self.dev_root.join(self.project_group)
    }

    /// `public_root/<group>`
    #[must_use]
    pub fn destination(&self) -> PathBuf {
        self.public_root.join(self.project_group)
    }

    /// Check the group names a single project directory under the dev root
    ///
    /// The copy must be found again by [`crate::project::locate`] and removed
    /// by the next reset, so the group carries the project prefix.
    ///
    /// # Errors
    /// Group is not a plain prefixed name or its source tree is missing
    pub fn validate(&self) -> Result<(), ResetError> {
        if !is_plain_name(self.project_group) || !is_project_name(self.project_group) {
            return Err(ResetError::InvalidGroup(self.project_group.to_string()));
        }
        let source = self.source();
        if !source.is_dir() {
            return Err(ResetError::MissingSource(source));
        }
        Ok(())
    }

    /// Pull, clear and copy
    ///
    /// A failed pull is logged and recorded; the copy proceeds from whatever
    /// the dev root holds.
    ///
    /// # Errors
    /// Validation failure (before any mutation) or filesystem errors
    pub fn execute(&self, tools: &ToolConfig, runner: &mut dyn ProcessRunner) -> Result<ResetReport, ResetError> {
        self.validate()?;
        tracing::info!("Resetting public project to {}", self.project_group);

        let pull = self.pull(tools, runner);
        // The pull may have removed the project from the dev root.
        let source = self.source();
        if !source.is_dir() {
            return Err(ResetError::MissingSource(source));
        }

        let removed = self.clear_public_root()?;
        let destination = self.destination();
        let files_copied = copy_tree(&source, &destination)?;

        tracing::info!(
            "Copied {} files into {} ({} previous projects removed)",
            files_copied,
            destination.display(),
            removed.len()
        );
        Ok(ResetReport {
            pull,
            removed,
            copied_to: destination,
            files_copied,
        })
    }

    fn pull(&self, tools: &ToolConfig, runner: &mut dyn ProcessRunner) -> PullOutcome {
        let spec = CommandSpec::new(&tools.git)
            .arg("-C")
            .arg(self.dev_root)
            .arg("pull");
        match runner.run(&spec) {
            Ok(status) if status.success() => PullOutcome::Updated,
            Ok(status) => {
                tracing::warn!("{} failed with {}", spec, status);
                PullOutcome::Failed(status)
            }
            Err(e) => {
                tracing::warn!("{}", e);
                PullOutcome::NotRun(e.to_string())
            }
        }
    }

    fn clear_public_root(&self) -> Result<Vec<PathBuf>, ResetError> {
        let dirs = project_dirs(self.public_root).map_err(|source| ResetError::Io {
            path: self.public_root.to_path_buf(),
            source,
        })?;
        for dir in &dirs {
            tracing::debug!("Removing {}", dir.display());
            fs::remove_dir_all(dir).map_err(|source| ResetError::Remove {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(dirs)
    }
}

/// Recursively copy `from` into a new directory `to`
///
/// Symlinks are recreated as links on unix and followed elsewhere.
///
/// # Errors
/// First IO failure, tagged with the paths involved
pub fn copy_tree(from: &Path, to: &Path) -> Result<usize, ResetError> {
    let copy_err = |from: &Path, to: &Path| {
        let (from, to) = (from.to_path_buf(), to.to_path_buf());
        move |source: std::io::Error| ResetError::Copy { from, to, source }
    };

    fs::create_dir_all(to).map_err(copy_err(from, to))?;
    let mut copied = 0;
    for entry in fs::read_dir(from).map_err(copy_err(from, to))? {
        let entry = entry.map_err(copy_err(from, to))?;
        let src = entry.path();
        let dst = to.join(entry.file_name());
        let file_type = entry.file_type().map_err(copy_err(&src, &dst))?;

        if file_type.is_dir() {
            copied += copy_tree(&src, &dst)?;
        } else if file_type.is_symlink() {
            copy_link(&src, &dst).map_err(copy_err(&src, &dst))?;
            copied += 1;
        } else {
            fs::copy(&src, &dst).map_err(copy_err(&src, &dst))?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(unix)]
fn copy_link(src: &Path, dst: &Path) -> std::io::Result<()> {
    let target = fs::read_link(src)?;
    std::os::unix::fs::symlink(target, dst)
}

#[cfg(not(unix))]
fn copy_link(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::copy(src, dst).map(|_| ())
}
