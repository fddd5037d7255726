//! Current project discovery and conventional project subpaths

use crate::error::{GoldenError, ProjectError, ProjectVResult};
use std::path::{Component, Path, PathBuf};

/// Name prefix of project directories in the public and dev roots
pub const PROJECT_PREFIX: &str = "dlab";

/// A project directory under the public root
///
/// Only existence is checked when located; subpaths are checked on access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDir {
    root: PathBuf,
}

impl ProjectDir {
    /// Wrap an existing directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Project directory
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Directory name, e.g. `dlab3`
    #[must_use]
    pub fn name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// `sim_result/`
    #[must_use]
    pub fn sim_result_dir(&self) -> PathBuf {
        self.root.join("sim_result")
    }

    /// `sim_result/wave.vcd`
    #[must_use]
    pub fn wave_file(&self) -> PathBuf {
        self.sim_result_dir().join("wave.vcd")
    }

    /// `golden/`
    #[must_use]
    pub fn golden_dir(&self) -> PathBuf {
        self.root.join("golden")
    }

    /// `golden/list`
    #[must_use]
    pub fn golden_manifest(&self) -> PathBuf {
        self.golden_dir().join("list")
    }

    /// `golden/<name>.log`
    ///
    /// # Errors
    /// [`GoldenError::InvalidItem`] unless `name` is a plain file name
    pub fn golden_log(&self, name: &str) -> Result<PathBuf, GoldenError> {
        self.golden_file(name, "log")
    }

    /// `golden/<name>.vcd`
    ///
    /// # Errors
    /// [`GoldenError::InvalidItem`] unless `name` is a plain file name
    pub fn golden_waveform(&self, name: &str) -> Result<PathBuf, GoldenError> {
        self.golden_file(name, "vcd")
    }

    fn golden_file(&self, name: &str, extension: &str) -> Result<PathBuf, GoldenError> {
        if !is_plain_name(name) {
            return Err(GoldenError::InvalidItem(name.to_string()));
        }
        Ok(self.golden_dir().join(format!("{name}.{extension}")))
    }

    /// `design_src/`
    #[must_use]
    pub fn design_src_dir(&self) -> PathBuf {
        self.root.join("design_src")
    }

    /// `ref/spec.url`
    #[must_use]
    pub fn spec_url_file(&self) -> PathBuf {
        self.root.join("ref").join("spec.url")
    }

    /// Read the spec URL, trimmed
    ///
    /// # Errors
    /// File missing, unreadable or blank
    pub fn spec_url(&self) -> Result<String, ProjectError> {
        let path = self.spec_url_file();
        if !path.is_file() {
            return Err(ProjectError::NoSpecUrl(path));
        }
        let text = std::fs::read_to_string(&path).map_err(|e| ProjectError::io_error(&path, e))?;
        let url = text.trim();
        if url.is_empty() {
            return Err(ProjectError::NoSpecUrl(path));
        }
        Ok(url.to_string())
    }

    /// `design_src/*.v`, sorted
    ///
    /// # Errors
    /// `design_src/` missing
    pub fn design_sources(&self) -> Result<Vec<PathBuf>, ProjectError> {
        let dir = self.design_src_dir();
        if !dir.is_dir() {
            return Err(ProjectError::NoDesignSources(dir));
        }
        let mut files = crate::logs::glob_files(&dir, "*.v");
        files.sort();
        Ok(files)
    }
}

/// Whether a directory entry name marks a project
#[must_use]
pub fn is_project_name(name: &str) -> bool {
    name.starts_with(PROJECT_PREFIX)
}

/// Whether `name` is exactly one normal path component
#[must_use]
pub fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Find the current project in `public_root`
///
/// One level is scanned in filesystem enumeration order; the first directory
/// with the project prefix wins.
///
/// # Errors
/// [`ProjectError::NoProject`] when nothing matches, IO errors listing the root
pub fn locate(public_root: &Path) -> ProjectVResult<ProjectDir> {
    let entries =
        std::fs::read_dir(public_root).map_err(|e| ProjectError::io_error(public_root, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| ProjectError::io_error(public_root, e))?;
        let name = entry.file_name();
        let path = entry.path();
        if is_project_name(&name.to_string_lossy()) && path.is_dir() {
            tracing::debug!("Located project {}", path.display());
            return Ok(ProjectDir::new(path));
        }
    }
    Err(ProjectError::NoProject(public_root.to_path_buf()).into())
}

/// Every project directory directly in `root`, in enumeration order
///
/// # Errors
/// IO errors listing the root
pub fn project_dirs(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        if is_project_name(&entry.file_name().to_string_lossy()) && path.is_dir() {
            found.push(path);
        }
    }
    Ok(found)
}
