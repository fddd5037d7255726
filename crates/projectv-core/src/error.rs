//! Error types for projectV
//!
//! Every failure is recoverable from the user's point of view: the action is
//! reported and can be retried. The categories are:
//! - Configuration (environment roots, config file)
//! - Identity lookup (record files, misses)
//! - Project location and golden artifacts
//! - External process launches
//! - Reset (filesystem mutation)

use std::path::PathBuf;

/// Errors while reading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is unset or empty
    #[error("{0} is not set")]
    MissingVar(&'static str),

    /// Environment variable does not name an existing directory
    #[error("{var} is invalid: {path} is not a directory")]
    NotADirectory {
        /// Variable name
        var: &'static str,
        /// Value it holds
        path: PathBuf,
    },

    /// Config file could not be read
    #[error("io error reading config {path}: {source}")]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::config::Settings`]
    #[error("invalid config {path}: {source}")]
    Parse {
        /// Config file
        path: PathBuf,
        /// Parser error
        #[source]
        source: toml::de::Error,
    },
}

/// Errors while resolving a student name to a project group
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// Blank input
    #[error("Please enter a student name.")]
    EmptyName,

    /// Record file does not exist
    #[error("record file not found: {0}")]
    MissingRecordFile(PathBuf),

    /// No record matches the entered name
    #[error("Student name '{0}' not found.")]
    StudentNotFound(String),

    /// Student exists but has no assignment
    #[error("No project found for student ID '{0}'.")]
    ProjectNotFound(String),

    /// IO error while scanning a record file
    #[error("io error reading {path}: {source}")]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl IdentityError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors while locating or reading the current project
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// Public root contains no project directory
    #[error("No existing dlab* project found in {0}.")]
    NoProject(PathBuf),

    /// An action needs a project but none is loaded
    #[error("No dlab* project loaded. Use Get or Reload Project first.")]
    NoProjectLoaded,

    /// `sim_result/wave.vcd` is missing
    #[error("No waveform file found. Please run simulation first.")]
    NoWaveform,

    /// `ref/spec.url` is missing or blank
    #[error("No spec URL found in {0}")]
    NoSpecUrl(PathBuf),

    /// `design_src/` is missing
    #[error("No design sources found: {0}")]
    NoDesignSources(PathBuf),

    /// IO error while reading project files
    #[error("io error reading {path}: {source}")]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl ProjectError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors while accessing golden reference artifacts
#[derive(Debug, thiserror::Error)]
pub enum GoldenError {
    /// Catalog is empty or nothing is selected
    #[error("No golden item selected.")]
    NoSelection,

    /// Requested item is not in the catalog
    #[error("golden item '{0}' is not in the list")]
    UnknownItem(String),

    /// Item name would leave `golden/`
    #[error("invalid golden item name: '{0}'")]
    InvalidItem(String),

    /// Golden log file is missing
    #[error("Golden log not found: {0}")]
    MissingLog(PathBuf),

    /// Golden waveform file is missing
    #[error("Golden waveform not found: {0}")]
    MissingWaveform(PathBuf),

    /// IO error while reading the manifest or a log
    #[error("io error reading {path}: {source}")]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl GoldenError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors while starting an external program
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    /// Program could not be spawned
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        /// Program name as configured
        program: String,
        /// OS error
        #[source]
        source: std::io::Error,
    },
}

impl LaunchError {
    /// Create spawn error for program
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }
}

/// Errors during a project reset
#[derive(Debug, thiserror::Error)]
pub enum ResetError {
    /// Project group is not a plain `dlab*` directory name
    #[error("invalid project group name: '{0}' (expected a single dlab* directory name)")]
    InvalidGroup(String),

    /// Project tree is missing from the dev root
    #[error("project source not found: {0}")]
    MissingSource(PathBuf),

    /// Removing a previous project failed
    #[error("failed to remove {path}: {source}")]
    Remove {
        /// Directory being removed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Copying the project tree failed
    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        /// Source path
        from: PathBuf,
        /// Destination path
        to: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Public root could not be listed
    #[error("io error reading {path}: {source}")]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Combined projectV error
#[derive(Debug, thiserror::Error)]
pub enum ProjectVError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Identity lookup error
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// Project location error
    #[error(transparent)]
    Project(#[from] ProjectError),

    /// Golden artifact error
    #[error(transparent)]
    Golden(#[from] GoldenError),

    /// Program launch error
    #[error(transparent)]
    Launch(#[from] LaunchError),

    /// Reset error
    #[error(transparent)]
    Reset(#[from] ResetError),
}

/// Result type alias for projectV operations
pub type ProjectVResult<T> = Result<T, ProjectVError>;
