//! Environment roots and optional settings file

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root holding `.private/` identity records
pub const DLAB_ROOT_VAR: &str = "DLAB_ROOT";
/// Instructor-maintained source-of-truth repository
pub const DEV_ROOT_VAR: &str = "PROJECT_DEV_ROOT";
/// Student-facing working directory
pub const PUBLIC_ROOT_VAR: &str = "PROJECT_PUBLIC_ROOT";
/// Optional path to a TOML [`Settings`] file
pub const CONFIG_VAR: &str = "PROJECTV_CONFIG";

/// Directory roots captured from the environment
///
/// Values are stored as given; [`Roots::require`] validates on use so that
/// an action only fails on the roots it actually needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roots {
    /// `DLAB_ROOT`
    pub dlab_root: Option<PathBuf>,
    /// `PROJECT_DEV_ROOT`
    pub dev_root: Option<PathBuf>,
    /// `PROJECT_PUBLIC_ROOT`
    pub public_root: Option<PathBuf>,
}

impl Roots {
    /// Capture roots from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var_os(var).map(PathBuf::from))
    }

    /// Capture roots through an arbitrary lookup (empty values count as unset)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<PathBuf>,
    {
        let get = |var: &str| lookup(var).filter(|p| !p.as_os_str().is_empty());
        Self {
            dlab_root: get(DLAB_ROOT_VAR),
            dev_root: get(DEV_ROOT_VAR),
            public_root: get(PUBLIC_ROOT_VAR),
        }
    }

    /// The public root, validated
    ///
    /// # Errors
    /// Unset or not a directory
    pub fn public_root(&self) -> Result<&Path, ConfigError> {
        require(PUBLIC_ROOT_VAR, self.public_root.as_deref())
    }

    /// The dev root, validated
    ///
    /// # Errors
    /// Unset or not a directory
    pub fn dev_root(&self) -> Result<&Path, ConfigError> {
        require(DEV_ROOT_VAR, self.dev_root.as_deref())
    }

    /// The dlab root, validated
    ///
    /// # Errors
    /// Unset or not a directory
    pub fn dlab_root(&self) -> Result<&Path, ConfigError> {
        require(DLAB_ROOT_VAR, self.dlab_root.as_deref())
    }

    /// All three roots, validated in `DLAB_ROOT`, dev, public order
    ///
    /// # Errors
    /// The first root that is unset or not a directory
    pub fn require(&self) -> Result<ValidRoots<'_>, ConfigError> {
        Ok(ValidRoots {
            dlab_root: self.dlab_root()?,
            dev_root: self.dev_root()?,
            public_root: self.public_root()?,
        })
    }
}

fn require<'a>(var: &'static str, value: Option<&'a Path>) -> Result<&'a Path, ConfigError> {
    let path = value.ok_or(ConfigError::MissingVar(var))?;
    if path.is_dir() {
        Ok(path)
    } else {
        Err(ConfigError::NotADirectory {
            var,
            path: path.to_path_buf(),
        })
    }
}

/// Roots that are known to exist
#[derive(Debug, Clone, Copy)]
pub struct ValidRoots<'a> {
    /// `DLAB_ROOT`
    pub dlab_root: &'a Path,
    /// `PROJECT_DEV_ROOT`
    pub dev_root: &'a Path,
    /// `PROJECT_PUBLIC_ROOT`
    pub public_root: &'a Path,
}

/// Optional settings, every field defaulted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// External program names
    pub tools: ToolConfig,
    /// Identity record handling
    pub identity: IdentityConfig,
}

impl Settings {
    /// Parse settings from TOML text
    ///
    /// # Errors
    /// Invalid TOML or unknown keys
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load settings from a file
    ///
    /// # Errors
    /// File unreadable or invalid
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Load from an explicit path, else `PROJECTV_CONFIG`, else defaults
    ///
    /// # Errors
    /// The chosen file is unreadable or invalid
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os(CONFIG_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => {
                tracing::debug!("Loading settings from {}", path.display());
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }
}

/// External program names and the simulation make target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Version control client
    pub git: String,
    /// Build driver
    pub make: String,
    /// Target that runs the simulation GUI
    pub make_target: String,
    /// VCD viewer
    pub waveform_viewer: String,
    /// Code editor, must accept `<dir> --goto <files>`
    pub editor: String,
    /// URL opener
    pub opener: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            git: "git".to_string(),
            make: "make".to_string(),
            make_target: "run-gui".to_string(),
            waveform_viewer: "gtkwave".to_string(),
            editor: "code".to_string(),
            opener: "xdg-open".to_string(),
        }
    }
}

/// Which identity record scheme to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityScheme {
    /// Hashed when its record file exists, plain otherwise
    #[default]
    Auto,
    /// `id@name` students plus `id@group` assignments
    Plain,
    /// `id@hash@group` triples
    Hashed,
}

/// Identity settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityConfig {
    /// Record scheme
    pub scheme: IdentityScheme,
    /// Prefix mixed into the name digest; empty means unsalted
    pub salt: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(map: HashMap<&'static str, PathBuf>) -> impl Fn(&str) -> Option<PathBuf> {
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn missing_var_is_reported_by_name() {
        let roots = Roots::from_lookup(|_| None);
        let err = roots.public_root().unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(PUBLIC_ROOT_VAR)));
    }

    #[test]
    fn empty_var_counts_as_unset() {
        let roots = Roots::from_lookup(|_| Some(PathBuf::new()));
        assert_eq!(roots, Roots::default());
    }

    #[test]
    fn non_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain-file");
        std::fs::write(&file, "x").unwrap();

        let roots = Roots::from_lookup(lookup(HashMap::from([(DEV_ROOT_VAR, file.clone())])));
        match roots.dev_root() {
            Err(ConfigError::NotADirectory { var, path }) => {
                assert_eq!(var, DEV_ROOT_VAR);
                assert_eq!(path, file);
            }
            other => panic!("expected NotADirectory, got {other:?}"),
        }
    }

    #[test]
    fn require_checks_all_three() {
        let dir = tempfile::tempdir().unwrap();
        let roots = Roots::from_lookup(lookup(HashMap::from([
            (DLAB_ROOT_VAR, dir.path().to_path_buf()),
            (DEV_ROOT_VAR, dir.path().to_path_buf()),
        ])));
        assert!(matches!(
            roots.require(),
            Err(ConfigError::MissingVar(PUBLIC_ROOT_VAR))
        ));
    }

    #[test]
    fn settings_default_when_empty() {
        let settings = Settings::from_toml("", Path::new("inline")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.tools.waveform_viewer, "gtkwave");
        assert_eq!(settings.identity.scheme, IdentityScheme::Auto);
    }

    #[test]
    fn settings_partial_override() {
        let text = r#"
            [tools]
            waveform_viewer = "surfer"

            [identity]
            scheme = "hashed"
            salt = "fall-2026"
        "#;
        let settings = Settings::from_toml(text, Path::new("inline")).unwrap();
        assert_eq!(settings.tools.waveform_viewer, "surfer");
        assert_eq!(settings.tools.make_target, "run-gui");
        assert_eq!(settings.identity.scheme, IdentityScheme::Hashed);
        assert_eq!(settings.identity.salt, "fall-2026");
    }

    #[test]
    fn settings_reject_unknown_keys() {
        let err = Settings::from_toml("[tools]\nviewer = \"x\"", Path::new("cfg.toml")).unwrap_err();
        assert!(err.to_string().starts_with("invalid config cfg.toml"));
    }
}
