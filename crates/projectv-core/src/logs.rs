//! Simulation and golden log retrieval

use crate::error::{GoldenError, ProjectError};
use crate::project::ProjectDir;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Shown when the project has no `sim_result/`
pub const NO_SIM_RESULT: &str = "[Simulation log not found]";
/// Shown when `sim_result/` has no `.log` files
pub const NO_LOG_FILES: &str = "[No .log files found in sim_result/]";

/// Text ready for the log display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogView {
    /// Contents of a log file
    File {
        /// Source file
        path: PathBuf,
        /// Last modification time, when the filesystem reports one
        modified: Option<SystemTime>,
        /// File contents, lossily decoded
        content: String,
    },
    /// Placeholder text when there is nothing to show
    Notice(&'static str),
}

impl LogView {
    /// Text to display
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::File { content, .. } => content,
            Self::Notice(text) => text,
        }
    }

    /// One-line description of the source
    #[must_use]
    pub fn header(&self) -> Option<String> {
        match self {
            Self::File { path, modified, .. } => Some(match modified {
                Some(time) => format!(
                    "{} (modified {})",
                    path.display(),
                    DateTime::<Local>::from(*time).format("%Y-%m-%d %H:%M:%S")
                ),
                None => path.display().to_string(),
            }),
            Self::Notice(_) => None,
        }
    }
}

/// Files in `dir` matching a glob `pattern`, in glob order
///
/// Unreadable entries and invalid patterns yield nothing.
#[must_use]
pub fn glob_files(dir: &Path, pattern: &str) -> Vec<PathBuf> {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let full = format!("{escaped}/{pattern}");
    match glob::glob(&full) {
        Ok(paths) => paths.filter_map(Result::ok).filter(|p| p.is_file()).collect(),
        Err(e) => {
            tracing::warn!("Invalid glob pattern {}: {}", full, e);
            Vec::new()
        }
    }
}

/// The most recently modified `*.log` in `dir`
///
/// Files whose modification time cannot be read rank oldest.
#[must_use]
pub fn latest_log(dir: &Path) -> Option<PathBuf> {
    glob_files(dir, "*.log")
        .into_iter()
        .map(|path| {
            let modified = modified_time(&path).unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, path)
        })
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, path)| path)
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Read a file as display text
///
/// # Errors
/// IO errors from the read
pub fn read_view(path: &Path) -> std::io::Result<LogView> {
    let bytes = std::fs::read(path)?;
    Ok(LogView::File {
        path: path.to_path_buf(),
        modified: modified_time(path),
        content: String::from_utf8_lossy(&bytes).into_owned(),
    })
}

/// The latest simulation log of a project, or a notice
///
/// # Errors
/// The chosen log cannot be read
pub fn simulation_log(project: &ProjectDir) -> Result<LogView, ProjectError> {
    let dir = project.sim_result_dir();
    if !dir.is_dir() {
        return Ok(LogView::Notice(NO_SIM_RESULT));
    }
    match latest_log(&dir) {
        Some(path) => read_view(&path).map_err(|e| ProjectError::io_error(&path, e)),
        None => Ok(LogView::Notice(NO_LOG_FILES)),
    }
}

/// `golden/<name>.log` of a project
///
/// # Errors
/// Invalid item name, [`GoldenError::MissingLog`] when absent, IO errors on read
pub fn golden_log(project: &ProjectDir, name: &str) -> Result<LogView, GoldenError> {
    let path = project.golden_log(name)?;
    if !path.is_file() {
        return Err(GoldenError::MissingLog(path));
    }
    read_view(&path).map_err(|e| GoldenError::io_error(&path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::Duration;

    fn touch(path: &Path, content: &str, age: Duration) {
        fs::write(path, content).unwrap();
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
    }

    #[test]
    fn latest_log_prefers_newest_mtime() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.log"), "newer", Duration::from_secs(10));
        touch(&dir.path().join("a.log"), "older", Duration::from_secs(3600));
        touch(&dir.path().join("c.txt"), "ignored", Duration::ZERO);

        assert_eq!(latest_log(dir.path()), Some(dir.path().join("b.log")));
    }

    #[test]
    fn simulation_log_notices() {
        let dir = tempfile::tempdir().unwrap();
        let project = ProjectDir::new(dir.path());
        assert_eq!(simulation_log(&project).unwrap(), LogView::Notice(NO_SIM_RESULT));

        fs::create_dir(project.sim_result_dir()).unwrap();
        assert_eq!(simulation_log(&project).unwrap(), LogView::Notice(NO_LOG_FILES));
    }

    #[test]
    fn simulation_log_reads_content() {
        let dir = tempfile::tempdir().unwrap();
        let project = ProjectDir::new(dir.path());
        fs::create_dir(project.sim_result_dir()).unwrap();
        touch(&project.sim_result_dir().join("run.log"), "PASS 12/12\n", Duration::ZERO);

        let view = simulation_log(&project).unwrap();
        assert_eq!(view.text(), "PASS 12/12\n");
        assert!(view.header().unwrap().contains("run.log (modified "));
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin.log");
        fs::write(&path, [b'o', b'k', 0xff]).unwrap();
        assert_eq!(read_view(&path).unwrap().text(), "ok\u{fffd}");
    }

    #[test]
    fn golden_log_missing() {
        let dir = tempfile::tempdir().unwrap();
        let project = ProjectDir::new(dir.path());
        let err = golden_log(&project, "t1").unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Golden log not found: {}", project.golden_log("t1").unwrap().display())
        );
    }

    #[test]
    fn glob_escapes_directory_metacharacters() {
        let dir = tempfile::tempdir().unwrap();
        let odd = dir.path().join("run[1]");
        fs::create_dir(&odd).unwrap();
        fs::write(odd.join("x.log"), "").unwrap();
        assert_eq!(glob_files(&odd, "*.log"), vec![odd.join("x.log")]);
    }
}
