//! Testing utilities for the projectV workspace
//!
//! Filesystem fixtures laid out like a real course setup, and a process
//! runner that records invocations instead of starting programs.

#![allow(missing_docs)]

use projectv_core::config::{Roots, DEV_ROOT_VAR, DLAB_ROOT_VAR, PUBLIC_ROOT_VAR};
use projectv_core::identity::{HashedRecord, NameDigest, ASSIGNMENTS_FILE, HASHED_FILE, STUDENTS_FILE};
use projectv_core::process::{CommandSpec, ProcessRunner, RunStatus};
use projectv_core::LaunchError;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// `DLAB_ROOT`, `PROJECT_DEV_ROOT` and `PROJECT_PUBLIC_ROOT` in one temp dir
pub struct CourseFixture {
    _dir: TempDir,
    pub dlab_root: PathBuf,
    pub dev_root: PathBuf,
    pub public_root: PathBuf,
}

impl CourseFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let dlab_root = dir.path().join("dlab");
        let dev_root = dir.path().join("dev");
        let public_root = dir.path().join("public");
        fs::create_dir_all(dlab_root.join(".private")).unwrap();
        fs::create_dir_all(&dev_root).unwrap();
        fs::create_dir_all(&public_root).unwrap();
        Self {
            _dir: dir,
            dlab_root,
            dev_root,
            public_root,
        }
    }

    pub fn roots(&self) -> Roots {
        Roots {
            dlab_root: Some(self.dlab_root.clone()),
            dev_root: Some(self.dev_root.clone()),
            public_root: Some(self.public_root.clone()),
        }
    }

    /// `(name, value)` pairs for spawning the binary
    pub fn env(&self) -> [(&'static str, &Path); 3] {
        [
            (DLAB_ROOT_VAR, self.dlab_root.as_path()),
            (DEV_ROOT_VAR, self.dev_root.as_path()),
            (PUBLIC_ROOT_VAR, self.public_root.as_path()),
        ]
    }

    /// Plain students and assignments: `(id, name, group)`
    pub fn with_plain_students(self, students: &[(&str, &str, &str)]) -> Self {
        let names: String = students.iter().map(|(id, name, _)| format!("{id}@{name}\n")).collect();
        let groups: String = students.iter().map(|(id, _, group)| format!("{id}@{group}\n")).collect();
        fs::write(self.dlab_root.join(STUDENTS_FILE), names).unwrap();
        fs::write(self.dev_root.join(ASSIGNMENTS_FILE), groups).unwrap();
        self
    }

    /// Hashed records: `(id, name, group)`
    pub fn with_hashed_students(self, salt: &str, students: &[(&str, &str, &str)]) -> Self {
        let lines: String = students
            .iter()
            .map(|(id, name, group)| {
                let record = HashedRecord {
                    id: (*id).to_string(),
                    digest: NameDigest::of_name(name, salt),
                    group: (*group).to_string(),
                };
                format!("{}\n", record.to_line())
            })
            .collect();
        fs::write(self.dlab_root.join(HASHED_FILE), lines).unwrap();
        self
    }

    /// A project tree in the dev root
    pub fn dev_project(&self, group: &str) -> ProjectBuilder {
        ProjectBuilder::create(self.dev_root.join(group))
    }

    /// A project tree already in the public root
    pub fn public_project(&self, group: &str) -> ProjectBuilder {
        ProjectBuilder::create(self.public_root.join(group))
    }

    /// Names of every entry in the public root, sorted
    pub fn public_entries(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(&self.public_root)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl Default for CourseFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes conventional project files
pub struct ProjectBuilder {
    root: PathBuf,
}

impl ProjectBuilder {
    fn create(root: PathBuf) -> Self {
        fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Write `relative` with `content`, creating parents
    pub fn file(self, relative: &str, content: &str) -> Self {
        let path = self.root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    /// Write `relative` and backdate its mtime by `age`
    pub fn aged_file(self, relative: &str, content: &str, age: Duration) -> Self {
        let this = self.file(relative, content);
        let file = File::options().write(true).open(this.root.join(relative)).unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
        this
    }

    /// `golden/list` plus a `.log` and `.vcd` for every listed name
    pub fn golden(self, manifest: &str) -> Self {
        let mut this = self.file("golden/list", manifest);
        for name in manifest.lines().map(str::trim).filter(|l| !l.is_empty()) {
            this = this
                .file(&format!("golden/{name}.log"), &format!("golden log {name}\n"))
                .file(&format!("golden/{name}.vcd"), "$timescale 1ns $end\n");
        }
        this
    }
}

/// Records every invocation; blocking runs return `exit_code`
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub runs: Vec<CommandSpec>,
    pub launches: Vec<CommandSpec>,
    pub exit_code: i32,
    /// Programs that fail to start
    pub missing: Vec<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_missing(mut self, program: &str) -> Self {
        self.missing.push(program.to_string());
        self
    }

    pub fn total_calls(&self) -> usize {
        self.runs.len() + self.launches.len()
    }

    fn check(&self, spec: &CommandSpec) -> Result<(), LaunchError> {
        if self.missing.contains(&spec.program) {
            return Err(LaunchError::spawn(
                &spec.program,
                std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
            ));
        }
        Ok(())
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&mut self, spec: &CommandSpec) -> Result<RunStatus, LaunchError> {
        self.check(spec)?;
        self.runs.push(spec.clone());
        Ok(RunStatus {
            code: Some(self.exit_code),
        })
    }

    fn spawn_detached(&mut self, spec: &CommandSpec) -> Result<(), LaunchError> {
        self.check(spec)?;
        self.launches.push(spec.clone());
        Ok(())
    }
}
