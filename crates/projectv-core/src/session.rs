//! User actions over the current project
//!
//! A [`Session`] owns the only retained state: the current project directory
//! and its golden catalog. Every action is synchronous. Blocking runs
//! (`git pull`, `make run-gui`) hold the caller; viewers and editors are
//! launched detached.

use crate::config::{Roots, Settings};
use crate::error::{GoldenError, IdentityError, ProjectError, ProjectVResult};
use crate::golden::GoldenCatalog;
use crate::identity::{IdentityResolver, Resolution};
use crate::logs::{self, LogView};
use crate::process::{CommandSpec, ProcessRunner};
use crate::project::{self, ProjectDir};
use crate::reset::{ResetPlan, ResetReport};

/// Headline of the reset confirmation
pub const RESET_WARNING: &str = "Will reset all your project content.";

/// Asks the user to approve a destructive action
pub trait Confirm {
    /// `true` to proceed
    fn confirm(&mut self, headline: &str, detail: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str, &str) -> bool,
{
    fn confirm(&mut self, headline: &str, detail: &str) -> bool {
        self(headline, detail)
    }
}

/// Result of [`Session::get_project`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetProjectOutcome {
    /// Confirmation declined; nothing changed
    Cancelled(Resolution),
    /// Reset performed and project reloaded
    Reset {
        /// Who and what was reset
        resolution: Resolution,
        /// What the reset did
        report: ResetReport,
    },
}

/// Application state plus the runner used for external programs
pub struct Session<R: ProcessRunner> {
    roots: Roots,
    settings: Settings,
    runner: R,
    project: Option<ProjectDir>,
    catalog: GoldenCatalog,
}

impl<R: ProcessRunner> std::fmt::Debug for Session<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("roots", &self.roots)
            .field("project", &self.project)
            .field("golden_items", &self.catalog.items().len())
            .finish_non_exhaustive()
    }
}

impl<R: ProcessRunner> Session<R> {
    /// Create a session with no project loaded
    pub fn new(roots: Roots, settings: Settings, runner: R) -> Self {
        Self {
            roots,
            settings,
            runner,
            project: None,
            catalog: GoldenCatalog::default(),
        }
    }

    /// Current project, if loaded
    #[must_use]
    pub fn project(&self) -> Option<&ProjectDir> {
        self.project.as_ref()
    }

    /// Golden catalog of the current project
    #[must_use]
    pub fn catalog(&self) -> &GoldenCatalog {
        &self.catalog
    }

    /// Settings in effect
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The process runner
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Locate the project in the public root and load its catalog
    ///
    /// # Errors
    /// Public root invalid or no project present; the previous state is kept
    pub fn reload(&mut self) -> ProjectVResult<&ProjectDir> {
        let public_root = self.roots.public_root()?;
        let found = project::locate(public_root)?;
        let catalog = GoldenCatalog::load(&found)?;
        tracing::info!(
            "Loaded project {} ({} golden items)",
            found.path().display(),
            catalog.items().len()
        );
        self.catalog = catalog;
        Ok(&*self.project.insert(found))
    }

    /// Resolve `name`, confirm, reset the public root and reload
    ///
    /// Nothing is touched unless the name resolves, all roots are valid and
    /// `confirm` approves.
    ///
    /// # Errors
    /// Empty name, configuration, lookup, reset or reload failures
    pub fn get_project(&mut self, name: &str, confirm: &mut dyn Confirm) -> ProjectVResult<GetProjectOutcome> {
        if name.trim().is_empty() {
            return Err(IdentityError::EmptyName.into());
        }
        let roots = self.roots.require()?;
        let resolver = IdentityResolver::new(roots.dlab_root, roots.dev_root, self.settings.identity.clone());
        let resolution = resolver.resolve(name)?;

        let detail = format!("Do you want to continue for: {}?", resolution.project_group);
        if !confirm.confirm(RESET_WARNING, &detail) {
            tracing::info!("Reset of {} cancelled", resolution.project_group);
            return Ok(GetProjectOutcome::Cancelled(resolution));
        }

        let plan = ResetPlan {
            project_group: &resolution.project_group,
            dev_root: roots.dev_root,
            public_root: roots.public_root,
        };
        let report = match plan.execute(&self.settings.tools, &mut self.runner) {
            Ok(report) => report,
            Err(e) => {
                if self.project.as_ref().is_some_and(|p| !p.path().is_dir()) {
                    self.forget_project();
                }
                return Err(e.into());
            }
        };
        if let Err(e) = self.reload() {
            self.forget_project();
            return Err(e);
        }
        Ok(GetProjectOutcome::Reset { resolution, report })
    }

    fn forget_project(&mut self) {
        tracing::warn!("Current project is gone; reload required");
        self.project = None;
        self.catalog = GoldenCatalog::default();
    }

    fn require_project(&self) -> Result<&ProjectDir, ProjectError> {
        self.project.as_ref().ok_or(ProjectError::NoProjectLoaded)
    }

    /// Run `make run-gui` in the project, then show the latest log
    ///
    /// The exit status is logged, not treated as an error.
    ///
    /// # Errors
    /// No project, make could not start, log unreadable
    pub fn run_gui(&mut self) -> ProjectVResult<LogView> {
        let project = self.require_project()?.clone();
        let tools = &self.settings.tools;
        let spec = CommandSpec::new(&tools.make)
            .arg(&tools.make_target)
            .current_dir(project.path());
        let status = self.runner.run(&spec)?;
        if !status.success() {
            tracing::warn!("{} finished with {}", spec, status);
        }
        Ok(logs::simulation_log(&project)?)
    }

    /// Latest simulation log
    ///
    /// # Errors
    /// No project or log unreadable
    pub fn show_log(&self) -> ProjectVResult<LogView> {
        Ok(logs::simulation_log(self.require_project()?)?)
    }

    /// Open `sim_result/wave.vcd` in the waveform viewer
    ///
    /// # Errors
    /// No project, no waveform, viewer could not start
    pub fn show_waveform(&mut self) -> ProjectVResult<()> {
        let wave = self.require_project()?.wave_file();
        if !wave.is_file() {
            return Err(ProjectError::NoWaveform.into());
        }
        let spec = CommandSpec::new(&self.settings.tools.waveform_viewer).arg(wave);
        self.runner.spawn_detached(&spec)?;
        Ok(())
    }

    /// Change the selected golden item
    ///
    /// # Errors
    /// No project or unknown item
    pub fn select_golden(&mut self, name: &str) -> ProjectVResult<()> {
        self.require_project()?;
        self.catalog.select(name)?;
        Ok(())
    }

    fn selected_golden(&self) -> ProjectVResult<(&ProjectDir, &str)> {
        let project = self.require_project()?;
        let name = self.catalog.require_selected()?;
        Ok((project, name))
    }

    /// Contents of `golden/<selected>.log`
    ///
    /// # Errors
    /// No project, no selection, missing or unreadable log
    pub fn show_golden_log(&self) -> ProjectVResult<LogView> {
        let (project, name) = self.selected_golden()?;
        Ok(logs::golden_log(project, name)?)
    }

    /// Open `golden/<selected>.vcd` in the waveform viewer
    ///
    /// # Errors
    /// No project, no selection, missing waveform, viewer could not start
    pub fn show_golden_waveform(&mut self) -> ProjectVResult<()> {
        let (project, name) = self.selected_golden()?;
        let path = project.golden_waveform(name)?;
        if !path.is_file() {
            return Err(GoldenError::MissingWaveform(path).into());
        }
        let spec = CommandSpec::new(&self.settings.tools.waveform_viewer).arg(path);
        self.runner.spawn_detached(&spec)?;
        Ok(())
    }

    /// Open the URL in `ref/spec.url`
    ///
    /// # Errors
    /// No project, missing URL, opener could not start
    pub fn open_spec(&mut self) -> ProjectVResult<String> {
        let url = self.require_project()?.spec_url()?;
        let spec = CommandSpec::new(&self.settings.tools.opener).arg(&url);
        self.runner.spawn_detached(&spec)?;
        Ok(url)
    }

    /// Open `design_src/` in the editor with every `.v` file
    ///
    /// # Errors
    /// No project, no `design_src/`, editor could not start
    pub fn open_code(&mut self) -> ProjectVResult<usize> {
        let project = self.require_project()?;
        let sources = project.design_sources()?;
        let mut spec = CommandSpec::new(&self.settings.tools.editor).arg(project.design_src_dir());
        if !sources.is_empty() {
            spec = spec.arg("--goto").args(&sources);
        }
        self.runner.spawn_detached(&spec)?;
        Ok(sources.len())
    }
}
