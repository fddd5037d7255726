//! projectV core
//!
//! Lab project management for dlab digital-design courses: reset a student's
//! public working copy from the dev repository, browse golden reference
//! artifacts, and launch the simulation GUI, waveform viewer, editor and spec
//! page.
//!
//! # Flow
//!
//! ```text
//! name → IdentityResolver → Resolution → [confirm] → ResetPlan::execute
//!                                                          ↓
//!            GoldenCatalog ← ProjectDir ← project::locate(public root)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use projectv_core::prelude::*;
//!
//! let mut session = Session::new(Roots::from_env(), Settings::default(), SystemRunner::new());
//! session.reload()?;
//! println!("{}", session.show_log()?.text());
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod golden;
pub mod identity;
pub mod logs;
pub mod process;
pub mod project;
pub mod reset;
pub mod session;

pub use error::{
    ConfigError, GoldenError, IdentityError, LaunchError, ProjectError, ProjectVError, ProjectVResult,
    ResetError,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a session
    pub use crate::config::{IdentityScheme, Roots, Settings, ToolConfig};
    pub use crate::error::{ProjectVError, ProjectVResult};
    pub use crate::golden::GoldenCatalog;
    pub use crate::identity::{IdentityResolver, NameDigest, Resolution};
    pub use crate::logs::LogView;
    pub use crate::process::{CommandSpec, ProcessRunner, RunStatus, SystemRunner};
    pub use crate::project::ProjectDir;
    pub use crate::reset::{PullOutcome, ResetReport};
    pub use crate::session::{Confirm, GetProjectOutcome, Session};
}
