//! Domain logic: turn a project's diagnostics into per-file candidate edits.
//!
//! This crate owns *which* edits are candidates and why. It does not own
//! how conflicting edits are resolved or applied; that's the `codefix-edit`
//! crate.

mod aggregate;
mod collect;
mod filter;
mod fixes;
mod planner;
mod ports;

pub use aggregate::EditSet;
pub use collect::collect_diagnostics;
pub use filter::{DiagnosticSelection, filter_by_code};
pub use fixes::{filter_by_fix_name, fixes_for_file, resolve_fixes};
pub use planner::{PassPlan, Planner, PlannerConfig};
pub use ports::{FileNotFoundError, Project, ProjectLoadError};
