//! Embeddable core library for codefix.
//!
//! Provides a clap-free, I/O-abstracted entry point suitable for linking
//! into an editor integration, a CI bot or another host process.
//!
//! # Port traits
//!
//! All I/O is abstracted behind port traits in [`ports`]:
//! - [`AnalysisService`](ports::AnalysisService): load a project and query diagnostics/fixes
//! - [`WritePort`](ports::WritePort): write files and create directories
//!
//! The [`adapters`] module provides a filesystem snapshot backend, an
//! in-memory scripted backend and matching writers.
//!
//! # Entry points
//!
//! - [`run_codefix`](pipeline::run_codefix): run passes until nothing is rejected or the pass limit is hit
//! - [`run_pass`](pipeline::run_pass): run exactly one pass

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod settings;

// Re-export the domain's project port so callers don't need codefix-domain directly.
pub use codefix_domain::{FileNotFoundError, Project, ProjectLoadError};
