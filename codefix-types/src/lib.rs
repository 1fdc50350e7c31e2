//! Shared DTOs (schemas-as-code) for the codefix workspace.
//!
//! # Design constraints
//! - Offsets are byte offsets into UTF-8 source text.
//! - Spans always refer to the *unmodified* file text.
//! - Prefer adding optional fields over changing semantics.

pub mod diagnostic;
pub mod fix;
pub mod receipt;
pub mod report;

/// Schema identifiers.
pub mod schema {
    pub const CODEFIX_ANALYSIS_V1: &str = "codefix.analysis.v1";
    pub const CODEFIX_REPORT_V1: &str = "codefix.report.v1";
}
