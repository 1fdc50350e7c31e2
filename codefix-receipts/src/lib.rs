//! Project descriptor and analysis snapshot ingestion.
//!
//! codefix does not analyse source code itself. An external engine writes an
//! analysis snapshot (diagnostics plus the fixes it offers for them) and a
//! small TOML descriptor names the project's sources and that snapshot.
//! Loading is tolerant: unknown fields are ignored so engines can carry
//! extra data without breaking codefix.

mod descriptor;
mod load;

pub use descriptor::{ProjectDescriptor, expand_sources, load_descriptor};
pub use load::{ReceiptLoadError, load_analysis};
