//! # Hokus Common
//!
//! Foundational pieces shared by every Hokus crate:
//!
//! - [`error`] - severity classification for error enums, plus the errors of this crate
//! - [`format`] - the data formats Hugo configs and site configs are written in
//! - [`logging`] - helpers for rendering values inside tracing statements

pub mod error;
pub mod format;
pub mod logging;

pub use error::{CommonError, ErrorSeverity, Result, Severity};
pub use format::DataFormat;
pub use logging::Pretty;
