//! Error handling and result types for backport-pr.
//!
//! All fallible functions return the `Result<T>` alias defined here. Domain
//! failures are raised as [`crate::error::BackportError`] and converted into
//! a `color_eyre` report as they propagate, so callers can still downcast to
//! the concrete variant when they need to branch on it.
//!
//! ```rust,ignore
//! use color_eyre::eyre::Context;
//! use crate::result::Result;
//!
//! fn load() -> Result<String> {
//!     let content = std::fs::read_to_string("labels.txt")
//!         .wrap_err("failed to read labels")?;
//!     Ok(content)
//! }
//! ```

use color_eyre::eyre::Result as EyreResult;

/// Standard result type used throughout backport-pr.
pub type Result<T> = EyreResult<T>;
