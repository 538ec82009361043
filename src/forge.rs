//! Remote code-hosting API access.
//!
//! Provides the two operations a backport consumes, listing the pull
//! requests associated with a commit and opening a pull request, behind a
//! common trait.

/// Connection and authentication settings for the forge.
pub mod config;

/// GitHub API client implementation.
pub mod github;

/// Dry-run aware wrapper around a forge implementation.
pub mod manager;

/// Request and response types shared by forge implementations.
pub mod request;

/// Common trait for forge platform abstraction.
pub mod traits;
