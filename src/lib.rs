pub mod actions;
pub mod backport;
pub mod cli;
pub mod config;
pub mod error;
pub mod forge;
pub mod git;
pub mod identity;
pub mod result;
pub mod template;

pub use backport::{Backport, Outcome};
pub use error::BackportError;
pub use result::Result;
