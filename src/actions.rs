//! GitHub Actions workflow command output.
//!
//! When running inside a workflow, protocol phases are folded into log groups
//! and fatal errors are surfaced as error annotations. Outside of a workflow
//! group titles are logged normally and nothing else is printed.
use log::*;
use std::env;

/// Whether the process is running inside a GitHub Actions workflow.
pub fn workflow_commands_enabled() -> bool {
    env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// Escape message data for a workflow command.
pub fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Emit an `::error::` annotation for a failed run.
pub fn report_failure(enabled: bool, message: &str) {
    if enabled {
        println!("::error::{}", escape_data(message));
    }
}

/// Collapsible log group, closed when dropped.
pub struct LogGroup {
    enabled: bool,
}

impl LogGroup {
    pub fn start(enabled: bool, title: &str) -> Self {
        if enabled {
            println!("::group::{title}");
        } else {
            info!("{title}");
        }
        Self { enabled }
    }
}

impl Drop for LogGroup {
    fn drop(&mut self) {
        if self.enabled {
            println!("::endgroup::");
        }
    }
}
