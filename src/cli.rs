//! CLI argument parsing and GitHub Actions input mapping.
//!
//! Every input can be given as a flag or through the environment variable the
//! GitHub Actions runner sets for a workflow input (`INPUT_<NAME>`).
use clap::Parser;
use secrecy::SecretString;
use std::{env, path::PathBuf};

use crate::{
    config::{BackportConfig, DEFAULT_LABEL_PREFIX, LabelSelection, parse_list},
    error::BackportError,
    forge::config::{DEFAULT_API_URL, RemoteConfig},
    result::Result,
    template::{DEFAULT_BODY, DEFAULT_TITLE},
};

/// Cherry-pick a merged commit onto the branch named by its pull request's
/// `tests/<branch>` label and open a pull request for it.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, env = "INPUT_TOKEN", default_value = "", hide_env_values = true)]
    /// GitHub token. Falls back to GITHUB_TOKEN env var.
    pub token: String,

    #[arg(long, env = "INPUT_COMMITTER", default_value = "")]
    /// Committer identity, "Name <email>".
    pub committer: String,

    #[arg(long, env = "INPUT_AUTHOR", default_value = "")]
    /// Author identity, "Name <email>".
    pub author: String,

    #[arg(long, env = "INPUT_BRANCH", default_value = "")]
    /// Placeholder branch, replaced by the label-derived target branch.
    pub branch: String,

    #[arg(long, env = "INPUT_LABELS", default_value = "")]
    /// Labels for the created pull request (comma or newline separated).
    pub labels: String,

    #[arg(long, env = "INPUT_ASSIGNEES", default_value = "")]
    /// Assignees for the created pull request.
    pub assignees: String,

    #[arg(long, env = "INPUT_REVIEWERS", default_value = "")]
    /// Reviewers for the created pull request.
    pub reviewers: String,

    #[arg(long, env = "INPUT_TEAMREVIEWERS", default_value = "")]
    /// Team reviewers for the created pull request.
    pub team_reviewers: String,

    #[arg(long, env = "GITHUB_SHA")]
    /// Commit to backport. Nothing happens when unset or empty.
    pub sha: Option<String>,

    #[arg(long, env = "GITHUB_REPOSITORY", default_value = "")]
    /// Repository slug, owner/repo.
    pub repository: String,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    /// GitHub REST API base URL.
    pub api_url: String,

    #[arg(long, default_value = ".")]
    /// Local repository the git commands run in.
    pub working_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_LABEL_PREFIX)]
    /// Label prefix naming the target branch.
    pub label_prefix: String,

    #[arg(long, value_enum, default_value_t = LabelSelection::First)]
    /// Which matching label wins when several are present.
    pub label_selection: LabelSelection,

    #[arg(long, default_value = DEFAULT_TITLE)]
    /// Pull request title template.
    pub title: String,

    #[arg(long, default_value = DEFAULT_BODY)]
    /// Pull request body template.
    pub body: String,

    #[arg(long, default_value_t = false)]
    /// Cherry-pick locally but skip the push and pull request.
    pub dry_run: bool,

    #[arg(long, default_value_t = false)]
    /// Enable debug logging.
    pub debug: bool,
}

impl Args {
    /// Configure the forge connection, resolving the token fallback.
    pub fn get_remote(&self) -> Result<RemoteConfig> {
        let mut token = self.token.clone();

        if token.is_empty()
            && let Ok(env_var_token) = env::var("GITHUB_TOKEN")
        {
            token = env_var_token;
        }

        if token.is_empty() {
            return Err(BackportError::invalid_args("must set github token").into());
        }

        RemoteConfig::new(
            &self.repository,
            &self.api_url,
            SecretString::from(token),
        )
    }

    /// Assemble the run configuration from the inputs.
    pub fn backport_config(&self, workflow_commands: bool) -> Result<BackportConfig> {
        BackportConfig::builder()
            .committer(self.committer.clone())
            .author(self.author.clone())
            .branch(self.branch.clone())
            .labels(parse_list(&self.labels))
            .assignees(parse_list(&self.assignees))
            .reviewers(parse_list(&self.reviewers))
            .team_reviewers(parse_list(&self.team_reviewers))
            .label_prefix(self.label_prefix.clone())
            .label_selection(self.label_selection)
            .title_template(self.title.clone())
            .body_template(self.body.clone())
            .workflow_commands(workflow_commands)
            .build()
    }
}
