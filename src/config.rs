//! Run configuration for a backport.
//!
//! Inputs arrive as flat strings (command line flags or GitHub Actions
//! `INPUT_*` variables) and are assembled into a [`BackportConfig`] through
//! its builder, which validates everything that can be checked before any
//! git or API work starts.
use clap::ValueEnum;
use derive_builder::Builder;

use crate::{
    error::BackportError,
    result::Result,
    template::{DEFAULT_BODY, DEFAULT_TITLE, PrTemplates},
};

/// Label prefix that marks a pull request for backporting.
pub const DEFAULT_LABEL_PREFIX: &str = "tests/";

/// Which matching label decides the target branch when several match.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LabelSelection {
    /// First matching label in the order the API returned them.
    #[default]
    First,
    /// Last matching label, i.e. the most recently added one.
    Last,
}

/// Split a comma or newline delimited input into trimmed, non-empty entries.
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Debug, Builder)]
#[builder(setter(into), build_fn(private, name = "_build"))]
pub struct BackportConfigParams {
    /// Committer display string, `Name <email>`.
    #[builder(default)]
    pub committer: String,
    /// Author display string, `Name <email>`.
    #[builder(default)]
    pub author: String,
    /// Placeholder branch, replaced by the label-derived target branch.
    #[builder(default)]
    pub branch: String,
    #[builder(default)]
    pub labels: Vec<String>,
    #[builder(default)]
    pub assignees: Vec<String>,
    #[builder(default)]
    pub reviewers: Vec<String>,
    #[builder(default)]
    pub team_reviewers: Vec<String>,
    #[builder(default = "DEFAULT_LABEL_PREFIX.into()")]
    pub label_prefix: String,
    #[builder(default)]
    pub label_selection: LabelSelection,
    #[builder(default = "DEFAULT_TITLE.into()")]
    pub title_template: String,
    #[builder(default = "DEFAULT_BODY.into()")]
    pub body_template: String,
    #[builder(default)]
    pub workflow_commands: bool,
}

impl BackportConfigParamsBuilder {
    pub fn build(&self) -> Result<BackportConfig> {
        let params = self._build().map_err(|e| {
            BackportError::invalid_config(format!(
                "Failed to build backport config: {}",
                e
            ))
        })?;
        BackportConfig::new(params)
    }
}

#[derive(Debug, Clone)]
pub struct BackportConfig {
    pub committer: String,
    pub author: String,
    pub branch: String,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    pub reviewers: Vec<String>,
    pub team_reviewers: Vec<String>,
    pub label_prefix: String,
    pub label_selection: LabelSelection,
    pub title_template: String,
    pub body_template: String,
    pub workflow_commands: bool,
}

impl BackportConfig {
    pub fn builder() -> BackportConfigParamsBuilder {
        BackportConfigParamsBuilder::default()
    }

    pub fn new(params: BackportConfigParams) -> Result<Self> {
        if params.label_prefix.is_empty() {
            return Err(
                BackportError::invalid_config("label prefix must not be empty")
                    .into(),
            );
        }

        PrTemplates::new(&params.title_template, &params.body_template)?;

        Ok(Self {
            committer: params.committer,
            author: params.author,
            branch: params.branch,
            labels: params.labels,
            assignees: params.assignees,
            reviewers: params.reviewers,
            team_reviewers: params.team_reviewers,
            label_prefix: params.label_prefix,
            label_selection: params.label_selection,
            title_template: params.title_template,
            body_template: params.body_template,
            workflow_commands: params.workflow_commands,
        })
    }

    pub fn templates(&self) -> Result<PrTemplates> {
        PrTemplates::new(&self.title_template, &self.body_template)
    }
}
