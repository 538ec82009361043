//! Backport orchestration.
//!
//! A run resolves the triggering commit, finds the closed pull request that
//! merged it, derives the target branch from that pull request's labels and
//! then drives git and the forge through a fixed sequence:
//!
//! 1. configure the git identity
//! 2. update remotes and fetch
//! 3. create the working branch from `origin/<target>`
//! 4. log short history
//! 5. cherry-pick the commit with `-x`
//! 6. push the working branch
//! 7. open a pull request into the target branch
//!
//! Missing inputs at any of the lookup stages end the run successfully
//! without touching git. Pull requests and labels are matched in the order
//! the API returned them; that order is not guaranteed stable between calls.
use log::*;
use std::fmt;

use crate::{
    actions::LogGroup,
    config::{BackportConfig, LabelSelection},
    forge::{
        manager::ForgeManager,
        request::{AssociatedPullRequest, CreatePrRequest, PullRequestState},
    },
    git::{EmptyCherryPick, FailureTolerance, Git},
    identity::Identity,
    result::Result,
    template::{PrContext, PrTemplates},
};

/// How a backport run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    NoCommit,
    NoAssociatedPullRequests {
        sha: String,
    },
    NoClosedPullRequest {
        sha: String,
    },
    NoTargetLabel {
        pr_number: u64,
    },
    Created {
        target_branch: String,
        working_branch: String,
        pr_number: u64,
    },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCommit => write!(f, "no commit sha provided: nothing to do"),
            Self::NoAssociatedPullRequests { sha } => {
                write!(f, "no pull requests associated with {sha}: nothing to do")
            }
            Self::NoClosedPullRequest { sha } => {
                write!(f, "no closed pull request for {sha}: nothing to do")
            }
            Self::NoTargetLabel { pr_number } => {
                write!(f, "pull request #{pr_number} has no backport label: nothing to do")
            }
            Self::Created {
                target_branch,
                working_branch,
                pr_number,
            } => write!(
                f,
                "opened pull request #{pr_number} from {working_branch} into {target_branch}"
            ),
        }
    }
}

/// Treat an absent or blank sha as no commit.
pub fn resolve_commit(sha: Option<&str>) -> Option<String> {
    sha.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// First pull request in API order whose state is closed.
pub fn select_closed_pull_request(
    prs: &[AssociatedPullRequest],
) -> Option<&AssociatedPullRequest> {
    prs.iter().find(|pr| pr.state == PullRequestState::Closed)
}

/// Target branch named by the selected `prefix` label, prefix stripped.
pub fn target_branch(
    labels: &[String],
    prefix: &str,
    selection: LabelSelection,
) -> Option<String> {
    let mut matching = labels.iter().filter_map(|l| l.strip_prefix(prefix));

    let label = match selection {
        LabelSelection::First => matching.next(),
        LabelSelection::Last => matching.last(),
    };

    label.map(String::from)
}

/// Name of the branch the cherry-pick is pushed to.
pub fn working_branch_name(target_branch: &str, sha: &str) -> String {
    format!("cherry-pick-{target_branch}-{sha}")
}

pub struct Backport {
    config: BackportConfig,
    templates: PrTemplates,
    forge: ForgeManager,
    git: Git,
    tolerance: Box<dyn FailureTolerance>,
}

impl Backport {
    pub fn new(
        config: BackportConfig,
        forge: ForgeManager,
        git: Git,
    ) -> Result<Self> {
        let templates = config.templates()?;

        Ok(Self {
            config,
            templates,
            forge,
            git,
            tolerance: Box::new(EmptyCherryPick),
        })
    }

    /// Replace the predicate deciding which cherry-pick failures are benign.
    pub fn with_tolerance(mut self, tolerance: Box<dyn FailureTolerance>) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn group(&self, title: &str) -> LogGroup {
        LogGroup::start(self.config.workflow_commands, title)
    }

    pub async fn run(&mut self, sha: Option<String>) -> Result<Outcome> {
        info!(
            "cherry pick into branch {} with {}",
            self.config.branch,
            sha.as_deref().unwrap_or_default()
        );

        let Some(sha) = resolve_commit(sha.as_deref()) else {
            return Ok(Outcome::NoCommit);
        };

        let prs = self.forge.list_pull_requests_for_commit(&sha).await?;

        info!("found {} pull requests associated with {sha}", prs.len());

        if prs.is_empty() {
            return Ok(Outcome::NoAssociatedPullRequests { sha });
        }

        let Some(source) = select_closed_pull_request(&prs) else {
            return Ok(Outcome::NoClosedPullRequest { sha });
        };

        info!(
            "{} pull request #{} labels: {:?}",
            source.state, source.number, source.labels
        );

        let Some(target_branch) = target_branch(
            &source.labels,
            &self.config.label_prefix,
            self.config.label_selection,
        ) else {
            return Ok(Outcome::NoTargetLabel {
                pr_number: source.number,
            });
        };

        self.config.branch = target_branch.clone();

        let working_branch = working_branch_name(&target_branch, &sha);

        let pr_context = PrContext {
            sha: sha.clone(),
            target_branch: target_branch.clone(),
            working_branch: working_branch.clone(),
            source_number: source.number,
            source_title: source.title.clone(),
        };

        // render before any git work so template errors leave the repo alone
        let text = self.templates.render(&pr_context)?;

        {
            let _group = self.group("Configuring the committer and author");
            let author = Identity::parse(&self.config.author);
            let committer = Identity::parse(&self.config.committer);
            info!("configured git committer as '{committer}'");
            self.git.configure_identity(&author, &committer).await?;
        }

        {
            let _group = self.group("Fetch all branches");
            self.git.sync_remotes().await?;
        }

        {
            let _group =
                self.group(&format!("Create new branch from {target_branch}"));
            self.git.create_branch(&working_branch, &target_branch).await?;
        }

        self.git.log_oneline().await?;

        {
            let _group = self.group("Cherry picking");
            self.git.cherry_pick(&sha, self.tolerance.as_ref()).await?;
        }

        {
            let _group = self.group("Push new branch to remote");
            self.git.push_upstream(&working_branch).await?;
        }

        let _group = self.group("Opening pull request");

        let pr = self
            .forge
            .create_pull_request(CreatePrRequest {
                head_branch: working_branch.clone(),
                base_branch: target_branch.clone(),
                title: text.title,
                body: text.body,
                labels: self.config.labels.clone(),
                assignees: self.config.assignees.clone(),
                reviewers: self.config.reviewers.clone(),
                team_reviewers: self.config.team_reviewers.clone(),
            })
            .await?;

        if let Some(url) = &pr.html_url {
            info!("pull request url: {url}");
        }

        Ok(Outcome::Created {
            target_branch,
            working_branch,
            pr_number: pr.number,
        })
    }
}
