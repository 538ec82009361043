//! Implements the Forge trait for Github
use async_trait::async_trait;
use log::*;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};

use crate::{
    error::BackportError,
    forge::{
        config::RemoteConfig,
        request::{
            AssociatedPullRequest, CreatePrRequest, PullRequest,
            PullRequestState,
        },
        traits::Forge,
    },
    result::Result,
};

#[derive(Debug, Deserialize)]
struct GithubLabel {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubPull {
    pub number: u64,
    pub state: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub labels: Vec<GithubLabel>,
}

impl From<GithubPull> for AssociatedPullRequest {
    fn from(pull: GithubPull) -> Self {
        Self {
            number: pull.number,
            title: pull.title.unwrap_or_default(),
            state: PullRequestState::from(pull.state.as_str()),
            labels: pull.labels.into_iter().filter_map(|l| l.name).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ReviewersBody<'a> {
    pub reviewers: &'a [String],
    pub team_reviewers: &'a [String],
}

#[derive(Debug, Serialize)]
struct AssigneesBody<'a> {
    pub assignees: &'a [String],
}

#[derive(Debug, Serialize)]
struct LabelsBody<'a> {
    pub labels: &'a [String],
}

/// GitHub forge implementation using Octocrab for API interactions.
pub struct Github {
    config: RemoteConfig,
    base_uri: String,
    instance: Octocrab,
}

impl Github {
    /// Create GitHub client with personal access token authentication and API
    /// base URL configuration.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let base_uri = config.base_uri();
        let instance = Octocrab::builder()
            .personal_token(config.token.clone())
            .base_uri(base_uri.clone())
            .map_err(BackportError::from)?
            .build()
            .map_err(BackportError::from)?;

        Ok(Self {
            config,
            base_uri,
            instance,
        })
    }

    fn repo_endpoint(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.base_uri, self.config.owner, self.config.repo, path
        )
    }

    async fn request_reviewers(
        &self,
        pr_number: u64,
        reviewers: &[String],
        team_reviewers: &[String],
    ) -> Result<()> {
        if reviewers.is_empty() && team_reviewers.is_empty() {
            return Ok(());
        }

        info!(
            "requesting reviewers {:?} and team reviewers {:?}",
            reviewers, team_reviewers
        );

        let endpoint =
            self.repo_endpoint(&format!("pulls/{pr_number}/requested_reviewers"));
        let body = ReviewersBody {
            reviewers,
            team_reviewers,
        };

        let _: serde_json::Value = self
            .instance
            .post(endpoint, Some(&body))
            .await
            .map_err(BackportError::from)?;

        Ok(())
    }

    async fn add_assignees(
        &self,
        pr_number: u64,
        assignees: &[String],
    ) -> Result<()> {
        if assignees.is_empty() {
            return Ok(());
        }

        info!("adding assignees {:?}", assignees);

        let endpoint =
            self.repo_endpoint(&format!("issues/{pr_number}/assignees"));

        let _: serde_json::Value = self
            .instance
            .post(endpoint, Some(&AssigneesBody { assignees }))
            .await
            .map_err(BackportError::from)?;

        Ok(())
    }

    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        if labels.is_empty() {
            return Ok(());
        }

        info!("adding labels {:?}", labels);

        let endpoint = self.repo_endpoint(&format!("issues/{pr_number}/labels"));

        let _: serde_json::Value = self
            .instance
            .post(endpoint, Some(&LabelsBody { labels }))
            .await
            .map_err(BackportError::from)?;

        Ok(())
    }
}

#[async_trait]
impl Forge for Github {
    fn repo_name(&self) -> String {
        format!("{}/{}", self.config.owner, self.config.repo)
    }

    async fn list_pull_requests_for_commit(
        &self,
        sha: &str,
    ) -> Result<Vec<AssociatedPullRequest>> {
        let endpoint = self.repo_endpoint(&format!("commits/{sha}/pulls"));

        info!("getting pull requests for {} at {sha}", self.repo_name());

        let pulls: Vec<GithubPull> = self
            .instance
            .get(endpoint, None::<&()>)
            .await
            .map_err(BackportError::from)?;

        Ok(pulls.into_iter().map(AssociatedPullRequest::from).collect())
    }

    async fn create_pull_request(
        &self,
        req: CreatePrRequest,
    ) -> Result<PullRequest> {
        info!(
            "creating pull request {} -> {}",
            req.head_branch, req.base_branch
        );

        let pr = self
            .instance
            .pulls(&self.config.owner, &self.config.repo)
            .create(req.title, req.head_branch, req.base_branch)
            .body(req.body)
            .send()
            .await
            .map_err(BackportError::from)?;

        info!("created pull request #{}", pr.number);

        self.request_reviewers(pr.number, &req.reviewers, &req.team_reviewers)
            .await?;
        self.add_assignees(pr.number, &req.assignees).await?;
        self.add_labels(pr.number, &req.labels).await?;

        Ok(PullRequest {
            number: pr.number,
            html_url: pr.html_url.map(|u| u.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_github_pulls_keeping_label_order() {
        let json = r#"[
            {
                "number": 12,
                "state": "closed",
                "title": "Fix upload",
                "labels": [
                    {"name": "enhancement"},
                    {"name": "tests/release-1.0"},
                    {"color": "ffffff"}
                ]
            },
            {"number": 13, "state": "open"}
        ]"#;

        let pulls: Vec<GithubPull> = serde_json::from_str(json).unwrap();
        let prs: Vec<AssociatedPullRequest> =
            pulls.into_iter().map(AssociatedPullRequest::from).collect();

        assert_eq!(prs.len(), 2);
        assert_eq!(prs[0].number, 12);
        assert_eq!(prs[0].state, PullRequestState::Closed);
        assert_eq!(prs[0].title, "Fix upload");
        assert_eq!(prs[0].labels, vec!["enhancement", "tests/release-1.0"]);
        assert_eq!(prs[1].state, PullRequestState::Open);
        assert!(prs[1].labels.is_empty());
    }

    #[test]
    fn serializes_reviewers_body() {
        let reviewers = vec!["alice".to_string()];
        let team_reviewers = vec!["core".to_string()];
        let body = serde_json::to_value(ReviewersBody {
            reviewers: &reviewers,
            team_reviewers: &team_reviewers,
        })
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({"reviewers": ["alice"], "team_reviewers": ["core"]})
        );
    }

    #[tokio::test]
    async fn builds_repository_endpoints() {
        let config = RemoteConfig::new(
            "owner/repo",
            "https://api.github.com",
            secrecy::SecretString::from("token".to_string()),
        )
        .unwrap();

        let github = Github::new(config).unwrap();

        assert_eq!(github.repo_name(), "owner/repo");
        assert_eq!(
            github.repo_endpoint("commits/abc123/pulls"),
            "https://api.github.com/repos/owner/repo/commits/abc123/pulls"
        );
    }
}
