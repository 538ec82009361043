//! Traits related to remote git forges
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::{
    forge::request::{AssociatedPullRequest, CreatePrRequest, PullRequest},
    result::Result,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Forge: Send + Sync {
    /// Repository identifier, `owner/repo`.
    fn repo_name(&self) -> String;

    /// Pull requests associated with `sha`, in the order the API returns
    /// them.
    async fn list_pull_requests_for_commit(
        &self,
        sha: &str,
    ) -> Result<Vec<AssociatedPullRequest>>;

    async fn create_pull_request(
        &self,
        req: CreatePrRequest,
    ) -> Result<PullRequest>;
}
