//! Manager that wraps forge implementations
use log::*;

use crate::{
    forge::{
        request::{AssociatedPullRequest, CreatePrRequest, PullRequest},
        traits::Forge,
    },
    result::Result,
};

pub struct ForgeManager {
    forge: Box<dyn Forge>,
    dry_run: bool,
}

impl ForgeManager {
    pub fn new(forge: Box<dyn Forge>, dry_run: bool) -> Self {
        Self { forge, dry_run }
    }

    pub fn repo_name(&self) -> String {
        self.forge.repo_name()
    }

    pub async fn list_pull_requests_for_commit(
        &self,
        sha: &str,
    ) -> Result<Vec<AssociatedPullRequest>> {
        debug!("listing pull requests for commit {sha} in {}", self.repo_name());
        self.forge.list_pull_requests_for_commit(sha).await
    }

    pub async fn create_pull_request(
        &self,
        req: CreatePrRequest,
    ) -> Result<PullRequest> {
        if self.dry_run {
            warn!("dry_run: would create PR: req: {:#?}", req);
            return Ok(PullRequest {
                number: 0,
                html_url: None,
            });
        }

        self.forge.create_pull_request(req).await
    }
}
