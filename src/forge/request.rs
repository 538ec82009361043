use std::fmt;

/// State of a pull request as reported by the forge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestState {
    Open,
    Closed,
    Other(String),
}

impl From<&str> for PullRequestState {
    fn from(state: &str) -> Self {
        match state {
            "open" => Self::Open,
            "closed" => Self::Closed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for PullRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Other(state) => write!(f, "{state}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Pull request associated with a commit.
pub struct AssociatedPullRequest {
    pub number: u64,
    pub title: String,
    pub state: PullRequestState,
    /// Label names in the order the API returned them.
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to create a new pull request.
pub struct CreatePrRequest {
    pub head_branch: String,
    pub base_branch: String,
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    pub reviewers: Vec<String>,
    pub team_reviewers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Created pull request.
pub struct PullRequest {
    pub number: u64,
    pub html_url: Option<String>,
}
