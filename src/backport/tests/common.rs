//! Common test utilities for backport tests.

use std::path::Path;

use crate::{
    backport::Backport,
    config::BackportConfig,
    forge::{
        manager::ForgeManager,
        request::{AssociatedPullRequest, PullRequestState},
        traits::MockForge,
    },
    git::{CHERRY_PICK_EMPTY, Git, GitOutput, MockGitRunner},
};

pub const TEST_SHA: &str = "abc123";
pub const TEST_AUTHOR: &str = "Author Name <author@example.com>";
pub const TEST_COMMITTER: &str = "Committer Name <committer@example.com>";

pub fn pull_request(
    number: u64,
    state: PullRequestState,
    labels: &[&str],
) -> AssociatedPullRequest {
    AssociatedPullRequest {
        number,
        title: format!("Pull request {number}"),
        state,
        labels: labels.iter().map(|l| l.to_string()).collect(),
    }
}

pub fn closed_pr(number: u64, labels: &[&str]) -> AssociatedPullRequest {
    pull_request(number, PullRequestState::Closed, labels)
}

pub fn open_pr(number: u64, labels: &[&str]) -> AssociatedPullRequest {
    pull_request(number, PullRequestState::Open, labels)
}

pub fn ok_output() -> GitOutput {
    GitOutput::default()
}

pub fn failed_output(stderr: &str) -> GitOutput {
    GitOutput {
        exit_code: 1,
        stdout: "".into(),
        stderr: stderr.into(),
    }
}

pub fn empty_cherry_pick_output() -> GitOutput {
    failed_output(CHERRY_PICK_EMPTY)
}

pub fn test_config() -> BackportConfig {
    BackportConfig::builder()
        .author(TEST_AUTHOR)
        .committer(TEST_COMMITTER)
        .branch("placeholder")
        .assignees(vec!["alice".to_string()])
        .reviewers(vec!["bob".to_string(), "carol".to_string()])
        .team_reviewers(vec!["core".to_string()])
        .labels(vec!["backport".to_string()])
        .build()
        .unwrap()
}

/// Expect a single git invocation with exactly `args`, in sequence.
pub fn expect_git(
    runner: &mut MockGitRunner,
    seq: &mut mockall::Sequence,
    args: &[&str],
    output: GitOutput,
) {
    let expected: Vec<String> = args.iter().map(|a| a.to_string()).collect();

    runner
        .expect_run()
        .withf(move |_, a| a == expected.as_slice())
        .times(1)
        .in_sequence(seq)
        .returning(move |_, _| Ok(output.clone()));
}

/// Expect the git steps that precede the cherry-pick for the standard
/// `release-1.0` scenario.
pub fn expect_git_setup(runner: &mut MockGitRunner, seq: &mut mockall::Sequence) {
    expect_git(
        runner,
        seq,
        &["config", "--global", "user.name", "Author Name"],
        ok_output(),
    );
    expect_git(
        runner,
        seq,
        &["config", "--global", "user.email", "committer@example.com"],
        ok_output(),
    );
    expect_git(runner, seq, &["remote", "update"], ok_output());
    expect_git(runner, seq, &["fetch", "--all"], ok_output());
    expect_git(
        runner,
        seq,
        &[
            "checkout",
            "-b",
            "cherry-pick-release-1.0-abc123",
            "origin/release-1.0",
        ],
        ok_output(),
    );
    expect_git(runner, seq, &["log", "--oneline"], ok_output());
}

/// Creates a test Backport with the provided mocks and no dry run.
pub fn create_test_backport(
    mock_forge: MockForge,
    mock_git: MockGitRunner,
) -> Backport {
    create_test_backport_with_config(mock_forge, mock_git, test_config(), false)
}

pub fn create_test_backport_with_config(
    mock_forge: MockForge,
    mock_git: MockGitRunner,
    config: BackportConfig,
    dry_run: bool,
) -> Backport {
    let forge = ForgeManager::new(Box::new(mock_forge), dry_run);
    let git = Git::new(Box::new(mock_git), Path::new("."), dry_run);

    Backport::new(config, forge, git).unwrap()
}

/// Mock forge answering the commit lookup with `prs`.
pub fn forge_returning(prs: Vec<AssociatedPullRequest>) -> MockForge {
    let mut mock_forge = MockForge::new();
    mock_forge
        .expect_repo_name()
        .returning(|| "owner/repo".to_string());
    mock_forge
        .expect_list_pull_requests_for_commit()
        .withf(|sha| sha == TEST_SHA)
        .times(1)
        .returning(move |_| Ok(prs.clone()));
    mock_forge
}
