//! Git operations driven through the `git` executable.
//!
//! Every invocation goes through a [`GitRunner`] and receives an explicit
//! [`ExecContext`] (working directory and committer identity). The only
//! process-wide side effect is [`Git::configure_identity`], which writes the
//! global `user.name` / `user.email` settings exactly once per run.
use async_trait::async_trait;
use color_eyre::eyre::eyre;
use log::*;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::process::Command;

#[cfg(test)]
use mockall::automock;

use crate::{error::BackportError, identity::Identity, result::Result};

/// Message git prints when a cherry-pick applies but leaves nothing to commit.
pub const CHERRY_PICK_EMPTY: &str = "The previous cherry-pick is now empty, possibly due to conflict resolution.";

/// Name of the remote branches are based on and pushed to.
pub const DEFAULT_REMOTE: &str = "origin";

/// Captured result of a single git invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Execution context passed to every git invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecContext {
    /// Repository the command runs in.
    pub work_dir: PathBuf,
    /// Committer identity exported to the subprocess environment.
    pub identity: Option<Identity>,
}

/// Runs git with an argument vector and reports exit code and output.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GitRunner: Send + Sync {
    async fn run(&self, ctx: &ExecContext, args: &[String])
    -> Result<GitOutput>;
}

/// [`GitRunner`] backed by the git executable found on `PATH`.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl GitRunner for GitCli {
    async fn run(
        &self,
        ctx: &ExecContext,
        args: &[String],
    ) -> Result<GitOutput> {
        if !ctx.work_dir.is_dir() {
            return Err(BackportError::invalid_config(format!(
                "working directory does not exist: {}",
                ctx.work_dir.display()
            ))
            .into());
        }

        debug!("running: git {}", args.join(" "));

        let mut command = Command::new(&self.program);
        command.args(args).current_dir(&ctx.work_dir);

        if let Some(identity) = &ctx.identity {
            command
                .env("GIT_COMMITTER_NAME", &identity.name)
                .env("GIT_COMMITTER_EMAIL", &identity.email);
        }

        let output = match command.output().await {
            Ok(output) => output,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(BackportError::GitNotFound(
                    self.program.display().to_string(),
                )
                .into());
            }
            Err(err) => {
                return Err(eyre!(
                    "failed to execute git {}: {err}",
                    args.join(" ")
                ));
            }
        };

        let result = GitOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if result.success() {
            let stdout = result.stdout.trim();
            if !stdout.is_empty() {
                info!("{stdout}");
            }
        } else {
            warn!("{}", result.stderr.trim());
        }

        Ok(result)
    }
}

/// Decides whether a failed git invocation may be treated as success.
pub trait FailureTolerance: Send + Sync {
    fn tolerates(&self, output: &GitOutput) -> bool;
}

/// Tolerates a cherry-pick whose changes are already on the target branch.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCherryPick;

impl FailureTolerance for EmptyCherryPick {
    fn tolerates(&self, output: &GitOutput) -> bool {
        !output.success() && output.stderr.contains(CHERRY_PICK_EMPTY)
    }
}

/// The fixed sequence of git operations a backport needs.
pub struct Git {
    runner: Box<dyn GitRunner>,
    context: ExecContext,
    dry_run: bool,
}

impl Git {
    pub fn new(
        runner: Box<dyn GitRunner>,
        work_dir: &Path,
        dry_run: bool,
    ) -> Self {
        Self {
            runner,
            context: ExecContext {
                work_dir: work_dir.to_path_buf(),
                identity: None,
            },
            dry_run,
        }
    }

    pub fn context(&self) -> &ExecContext {
        &self.context
    }

    async fn exec(&self, args: &[&str]) -> Result<GitOutput> {
        let args = args.iter().map(|a| a.to_string()).collect::<Vec<_>>();
        self.runner.run(&self.context, &args).await
    }

    async fn exec_checked(&self, args: &[&str]) -> Result<GitOutput> {
        let output = self.exec(args).await?;

        if !output.success() {
            let args = args.iter().map(|a| a.to_string()).collect::<Vec<_>>();
            return Err(BackportError::git_command_failed(
                &args,
                output.exit_code,
                output.stderr.trim(),
            )
            .into());
        }

        Ok(output)
    }

    /// Write the global git identity.
    ///
    /// The global name comes from the author and the global email from the
    /// committer. Subsequent invocations also receive this pairing through
    /// their execution context.
    pub async fn configure_identity(
        &mut self,
        author: &Identity,
        committer: &Identity,
    ) -> Result<()> {
        self.exec_checked(&["config", "--global", "user.name", &author.name])
            .await?;
        self.exec_checked(&[
            "config",
            "--global",
            "user.email",
            &committer.email,
        ])
        .await?;

        self.context.identity =
            Some(Identity::new(&author.name, &committer.email));

        Ok(())
    }

    /// Update every remote and fetch all remote tracking branches.
    pub async fn sync_remotes(&self) -> Result<()> {
        self.exec_checked(&["remote", "update"]).await?;
        self.exec_checked(&["fetch", "--all"]).await?;
        Ok(())
    }

    /// Create and check out `branch` starting at `origin/<base>`.
    pub async fn create_branch(&self, branch: &str, base: &str) -> Result<()> {
        let start_point = format!("{DEFAULT_REMOTE}/{base}");
        self.exec_checked(&["checkout", "-b", branch, &start_point])
            .await?;
        Ok(())
    }

    /// Log short history. Diagnostic only: the exit code is ignored.
    pub async fn log_oneline(&self) -> Result<()> {
        self.exec(&["log", "--oneline"]).await?;
        Ok(())
    }

    /// Cherry-pick `sha` recording its origin in the commit message.
    pub async fn cherry_pick(
        &self,
        sha: &str,
        tolerance: &dyn FailureTolerance,
    ) -> Result<()> {
        let output = self.exec(&["cherry-pick", "-x", sha]).await?;

        if output.success() {
            return Ok(());
        }

        if tolerance.tolerates(&output) {
            warn!("cherry-pick of {sha} tolerated: {}", output.stderr.trim());
            return Ok(());
        }

        Err(BackportError::CherryPickFailed(output.stderr).into())
    }

    /// Push `branch` to the remote and set it as upstream.
    pub async fn push_upstream(&self, branch: &str) -> Result<()> {
        if self.dry_run {
            warn!("dry_run: would push branch {branch} to {DEFAULT_REMOTE}");
            return Ok(());
        }

        self.exec_checked(&["push", "-u", DEFAULT_REMOTE, branch])
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn output(exit_code: i32, stderr: &str) -> GitOutput {
        GitOutput {
            exit_code,
            stdout: "".into(),
            stderr: stderr.into(),
        }
    }

    fn args(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn tolerates_empty_cherry_pick() {
        assert!(EmptyCherryPick.tolerates(&output(1, CHERRY_PICK_EMPTY)));
    }

    #[test]
    fn tolerates_empty_cherry_pick_within_longer_stderr() {
        let stderr = format!("hint: something\n{CHERRY_PICK_EMPTY}\nhint: more");
        assert!(EmptyCherryPick.tolerates(&output(1, &stderr)));
    }

    #[test]
    fn does_not_tolerate_conflicts() {
        assert!(!EmptyCherryPick.tolerates(&output(1, "conflict in file.txt")));
    }

    #[test]
    fn does_not_apply_to_successful_output() {
        assert!(!EmptyCherryPick.tolerates(&output(0, CHERRY_PICK_EMPTY)));
    }

    #[tokio::test]
    async fn configure_identity_pairs_author_name_with_committer_email() {
        let mut runner = MockGitRunner::new();
        let mut seq = mockall::Sequence::new();

        runner
            .expect_run()
            .withf(|ctx, a| {
                ctx.identity.is_none()
                    && a == args(&[
                        "config",
                        "--global",
                        "user.name",
                        "Author",
                    ])
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(GitOutput::default()));

        runner
            .expect_run()
            .withf(|_, a| {
                a == args(&[
                    "config",
                    "--global",
                    "user.email",
                    "committer@example.com",
                ])
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(GitOutput::default()));

        let mut git = Git::new(Box::new(runner), Path::new("."), false);
        git.configure_identity(
            &Identity::new("Author", "author@example.com"),
            &Identity::new("Committer", "committer@example.com"),
        )
        .await
        .unwrap();

        assert_eq!(
            git.context().identity,
            Some(Identity::new("Author", "committer@example.com"))
        );
    }

    #[tokio::test]
    async fn checked_steps_fail_on_non_zero_exit() {
        let mut runner = MockGitRunner::new();
        runner
            .expect_run()
            .returning(|_, _| Ok(output(1, "fatal: no remote\n")));

        let git = Git::new(Box::new(runner), Path::new("."), false);
        let err = git.sync_remotes().await.unwrap_err();

        match err.downcast_ref::<BackportError>() {
            Some(BackportError::GitCommandFailed {
                command,
                exit_code,
                stderr,
            }) => {
                assert_eq!(command, "remote update");
                assert_eq!(*exit_code, 1);
                assert_eq!(stderr, "fatal: no remote");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn log_ignores_exit_code() {
        let mut runner = MockGitRunner::new();
        runner
            .expect_run()
            .withf(|_, a| a == args(&["log", "--oneline"]))
            .times(1)
            .returning(|_, _| Ok(output(128, "fatal: bad default revision")));

        let git = Git::new(Box::new(runner), Path::new("."), false);
        assert!(git.log_oneline().await.is_ok());
    }

    #[tokio::test]
    async fn cherry_pick_failure_carries_stderr() {
        let mut runner = MockGitRunner::new();
        runner
            .expect_run()
            .returning(|_, _| Ok(output(1, "conflict in file.txt")));

        let git = Git::new(Box::new(runner), Path::new("."), false);
        let err = git
            .cherry_pick("abc123", &EmptyCherryPick)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("conflict in file.txt"));
    }

    #[tokio::test]
    async fn cherry_pick_uses_supplied_tolerance() {
        struct TolerateEverything;

        impl FailureTolerance for TolerateEverything {
            fn tolerates(&self, _output: &GitOutput) -> bool {
                true
            }
        }

        let mut runner = MockGitRunner::new();
        runner
            .expect_run()
            .returning(|_, _| Ok(output(1, "conflict in file.txt")));

        let git = Git::new(Box::new(runner), Path::new("."), false);
        assert!(git.cherry_pick("abc123", &TolerateEverything).await.is_ok());
    }

    #[tokio::test]
    async fn dry_run_skips_push() {
        let mut runner = MockGitRunner::new();
        runner.expect_run().times(0);

        let git = Git::new(Box::new(runner), Path::new("."), true);
        git.push_upstream("cherry-pick-main-abc123").await.unwrap();
    }

    #[tokio::test]
    #[test_log::test]
    async fn git_cli_captures_exit_code_and_output() {
        let tmp = TempDir::new().unwrap();
        let ctx = ExecContext {
            work_dir: tmp.path().to_path_buf(),
            identity: None,
        };
        let git = GitCli::default();

        let init = git.run(&ctx, &args(&["init"])).await.unwrap();
        assert!(init.success());

        let missing = git
            .run(&ctx, &args(&["rev-parse", "--verify", "does-not-exist"]))
            .await
            .unwrap();
        assert!(!missing.success());
        assert!(!missing.stderr.is_empty());
    }

    #[tokio::test]
    async fn git_cli_exports_committer_identity() {
        let tmp = TempDir::new().unwrap();
        let ctx = ExecContext {
            work_dir: tmp.path().to_path_buf(),
            identity: Some(Identity::new("Backport Bot", "bot@example.com")),
        };
        let git = GitCli::default();

        git.run(&ctx, &args(&["init"])).await.unwrap();
        let ident = git
            .run(&ctx, &args(&["var", "GIT_COMMITTER_IDENT"]))
            .await
            .unwrap();

        assert!(ident.success());
        assert!(ident.stdout.starts_with("Backport Bot <bot@example.com>"));
    }

    #[tokio::test]
    async fn git_cli_reports_missing_executable() {
        let tmp = TempDir::new().unwrap();
        let ctx = ExecContext {
            work_dir: tmp.path().to_path_buf(),
            identity: None,
        };
        let git = GitCli::new("definitely-not-a-git-binary");

        let err = git.run(&ctx, &args(&["status"])).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<BackportError>(),
            Some(BackportError::GitNotFound(_))
        ));
    }

    #[tokio::test]
    async fn git_cli_rejects_missing_working_directory() {
        let tmp = TempDir::new().unwrap();
        let ctx = ExecContext {
            work_dir: tmp.path().join("missing"),
            identity: None,
        };

        let err = GitCli::default()
            .run(&ctx, &args(&["status"]))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<BackportError>(),
            Some(BackportError::InvalidConfig(_))
        ));
    }
}
