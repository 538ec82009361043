use clap::Parser;
use log::*;

use backport_pr::{
    Backport, Result, actions,
    backport::resolve_commit,
    cli,
    forge::{github::Github, manager::ForgeManager},
    git::{Git, GitCli},
};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("backport_pr")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

async fn run(args: cli::Args, workflow_commands: bool) -> Result<()> {
    let Some(sha) = resolve_commit(args.sha.as_deref()) else {
        info!("no commit sha provided: nothing to do");
        return Ok(());
    };

    let config = args.backport_config(workflow_commands)?;
    let remote = args.get_remote()?;

    let forge = ForgeManager::new(Box::new(Github::new(remote)?), args.dry_run);
    let git = Git::new(Box::new(GitCli::default()), &args.working_dir, args.dry_run);

    let mut backport = Backport::new(config, forge, git)?;
    let outcome = backport.run(Some(sha)).await?;

    info!("{outcome}");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli_args = cli::Args::parse();

    initialize_logger(cli_args.debug)?;

    let workflow_commands = actions::workflow_commands_enabled();

    if let Err(err) = run(cli_args, workflow_commands).await {
        actions::report_failure(workflow_commands, &err.to_string());
        return Err(err);
    }

    Ok(())
}
