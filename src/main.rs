use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod scaffold;
mod scenario;
mod templates;
mod tree;
mod workflow;

use cli::{Command, RootArgs};

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.command.verbose());

    match args.command {
        Command::Add(args) => workflow::run_add(&args),
        Command::Plan(args) => workflow::run_plan(&args),
        Command::Validate(args) => workflow::run_validate(&args),
        Command::Init(args) => workflow::run_init(&args),
        Command::Assets(args) => workflow::run_assets(&args),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
