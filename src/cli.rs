//! CLI argument parsing for scenario step maintenance.
//!
//! Every command works on one scenario directory; there are no config files.
use crate::scaffold::{Difficulty, ImageId, TIME_CHOICES};
use crate::scenario::StepKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "kc-steps",
    version,
    about = "Step renumbering and manifest maintenance for tutorial scenarios",
    after_help = "Commands:\n  add --title <T> --at <N>      Insert a step, renumbering later steps\n  plan --title <T> --at <N>     Print the insertion plan as JSON without writing\n  validate                      Check index.json against the step layout\n  init --title <T> --description <D>  Create index.json, intro.md and finish.md\n  assets                        Write the helper script bundle into assets/\n\nExamples:\n  kc-steps add --scenario ./my-scenario --title \"Deploy the app\" --at 2\n  kc-steps add --scenario ./my-scenario --title \"Check\" --at 4 --kind verify --dry-run\n  kc-steps validate --scenario ./my-scenario --json\n  kc-steps init --scenario ./new --title \"Pods\" --description \"First pod\"",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Add(AddArgs),
    Plan(PlanArgs),
    Validate(ValidateArgs),
    Init(InitArgs),
    Assets(AssetsArgs),
}

impl Command {
    pub fn verbose(&self) -> bool {
        match self {
            Command::Add(args) => args.verbose,
            Command::Plan(args) => args.verbose,
            Command::Validate(args) => args.verbose,
            Command::Init(_) | Command::Assets(_) => false,
        }
    }
}

/// Add command inputs.
#[derive(Parser, Debug)]
#[command(about = "Insert a step and renumber the steps after it")]
pub struct AddArgs {
    /// Scenario directory containing index.json and the step files
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub scenario: PathBuf,

    /// Title of the new step
    #[arg(long, value_name = "TITLE")]
    pub title: String,

    /// Position of the new step (1 inserts first, N+1 appends)
    #[arg(long = "at", value_name = "N")]
    pub insert_at: usize,

    /// Placeholder scripts to create (regular: background + foreground, verify: verify)
    #[arg(long, value_enum, default_value_t = StepKind::Regular)]
    pub kind: StepKind,

    /// Show the plan and the resulting tree without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,

    /// Log each move to stderr
    #[arg(long)]
    pub verbose: bool,
}

/// Plan command inputs.
#[derive(Parser, Debug)]
#[command(about = "Print the insertion plan as JSON; never writes")]
pub struct PlanArgs {
    /// Scenario directory containing index.json and the step files
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub scenario: PathBuf,

    /// Title of the new step
    #[arg(long, value_name = "TITLE")]
    pub title: String,

    /// Position of the new step (1 inserts first, N+1 appends)
    #[arg(long = "at", value_name = "N")]
    pub insert_at: usize,

    #[arg(long, value_enum, default_value_t = StepKind::Regular)]
    pub kind: StepKind,

    #[arg(long)]
    pub verbose: bool,
}

/// Validate command inputs.
#[derive(Parser, Debug)]
#[command(about = "Check index.json and the step layout")]
pub struct ValidateArgs {
    /// Scenario directory containing index.json and the step files
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub scenario: PathBuf,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,

    #[arg(long)]
    pub verbose: bool,
}

/// Init command inputs for a new scenario.
#[derive(Parser, Debug)]
#[command(about = "Create index.json, intro.md and finish.md")]
pub struct InitArgs {
    /// Scenario directory (created if missing)
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub scenario: PathBuf,

    #[arg(long, value_name = "TITLE")]
    pub title: String,

    #[arg(long, value_name = "TEXT")]
    pub description: String,

    #[arg(long, value_enum, default_value = "beginner")]
    pub difficulty: Difficulty,

    /// Estimated completion time
    #[arg(long, value_name = "TIME", default_value = TIME_CHOICES[0], value_parser = TIME_CHOICES)]
    pub time: String,

    /// Backend image
    #[arg(long, value_enum, default_value = "ubuntu")]
    pub image_id: ImageId,

    /// Use the IDE interface layout
    #[arg(long)]
    pub ide: bool,

    /// Overwrite an existing index.json
    #[arg(long)]
    pub force: bool,
}

/// Assets command inputs.
#[derive(Parser, Debug)]
#[command(about = "Write the helper script bundle into assets/")]
pub struct AssetsArgs {
    /// Scenario directory (created if missing)
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub scenario: PathBuf,

    /// Overwrite files that already exist
    #[arg(long)]
    pub force: bool,
}
