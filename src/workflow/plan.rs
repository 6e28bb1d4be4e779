//! Workflow plan step: compute an insertion plan and print it.
use super::prepare_insertion;
use crate::cli::PlanArgs;
use anyhow::{Context, Result};

/// Print the insertion plan as JSON. Never writes.
pub fn run_plan(args: &PlanArgs) -> Result<()> {
    let prepared = prepare_insertion(&args.scenario, &args.title, args.insert_at, args.kind)?;
    let text = serde_json::to_string_pretty(&prepared.plan).context("serialize plan")?;
    println!("{text}");
    Ok(())
}
