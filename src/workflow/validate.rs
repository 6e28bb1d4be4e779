//! Workflow validate step.
use super::scenario_root;
use crate::cli::ValidateArgs;
use crate::scenario::{validate_scenario, ScenarioPaths};
use anyhow::{anyhow, Context, Result};

/// Print the validation report; fails when any check failed.
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    let paths = ScenarioPaths::new(scenario_root(&args.scenario, false)?);
    let report = validate_scenario(&paths)
        .with_context(|| format!("validate {}", paths.root().display()))?;
    if args.json {
        let text = serde_json::to_string_pretty(&report).context("serialize validation report")?;
        println!("{text}");
    } else {
        print!("{}", report.render_text());
    }
    if !report.passed {
        return Err(anyhow!("scenario validation failed"));
    }
    Ok(())
}
