//! Workflow assets step.
use super::scenario_root;
use crate::cli::AssetsArgs;
use crate::scaffold;
use crate::scenario::ScenarioPaths;
use anyhow::{Context, Result};

pub fn run_assets(args: &AssetsArgs) -> Result<()> {
    let paths = ScenarioPaths::new(scenario_root(&args.scenario, true)?);
    let written = scaffold::write_assets(&paths, args.force)
        .with_context(|| format!("write assets under {}", paths.assets_dir().display()))?;
    if written.is_empty() {
        println!("assets already present (use --force to overwrite)");
    }
    for rel in written {
        println!("wrote {rel}");
    }
    Ok(())
}
