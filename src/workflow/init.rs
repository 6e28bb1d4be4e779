//! Workflow init step.
//!
//! Init writes a manifest with an empty step list so `add` can run next.
use super::scenario_root;
use crate::cli::InitArgs;
use crate::scaffold::{self, Skeleton};
use crate::scenario::ScenarioPaths;
use anyhow::{anyhow, Context, Result};

/// Run the init step, creating `index.json` and the intro/finish pages.
pub fn run_init(args: &InitArgs) -> Result<()> {
    let paths = ScenarioPaths::new(scenario_root(&args.scenario, true)?);
    let index_path = paths.index_path();
    if index_path.is_file() && !args.force {
        return Err(anyhow!(
            "index.json already exists at {} (use --force to overwrite)",
            index_path.display()
        ));
    }
    let title = args.title.trim();
    if title.is_empty() {
        return Err(anyhow!("scenario title must not be blank"));
    }
    let skeleton = Skeleton {
        title: title.to_string(),
        description: args.description.trim().to_string(),
        difficulty: args.difficulty,
        time: args.time.clone(),
        image_id: args.image_id,
        ide: args.ide,
    };
    let written = scaffold::init_scenario(&paths, &skeleton)
        .with_context(|| format!("initialize {}", paths.root().display()))?;
    for rel in written {
        println!("wrote {}", paths.resolve(&rel).display());
    }
    Ok(())
}
