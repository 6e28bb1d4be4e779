//! Command orchestration.
//!
//! Each command resolves the scenario root, delegates to the scenario layer,
//! and prints results to stdout. Logs go to stderr.
mod add;
mod assets;
mod init;
mod plan;
mod validate;

pub(crate) use add::run_add;
pub(crate) use assets::run_assets;
pub(crate) use init::run_init;
pub(crate) use plan::run_plan;
pub(crate) use validate::run_validate;

use crate::scenario::{
    plan_insertion, read_layout, InsertRequest, Layout, Manifest, MutationPlan, ScenarioPaths,
    StepKind,
};
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve the scenario directory, creating it first when `create` is set.
fn scenario_root(path: &Path, create: bool) -> Result<PathBuf> {
    if create {
        fs::create_dir_all(path)
            .with_context(|| format!("create scenario directory {}", path.display()))?;
    }
    path.canonicalize()
        .with_context(|| format!("resolve scenario directory {}", path.display()))
}

/// Inputs and plan shared by `add` and `plan`.
struct Prepared {
    paths: ScenarioPaths,
    layout: Layout,
    plan: MutationPlan,
}

fn prepare_insertion(
    scenario: &Path,
    title: &str,
    insert_at: usize,
    kind: StepKind,
) -> Result<Prepared> {
    let title = title.trim();
    if title.is_empty() {
        return Err(anyhow!("step title must not be blank"));
    }
    let paths = ScenarioPaths::new(scenario_root(scenario, false)?);
    let manifest_path = paths.index_path();
    let manifest = Manifest::load(&manifest_path)
        .with_context(|| format!("load {}", manifest_path.display()))?;
    let layout = read_layout(paths.root())
        .with_context(|| format!("read steps in {}", paths.root().display()))?;
    tracing::info!(steps = layout.len(), "read scenario layout");
    let request = InsertRequest {
        title: title.to_string(),
        insert_at,
        kind,
    };
    let plan = plan_insertion(&layout, &manifest, &request)
        .with_context(|| format!("plan insertion of {title:?} at {insert_at}"))?;
    Ok(Prepared {
        paths,
        layout,
        plan,
    })
}
