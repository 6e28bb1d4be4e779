//! Workflow add step.
//!
//! Plans the insertion, previews it as a tree diff, and applies it unless
//! `--dry-run` is set.
use super::{prepare_insertion, Prepared};
use crate::cli::AddArgs;
use crate::scenario::{apply_plan, MutationPlan};
use crate::tree::{tree_diff, TreeSnapshot};
use anyhow::{Context, Result};
use serde_json::json;

/// Run the add step.
pub fn run_add(args: &AddArgs) -> Result<()> {
    let Prepared {
        paths,
        layout,
        plan,
    } = prepare_insertion(&args.scenario, &args.title, args.insert_at, args.kind)?;
    let before = TreeSnapshot::capture(paths.root())?;

    if args.dry_run {
        let diff = tree_diff(&before.render(), &before.project(&plan).render());
        if args.json {
            let output = json!({
                "dry_run": true,
                "plan": plan,
                "ordinals": plan.projected_ordinals(&layout),
                "tree_diff": diff,
            });
            let text = serde_json::to_string_pretty(&output).context("serialize dry run")?;
            println!("{text}");
        } else {
            println!("dry run: nothing was changed");
            print_summary(&plan, "would move");
            print_diff(diff.as_deref());
        }
        return Ok(());
    }

    let manifest_path = paths.index_path();
    let report = apply_plan(paths.root(), &plan, &manifest_path)
        .inspect_err(|err| {
            if !err.is_pre_mutation() {
                eprintln!("note: the scenario was partially changed; run `kc-steps validate` after recovering");
            }
        })
        .with_context(|| format!("apply insertion in {}", paths.root().display()))?;
    let after = TreeSnapshot::capture(paths.root())?;
    let diff = tree_diff(&before.render(), &after.render());
    if args.json {
        let output = json!({
            "dry_run": false,
            "report": report,
            "tree_diff": diff,
        });
        let text = serde_json::to_string_pretty(&output).context("serialize add report")?;
        println!("{text}");
    } else {
        print_summary(&plan, "moved");
        println!("wrote {}", manifest_path.display());
        print_diff(diff.as_deref());
    }
    Ok(())
}

fn print_summary(plan: &MutationPlan, verb: &str) {
    let step = &plan.new_step;
    println!(
        "step {} {:?} ({}) at {}",
        step.ordinal, step.title, step.kind, step.dir
    );
    for mv in &plan.moves {
        println!("{verb} {} -> {}", mv.from_path, mv.to_path);
    }
}

fn print_diff(diff: Option<&str>) {
    if let Some(diff) = diff {
        println!();
        print!("{diff}");
    }
}
