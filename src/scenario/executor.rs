//! Mutation executor.
//!
//! Moves are applied in the order the engine produced (highest target
//! first), then the new step is written, then the manifest is persisted.
//! A failure after the first rename stops immediately and reports what was
//! and was not moved; completed moves are left in place.
use super::error::{ExecStage, IncompleteMove, LayoutIssue, StepError};
use super::paths::{bare_content_rel, step_stem};
use super::types::{ApplyReport, MutationPlan, NewStep, StepMove};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Apply `plan` to the scenario at `root` and write the manifest to `manifest_path`.
pub fn apply_plan(
    root: &Path,
    plan: &MutationPlan,
    manifest_path: &Path,
) -> Result<ApplyReport, StepError> {
    preflight(root, plan)?;

    let mut completed: Vec<StepMove> = Vec::with_capacity(plan.moves.len());
    for (idx, mv) in plan.moves.iter().enumerate() {
        let target = root.join(&mv.to_path);
        if target.exists() {
            return Err(incomplete(
                ExecStage::Move,
                completed,
                plan.moves[idx..].to_vec(),
                format!("{} already exists", mv.to_path),
            ));
        }
        if let Err(err) = fs::rename(root.join(&mv.from_path), &target) {
            return Err(incomplete(
                ExecStage::Move,
                completed,
                plan.moves[idx..].to_vec(),
                format!("rename {} -> {}: {err}", mv.from_path, mv.to_path),
            ));
        }
        if let Some((inner_from, inner_to)) = &mv.content_rename {
            if let Err(err) = fs::rename(root.join(inner_from), root.join(inner_to)) {
                completed.push(StepMove {
                    content_rename: None,
                    ..mv.clone()
                });
                return Err(incomplete(
                    ExecStage::Move,
                    completed,
                    plan.moves[idx + 1..].to_vec(),
                    format!("rename {inner_from} -> {inner_to}: {err}"),
                ));
            }
        }
        tracing::info!(from = mv.from, to = mv.to, "moved {} -> {}", mv.from_path, mv.to_path);
        completed.push(mv.clone());
    }

    let created = match create_step(root, &plan.new_step) {
        Ok(created) => created,
        Err(err) => {
            return Err(incomplete(
                ExecStage::CreateStep,
                completed,
                Vec::new(),
                err.to_string(),
            ));
        }
    };

    if let Err(err) = plan.manifest.save(manifest_path) {
        return Err(incomplete(
            ExecStage::Manifest,
            completed,
            Vec::new(),
            err.to_string(),
        ));
    }

    Ok(ApplyReport {
        moved: completed,
        created,
        manifest_path: manifest_path.display().to_string(),
    })
}

fn incomplete(
    stage: ExecStage,
    completed: Vec<StepMove>,
    pending: Vec<StepMove>,
    reason: String,
) -> StepError {
    tracing::warn!(%stage, completed = completed.len(), pending = pending.len(), "plan stopped: {reason}");
    StepError::IncompleteMove {
        report: IncompleteMove {
            stage,
            completed,
            pending,
            reason,
        },
    }
}

/// Check the plan against the directory before anything is written.
///
/// Every source must exist and every target must either be absent or be
/// vacated by a move that runs earlier in the plan.
fn preflight(root: &Path, plan: &MutationPlan) -> Result<(), StepError> {
    let mut vacated: BTreeSet<&str> = BTreeSet::new();
    for mv in &plan.moves {
        if !root.join(&mv.from_path).exists() {
            return Err(StepError::layout(LayoutIssue::MissingContent {
                ordinal: mv.from,
                path: mv.from_path.clone(),
            }));
        }
        if root.join(&mv.to_path).exists() && !vacated.contains(mv.to_path.as_str()) {
            return Err(StepError::Collision {
                ordinal: mv.to,
                detail: format!("{} already exists on disk", mv.to_path),
            });
        }
        if mv.content_rename.is_some() {
            let inner_target = root.join(&mv.from_path).join(bare_content_rel(mv.to));
            if inner_target.exists() {
                return Err(StepError::Collision {
                    ordinal: mv.to,
                    detail: format!(
                        "{}/{} already exists",
                        mv.from_path,
                        bare_content_rel(mv.to)
                    ),
                });
            }
        }
        vacated.insert(mv.from_path.as_str());
    }

    let ordinal = plan.new_step.ordinal;
    for entry in [step_stem(ordinal), bare_content_rel(ordinal)] {
        if root.join(&entry).exists() && !vacated.contains(entry.as_str()) {
            return Err(StepError::Collision {
                ordinal,
                detail: format!("{entry} already exists on disk"),
            });
        }
    }
    Ok(())
}

fn create_step(root: &Path, step: &NewStep) -> Result<Vec<String>, StepError> {
    let dir = root.join(&step.dir);
    fs::create_dir(&dir).map_err(|err| StepError::io(&dir, err))?;
    let mut created = Vec::with_capacity(step.files.len());
    for file in &step.files {
        let path = root.join(&file.path);
        fs::write(&path, file.contents.as_bytes()).map_err(|err| StepError::io(&path, err))?;
        if file.executable {
            make_executable(&path)?;
        }
        tracing::debug!(path = %path.display(), "created step file");
        created.push(file.path.clone());
    }
    Ok(created)
}

/// Set `0o755` on a freshly written script.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> Result<(), StepError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .map_err(|err| StepError::io(path, err))
}

#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> Result<(), StepError> {
    Ok(())
}
