//! Renumbering engine.
//!
//! Planning is a pure function of a layout snapshot, the manifest, and an
//! insertion request. Nothing here touches the filesystem; the executor
//! applies the resulting plan.
//!
//! Inserting at `k` shifts every step at ordinal `>= k` up by one. Because
//! move targets overlap move sources (`step2 -> step3` while `step3 -> step4`
//! is pending), moves are sorted by target ordinal, highest first, and the
//! order is replayed against the occupied set before the plan is returned.
use super::error::{LayoutIssue, StepError};
use super::manifest::{Manifest, StepRecord};
use super::paths::{
    bare_content_rel, dir_content_rel, retarget_reference, side_file_rel, step_stem,
};
use super::types::{
    InsertRequest, Layout, MutationPlan, NewStep, PlannedFile, Step, StepMove, StepShape,
};
use crate::templates;
use serde_json::Value;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

/// Compute the plan that inserts `request` into `layout`.
pub fn plan_insertion(
    layout: &Layout,
    manifest: &Manifest,
    request: &InsertRequest,
) -> Result<MutationPlan, StepError> {
    check_alignment(layout, manifest)?;
    let max = layout.len() + 1;
    if request.insert_at < 1 || request.insert_at > max {
        return Err(StepError::InvalidPosition {
            requested: request.insert_at,
            max,
        });
    }

    let assignment = assign_ordinals(layout, request.insert_at)?;
    let mut moves: Vec<StepMove> = layout
        .steps
        .iter()
        .filter_map(|step| {
            let to = assignment[&step.ordinal];
            (to != step.ordinal).then(|| step_move(step, to))
        })
        .collect();
    moves.sort_by_key(|mv| Reverse(mv.to));
    verify_move_order(&layout.ordinals(), &moves, request.insert_at)?;

    let new_step = synthesize_step(request);
    let manifest = rebuild_manifest(layout, manifest, &assignment, &new_step);
    tracing::info!(
        insert_at = request.insert_at,
        kind = %request.kind,
        moves = moves.len(),
        "planned step insertion"
    );
    Ok(MutationPlan {
        moves,
        new_step,
        manifest,
    })
}

/// Require the manifest to describe the layout record for record: same
/// length, and each `text` naming the content file of the step at its position.
pub fn check_alignment(layout: &Layout, manifest: &Manifest) -> Result<(), StepError> {
    if manifest.len() != layout.len() {
        return Err(StepError::layout(LayoutIssue::CountMismatch {
            manifest: manifest.len(),
            layout: layout.len(),
        }));
    }
    for (step, record) in layout.steps.iter().zip(manifest.steps()) {
        if record.text != step.content_path {
            return Err(StepError::layout(LayoutIssue::ContentMismatch {
                ordinal: step.ordinal,
                manifest: record.text.clone(),
                layout: step.content_path.clone(),
            }));
        }
    }
    Ok(())
}

/// Map every existing ordinal to its post-insertion ordinal.
///
/// The result is a bijection from `1..=N` onto `1..=N+1` minus `insert_at`.
fn assign_ordinals(layout: &Layout, insert_at: usize) -> Result<BTreeMap<usize, usize>, StepError> {
    let mut assignment = BTreeMap::new();
    let mut targets = BTreeSet::from([insert_at]);
    for step in &layout.steps {
        let to = if step.ordinal >= insert_at {
            step.ordinal + 1
        } else {
            step.ordinal
        };
        if !targets.insert(to) || assignment.insert(step.ordinal, to).is_some() {
            return Err(StepError::Collision {
                ordinal: to,
                detail: format!("step{} is assigned an ordinal twice", step.ordinal),
            });
        }
    }
    if let Some((expected, found)) = (1..)
        .zip(targets.iter().copied())
        .find(|(expected, found)| expected != found)
    {
        return Err(StepError::layout(LayoutIssue::Gap { expected, found }));
    }
    Ok(assignment)
}

/// Replay `moves` against the `initial` ordinals and fail on the first move
/// whose target is still occupied, or when `new_ordinal` is not free at the end.
pub fn verify_move_order(
    initial: &[usize],
    moves: &[StepMove],
    new_ordinal: usize,
) -> Result<(), StepError> {
    let mut occupied: BTreeSet<usize> = initial.iter().copied().collect();
    for mv in moves {
        if occupied.contains(&mv.to) {
            return Err(StepError::Collision {
                ordinal: mv.to,
                detail: format!(
                    "moving step{} would overwrite step{} before it moved",
                    mv.from, mv.to
                ),
            });
        }
        occupied.remove(&mv.from);
        occupied.insert(mv.to);
    }
    if occupied.contains(&new_ordinal) {
        return Err(StepError::Collision {
            ordinal: new_ordinal,
            detail: "the new step's ordinal is still occupied".to_string(),
        });
    }
    Ok(())
}

fn step_move(step: &Step, to: usize) -> StepMove {
    let from = step.ordinal;
    match step.shape {
        StepShape::File => StepMove {
            from,
            to,
            shape: StepShape::File,
            from_path: step.entry_path(),
            to_path: bare_content_rel(to),
            content_rename: None,
        },
        StepShape::Directory => StepMove {
            from,
            to,
            shape: StepShape::Directory,
            from_path: step.entry_path(),
            to_path: step_stem(to),
            content_rename: Some((
                format!("{}/{}", step_stem(to), bare_content_rel(from)),
                dir_content_rel(to),
            )),
        },
    }
}

fn synthesize_step(request: &InsertRequest) -> NewStep {
    let ordinal = request.insert_at;
    let content_path = dir_content_rel(ordinal);
    let mut files = vec![PlannedFile {
        path: content_path.clone(),
        contents: templates::step_markdown(&request.title),
        executable: false,
    }];
    for side in request.kind.placeholder_scripts() {
        files.push(PlannedFile {
            path: side_file_rel(ordinal, *side),
            contents: templates::placeholder_script(&request.title),
            executable: true,
        });
    }
    NewStep {
        ordinal,
        title: request.title.clone(),
        kind: request.kind,
        dir: step_stem(ordinal),
        content_path,
        files,
    }
}

fn rebuild_manifest(
    layout: &Layout,
    manifest: &Manifest,
    assignment: &BTreeMap<usize, usize>,
    new_step: &NewStep,
) -> Manifest {
    let mut ordered: Vec<(usize, StepRecord)> = layout
        .steps
        .iter()
        .zip(manifest.steps())
        .map(|(step, record)| {
            let to = assignment[&step.ordinal];
            (to, retarget_record(step, record, to))
        })
        .collect();

    let mut record = StepRecord::new(new_step.title.clone(), new_step.content_path.clone());
    for side in new_step.kind.placeholder_scripts() {
        record.set_script_ref(*side, side_file_rel(new_step.ordinal, *side));
    }
    ordered.push((new_step.ordinal, record));
    ordered.sort_by_key(|(ordinal, _)| *ordinal);

    manifest.with_steps(ordered.into_iter().map(|(_, record)| record).collect())
}

fn retarget_record(step: &Step, record: &StepRecord, to: usize) -> StepRecord {
    let mut record = record.clone();
    record.text = match step.shape {
        StepShape::File => bare_content_rel(to),
        StepShape::Directory => dir_content_rel(to),
    };
    if to != step.ordinal {
        for value in record.extra.values_mut() {
            if let Value::String(rel) = value {
                if let Some(retargeted) = retarget_reference(rel, step.ordinal, to) {
                    *rel = retargeted;
                }
            }
        }
    }
    record
}

#[cfg(test)]
#[path = "renumber_tests.rs"]
mod tests;
