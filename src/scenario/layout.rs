//! Step layout reader.
//!
//! Reading is side-effect free. Any inconsistency in the directory is an error
//! here so the engine only ever sees a dense `1..=N` layout.
use super::error::{LayoutIssue, StepError};
use super::paths::{bare_content_rel, dir_content_rel, step_stem};
use super::types::{Layout, SideFile, Step, StepKind, StepShape};
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

fn step_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^step(\d+)(\.md)?$").expect("valid step name regex"))
}

/// A directory entry that looks like a step.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Candidate {
    ordinal: usize,
    name: String,
    shape: StepShape,
}

/// Scan `root` and return its steps ordered by ordinal.
pub fn read_layout(root: &Path) -> Result<Layout, StepError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(root).map_err(|err| StepError::io(root, err))? {
        let entry = entry.map_err(|err| StepError::io(root, err))?;
        let file_type = entry
            .file_type()
            .map_err(|err| StepError::io(&entry.path(), err))?;
        let name = entry.file_name().to_string_lossy().to_string();
        names.push((name, file_type.is_dir(), file_type.is_file()));
    }
    names.sort();

    let mut by_ordinal: BTreeMap<usize, Candidate> = BTreeMap::new();
    for (name, is_dir, is_file) in names {
        let Some(candidate) = classify(&name, is_dir, is_file)? else {
            continue;
        };
        if let Some(existing) = by_ordinal.get(&candidate.ordinal) {
            return Err(StepError::layout(LayoutIssue::Duplicate {
                ordinal: candidate.ordinal,
                first: existing.name.clone(),
                second: candidate.name,
            }));
        }
        by_ordinal.insert(candidate.ordinal, candidate);
    }

    let mut steps = Vec::with_capacity(by_ordinal.len());
    for (expected, (ordinal, candidate)) in (1..).zip(by_ordinal) {
        if ordinal != expected {
            return Err(StepError::layout(LayoutIssue::Gap {
                expected,
                found: ordinal,
            }));
        }
        steps.push(describe_step(root, candidate)?);
    }
    tracing::debug!(root = %root.display(), steps = steps.len(), "read step layout");
    Ok(Layout { steps })
}

fn classify(name: &str, is_dir: bool, is_file: bool) -> Result<Option<Candidate>, StepError> {
    let Some(caps) = step_name_re().captures(name) else {
        return Ok(None);
    };
    let has_md = caps.get(2).is_some();
    let shape = match (has_md, is_dir, is_file) {
        (true, _, true) => StepShape::File,
        (false, true, _) => StepShape::Directory,
        _ => return Ok(None),
    };
    let digits = &caps[1];
    let ordinal = digits.parse::<usize>().ok().filter(|ordinal| *ordinal > 0);
    let Some(ordinal) = ordinal.filter(|ordinal| ordinal.to_string() == digits) else {
        return Err(StepError::layout(LayoutIssue::NonCanonicalName {
            name: name.to_string(),
        }));
    };
    Ok(Some(Candidate {
        ordinal,
        name: name.to_string(),
        shape,
    }))
}

fn describe_step(root: &Path, candidate: Candidate) -> Result<Step, StepError> {
    let ordinal = candidate.ordinal;
    match candidate.shape {
        StepShape::File => Ok(Step {
            ordinal,
            shape: StepShape::File,
            kind: StepKind::Regular,
            content_path: bare_content_rel(ordinal),
            side_files: Vec::new(),
        }),
        StepShape::Directory => {
            let content_path = dir_content_rel(ordinal);
            if !root.join(&content_path).is_file() {
                return Err(StepError::layout(LayoutIssue::MissingContent {
                    ordinal,
                    path: content_path,
                }));
            }
            let dir = root.join(step_stem(ordinal));
            let side_files: Vec<SideFile> = SideFile::ALL
                .into_iter()
                .filter(|side| dir.join(side.file_name()).is_file())
                .collect();
            let kind = if side_files.contains(&SideFile::Verify) {
                StepKind::Verify
            } else {
                StepKind::Regular
            };
            Ok(Step {
                ordinal,
                shape: StepShape::Directory,
                kind,
                content_path,
                side_files,
            })
        }
    }
}
