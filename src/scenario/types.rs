//! Shared types for step layouts, insertion requests, and mutation plans.
use super::manifest::Manifest;
use super::paths;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a step carries setup scripts or a verification script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    #[value(alias = "r")]
    Regular,
    #[value(alias = "v")]
    Verify,
}

impl StepKind {
    /// Return the stable string identifier used in plans and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Regular => "regular",
            StepKind::Verify => "verify",
        }
    }

    /// Placeholder scripts created for a brand-new step of this kind.
    pub fn placeholder_scripts(&self) -> &'static [SideFile] {
        match self {
            StepKind::Regular => &[SideFile::Background, SideFile::Foreground],
            StepKind::Verify => &[SideFile::Verify],
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// On-disk representation of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepShape {
    /// A bare `stepN.md` file.
    File,
    /// A `stepN/` directory holding `stepN.md` and optional scripts.
    Directory,
}

/// Optional scripts that live next to a directory step's markdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SideFile {
    Background,
    Foreground,
    Verify,
}

impl SideFile {
    pub const ALL: [SideFile; 3] = [SideFile::Background, SideFile::Foreground, SideFile::Verify];

    pub fn file_name(&self) -> &'static str {
        match self {
            SideFile::Background => "background.sh",
            SideFile::Foreground => "foreground.sh",
            SideFile::Verify => "verify.sh",
        }
    }

    /// Manifest key that references this script.
    pub fn manifest_key(&self) -> &'static str {
        match self {
            SideFile::Background => "background",
            SideFile::Foreground => "foreground",
            SideFile::Verify => "verify",
        }
    }
}

/// A step discovered on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub ordinal: usize,
    pub shape: StepShape,
    pub kind: StepKind,
    /// Relative path of the step's markdown file.
    pub content_path: String,
    pub side_files: Vec<SideFile>,
}

impl Step {
    /// Relative path of the file or directory that represents the step.
    pub fn entry_path(&self) -> String {
        match self.shape {
            StepShape::File => paths::bare_content_rel(self.ordinal),
            StepShape::Directory => paths::step_stem(self.ordinal),
        }
    }
}

/// Steps found in a scenario directory, ordered by ordinal.
///
/// A `Layout` returned by the reader always has ordinals `1..=len`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub steps: Vec<Step>,
}

impl Layout {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn ordinals(&self) -> Vec<usize> {
        self.steps.iter().map(|step| step.ordinal).collect()
    }
}

/// Request to insert a new step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertRequest {
    pub title: String,
    pub insert_at: usize,
    pub kind: StepKind,
}

/// One rename of an existing step from `from` to `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepMove {
    pub from: usize,
    pub to: usize,
    pub shape: StepShape,
    pub from_path: String,
    pub to_path: String,
    /// Rename of the markdown file inside a directory step, applied after the
    /// directory itself has moved.
    pub content_rename: Option<(String, String)>,
}

/// A placeholder file written for the new step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedFile {
    pub path: String,
    pub contents: String,
    pub executable: bool,
}

/// The step synthesized by an insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewStep {
    pub ordinal: usize,
    pub title: String,
    pub kind: StepKind,
    pub dir: String,
    pub content_path: String,
    pub files: Vec<PlannedFile>,
}

/// Everything needed to reach the post-insertion state.
///
/// `moves` is sorted by target ordinal, highest first.
#[derive(Debug, Clone, Serialize)]
pub struct MutationPlan {
    pub moves: Vec<StepMove>,
    pub new_step: NewStep,
    pub manifest: Manifest,
}

impl MutationPlan {
    /// Layout the scenario will have once the plan is applied.
    pub fn projected_ordinals(&self, current: &Layout) -> Vec<usize> {
        let mut ordinals: Vec<usize> = current
            .steps
            .iter()
            .map(|step| {
                self.moves
                    .iter()
                    .find(|mv| mv.from == step.ordinal)
                    .map_or(step.ordinal, |mv| mv.to)
            })
            .collect();
        ordinals.push(self.new_step.ordinal);
        ordinals.sort_unstable();
        ordinals
    }
}

/// Result of applying a plan.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyReport {
    pub moved: Vec<StepMove>,
    pub created: Vec<String>,
    pub manifest_path: String,
}
