//! Error taxonomy for the step layout, manifest, planning, and execution.
//!
//! Everything up to and including planning fails before the first write; only
//! `IncompleteMove` describes a scenario directory that was partially changed.
use super::types::StepMove;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// On-disk inconsistencies detected by the layout reader.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum LayoutIssue {
    #[display("non-canonical step name {name:?} (expected stepN or stepN.md without leading zeros)")]
    NonCanonicalName { name: String },
    #[display("step {ordinal} appears more than once ({first} and {second})")]
    Duplicate {
        ordinal: usize,
        first: String,
        second: String,
    },
    #[display("step ordinals are not contiguous: expected step{expected}, found step{found}")]
    Gap { expected: usize, found: usize },
    #[display("step {ordinal} is missing its content file {path}")]
    MissingContent { ordinal: usize, path: String },
    #[display("manifest lists {manifest} steps but the layout has {layout}")]
    CountMismatch { manifest: usize, layout: usize },
    #[display("manifest step {ordinal} points at {manifest} but the layout has {layout}")]
    ContentMismatch {
        ordinal: usize,
        manifest: String,
        layout: String,
    },
}

/// Phase of plan execution that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum ExecStage {
    #[display("move")]
    Move,
    #[display("create step")]
    CreateStep,
    #[display("manifest")]
    Manifest,
}

/// State of a plan that stopped partway through.
///
/// Completed moves are not undone; `recovery_renames` lists the reverse
/// renames that restore the previous layout.
#[derive(Debug, Clone, Serialize)]
pub struct IncompleteMove {
    pub stage: ExecStage,
    pub completed: Vec<StepMove>,
    pub pending: Vec<StepMove>,
    pub reason: String,
}

impl IncompleteMove {
    /// Ordinals (source side) that were moved successfully.
    pub fn moved_ordinals(&self) -> Vec<usize> {
        self.completed.iter().map(|mv| mv.from).collect()
    }

    /// Ordinals (source side) that were never moved.
    pub fn unmoved_ordinals(&self) -> Vec<usize> {
        self.pending.iter().map(|mv| mv.from).collect()
    }

    /// Reverse renames, newest first, that undo the completed moves.
    pub fn recovery_renames(&self) -> Vec<(String, String)> {
        let mut renames = Vec::new();
        for mv in self.completed.iter().rev() {
            if let Some((inner_from, inner_to)) = &mv.content_rename {
                renames.push((inner_to.clone(), inner_from.clone()));
            }
            renames.push((mv.to_path.clone(), mv.from_path.clone()));
        }
        renames
    }
}

impl fmt::Display for IncompleteMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "incomplete move during {} stage: {}; moved steps {:?}, not moved steps {:?}",
            self.stage,
            self.reason,
            self.moved_ordinals(),
            self.unmoved_ordinals()
        )?;
        let renames = self.recovery_renames();
        if !renames.is_empty() {
            f.write_str("; to restore the previous layout rename")?;
            for (from, to) in renames {
                write!(f, " {from} -> {to};")?;
            }
        }
        Ok(())
    }
}

/// Domain error returned by the reader, store, engine, and executor.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum StepError {
    #[display("layout error: {issue}")]
    Layout { issue: LayoutIssue },
    #[display("manifest format error in {}: {reason}", path.display())]
    ManifestFormat { path: PathBuf, reason: String },
    #[display("invalid position {requested}: expected a step number between 1 and {max}")]
    InvalidPosition { requested: usize, max: usize },
    #[display("collision at step {ordinal}: {detail}")]
    Collision { ordinal: usize, detail: String },
    #[display("{report}")]
    IncompleteMove { report: IncompleteMove },
    #[display("{}: {cause}", path.display())]
    Io {
        path: PathBuf,
        #[error(source)]
        cause: std::io::Error,
    },
}

impl StepError {
    pub fn layout(issue: LayoutIssue) -> Self {
        StepError::Layout { issue }
    }

    pub fn manifest_format(path: &Path, reason: impl Into<String>) -> Self {
        StepError::ManifestFormat {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn io(path: &Path, cause: std::io::Error) -> Self {
        StepError::Io {
            path: path.to_path_buf(),
            cause,
        }
    }

    /// True when the failure happened before anything on disk was changed.
    pub fn is_pre_mutation(&self) -> bool {
        !matches!(self, StepError::IncompleteMove { .. })
    }
}
