//! Typed paths and naming conventions for a scenario directory.
//!
//! Step names are derived from ordinals in exactly one place so the reader,
//! the engine, and the executor can never disagree about a step's location.
use super::types::SideFile;
use std::path::{Component, Path, PathBuf};

/// Manifest file name at the scenario root.
pub const INDEX_JSON: &str = "index.json";
pub const INTRO_MD: &str = "intro.md";
pub const FINISH_MD: &str = "finish.md";
pub const ASSETS_DIR: &str = "assets";

/// Convenience wrapper for locating scenario artifacts.
#[derive(Debug, Clone)]
pub struct ScenarioPaths {
    root: PathBuf,
}

impl ScenarioPaths {
    /// Create a new path helper rooted at the scenario directory.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the `index.json` path.
    pub fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_JSON)
    }

    pub fn intro_path(&self) -> PathBuf {
        self.root.join(INTRO_MD)
    }

    pub fn finish_path(&self) -> PathBuf {
        self.root.join(FINISH_MD)
    }

    /// Return the `assets/` directory path.
    pub fn assets_dir(&self) -> PathBuf {
        self.root.join(ASSETS_DIR)
    }

    /// Resolve a manifest-relative path against the root.
    pub fn resolve(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }
}

/// `stepN`, the directory name (and file stem) of step `N`.
pub fn step_stem(ordinal: usize) -> String {
    format!("step{ordinal}")
}

/// `stepN.md`, a bare-file step.
pub fn bare_content_rel(ordinal: usize) -> String {
    format!("step{ordinal}.md")
}

/// `stepN/stepN.md`, the markdown inside a directory step.
pub fn dir_content_rel(ordinal: usize) -> String {
    format!("step{ordinal}/step{ordinal}.md")
}

/// `stepN/<script>`.
pub fn side_file_rel(ordinal: usize, side: SideFile) -> String {
    format!("step{ordinal}/{}", side.file_name())
}

/// Rewrite a manifest reference that points into step `from` so it points
/// into step `to`. Returns `None` when the value does not reference `from`.
pub fn retarget_reference(value: &str, from: usize, to: usize) -> Option<String> {
    if value == bare_content_rel(from) {
        return Some(bare_content_rel(to));
    }
    let prefix = format!("{}/", step_stem(from));
    let rest = value.strip_prefix(&prefix)?;
    let rest = if rest == bare_content_rel(from) {
        bare_content_rel(to)
    } else {
        rest.to_string()
    };
    Some(format!("{}/{rest}", step_stem(to)))
}

/// Reject manifest paths that could escape the scenario root.
pub fn check_relative_path(rel: &str) -> Result<(), String> {
    if rel.is_empty() {
        return Err("path is empty".to_string());
    }
    if rel.contains('\0') {
        return Err(format!("path {rel:?} contains a NUL byte"));
    }
    let path = Path::new(rel);
    if path.is_absolute() || rel.starts_with('/') || rel.starts_with('\\') {
        return Err(format!("path {rel:?} must be relative"));
    }
    if path
        .components()
        .any(|component| matches!(component, Component::ParentDir | Component::Prefix(_)))
    {
        return Err(format!("path {rel:?} must not contain '..'"));
    }
    Ok(())
}
