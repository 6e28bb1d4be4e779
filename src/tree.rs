//! Directory listings for before/after previews.
use crate::scenario::MutationPlan;
use anyhow::{Context, Result};
use similar::TextDiff;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Relative paths under a scenario root; directories end with `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeSnapshot {
    entries: BTreeSet<String>,
}

impl TreeSnapshot {
    /// Walk `root`, skipping hidden entries.
    pub fn capture(root: &Path) -> Result<Self> {
        let mut snapshot = Self::default();
        snapshot.walk(root, "")?;
        Ok(snapshot)
    }

    fn walk(&mut self, dir: &Path, prefix: &str) -> Result<()> {
        let entries = fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))?;
        for entry in entries {
            let entry = entry.with_context(|| format!("read entry in {}", dir.display()))?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            let rel = format!("{prefix}{name}");
            let file_type = entry
                .file_type()
                .with_context(|| format!("stat {}", entry.path().display()))?;
            if file_type.is_dir() {
                self.entries.insert(format!("{rel}/"));
                self.walk(&entry.path(), &format!("{rel}/"))?;
            } else {
                self.entries.insert(rel);
            }
        }
        Ok(())
    }

    /// The listing the scenario will have once `plan` is applied.
    pub fn project(&self, plan: &MutationPlan) -> Self {
        let mut entries = self.entries.clone();
        for mv in &plan.moves {
            let from_dir = format!("{}/", mv.from_path);
            let to_dir = format!("{}/", mv.to_path);
            entries = entries
                .into_iter()
                .map(|entry| {
                    if entry == mv.from_path {
                        mv.to_path.clone()
                    } else if let Some(rest) = entry.strip_prefix(&from_dir) {
                        format!("{to_dir}{rest}")
                    } else {
                        entry
                    }
                })
                .collect();
            if let Some((inner_from, inner_to)) = &mv.content_rename {
                if entries.remove(inner_from) {
                    entries.insert(inner_to.clone());
                }
            }
        }
        entries.insert(format!("{}/", plan.new_step.dir));
        for file in &plan.new_step.files {
            entries.insert(file.path.clone());
        }
        Self { entries }
    }

    /// Indented listing, one entry per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let trimmed = entry.trim_end_matches('/');
            let depth = trimmed.matches('/').count();
            let name = trimmed.rsplit('/').next().unwrap_or(trimmed);
            let suffix = if entry.ends_with('/') { "/" } else { "" };
            out.push_str(&"  ".repeat(depth));
            out.push_str(name);
            out.push_str(suffix);
            out.push('\n');
        }
        out
    }
}

/// Unified diff between two rendered listings, or `None` when they match.
pub fn tree_diff(before: &str, after: &str) -> Option<String> {
    let diff = TextDiff::from_lines(before, after);
    let unified = diff
        .unified_diff()
        .context_radius(3)
        .header("Before changes", "After changes")
        .to_string();
    if unified.is_empty() {
        None
    } else {
        Some(unified)
    }
}
