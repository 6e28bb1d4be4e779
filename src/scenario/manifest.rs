//! Manifest store for `index.json`.
//!
//! The manifest keeps every key it does not understand so a load/save cycle
//! only changes the step list. Writes go through a temp file in the same
//! directory and are renamed over the destination.
use super::error::StepError;
use super::paths::check_relative_path;
use super::types::SideFile;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// One entry of the manifest step list.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StepRecord {
    pub title: String,
    pub text: String,
    /// Script references (`background`, `foreground`, `verify`) and any other
    /// keys the platform understands.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StepRecord {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            extra: Map::new(),
        }
    }

    /// Relative path of a referenced script, if the record names one.
    pub fn script_ref(&self, side: SideFile) -> Option<&str> {
        self.extra.get(side.manifest_key()).and_then(Value::as_str)
    }

    pub fn set_script_ref(&mut self, side: SideFile, rel: String) {
        self.extra
            .insert(side.manifest_key().to_string(), Value::String(rel));
    }

    /// Every relative path the record references, `text` first.
    pub fn referenced_paths(&self) -> Vec<&str> {
        let mut refs = vec![self.text.as_str()];
        for side in SideFile::ALL {
            if let Some(rel) = self.script_ref(side) {
                refs.push(rel);
            }
        }
        refs
    }
}

/// Where the step list lives inside the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepsLocation {
    /// `{"steps": [...]}`
    TopLevel,
    /// `{"details": {"steps": [...]}}`
    Details,
}

/// Parsed `index.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    location: StepsLocation,
    /// The document with the step list removed.
    document: Map<String, Value>,
    steps: Vec<StepRecord>,
}

impl Manifest {
    /// Build a manifest with an empty step list at `location`.
    pub fn new(location: StepsLocation, document: Map<String, Value>) -> Self {
        Self {
            location,
            document,
            steps: Vec::new(),
        }
    }

    /// Load and validate a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, StepError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(StepError::manifest_format(path, "file not found"));
            }
            Err(err) => return Err(StepError::io(path, err)),
        };
        let manifest = Self::parse(path, &text)?;
        tracing::debug!(
            path = %path.display(),
            location = ?manifest.location(),
            steps = manifest.len(),
            "loaded manifest"
        );
        Ok(manifest)
    }

    /// Parse manifest text; `path` is only used for error reporting.
    pub fn parse(path: &Path, text: &str) -> Result<Self, StepError> {
        if text.trim().is_empty() {
            return Err(StepError::manifest_format(path, "file is empty"));
        }
        let value: Value = serde_json::from_str(text)
            .map_err(|err| StepError::manifest_format(path, format!("invalid JSON: {err}")))?;
        Self::from_value(path, value)
    }

    /// Validate the structure of an already-decoded document.
    pub fn from_value(path: &Path, value: Value) -> Result<Self, StepError> {
        let Value::Object(mut document) = value else {
            return Err(StepError::manifest_format(
                path,
                "top-level value must be an object",
            ));
        };
        let (location, raw_steps) = if let Some(steps) = document.remove("steps") {
            (StepsLocation::TopLevel, steps)
        } else if let Some(steps) = document
            .get_mut("details")
            .and_then(Value::as_object_mut)
            .and_then(|details| details.remove("steps"))
        {
            (StepsLocation::Details, steps)
        } else {
            return Err(StepError::manifest_format(path, "missing `steps` key"));
        };
        let Value::Array(entries) = raw_steps else {
            return Err(StepError::manifest_format(path, "`steps` must be a list"));
        };
        let steps = entries
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| parse_record(path, idx + 1, entry))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            location,
            document,
            steps,
        })
    }

    pub fn location(&self) -> StepsLocation {
        self.location
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Copy of this manifest with a different step list.
    pub fn with_steps(&self, steps: Vec<StepRecord>) -> Self {
        Self {
            location: self.location,
            document: self.document.clone(),
            steps,
        }
    }

    /// Reassemble the full JSON document.
    pub fn to_document(&self) -> Result<Value, serde_json::Error> {
        let steps = serde_json::to_value(&self.steps)?;
        let mut document = self.document.clone();
        match self.location {
            StepsLocation::TopLevel => {
                document.insert("steps".to_string(), steps);
            }
            StepsLocation::Details => {
                let details = document
                    .entry("details")
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(details) = details {
                    details.insert("steps".to_string(), steps);
                }
            }
        }
        Ok(Value::Object(document))
    }

    /// Serialize deterministically: pretty JSON, sorted keys, trailing newline.
    pub fn to_json_text(&self) -> Result<String, serde_json::Error> {
        let mut text = serde_json::to_string_pretty(&self.to_document()?)?;
        text.push('\n');
        Ok(text)
    }

    /// Persist the manifest, replacing `path` atomically.
    pub fn save(&self, path: &Path) -> Result<(), StepError> {
        let text = self
            .to_json_text()
            .map_err(|err| StepError::manifest_format(path, format!("serialize: {err}")))?;
        write_atomic(path, text.as_bytes())?;
        tracing::info!(path = %path.display(), steps = self.len(), "wrote manifest");
        Ok(())
    }
}

impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_document()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

fn parse_record(path: &Path, position: usize, entry: Value) -> Result<StepRecord, StepError> {
    let Some(object) = entry.as_object() else {
        return Err(StepError::manifest_format(
            path,
            format!("step {position} must be an object"),
        ));
    };
    for key in ["title", "text"] {
        match object.get(key) {
            Some(Value::String(_)) => {}
            Some(_) => {
                return Err(StepError::manifest_format(
                    path,
                    format!("step {position} field `{key}` must be a string"),
                ));
            }
            None => {
                return Err(StepError::manifest_format(
                    path,
                    format!("step {position} is missing `{key}`"),
                ));
            }
        }
    }
    let record: StepRecord = serde_json::from_value(entry)
        .map_err(|err| StepError::manifest_format(path, format!("step {position}: {err}")))?;
    for rel in record.referenced_paths() {
        check_relative_path(rel).map_err(|reason| {
            StepError::manifest_format(path, format!("step {position}: {reason}"))
        })?;
    }
    Ok(record)
}

/// Write `bytes` to `path` through a synced temp file renamed over the target.
///
/// The temp file is removed if any step fails, so the destination is either
/// the old contents or the new contents.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StepError> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(|err| StepError::io(dir, err))?;
    tmp.write_all(bytes)
        .map_err(|err| StepError::io(tmp.path(), err))?;
    tmp.as_file()
        .sync_all()
        .map_err(|err| StepError::io(tmp.path(), err))?;
    let permissions = match fs::metadata(path) {
        Ok(meta) => Some(meta.permissions()),
        Err(_) => default_permissions(),
    };
    if let Some(permissions) = permissions {
        fs::set_permissions(tmp.path(), permissions)
            .map_err(|err| StepError::io(tmp.path(), err))?;
    }
    tmp.persist(path)
        .map_err(|err| StepError::io(path, err.error))?;
    Ok(())
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}
