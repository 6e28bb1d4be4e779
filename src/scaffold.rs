//! Scenario skeleton and asset bundle generation.
//!
//! Both writers only ever add files; existing files are kept unless the
//! caller passes `force`.
use crate::scenario::{
    make_executable, write_atomic, Manifest, ScenarioPaths, StepError, StepsLocation, ASSETS_DIR,
    FINISH_MD, INDEX_JSON, INTRO_MD,
};
use crate::templates;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::Path;

/// Estimated completion times offered by `init`.
pub const TIME_CHOICES: [&str; 7] = [
    "15 minutes",
    "20 minutes",
    "25 minutes",
    "30 minutes",
    "35 minutes",
    "40 minutes",
    "45 minutes",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

/// Backend images a scenario can run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ImageId {
    #[value(name = "ubuntu")]
    Ubuntu,
    #[value(name = "ubuntu-4GB")]
    Ubuntu4Gb,
    #[value(name = "kubernetes-kubeadm-1node")]
    KubeadmOneNode,
    #[value(name = "kubernetes-kubeadm-1node-4GB")]
    KubeadmOneNode4Gb,
    #[value(name = "kubernetes-kubeadm-2nodes")]
    KubeadmTwoNodes,
}

impl ImageId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageId::Ubuntu => "ubuntu",
            ImageId::Ubuntu4Gb => "ubuntu-4GB",
            ImageId::KubeadmOneNode => "kubernetes-kubeadm-1node",
            ImageId::KubeadmOneNode4Gb => "kubernetes-kubeadm-1node-4GB",
            ImageId::KubeadmTwoNodes => "kubernetes-kubeadm-2nodes",
        }
    }
}

/// Values for a new scenario's `index.json`.
#[derive(Debug, Clone)]
pub struct Skeleton {
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub time: String,
    pub image_id: ImageId,
    pub ide: bool,
}

/// Build the manifest for an empty scenario; steps live under `details`.
pub fn skeleton_manifest(skeleton: &Skeleton) -> Manifest {
    let mut document = Map::new();
    document.insert("title".to_string(), Value::String(skeleton.title.clone()));
    document.insert(
        "description".to_string(),
        Value::String(skeleton.description.clone()),
    );
    document.insert(
        "difficulty".to_string(),
        Value::String(skeleton.difficulty.as_str().to_string()),
    );
    document.insert("time".to_string(), Value::String(skeleton.time.clone()));
    document.insert(
        "details".to_string(),
        json!({
            "intro": {"text": INTRO_MD},
            "finish": {"text": FINISH_MD},
            "assets": {"host01": []},
        }),
    );
    document.insert(
        "backend".to_string(),
        json!({"imageid": skeleton.image_id.as_str()}),
    );
    if skeleton.ide {
        document.insert("interface".to_string(), json!({"layout": "ide"}));
    }
    Manifest::new(StepsLocation::Details, document)
}

/// Write `index.json` plus `intro.md` and `finish.md` when they are missing.
///
/// Returns the relative paths that were written.
pub fn init_scenario(paths: &ScenarioPaths, skeleton: &Skeleton) -> Result<Vec<String>, StepError> {
    skeleton_manifest(skeleton).save(&paths.index_path())?;
    let mut written = vec![INDEX_JSON.to_string()];
    for (path, rel, contents) in [
        (paths.intro_path(), INTRO_MD, templates::INTRO_MD),
        (paths.finish_path(), FINISH_MD, templates::FINISH_MD),
    ] {
        if write_file(&path, contents, false, false)? {
            written.push(rel.to_string());
        }
    }
    tracing::info!(root = %paths.root().display(), files = written.len(), "initialized scenario");
    Ok(written)
}

/// Write the embedded asset bundle under `assets/`.
///
/// Existing files are skipped unless `force` is set. Returns the relative
/// paths that were written.
pub fn write_assets(paths: &ScenarioPaths, force: bool) -> Result<Vec<String>, StepError> {
    let dir = paths.assets_dir();
    fs::create_dir_all(&dir).map_err(|err| StepError::io(&dir, err))?;
    let mut written = Vec::new();
    for (name, contents, executable) in templates::ASSET_BUNDLE {
        if write_file(&dir.join(name), contents, *executable, force)? {
            written.push(format!("{ASSETS_DIR}/{name}"));
        } else {
            tracing::debug!(file = name, "asset exists; skipped");
        }
    }
    Ok(written)
}

fn write_file(path: &Path, contents: &str, executable: bool, force: bool) -> Result<bool, StepError> {
    if path.exists() && !force {
        return Ok(false);
    }
    write_atomic(path, contents.as_bytes())?;
    if executable {
        make_executable(path)?;
    }
    Ok(true)
}
