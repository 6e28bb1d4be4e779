//! Shared test infrastructure for integration tests.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A scratch scenario directory driven through the `kc-steps` binary.
pub struct ScenarioFixture {
    dir: TempDir,
}

impl ScenarioFixture {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// `step1.md` plus `step2/step2.md` with a matching top-level manifest.
    pub fn two_steps() -> Self {
        let fixture = Self::empty();
        fixture.write("step1.md", "# Step 1\n");
        fixture.write("step2/step2.md", "# Step 2\n");
        fixture.write(
            "index.json",
            r#"{
  "steps": [
    {"title": "Step 1", "text": "step1.md"},
    {"title": "Step 2", "text": "step2/step2.md"}
  ]
}
"#,
        );
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    pub fn write(&self, rel: &str, contents: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directory");
        }
        fs::write(path, contents).expect("write fixture file");
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).unwrap_or_else(|err| panic!("read {rel}: {err}"))
    }

    pub fn manifest(&self) -> serde_json::Value {
        serde_json::from_str(&self.read("index.json")).expect("parse index.json")
    }

    /// Every file under the root with its contents, for no-change assertions.
    pub fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        let mut files = BTreeMap::new();
        collect(self.root(), self.root(), &mut files);
        files
    }

    /// Run `kc-steps <args> --scenario <root>`.
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_kc-steps"))
            .args(args)
            .arg("--scenario")
            .arg(self.root())
            .env_remove("RUST_LOG")
            .output()
            .expect("run kc-steps")
    }
}

fn collect(root: &Path, dir: &Path, files: &mut BTreeMap<String, Vec<u8>>) {
    for entry in fs::read_dir(dir).expect("read dir") {
        let path = entry.expect("dir entry").path();
        if path.is_dir() {
            collect(root, &path, files);
        } else {
            let rel = path
                .strip_prefix(root)
                .expect("relative path")
                .to_string_lossy()
                .to_string();
            files.insert(rel, fs::read(&path).expect("read file"));
        }
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
