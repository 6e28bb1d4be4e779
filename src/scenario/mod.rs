//! Step layout, manifest, renumbering, and execution for one scenario directory.
//!
//! Reading and planning never write; only `executor` changes the directory.
mod error;
mod executor;
mod layout;
mod manifest;
mod paths;
mod renumber;
mod types;
mod validate;

pub use error::StepError;
pub use executor::{apply_plan, make_executable};
pub use layout::read_layout;
pub use manifest::{write_atomic, Manifest, StepRecord, StepsLocation};
pub use paths::{ScenarioPaths, ASSETS_DIR, FINISH_MD, INDEX_JSON, INTRO_MD};
pub use renumber::plan_insertion;
pub use types::{InsertRequest, Layout, MutationPlan, StepKind};
pub use validate::validate_scenario;
