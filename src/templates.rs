pub const STEP_MD: &str = include_str!("../templates/step.md");
pub const PLACEHOLDER_SH: &str = include_str!("../templates/placeholder.sh");
pub const INTRO_MD: &str = include_str!("../templates/intro.md");
pub const FINISH_MD: &str = include_str!("../templates/finish.md");
pub const ASSETS_README_MD: &str = include_str!("../templates/assets/README.md");
pub const ASSETS_SETUP_SH: &str = include_str!("../templates/assets/setup.sh");
pub const ASSETS_WAIT_SH: &str = include_str!("../templates/assets/wait.sh");

/// Asset bundle written by `assets`: (path under `assets/`, contents, executable).
pub const ASSET_BUNDLE: &[(&str, &str, bool)] = &[
    ("README.md", ASSETS_README_MD, false),
    ("setup.sh", ASSETS_SETUP_SH, true),
    ("wait.sh", ASSETS_WAIT_SH, true),
];

const TITLE_PLACEHOLDER: &str = "{title}";

/// Markdown for a brand-new step.
pub fn step_markdown(title: &str) -> String {
    STEP_MD.replace(TITLE_PLACEHOLDER, title)
}

/// Placeholder body for a new step's scripts.
pub fn placeholder_script(title: &str) -> String {
    PLACEHOLDER_SH.replace(TITLE_PLACEHOLDER, title)
}
