use anyhow::{Context as _, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the optional configuration file in the project root.
pub const CONFIG_FILE: &str = "_config.toml";

/// Where to find the inputs and put the output. Relative paths are resolved
/// against the project root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// The Markdown document.
    pub source: PathBuf,
    /// The generated page.
    pub output: PathBuf,
    /// Directory holding `header.html`, `sidebar.html`, and `footer.html`.
    pub includes: PathBuf,
    /// Classes added to every bare `<table>`.
    pub table_class: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: "docs.md".into(),
            output: "index.html".into(),
            includes: "assets/includes".into(),
            table_class: "table table-bordered".into(),
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        match fs::read_to_string(&path) {
            // Silently proceed if the file isn't found, but crash on other errors.
            Err(ref e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
            Ok(s) => toml::from_str(&s).with_context(|| format!("parsing {}", path.display())),
        }
    }
}
