use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory the per-user output files are written to.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// Prefix of the per-user output file names.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            prefix: default_prefix(),
        }
    }
}

fn default_dir() -> PathBuf {
    "output".into()
}

fn default_prefix() -> String {
    "following".into()
}

impl Config {
    /// Loads the config file. An explicitly given path must exist; without
    /// one, a missing file at the default location means built-in defaults.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_owned(),
            None => match default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let config = fs::read_to_string(&path)
            .with_context(|| format!("read config file {}", path.display()))?;
        toml::from_str(&config).context("parse config file")
    }
}

fn default_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "twitter-friends")?;
    Some(dirs.config_dir().join("config.toml"))
}
