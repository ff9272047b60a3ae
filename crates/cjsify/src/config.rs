//! `cjsify.toml` loading.

use anyhow::{Context, Result};
use cjsify_transform::{ModuleRewriter, RewriteOptions};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "cjsify.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CjsifyConfig {
    #[serde(default)]
    pub rewrite: RewriteOptions,
}

impl CjsifyConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("could not parse {}", path.display()))
    }

    /// Load `explicit` if given, otherwise `cjsify.toml` in `dir` if it
    /// exists, otherwise the defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<(Self, Option<PathBuf>)> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = dir.join(CONFIG_FILE_NAME);
                if !candidate.is_file() {
                    log::debug!("no {} in {}, using defaults", CONFIG_FILE_NAME, dir.display());
                    return Ok((Self::default(), None));
                }
                candidate
            }
        };

        log::debug!("loading configuration from {}", path.display());
        let config = Self::from_path(&path)?;
        Ok((config, Some(path)))
    }

    pub fn rewriter(&self) -> Result<ModuleRewriter> {
        ModuleRewriter::new(self.rewrite.clone()).context("invalid [rewrite] configuration")
    }
}

/// Build the rewriter for a CLI run from `--config` or the working directory.
pub fn load_rewriter(explicit: Option<&Path>) -> Result<ModuleRewriter> {
    let cwd = std::env::current_dir().context("could not determine the working directory")?;
    let (config, path) = CjsifyConfig::discover(explicit, &cwd)?;
    config.rewriter().with_context(|| match path {
        Some(path) => format!("in {}", path.display()),
        None => "in the default configuration".to_string(),
    })
}
