use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::foundation::error::WebpBinResult;

/// Per-instance tool configuration.
///
/// Every builder takes its own copy; there is no process-wide default state.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Full path to the binary. Wins over `bin_dir` when set.
    pub exec_path: Option<PathBuf>,
    /// Directory holding the binary, joined with the tool name.
    pub bin_dir: Option<PathBuf>,
    /// Extra environment variables for the child process.
    pub env: BTreeMap<String, String>,
}

impl ToolConfig {
    /// Empty configuration: the tool is looked up on `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `exec_path` as the binary.
    pub fn with_exec_path(mut self, exec_path: impl Into<PathBuf>) -> Self {
        self.exec_path = Some(exec_path.into());
        self
    }

    /// Look the binary up in `bin_dir`.
    pub fn with_bin_dir(mut self, bin_dir: impl Into<PathBuf>) -> Self {
        self.bin_dir = Some(bin_dir.into());
        self
    }

    /// Add one environment variable for the child process.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Resolve the program to spawn for `tool`.
    ///
    /// Order: `exec_path`, then `bin_dir/<tool>`, then bare `<tool>`.
    pub fn resolve_program(&self, tool: &str) -> PathBuf {
        if let Some(exec_path) = &self.exec_path {
            return exec_path.clone();
        }
        match &self.bin_dir {
            Some(dir) => dir.join(exe_name(tool)),
            None => PathBuf::from(tool),
        }
    }

    /// Parse a JSON configuration document.
    pub fn from_json_str(json: &str) -> WebpBinResult<Self> {
        let cfg = serde_json::from_str(json).context("parse tool config JSON")?;
        Ok(cfg)
    }

    /// Load a JSON configuration file.
    pub fn load(path: &Path) -> WebpBinResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read tool config '{}'", path.display()))?;
        Self::from_json_str(&json)
    }
}

fn exe_name(tool: &str) -> String {
    if cfg!(windows) {
        format!("{tool}.exe")
    } else {
        tool.to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
