//! Engine configuration.
//!
//! Render entry points take an explicit [`EngineConfig`] instead of reading process-wide state.
//! A config is built from defaults, optionally overlaid with a JSON file, and finally with
//! environment overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{ReelError, ReelResult};

/// Environment variable overriding [`EngineConfig::output_dir`].
pub const ENV_OUTPUT_DIR: &str = "PROMOREEL_OUTPUT_DIR";
/// Environment variable overriding [`EngineConfig::music_dir`].
pub const ENV_MUSIC_DIR: &str = "PROMOREEL_MUSIC_DIR";

/// Explicit configuration passed into every render entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory rendered videos are written to.
    pub output_dir: PathBuf,

    /// Read-only directory of background music tracks.
    pub music_dir: PathBuf,

    /// Slideshow image height in pixels after rescaling.
    pub target_height: u32,

    /// Overwrite an existing destination file.
    pub overwrite: bool,

    /// Render slideshow frames in parallel chunks.
    pub parallel: bool,

    /// Frames rendered per chunk.
    pub chunk_size: usize,

    /// Worker thread override for parallel rendering.
    pub threads: Option<usize>,

    /// Default log filter used by the CLI when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("outputs"),
            music_dir: PathBuf::from("assets").join("music"),
            target_height: 1080,
            overwrite: true,
            parallel: false,
            chunk_size: 48,
            threads: None,
            log_level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load a config from a JSON file. Missing fields fall back to defaults.
    pub fn from_json_file(path: &Path) -> ReelResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ReelError::invalid_input(format!("failed to read config '{}': {e}", path.display()))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            ReelError::serde(format!("failed to parse config '{}': {e}", path.display()))
        })
    }

    /// Resolve the effective config: defaults or `path`, then environment overrides.
    pub fn load(path: Option<&Path>) -> ReelResult<Self> {
        let cfg = match path {
            Some(p) => Self::from_json_file(p)?,
            None => Self::default(),
        };
        let cfg = cfg.with_env_overrides(|key| std::env::var(key).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply directory overrides from an environment lookup.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(ENV_OUTPUT_DIR).filter(|v| !v.is_empty()) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ENV_MUSIC_DIR).filter(|v| !v.is_empty()) {
            self.music_dir = PathBuf::from(dir);
        }
        self
    }

    /// Reject values the renderers cannot work with.
    pub fn validate(&self) -> ReelResult<()> {
        if self.target_height == 0 {
            return Err(ReelError::invalid_input("target_height must be > 0"));
        }
        if self.chunk_size == 0 {
            return Err(ReelError::invalid_input("chunk_size must be > 0"));
        }
        if self.threads == Some(0) {
            return Err(ReelError::invalid_input("threads must be >= 1 when set"));
        }
        Ok(())
    }

    /// Destination path for `file_name` under [`EngineConfig::output_dir`].
    pub fn output_path(&self, file_name: &str) -> ReelResult<PathBuf> {
        let name = Path::new(file_name);
        if file_name.is_empty() || name.file_name().is_none_or(|n| n != name.as_os_str()) {
            return Err(ReelError::invalid_input(format!(
                "output name '{file_name}' must be a plain file name"
            )));
        }
        Ok(self.output_dir.join(name))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
