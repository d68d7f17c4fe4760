//! # Config — TOML Defaults for the Command-Line Tool
//!
//! An optional TOML file supplies defaults that explicit CLI flags override:
//!
//! ```toml
//! [engine]
//! progress = true      # emit progress checkpoints
//! stride = 0           # 0 = ~100 checkpoints per run
//!
//! [export]
//! max_digits = 5000000
//! dir = "artifacts"    # relative `digits --out` paths land here
//! ```
//!
//! Unknown keys are rejected so that typos do not silently fall back to
//! defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::export::DEFAULT_MAX_DIGITS;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub export: ExportSection,
}

/// The `[engine]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSection {
    #[serde(default = "default_true")]
    pub progress: bool,
    #[serde(default)]
    pub stride: u32,
}

impl Default for EngineSection {
    fn default() -> Self {
        EngineSection {
            progress: true,
            stride: 0,
        }
    }
}

/// The `[export]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportSection {
    #[serde(default = "default_max_digits")]
    pub max_digits: u64,
    pub dir: Option<PathBuf>,
}

impl Default for ExportSection {
    fn default() -> Self {
        ExportSection {
            max_digits: DEFAULT_MAX_DIGITS,
            dir: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_digits() -> u64 {
    DEFAULT_MAX_DIGITS
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Load `path` if given, otherwise fall back to built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Resolve an export destination against `[export].dir`.
    pub fn export_path(&self, out: &Path) -> PathBuf {
        match &self.export.dir {
            Some(dir) if out.is_relative() => dir.join(out),
            _ => out.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = FileConfig::parse("").unwrap();
        assert_eq!(cfg, FileConfig::default());
        assert!(cfg.engine.progress);
        assert_eq!(cfg.engine.stride, 0);
        assert_eq!(cfg.export.max_digits, DEFAULT_MAX_DIGITS);
    }

    #[test]
    fn parses_all_sections() {
        let cfg = FileConfig::parse(
            r#"
            [engine]
            progress = false
            stride = 25

            [export]
            max_digits = 1000
            dir = "artifacts"
            "#,
        )
        .unwrap();
        assert!(!cfg.engine.progress);
        assert_eq!(cfg.engine.stride, 25);
        assert_eq!(cfg.export.max_digits, 1000);
        assert_eq!(cfg.export.dir, Some(PathBuf::from("artifacts")));
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(FileConfig::parse("[engine]\nstrid = 3\n").is_err());
        assert!(FileConfig::parse("[gpu]\nenabled = true\n").is_err());
    }

    #[test]
    fn export_path_joins_relative_only() {
        let cfg = FileConfig::parse("[export]\ndir = \"out\"\n").unwrap();
        assert_eq!(cfg.export_path(Path::new("M_7.txt")), PathBuf::from("out/M_7.txt"));
        let abs = std::env::temp_dir().join("M_7.txt");
        assert_eq!(cfg.export_path(&abs), abs);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("llcore.toml");
        std::fs::write(&path, "[engine]\nstride = 7\n").unwrap();
        let cfg = FileConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(cfg.engine.stride, 7);
    }

    #[test]
    fn missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("cannot read config file"));
    }
}
