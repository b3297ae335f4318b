//! Archive validation parameters, read from an optional TOML file.
//!
//! ```toml
//! min_file_size = 50
//! platform_dirs = ["Miseq", "Hiseq"]
//! require_index_read = false
//! ```

use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_MIN_FILE_SIZE: u64 = 50;
const DEFAULT_PLATFORM_DIRS: &[&str] = &["Miseq", "Hiseq", "Nextseq", "Novaseq", "MiniSeq"];

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveParams {
    /// A FASTQ whose decompressed content is not larger than this (bytes) is
    /// treated as truncated or empty.
    pub min_file_size: u64,
    /// Directory names that hold run folders, e.g. `Miseq/<run folder>/...`.
    pub platform_dirs: Vec<String>,
    /// Fail validation when the header carries no real index sequence.
    pub require_index_read: bool,
}

impl Default for ArchiveParams {
    fn default() -> ArchiveParams {
        ArchiveParams {
            min_file_size: DEFAULT_MIN_FILE_SIZE,
            platform_dirs: DEFAULT_PLATFORM_DIRS.iter().map(|s| s.to_string()).collect(),
            require_index_read: false,
        }
    }
}

impl ArchiveParams {
    pub fn from_toml_str(s: &str) -> Result<ArchiveParams> {
        let params: ArchiveParams = toml::from_str(s).context("invalid archive parameters")?;
        let defaults = ArchiveParams::default();
        if params.min_file_size != defaults.min_file_size {
            warn!("using non-default min_file_size = {}", params.min_file_size);
        }
        if params.platform_dirs.is_empty() {
            warn!("platform_dirs is empty, run folders will be located by name only");
        }
        Ok(params)
    }

    /// Load parameters from `path`, falling back to the defaults if the file
    /// does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<ArchiveParams> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(
                "could not find {}, falling back to default archive parameters",
                path.display()
            );
            return Ok(ArchiveParams::default());
        }
        let s = std::fs::read_to_string(path).with_context(|| path.display().to_string())?;
        ArchiveParams::from_toml_str(&s).with_context(|| path.display().to_string())
    }
}
