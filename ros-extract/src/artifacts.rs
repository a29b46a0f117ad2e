//! Names of the files an extract run produces.

use std::path::{Path, PathBuf};

pub const DEFAULT_PREFIX: &str = "extracted";
/// `chrono` format of the stamp embedded in file names.
pub const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
/// `chrono` format of the timestamp written into document headers.
pub const HEADER_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Kind of generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Script,
    Env,
    Json,
}

impl ArtifactKind {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Script => "rsc",
            Self::Env => "env",
            Self::Json => "json",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Env => "env",
            Self::Json => "json",
        }
    }
}

/// `<prefix>_<host with dots as underscores>_<stamp>`.
pub fn artifact_stem(prefix: &str, host: &str, stamp: &str) -> String {
    format!("{prefix}_{}_{stamp}", host.replace('.', "_"))
}

pub fn artifact_path(dir: &Path, stem: &str, kind: ArtifactKind) -> PathBuf {
    dir.join(format!("{stem}.{}", kind.extension()))
}
