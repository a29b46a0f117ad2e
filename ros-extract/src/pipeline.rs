use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use routeros_model::{extract, RawConfig, SnapshotSource};
use ros_extract::artifacts::HEADER_STAMP_FORMAT;
use ros_extract::inference::{infer, Inference};
use ros_extract::provenance::Provenance;
use ros_extract::vocabulary::{default_vocabulary, load_vocabulary, Vocabulary};
use tracing::debug;

use crate::cli::{SnapshotArgs, DEFAULT_HOST};

pub struct Analysis {
    pub config: RawConfig,
    pub inference: Inference,
}

pub fn load_snapshot(path: &Path) -> Result<RawConfig> {
    let mut source = SnapshotSource::open(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    Ok(extract(&mut source))
}

pub fn resolve_vocabulary(path: Option<&Path>) -> Result<Vocabulary> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading vocabulary");
            load_vocabulary(path).with_context(|| "failed to load vocabulary")
        }
        None => Ok(default_vocabulary()),
    }
}

/// Load the snapshot and run inference, enforcing `--strict`.
pub fn analyze(args: &SnapshotArgs) -> Result<Analysis> {
    let vocabulary = resolve_vocabulary(args.vocabulary.as_deref())?;
    let config = load_snapshot(&args.snapshot)?;
    let inference = infer(&config, &vocabulary);

    if args.strict && !inference.diagnostics.is_empty() {
        let codes: Vec<&str> = inference.diagnostics.iter().map(|d| d.code.as_str()).collect();
        bail!(
            "strict mode failed: {} inference diagnostics ({})",
            codes.len(),
            codes.join(", ")
        );
    }

    Ok(Analysis { config, inference })
}

/// `--host`, else the host recorded in the snapshot, else the factory address.
pub fn resolve_host(flag: Option<&str>, config: &RawConfig) -> String {
    flag.map(str::to_string)
        .or_else(|| {
            config
                .extraction_info()
                .and_then(|info| info.host.clone())
                .filter(|host| !host.is_empty())
        })
        .unwrap_or_else(|| DEFAULT_HOST.to_string())
}

pub fn provenance(host: &str, at: &DateTime<Local>) -> Provenance {
    Provenance::new(host, at.format(HEADER_STAMP_FORMAT).to_string())
}
