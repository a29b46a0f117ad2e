use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Local;
use routeros_model::{write_atomic, write_json, WriteError};
use ros_extract::artifacts::{artifact_path, artifact_stem, ArtifactKind, FILE_STAMP_FORMAT};
use ros_extract::env::{render_env, Connection};
use ros_extract::report::{defaulted_roles, render_extract_summary, ArtifactOutcome};
use ros_extract::script::{render_script, to_text};
use tracing::{error, info};

use crate::cli::ExtractArgs;
use crate::path_guard;
use crate::pipeline::{analyze, provenance, resolve_host};

pub fn run_extract(args: ExtractArgs) -> Result<()> {
    let analysis = analyze(&args.snapshot)?;
    let config = &analysis.config;
    let inference = &analysis.inference;

    let host = resolve_host(args.device.host.as_deref(), config);
    let now = Local::now();
    let provenance = provenance(&host, &now);
    let stem = artifact_stem(&args.prefix, &host, &now.format(FILE_STAMP_FORMAT).to_string());

    fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("failed to create output directory {}", args.output_dir.display())
    })?;

    let mut kinds = vec![ArtifactKind::Script, ArtifactKind::Env];
    if args.json {
        kinds.push(ArtifactKind::Json);
    }
    let paths: Vec<(ArtifactKind, PathBuf)> = kinds
        .into_iter()
        .map(|kind| (kind, artifact_path(&args.output_dir, &stem, kind)))
        .collect();
    for (_, path) in &paths {
        path_guard::ensure_output_not_same(path, &[&args.snapshot.snapshot])?;
    }

    let connection = Connection {
        host: host.clone(),
        username: args.device.username.clone(),
    };

    let mut outcomes = Vec::new();
    for (kind, path) in paths {
        let contents = match kind {
            ArtifactKind::Script => Ok(to_text(&render_script(config, &provenance)).into_bytes()),
            ArtifactKind::Env => Ok(render_env(
                config,
                &inference.roles,
                &inference.networks,
                &inference.ports,
                &connection,
                &provenance,
            )
            .to_text()
            .into_bytes()),
            ArtifactKind::Json => write_json(config),
        };
        outcomes.push(write_artifact(kind, path, contents));
    }

    println!(
        "{}",
        render_extract_summary(&host, &outcomes, &defaulted_roles(inference))
    );

    let failed = outcomes.iter().filter(|o| !o.is_written()).count();
    if failed > 0 {
        bail!("extract failed: {failed} of {} artifacts not written", outcomes.len());
    }
    Ok(())
}

/// Write one artifact; a failure is recorded, not propagated, so the other
/// artifacts are still attempted.
fn write_artifact(
    kind: ArtifactKind,
    path: PathBuf,
    contents: Result<Vec<u8>, WriteError>,
) -> ArtifactOutcome {
    let result = contents.and_then(|bytes| write_atomic(&path, &bytes));
    let error = match result {
        Ok(()) => {
            info!(kind = kind.label(), path = %path.display(), "artifact written");
            None
        }
        Err(err) => {
            error!(
                kind = kind.label(),
                path = %path.display(),
                error = %err,
                "artifact not written"
            );
            Some(err.to_string())
        }
    };
    ArtifactOutcome {
        kind: kind.label(),
        path: display_path(&path),
        error,
    }
}

fn display_path(path: &Path) -> PathBuf {
    path.strip_prefix(".").unwrap_or(path).to_path_buf()
}
