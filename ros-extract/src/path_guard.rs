use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

pub fn ensure_output_not_same(output: &Path, inputs: &[&Path]) -> Result<()> {
    let out_norm = normalize_for_compare(output)
        .with_context(|| format!("failed to normalize output path {}", output.display()))?;

    for input in inputs {
        let in_norm = normalize_for_compare(input)
            .with_context(|| format!("failed to normalize input path {}", input.display()))?;
        if out_norm == in_norm {
            bail!(
                "refusing to overwrite snapshot: output {} matches input {}",
                output.display(),
                input.display()
            );
        }
    }
    Ok(())
}

fn normalize_for_compare(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return path
            .canonicalize()
            .with_context(|| format!("canonicalize {}", path.display()));
    }

    // Not on disk yet: join with cwd, and canonicalize the parent when it exists
    // so `out/../snap.json` style paths still compare equal.
    let base = if path.is_absolute() {
        PathBuf::new()
    } else {
        std::env::current_dir().context("current_dir")?
    };
    let joined = base.join(path);
    match (joined.parent(), joined.file_name()) {
        (Some(parent), Some(name)) if parent.exists() => Ok(parent
            .canonicalize()
            .with_context(|| format!("canonicalize {}", parent.display()))?
            .join(name)),
        _ => Ok(joined),
    }
}
