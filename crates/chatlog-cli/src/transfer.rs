//! Export and import of the log through files.

use anyhow::Context;
use chatlog_reply::ChatRunner;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_EXPORT_FILE: &str = "textExport.json";

/// Writes the pretty-printed log to `path` (or the default file name).
pub fn export_to(runner: &ChatRunner, path: Option<&Path>) -> anyhow::Result<PathBuf> {
    let path = path.map_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE), Path::to_path_buf);
    let snapshot = runner.export();
    std::fs::write(&path, snapshot)
        .with_context(|| format!("Failed to write export file '{}'", path.display()))?;
    info!(path = %path.display(), messages = runner.session().len(), "Log exported");
    Ok(path)
}

/// Replaces the log with the contents of `path`.
///
/// `Ok(false)` means the file was read but its contents were rejected; the
/// log is unchanged in that case.
pub fn import_from(runner: &mut ChatRunner, path: &Path) -> anyhow::Result<bool> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file '{}'", path.display()))?;
    Ok(runner.import(&text))
}
