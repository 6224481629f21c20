//! Writing generated files, the formatter post-step and user hooks.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};

use crate::config::FormatterConfig;
use crate::error::{Error, Result};
use crate::generators::GeneratedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Unchanged,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Write `content` unless the file already holds exactly that text.
pub fn write_if_changed(path: &Path, content: &str) -> Result<WriteOutcome> {
    if let Ok(existing) = fs::read_to_string(path) {
        if existing == content {
            debug!(path = %path.display(), "Unchanged, skipping write.");
            return Ok(WriteOutcome::Unchanged);
        }
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    fs::write(path, content).map_err(io_error(path))?;
    Ok(WriteOutcome::Written)
}

/// Write every file under `dir`, returning the paths that changed.
pub fn write_files(dir: &Path, files: &[GeneratedFile]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for file in files {
        let path = dir.join(&file.filename);
        if write_if_changed(&path, &file.content)? == WriteOutcome::Written {
            info!(path = %path.display(), "Generated.");
            written.push(path);
        }
    }
    Ok(written)
}

/// Run the configured formatter over `paths`. Failures are logged, never returned.
pub fn run_formatter(formatter: &FormatterConfig, paths: &[PathBuf]) {
    if paths.is_empty() {
        return;
    }
    let result = Command::new(&formatter.command)
        .args(&formatter.args)
        .args(paths)
        .output();
    match result {
        Ok(output) if output.status.success() => {
            debug!(command = %formatter.command, files = paths.len(), "Formatted output.");
        }
        Ok(output) => warn!(
            command = %formatter.command,
            status = %output.status,
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "Formatter failed, keeping unformatted output."
        ),
        Err(err) => warn!(
            command = %formatter.command,
            error = %err,
            "Formatter could not be started, keeping unformatted output."
        ),
    }
}

/// Run a shell hook; a non-zero exit fails the run.
pub fn run_hook(command: &str) -> Result<()> {
    info!(hook = %command, "Running hook.");
    let output = if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", command]).output()
    } else {
        Command::new("sh").args(["-c", command]).output()
    }
    .map_err(io_error(Path::new(command)))?;

    if !output.status.success() {
        return Err(Error::Hook {
            command: command.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(())
}
