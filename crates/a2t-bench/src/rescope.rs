//! In-place scope rewriting for hand-maintained benchmark directories.
//!
//! Benchmarks over a single working copy (one `.als`, one `.cfg`) change the
//! scope between runs instead of generating a tree per scope.

use std::fs;
use std::path::{Path, PathBuf};

use regex::{NoExpand, Regex};
use tracing::{debug, info};

use crate::BenchError;

/// Alloy scope of the form `for <k> but 1..steps`.
const ALLOY_SCOPE_PATTERN: &str = r"for\s*\d+\s*but\s*1\s*\.\.\s*steps";

/// Rewrite every `for <k> but 1..steps` scope to `for <n> but 1..steps`.
pub fn rescope_alloy(text: &str, n: usize) -> Result<String, BenchError> {
    let re = Regex::new(ALLOY_SCOPE_PATTERN)?;
    let replacement = format!("for {} but 1..steps", n);
    Ok(re.replace_all(text, NoExpand(&replacement)).into_owned())
}

/// Rewrite `CONSTANT <name> = <k>` to `CONSTANT <name> = <n>`.
pub fn rescope_cfg(text: &str, constant: &str, n: usize) -> Result<String, BenchError> {
    let re = Regex::new(&format!(r"CONSTANT\s+{}\s*=\s*\d+", regex::escape(constant)))?;
    let replacement = format!("CONSTANT {} = {}", constant, n);
    Ok(re.replace_all(text, NoExpand(&replacement)).into_owned())
}

fn rewrite_file(
    path: &Path,
    rewrite: impl FnOnce(&str) -> Result<String, BenchError>,
) -> Result<bool, BenchError> {
    let text = fs::read_to_string(path).map_err(BenchError::io(path))?;
    let rewritten = rewrite(&text)?;
    let changed = rewritten != text;
    if changed {
        fs::write(path, rewritten).map_err(BenchError::io(path))?;
    }
    debug!(path = %path.display(), changed, "rescoped");
    Ok(changed)
}

/// Apply [`rescope_alloy`] to a file. Returns whether the file changed.
pub fn rescope_alloy_file(path: &Path, n: usize) -> Result<bool, BenchError> {
    rewrite_file(path, |text| rescope_alloy(text, n))
}

/// Apply [`rescope_cfg`] to a file. Returns whether the file changed.
pub fn rescope_cfg_file(path: &Path, constant: &str, n: usize) -> Result<bool, BenchError> {
    rewrite_file(path, |text| rescope_cfg(text, constant, n))
}

/// Number of instance directories directly under `root`.
pub fn count_instances(root: &Path) -> Result<usize, BenchError> {
    if !root.exists() {
        return Ok(0);
    }
    let mut count = 0;
    for entry in fs::read_dir(root).map_err(BenchError::io(root))? {
        let entry = entry.map_err(BenchError::io(root))?;
        if entry.path().is_dir() {
            count += 1;
        }
    }
    Ok(count)
}

/// Directory of instance `index` under `root`: `<root>/<root>_<index>`, with
/// or without zero padding.
pub fn instance_dir(root: &Path, index: usize) -> Result<PathBuf, BenchError> {
    let name = root
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| BenchError::MissingFile(root.to_path_buf()))?;

    let plain = root.join(format!("{}_{}", name, index));
    let padded = root.join(format!("{}_{:02}", name, index));
    [plain, padded]
        .into_iter()
        .find(|dir| dir.is_dir())
        .ok_or_else(|| BenchError::MissingFile(root.join(format!("{}_{}", name, index))))
}

/// Copy `file_name` of instance `index` into `dest_dir`, replacing the copy
/// that is there.
pub fn activate_instance(
    root: &Path,
    index: usize,
    file_name: &str,
    dest_dir: &Path,
) -> Result<PathBuf, BenchError> {
    let src = instance_dir(root, index)?.join(file_name);
    if !src.is_file() {
        return Err(BenchError::MissingFile(src));
    }
    let dst = dest_dir.join(file_name);
    fs::copy(&src, &dst).map_err(BenchError::io(&src))?;
    info!("Activated {} as {}", src.display(), dst.display());
    Ok(dst)
}
