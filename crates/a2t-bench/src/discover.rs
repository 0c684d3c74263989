//! Discovery of generated configuration trees.
//!
//! ```text
//! <base>/config_<stem>_n<NN>/           one root per scope
//!     <stem>.als                        scoped Alloy specification
//!     config_<stem>_n<NN>_<i>/          one TLC configuration each
//!         <Module>.cfg, <Module>.tla, ...
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Prefix shared by configuration roots and their sub-configurations.
pub const CONFIG_DIR_PREFIX: &str = "config_";

/// Sorted names of the `config_*` directories directly under `base`.
pub fn find_config_directories(base: &Path) -> io::Result<Vec<String>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(base)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if name.starts_with(CONFIG_DIR_PREFIX) {
                dirs.push(name.to_string());
            }
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Scope from a root name: `config_Echo_n03` → 3.
pub fn parse_scope(dir_name: &str) -> Option<usize> {
    let (_, last) = dir_name.rsplit_once('_')?;
    last.strip_prefix('n')?.parse().ok()
}

/// Sorted names of the files in `dir` with the given extension.
fn files_with_extension(dir: &Path, extension: &str) -> io::Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(extension) {
            if let Some(name) = entry.file_name().to_str() {
                files.push(name.to_string());
            }
        }
    }
    files.sort();
    Ok(files)
}

/// First `.als` file in `dir`.
pub fn find_als_file(dir: &Path) -> io::Result<Option<String>> {
    Ok(files_with_extension(dir, "als")?.into_iter().next())
}

/// TLC input of a sub-configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlcInput {
    /// Module file, named after the `.cfg` file
    pub tla_file: String,
    pub cfg_file: String,
}

/// The first `.cfg` file in `dir` and the `.tla` module of the same stem.
pub fn find_tlc_input(dir: &Path) -> io::Result<Option<TlcInput>> {
    let Some(cfg_file) = files_with_extension(dir, "cfg")?.into_iter().next() else {
        return Ok(None);
    };
    let stem = cfg_file.trim_end_matches(".cfg");
    Ok(Some(TlcInput {
        tla_file: format!("{}.tla", stem),
        cfg_file,
    }))
}

/// One configuration root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRoot {
    pub path: PathBuf,
    pub name: String,
    pub n: usize,
}

/// Every configuration root under `base` whose name carries a scope.
pub fn discover_roots(base: &Path) -> io::Result<Vec<ConfigRoot>> {
    Ok(find_config_directories(base)?
        .into_iter()
        .filter_map(|name| {
            let n = parse_scope(&name)?;
            Some(ConfigRoot {
                path: base.join(&name),
                name,
                n,
            })
        })
        .collect())
}
