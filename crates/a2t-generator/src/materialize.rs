//! Numbered configuration directories.
//!
//! Each rendered configuration gets its own directory
//! `<base>/<base-name>_<index>` holding copies of the support files the model
//! checker needs (specification modules, `.cfg` files) plus the generated file.
//!
//! Copies never clobber: an item that already exists at the destination is
//! left as it is.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// How the index is rendered in directory names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexStyle {
    /// `base_01`, `base_02`, ...
    #[default]
    Padded,
    /// `base_1`, `base_2`, ...
    Plain,
}

impl IndexStyle {
    pub fn directory_name(self, base_name: &str, index: usize) -> String {
        match self {
            IndexStyle::Padded => format!("{}_{:02}", base_name, index),
            IndexStyle::Plain => format!("{}_{}", base_name, index),
        }
    }
}

/// Materialization errors.
#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("configuration indices start at 1")]
    ZeroIndex,

    #[error("base directory {0} has no usable name")]
    InvalidBase(PathBuf),

    #[error("support file {0} does not exist")]
    MissingSource(PathBuf),

    #[error("I/O error at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> MaterializeError + '_ {
    move |source| MaterializeError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Creates indexed configuration directories under one base directory.
#[derive(Debug, Clone)]
pub struct Materializer {
    base_dir: PathBuf,
    source_dir: PathBuf,
    style: IndexStyle,
}

impl Materializer {
    /// Directories go under `base_dir`; support files are copied from `source_dir`.
    pub fn new(base_dir: impl Into<PathBuf>, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            source_dir: source_dir.into(),
            style: IndexStyle::default(),
        }
    }

    pub fn with_style(mut self, style: IndexStyle) -> Self {
        self.style = style;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn base_name(&self) -> Result<&str, MaterializeError> {
        self.base_dir
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| MaterializeError::InvalidBase(self.base_dir.clone()))
    }

    /// Path of the directory for `index`, without creating it.
    pub fn directory(&self, index: usize) -> Result<PathBuf, MaterializeError> {
        if index == 0 {
            return Err(MaterializeError::ZeroIndex);
        }
        let name = self.style.directory_name(self.base_name()?, index);
        Ok(self.base_dir.join(name))
    }

    /// Create the directory for `index` and copy `copy_list` into it.
    pub fn materialize(&self, index: usize, copy_list: &[&str]) -> Result<PathBuf, MaterializeError> {
        let dir = self.directory(index)?;
        fs::create_dir_all(&dir).map_err(io_error(&dir))?;

        for item in copy_list {
            let src = self.source_dir.join(item);
            let dst = dir.join(item);
            if !src.exists() {
                return Err(MaterializeError::MissingSource(src));
            }
            if copy_item(&src, &dst).map_err(io_error(&src))? {
                debug!(item, dir = %dir.display(), "copied support file");
            } else {
                debug!(item, dir = %dir.display(), "support file already present, kept");
            }
        }

        Ok(dir)
    }
}

/// Copy a file or a directory tree. Returns `false` if `dst` already existed.
pub fn copy_item(src: &Path, dst: &Path) -> io::Result<bool> {
    if dst.exists() {
        return Ok(false);
    }
    if src.is_dir() {
        copy_dir(src, dst)?;
    } else {
        fs::copy(src, dst)?;
    }
    Ok(true)
}

fn copy_dir(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else if !target.exists() {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Write a generated configuration file into `dir`.
pub fn write_config(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf, MaterializeError> {
    let path = dir.join(file_name);
    fs::write(&path, contents).map_err(io_error(&path))?;
    Ok(path)
}
