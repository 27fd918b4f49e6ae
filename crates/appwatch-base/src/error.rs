//! Error types for appwatch-base

use std::path::PathBuf;

/// Link base errors
#[derive(Debug, thiserror::Error)]
pub enum LinkBaseError {
    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),
}
