//! Persistent storage
//!
//! This module handles persistence of the performance preference record.

pub mod preferences;

use directories::ProjectDirs;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing persisted state
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not determine a per-user data directory")]
    DataDirUnavailable,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Get the per-user data directory, creating it if necessary
pub fn get_data_dir() -> Result<PathBuf, StorageError> {
    let dirs = ProjectDirs::from("", "", "wraplite").ok_or(StorageError::DataDirUnavailable)?;
    let dir = dirs.data_dir().to_path_buf();
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
