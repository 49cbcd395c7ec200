//! Persistent storage mount
//!
//! The boot mounts the script volume exactly once, before anything looks
//! for scripts. Failure here is the one fatal error in the boot sequence.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("volume '{label}' unavailable at {}", .root.display())]
    Unavailable { root: PathBuf, label: String },

    #[error("mount point {} is not a directory", .root.display())]
    NotADirectory { root: PathBuf },

    #[error("failed to format volume '{label}' at {}", .root.display())]
    Format {
        root: PathBuf,
        label: String,
        #[source]
        source: io::Error,
    },
}

/// Mounts the persistent volume that holds the scripts
pub trait StorageMount {
    fn mount(&mut self, root: &Path, label: &str, format_on_failure: bool) -> Result<(), MountError>;
}

/// Host stand-in for the flash volume: a plain directory
///
/// Mounting succeeds when `root` is an existing directory. A missing
/// directory is created only when formatting on failure is allowed.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectoryMount;

impl StorageMount for DirectoryMount {
    fn mount(&mut self, root: &Path, label: &str, format_on_failure: bool) -> Result<(), MountError> {
        match fs::metadata(root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(MountError::NotADirectory {
                root: root.to_path_buf(),
            }),
            Err(_) if format_on_failure => {
                fs::create_dir_all(root).map_err(|source| MountError::Format {
                    root: root.to_path_buf(),
                    label: label.to_string(),
                    source,
                })?;
                tracing::warn!(root = %root.display(), label, "Formatted storage volume");
                Ok(())
            }
            Err(_) => Err(MountError::Unavailable {
                root: root.to_path_buf(),
                label: label.to_string(),
            }),
        }
    }
}
