//! Script discovery
//!
//! Lists a single directory (no recursion) and keeps the entries whose
//! name ends in the script suffix. Anything else, subdirectories included,
//! is skipped without comment. Symlinks are judged by what they point to,
//! and dangling ones are skipped.

use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Order in which discovered scripts are handed back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryOrder {
    /// Sorted by file name bytes; LittleFS enumerates this way, so numeric
    /// prefixes (`00_gpio.rb`, `10_wifi.rb`) control load order
    #[default]
    Lexicographic,
    /// Whatever order the directory listing yields, exactly as the device's
    /// `readdir` loop hands scripts over
    Enumeration,
}

/// The directory could not be opened; callers treat it as empty
#[derive(Debug, thiserror::Error)]
#[error("directory unavailable: {}", .path.display())]
pub struct DiscoveryError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// True iff `name` is longer than `suffix` and ends with it, byte for byte
///
/// With the `.rb` suffix, `ab.rb` matches while `.rb` and `a.RB` do not.
pub fn is_script_name(name: &OsStr, suffix: &str) -> bool {
    let name = name.as_encoded_bytes();
    name.len() > suffix.len() && name.ends_with(suffix.as_bytes())
}

/// Find the script files directly inside `dir`
pub fn discover(dir: &Path, suffix: &str, order: DiscoveryOrder) -> Result<Vec<PathBuf>, DiscoveryError> {
    let entries = fs::read_dir(dir).map_err(|source| DiscoveryError {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut scripts: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            fs::metadata(entry.path())
                .map(|meta| !meta.is_dir())
                .unwrap_or(false)
        })
        .filter(|entry| is_script_name(&entry.file_name(), suffix))
        .map(|entry| dir.join(entry.file_name()))
        .collect();

    if order == DiscoveryOrder::Lexicographic {
        scripts.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    }

    Ok(scripts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn test_script_name_filter() {
        assert!(is_script_name(OsStr::new("ab.rb"), ".rb"));
        assert!(is_script_name(OsStr::new("a.rb"), ".rb"));
        assert!(!is_script_name(OsStr::new(".rb"), ".rb"));
        assert!(!is_script_name(OsStr::new("a.RB"), ".rb"));
        assert!(!is_script_name(OsStr::new("a.rbx"), ".rb"));
        assert!(!is_script_name(OsStr::new("rb"), ".rb"));
        assert!(!is_script_name(OsStr::new(""), ".rb"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_are_compared_bytewise() {
        use std::os::unix::ffi::OsStringExt;

        let name = OsString::from_vec(vec![0xff, b'.', b'r', b'b']);
        assert!(is_script_name(&name, ".rb"));
    }

    #[test]
    fn test_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.rb", "a.rb", ".rb", "c.RB", "notes.txt", "10_late.rb", "00_early.rb"] {
            touch(dir.path(), name);
        }
        fs::create_dir(dir.path().join("nested.rb")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        touch(&dir.path().join("sub"), "deep.rb");

        let found = discover(dir.path(), ".rb", DiscoveryOrder::Lexicographic).unwrap();

        assert_eq!(names(&found), vec!["00_early.rb", "10_late.rb", "a.rb", "b.rb"]);
        assert!(found.iter().all(|p| p.parent() == Some(dir.path())));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_follow_their_target() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        touch(outside.path(), "real.rb");
        symlink(outside.path(), dir.path().join("linked_dir.rb")).unwrap();
        symlink(outside.path().join("real.rb"), dir.path().join("linked_file.rb")).unwrap();
        symlink(outside.path().join("gone.rb"), dir.path().join("dangling.rb")).unwrap();

        let found = discover(dir.path(), ".rb", DiscoveryOrder::Lexicographic).unwrap();

        assert_eq!(names(&found), vec!["linked_file.rb"]);
    }

    #[test]
    fn test_enumeration_order_keeps_same_set() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["z.rb", "m.rb", "a.rb", "skip.py"] {
            touch(dir.path(), name);
        }

        let mut found = names(&discover(dir.path(), ".rb", DiscoveryOrder::Enumeration).unwrap());
        found.sort();

        assert_eq!(found, vec!["a.rb", "m.rb", "z.rb"]);
    }

    #[test]
    fn test_no_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "readme.md");

        let found = discover(dir.path(), ".rb", DiscoveryOrder::default()).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("mrblib");

        let err = discover(&missing, ".rb", DiscoveryOrder::default()).unwrap_err();
        assert_eq!(err.path, missing);
        assert_eq!(err.source.kind(), io::ErrorKind::NotFound);
    }
}
