use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A regular file found directly under the intake root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeEntry {
    pub path: PathBuf,
    pub file_name: OsString,
}

/// Lists the files to relocate, skipping directories, including the dated
/// buckets which live inside the intake root as well.
pub fn list_intake(intake_dir: &Path) -> io::Result<Vec<IntakeEntry>> {
    let mut files = vec![];
    for entry in fs::read_dir(intake_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            debug!("Skipping directory {}", path.display());
            continue;
        }
        files.push(IntakeEntry {
            path,
            file_name: entry.file_name(),
        });
    }
    // Listing order differs between filesystems; sort so logs read the same.
    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_skips_directories() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.txt"), "b").unwrap();
        fs::write(tmp.path().join("a.txt"), "a").unwrap();
        fs::create_dir(tmp.path().join("archive")).unwrap();
        fs::create_dir(tmp.path().join("2024-03-01")).unwrap();
        fs::write(tmp.path().join("archive").join("old.txt"), "old").unwrap();

        let names: Vec<_> = list_intake(tmp.path())
            .unwrap()
            .into_iter()
            .map(|entry| entry.file_name)
            .collect();
        assert_eq!(names, [OsString::from("a.txt"), OsString::from("b.txt")]);
    }

    #[test]
    fn test_list_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(list_intake(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn test_list_missing_dir_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(list_intake(&tmp.path().join("nowhere")).is_err());
    }
}
