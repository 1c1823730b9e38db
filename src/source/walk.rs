use crate::error::SourceError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Result of walking an input path
#[derive(Debug, Default)]
pub struct CollectedFiles {
    /// Regular files to process, sorted
    pub files: Vec<PathBuf>,

    /// Entries below the root that could not be read, in walk order
    pub skipped: Vec<SourceError>,
}

/// Files to process for `path`
///
/// A regular file yields itself. A directory yields every regular file below
/// it, sorted. Symlinked directories are not followed. Unreadable entries
/// below the root are reported in [`CollectedFiles::skipped`]; only an
/// unreadable root is an error.
pub fn collect_files(path: &Path) -> Result<CollectedFiles, SourceError> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SourceError::NotFound(path.to_path_buf()),
        _ => SourceError::io(path, e),
    })?;

    if metadata.is_file() {
        return Ok(CollectedFiles {
            files: vec![path.to_path_buf()],
            skipped: Vec::new(),
        });
    }
    if !metadata.is_dir() {
        return Err(SourceError::NotFound(path.to_path_buf()));
    }

    let mut collected = CollectedFiles::default();
    walk_dir(path, &mut collected).map_err(|e| SourceError::io(path, e))?;
    collected.files.sort();
    Ok(collected)
}

fn walk_dir(dir: &Path, out: &mut CollectedFiles) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                skip(out, dir, e);
                continue;
            }
        };
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                skip(out, &path, e);
                continue;
            }
        };

        if file_type.is_dir() {
            if let Err(e) = walk_dir(&path, out) {
                skip(out, &path, e);
            }
        } else if file_type.is_file() {
            out.files.push(path);
        } else if file_type.is_symlink() {
            match fs::metadata(&path) {
                Ok(target) if target.is_file() => out.files.push(path),
                Ok(_) => {}
                Err(e) => skip(out, &path, e),
            }
        }
    }
    Ok(())
}

fn skip(out: &mut CollectedFiles, path: &Path, error: std::io::Error) {
    warn!(path = %path.display(), error = %error, "skipping unreadable entry");
    out.skipped.push(SourceError::io(path, error));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let collected = collect_files(file.path()).unwrap();
        assert_eq!(collected.files, vec![file.path().to_path_buf()]);
        assert!(collected.skipped.is_empty());
    }

    #[test]
    fn test_directory_is_walked_recursively_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("b/nested")).unwrap();
        fs::write(dir.path().join("z.json"), "{}").unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("b/nested/c.json"), "{}").unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();

        let collected = collect_files(dir.path()).unwrap();
        assert!(collected.skipped.is_empty());
        let relative: Vec<_> = collected
            .files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            relative,
            vec![
                PathBuf::from("a.json"),
                PathBuf::from("b/nested/c.json"),
                PathBuf::from("z.json"),
            ]
        );
    }

    #[test]
    fn test_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_files(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("target.json"), "{}").unwrap();
        std::os::unix::fs::symlink(dir.path().join("target.json"), dir.path().join("link.json"))
            .unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.json"), dir.path().join("dangling.json"))
            .unwrap();

        let collected = collect_files(dir.path()).unwrap();
        assert_eq!(
            collected.files,
            vec![
                dir.path().join("a.json"),
                dir.path().join("link.json"),
                dir.path().join("target.json"),
            ]
        );

        assert_eq!(collected.skipped.len(), 1);
        let skipped = &collected.skipped[0];
        assert!(matches!(skipped, SourceError::Io { .. }));
        assert_eq!(skipped.path(), Some(dir.path().join("dangling.json").as_path()));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_is_reported() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("hidden.json"), "{}").unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not bind a privileged user
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let collected = collect_files(dir.path()).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(collected.files, vec![dir.path().join("a.json")]);
        assert_eq!(collected.skipped.len(), 1);
        assert_eq!(collected.skipped[0].path(), Some(locked.as_path()));
    }
}
