//! Thin helpers around `std::path` and `std::fs` used by the downloader and the cli.
use std::{
    fs, io,
    path::{Path, PathBuf},
};

const SEPARATORS: &[char] = &['/', '\\'];

#[inline]
pub fn exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

#[inline]
pub fn is_dir(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_dir()
}

/// Returns `true` only for regular files (or symlinks pointing to one).
#[inline]
pub fn is_file(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_file()
}

/// Returns the last non-empty `/`-separated segment of a path or URL.
///
/// Trailing slashes are ignored, so `http://host/dir/` yields `dir`. Returns an empty
/// string when there is no segment at all.
///
/// ```
/// use bulkfetch_common::file_ops::get_basename;
///
/// assert_eq!(get_basename("https://example.com/files/a.bin"), "a.bin");
/// assert_eq!(get_basename("relative/dir/"), "dir");
/// ```
pub fn get_basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches(SEPARATORS);
    trimmed
        .rsplit(SEPARATORS)
        .next()
        .unwrap_or_default()
}

/// File name without its last extension.
pub fn get_filename(path: impl AsRef<Path>) -> Option<String> {
    path.as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
}

/// Last extension of a file, including the leading period.
pub fn get_file_ext(path: impl AsRef<Path>) -> Option<String> {
    path.as_ref()
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
}

/// File size in bytes.
#[inline]
pub fn get_file_size(path: impl AsRef<Path>) -> Result<u64, io::Error> {
    Ok(fs::metadata(path)?.len())
}

/// Creates `dir` and all of its missing parents.
///
/// Returns `Ok(true)` when something was created and `Ok(false)` when the directory was
/// already there. Fails if the path exists but is not a directory.
pub fn create_dir(dir: impl AsRef<Path>) -> Result<bool, io::Error> {
    let dir = dir.as_ref();
    if dir.is_dir() {
        return Ok(false);
    }

    fs::create_dir_all(dir)?;
    Ok(true)
}

/// Removes a regular file if it exists. Returns whether something was removed.
pub fn remove_file(path: impl AsRef<Path>) -> Result<bool, io::Error> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(false);
    }

    if !path.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a regular file", path.display()),
        ));
    }

    fs::remove_file(path)?;
    Ok(true)
}

/// Lists the entries under `dir`.
///
/// With `exts` set only files whose extension (leading period included) is in the list are
/// returned and directories are left out. `recursive` descends into subdirectories.
pub fn list_files(
    dir: impl AsRef<Path>,
    exts: Option<&[&str]>,
    case_insensitive: bool,
    recursive: bool,
) -> Result<Vec<PathBuf>, io::Error> {
    let mut found = Vec::new();
    walk(dir.as_ref(), exts, case_insensitive, recursive, &mut found)?;
    Ok(found)
}

fn walk(
    dir: &Path,
    exts: Option<&[&str]>,
    case_insensitive: bool,
    recursive: bool,
    found: &mut Vec<PathBuf>,
) -> Result<(), io::Error> {
    for entry in fs::read_dir(dir)? {
        let child = entry?.path();

        if child.is_file() {
            match exts {
                Some(exts) => {
                    let Some(ext) = get_file_ext(&child) else {
                        continue;
                    };
                    let matched = exts.iter().any(|e| {
                        if case_insensitive {
                            e.eq_ignore_ascii_case(&ext)
                        } else {
                            *e == ext
                        }
                    });
                    if matched {
                        found.push(child);
                    }
                }
                None => found.push(child),
            }
        } else if child.is_dir() {
            if exts.is_none() {
                found.push(child.clone());
            }
            if recursive {
                walk(&child, exts, case_insensitive, recursive, found)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn basename_of_urls() {
        assert_eq!(get_basename("http://x/a.bin"), "a.bin");
        assert_eq!(get_basename("http://x/dir/"), "dir");
        assert_eq!(get_basename("a.bin"), "a.bin");
        assert_eq!(get_basename("http://x/a.bin?token=1"), "a.bin?token=1");
        assert_eq!(get_basename("/"), "");
    }

    #[test]
    fn extensions_and_stems() {
        assert_eq!(get_file_ext("archive.tar.gz").as_deref(), Some(".gz"));
        assert_eq!(get_file_ext("README"), None);
        assert_eq!(get_filename("dir/photo.jpg").as_deref(), Some("photo"));
    }

    #[test]
    fn create_dir_is_idempotent() {
        let tmp = tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");

        assert!(create_dir(&nested).unwrap());
        assert!(!create_dir(&nested).unwrap());
        assert!(is_dir(&nested));
    }

    #[test]
    fn create_dir_over_file_fails() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("taken");
        fs::write(&file, b"x").unwrap();

        assert!(create_dir(&file).is_err());
    }

    #[test]
    fn remove_file_reports_removal() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("gone.txt");
        fs::write(&file, b"bye").unwrap();

        assert!(remove_file(&file).unwrap());
        assert!(!remove_file(&file).unwrap());
        assert!(remove_file(tmp.path()).is_err());
    }

    #[test]
    fn list_files_filters_by_extension() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("a.JPG"), b"").unwrap();
        fs::write(tmp.path().join("b.png"), b"").unwrap();
        create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub").join("c.jpg"), b"").unwrap();

        let flat = list_files(tmp.path(), Some(&[".jpg"][..]), true, false).unwrap();
        assert_eq!(flat.len(), 1);

        let deep = list_files(tmp.path(), Some(&[".jpg"][..]), true, true).unwrap();
        assert_eq!(deep.len(), 2);

        let strict = list_files(tmp.path(), Some(&[".jpg"][..]), false, true).unwrap();
        assert_eq!(strict.len(), 1);

        let everything = list_files(tmp.path(), None, false, false).unwrap();
        assert_eq!(everything.len(), 3);
        assert_eq!(get_file_size(tmp.path().join("b.png")).unwrap(), 0);
    }
}
