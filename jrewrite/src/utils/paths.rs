//! Path utilities: display normalization and Java file discovery.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::constants::{DEFAULT_EXCLUDE_FOLDERS, JAVA_EXTENSION};

/// Normalizes a path for CLI display.
///
/// - Converts backslashes to forward slashes
/// - Strips a leading "./" prefix
///
/// # Examples
/// ```
/// use std::path::Path;
/// use jrewrite::utils::normalize_display_path;
///
/// assert_eq!(normalize_display_path(Path::new(".\\src\\A.java")), "src/A.java");
/// assert_eq!(normalize_display_path(Path::new("./src/Main.java")), "src/Main.java");
/// ```
#[must_use]
pub fn normalize_display_path(path: &Path) -> String {
    let s = path.to_string_lossy();
    let clean = s.trim_start_matches(r"\\?\");
    let normalized = clean.replace('\\', "/");
    normalized
        .strip_prefix("./")
        .unwrap_or(&normalized)
        .to_owned()
}

/// Checks if a name matches any exclusion pattern.
/// Supports exact matching and wildcard patterns starting with `*.`.
#[must_use]
pub fn is_excluded(name: &str, excludes: &[String]) -> bool {
    excludes.iter().any(|exclude| match exclude.strip_prefix('*') {
        Some(suffix) if suffix.starts_with('.') => name.ends_with(suffix),
        _ => name == exclude,
    })
}

/// Whether `path` names a Java source file.
#[must_use]
pub fn is_java_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == JAVA_EXTENSION)
}

/// Collects Java files below `root`, respecting `.gitignore` files.
///
/// The default excluded folders (build outputs, VCS and IDE metadata) are
/// skipped together with `exclude`; a folder listed in `include` is walked
/// even when excluded. A `root` that is itself a file is returned as is
/// when it is a Java file. Files come back sorted.
///
/// Returns the files and the number of directories walked.
#[must_use]
pub fn collect_java_files(
    root: &Path,
    exclude: &[String],
    include: &[String],
    verbose: bool,
) -> (Vec<PathBuf>, usize) {
    use ignore::WalkBuilder;

    if root.is_file() {
        let files = if is_java_file(root) {
            vec![root.to_path_buf()]
        } else {
            Vec::new()
        };
        return (files, 0);
    }

    let mut all_excludes: Vec<String> = exclude
        .iter()
        .cloned()
        .chain(DEFAULT_EXCLUDE_FOLDERS().iter().map(|&s| s.to_owned()))
        .collect();
    all_excludes.retain(|ex| !include.iter().any(|inc| ex == inc));

    let root_for_filter = root.to_path_buf();
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        // Outside a git checkout .gitignore files still apply.
        .require_git(false)
        .filter_entry(move |entry| {
            if entry.path() == root_for_filter {
                return true;
            }
            if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                return true;
            }
            entry
                .file_name()
                .to_str()
                .is_none_or(|name| !is_excluded(name, &all_excludes))
        })
        .build();

    let mut files = Vec::new();
    let mut dir_count = 0;
    for result in walker {
        match result {
            Ok(entry) => {
                let path = entry.path();
                if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                    if path != root {
                        dir_count += 1;
                    }
                    continue;
                }
                if is_java_file(path) {
                    files.push(path.to_path_buf());
                }
            }
            Err(err) => {
                if verbose {
                    eprintln!("Walk error: {err}");
                }
                debug!(error = %err, "walk error");
            }
        }
    }
    files.sort();
    (files, dir_count)
}

/// Where the rewritten form of `file` goes below `out_dir`.
///
/// The path is taken relative to `input_root`; for a single-file input
/// only the file name is kept.
#[must_use]
pub fn output_path(file: &Path, input_root: &Path, out_dir: &Path) -> PathBuf {
    let relative = file
        .strip_prefix(input_root)
        .ok()
        .filter(|rel| !rel.as_os_str().is_empty())
        .map_or_else(
            || file.file_name().map_or_else(PathBuf::new, PathBuf::from),
            Path::to_path_buf,
        );
    out_dir.join(relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_is_excluded() {
        let excludes = vec!["target".to_owned(), "*.bak".to_owned()];
        assert!(is_excluded("target", &excludes));
        assert!(is_excluded("old.bak", &excludes));
        assert!(!is_excluded("targets", &excludes));
        assert!(!is_excluded("src", &excludes));
    }

    #[test]
    fn test_collect_java_files() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let root = temp.path();
        fs::create_dir_all(root.join("src/main/java/p"))?;
        fs::create_dir_all(root.join("target/classes"))?;
        fs::create_dir_all(root.join("generated"))?;
        fs::write(root.join("src/main/java/p/A.java"), "class A {}")?;
        fs::write(root.join("src/main/java/p/notes.txt"), "")?;
        fs::write(root.join("target/classes/B.java"), "class B {}")?;
        fs::write(root.join("generated/C.java"), "class C {}")?;

        let (files, _) = collect_java_files(root, &["generated".to_owned()], &[], false);
        assert_eq!(files, vec![root.join("src/main/java/p/A.java")]);

        let (files, _) = collect_java_files(root, &[], &["target".to_owned()], false);
        assert_eq!(files.len(), 3);
        Ok(())
    }

    #[test]
    fn test_collect_respects_gitignore() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let root = temp.path();
        fs::write(root.join(".gitignore"), "Skipped.java\n")?;
        fs::write(root.join("Kept.java"), "class Kept {}")?;
        fs::write(root.join("Skipped.java"), "class Skipped {}")?;

        let (files, _) = collect_java_files(root, &[], &[], false);
        assert_eq!(files, vec![root.join("Kept.java")]);
        Ok(())
    }

    #[test]
    fn test_single_file_root() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let file = temp.path().join("A.java");
        fs::write(&file, "class A {}")?;
        assert_eq!(collect_java_files(&file, &[], &[], false).0, vec![file]);
        Ok(())
    }

    #[test]
    fn test_output_path() {
        let out = Path::new("/out");
        assert_eq!(
            output_path(Path::new("/src/p/A.java"), Path::new("/src"), out),
            PathBuf::from("/out/p/A.java")
        );
        assert_eq!(
            output_path(Path::new("/src/A.java"), Path::new("/src/A.java"), out),
            PathBuf::from("/out/A.java")
        );
    }
}
