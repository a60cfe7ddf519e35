use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Resolve `-i` to the JavaScript files it names: a single file, every `.js`
/// file under a directory, or the files matching a glob pattern.
pub fn resolve_inputs(input: &str, cwd: &str) -> Result<Vec<PathBuf>> {
    let path = Path::new(cwd).join(input);

    let mut files = if path.is_file() {
        vec![path]
    } else if path.is_dir() {
        find_js_files(&path)
    } else {
        let pattern = path.to_string_lossy().into_owned();
        glob::glob(&pattern)
            .map_err(|e| anyhow!("Invalid input pattern '{}': {}", input, e))?
            .filter_map(|entry| entry.ok())
            .filter(|path| path.is_file())
            .collect()
    };

    if files.is_empty() {
        return Err(anyhow!("No files found matching the input pattern: {}", input));
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn find_js_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("js"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn workspace() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/nested")).unwrap();
        fs::write(dir.path().join("src/a.js"), "let a = 1;").unwrap();
        fs::write(dir.path().join("src/b.js"), "let b = 2;").unwrap();
        fs::write(dir.path().join("src/notes.txt"), "skip").unwrap();
        fs::write(dir.path().join("src/nested/c.js"), "let c = 3;").unwrap();
        dir
    }

    #[test]
    fn test_resolve_single_file() {
        let dir = workspace();
        let cwd = dir.path().display().to_string();

        let files = resolve_inputs("src/a.js", &cwd).unwrap();
        assert_eq!(files, vec![dir.path().join("src/a.js")]);
    }

    #[test]
    fn test_resolve_directory_recursively() {
        let dir = workspace();
        let cwd = dir.path().display().to_string();

        let files = resolve_inputs("src", &cwd).unwrap();
        assert_eq!(
            files,
            vec![
                dir.path().join("src/a.js"),
                dir.path().join("src/b.js"),
                dir.path().join("src/nested/c.js"),
            ]
        );
    }

    #[test]
    fn test_resolve_glob() {
        let dir = workspace();
        let cwd = dir.path().display().to_string();

        let files = resolve_inputs("src/*.js", &cwd).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("src/a.js"), dir.path().join("src/b.js")]
        );
    }

    #[test]
    fn test_no_matches_is_an_error() {
        let dir = workspace();
        let cwd = dir.path().display().to_string();

        let err = resolve_inputs("lib/*.js", &cwd).unwrap_err();
        assert!(err.to_string().contains("No files found"));
    }
}
