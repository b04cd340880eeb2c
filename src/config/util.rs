//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /home/user/novel/chapters/  ← cwd
/// /home/user/novel/incompat.toml  ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    find_upward(&cwd, config_name)
}

/// Walk up from `start` looking for `config_name`.
fn find_upward(start: &Path, config_name: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_upward_from_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("chapters").join("one");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("incompat.toml"), "").unwrap();

        let found = find_upward(&nested, Path::new("incompat.toml")).unwrap();
        assert_eq!(found, dir.path().join("incompat.toml"));
    }

    #[test]
    fn test_find_upward_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("chapters");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("incompat.toml"), "").unwrap();
        fs::write(nested.join("incompat.toml"), "").unwrap();

        let found = find_upward(&nested, Path::new("incompat.toml")).unwrap();
        assert_eq!(found, nested.join("incompat.toml"));
    }

    #[test]
    fn test_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        assert_eq!(find_config_file(&path), None);

        fs::write(&path, "").unwrap();
        assert_eq!(find_config_file(&path), Some(path));
    }
}
