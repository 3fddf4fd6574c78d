//! Filesystem utilities.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Make a directory readable and writable by every user.
///
/// The download cache is shared with build containers that run as a
/// different user. No-op on non-unix platforms.
#[cfg(unix)]
pub fn make_world_writable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o777))
        .with_context(|| format!("failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
pub fn make_world_writable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_dir_nested() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("a").join("b");

        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());

        // Idempotent
        ensure_dir(&dir).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_make_world_writable() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("cache");
        ensure_dir(&dir).unwrap();

        make_world_writable(&dir).unwrap();
        let mode = fs::metadata(&dir).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o777);
    }
}
