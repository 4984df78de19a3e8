use std::path::{Path, PathBuf};

use crate::error::{InvokeError, Result};

/// Resolve `path` to an absolute path naming an executable regular file.
///
/// When `path` does not exist and has no extension, the platform executable
/// extension (`exe` on Windows) is tried as well.
pub fn resolve_executable(path: &Path) -> Result<PathBuf> {
    let candidate = with_platform_extension(path);

    let metadata = std::fs::metadata(&candidate).map_err(|err| not_found(path, err.to_string()))?;
    if !metadata.is_file() {
        return Err(not_found(path, "not a regular file"));
    }
    if !is_executable(&metadata) {
        return Err(not_found(path, "file is not executable"));
    }

    std::path::absolute(&candidate).map_err(|err| not_found(path, err.to_string()))
}

fn with_platform_extension(path: &Path) -> PathBuf {
    let ext = std::env::consts::EXE_EXTENSION;
    if ext.is_empty() || path.extension().is_some() || path.exists() {
        return path.to_path_buf();
    }
    path.with_extension(ext)
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &std::fs::Metadata) -> bool {
    true
}

fn not_found(path: &Path, reason: impl Into<String>) -> InvokeError {
    InvokeError::CollaboratorNotFound {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_executable(&dir.path().join("no-such-host")).unwrap_err();
        assert!(matches!(err, InvokeError::CollaboratorNotFound { .. }));
    }

    #[test]
    fn directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_executable(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            InvokeError::CollaboratorNotFound { ref reason, .. } if reason == "not a regular file"
        ));
    }

    #[test]
    #[cfg(unix)]
    fn non_executable_file_is_not_found() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = resolve_executable(file.path()).unwrap_err();
        assert!(matches!(
            err,
            InvokeError::CollaboratorNotFound { ref reason, .. } if reason == "file is not executable"
        ));
    }

    #[test]
    #[cfg(unix)]
    fn executable_resolves_to_absolute_path() {
        let resolved = resolve_executable(Path::new("/bin/sh")).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("sh"));
    }

    #[test]
    #[cfg(unix)]
    fn unix_paths_are_used_verbatim() {
        let path = Path::new("target/release/host");
        assert_eq!(with_platform_extension(path), path);
    }
}
