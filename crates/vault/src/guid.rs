//! Per-application GUID persisted as `{app_dir}/guid`.
//!
//! Whatever text a previous build wrote is returned as-is (trimmed). The
//! format is never validated, so identifiers written by other tool versions
//! survive.

use crate::VaultError;
use std::path::Path;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

const GUID_FILE: &str = "guid";

/// Stable identity of an application's packaging artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildIdentity {
    pub application_name: String,
    pub guid: String,
}

/// Returns the GUID stored under `build_dir`, generating and persisting a new
/// one on first use.
///
/// An empty or whitespace-only file counts as absent. `build_dir` is created
/// if it does not exist.
///
/// # Errors
/// `VaultError::IoError` if the file cannot be read or the directory is not
/// writable.
pub async fn get_or_create_guid(
    build_dir: &Path,
    app_name: &str,
) -> Result<BuildIdentity, VaultError> {
    let path = build_dir.join(GUID_FILE);

    match fs::read_to_string(&path).await {
        Ok(stored) if !stored.trim().is_empty() => {
            let stored = stored.trim();
            debug!("reusing guid {} for {}", stored, app_name);
            return Ok(BuildIdentity {
                application_name: app_name.to_string(),
                guid: stored.to_string(),
            });
        }
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    fs::create_dir_all(build_dir).await?;
    let guid = Uuid::new_v4().hyphenated().to_string();
    fs::write(&path, &guid).await?;
    debug!("generated guid {} for {}", guid, app_name);

    Ok(BuildIdentity {
        application_name: app_name.to_string(),
        guid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_reuse() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("vsstudio").join("App1");

        let first = get_or_create_guid(&dir, "App1").await.unwrap();
        assert!(dir.join("guid").exists());
        assert!(Uuid::parse_str(&first.guid).is_ok());
        assert_eq!(first.application_name, "App1");

        let second = get_or_create_guid(&dir, "App1").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_existing_value_preserved_unvalidated() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("guid"), "legacy-id-42\n").unwrap();

        let identity = get_or_create_guid(tmp.path(), "App1").await.unwrap();
        assert_eq!(identity.guid, "legacy-id-42");
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("guid")).unwrap(),
            "legacy-id-42\n"
        );
    }

    #[tokio::test]
    async fn test_blank_file_regenerated() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("guid"), "  \n").unwrap();

        let identity = get_or_create_guid(tmp.path(), "App1").await.unwrap();
        assert!(Uuid::parse_str(&identity.guid).is_ok());
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("guid")).unwrap(),
            identity.guid
        );
    }

    #[tokio::test]
    async fn test_unwritable_location_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        // A regular file where the build directory should be.
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();

        let err = get_or_create_guid(&blocker.join("App1"), "App1").await.unwrap_err();
        assert!(matches!(err, VaultError::IoError(_)));
    }
}
