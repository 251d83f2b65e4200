//! Output paths and archive saving.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// File name of a character's archive.
pub fn archive_file_name(character_id: i64) -> String {
    format!("character-{}.zip", character_id)
}

/// Full path the archive of `character_id` is saved to.
pub fn archive_path(output_dir: &Path, character_id: i64) -> PathBuf {
    output_dir.join(archive_file_name(character_id))
}

/// Write a finished archive into `output_dir`, creating it if needed.
pub async fn save_archive(output_dir: &Path, character_id: i64, bytes: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(output_dir).await?;

    let path = archive_path(output_dir, character_id);
    tokio::fs::write(&path, bytes).await?;

    tracing::info!("Saved {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_path() {
        assert_eq!(
            archive_path(Path::new("/downloads"), 52055),
            PathBuf::from("/downloads/character-52055.zip")
        );
    }

    #[tokio::test]
    async fn test_save_archive_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/out");

        let path = save_archive(&target, 7, b"PK").await.unwrap();

        assert_eq!(path, target.join("character-7.zip"));
        assert_eq!(std::fs::read(path).unwrap(), b"PK");
    }
}
