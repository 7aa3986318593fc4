//! JSON files on disk, one per key

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::{PersistError, Storage};

/// Directory-backed storage. Writes go to a temp file first and are renamed
/// into place so a crash never leaves a half-written record.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(json) => Ok(Some(json)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path).inspect_err(|_| {
            let _ = fs::remove_file(&tmp);
        })?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{HIGH_SCORE_KEY, HighScoreStore};

    #[test]
    fn test_missing_file_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path());
        assert_eq!(store.load_high_score(), 0);
        assert!(store.read(HIGH_SCORE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_from_fresh_store() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("saves");
        JsonFileStore::new(&nested).save_high_score(1770);

        let mut reopened = JsonFileStore::new(&nested);
        assert_eq!(reopened.load_high_score(), 1770);
        assert!(nested.join("pixel_invaders_highscore.json").exists());
        assert!(!nested.join("pixel_invaders_highscore.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pixel_invaders_highscore.json"), "{oops").unwrap();
        let mut store = JsonFileStore::new(dir.path());
        assert_eq!(store.load_high_score(), 0);
    }

    #[test]
    fn test_failed_rename_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory where the record file should go
        let target = dir.path().join("pixel_invaders_highscore.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("occupied"), "x").unwrap();

        let mut store = JsonFileStore::new(dir.path());
        assert!(store.write(HIGH_SCORE_KEY, r#"{"high_score":5}"#).is_err());
        assert!(!dir.path().join("pixel_invaders_highscore.json.tmp").exists());
    }

    #[test]
    fn test_unwritable_location_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the directory should be
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "x").unwrap();
        let mut store = JsonFileStore::new(&blocker);
        assert!(store.write(HIGH_SCORE_KEY, "{}").is_err());
        store.save_high_score(10);
        assert_eq!(store.load_high_score(), 0);
    }
}
