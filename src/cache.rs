use std::fs;
use std::path::{Path, PathBuf};

use blake3::Hasher;
use serde::{Deserialize, Serialize};

use crate::config::config_directory;
use crate::error::{AppError, AppResult};

const LEDGER_FILE_NAME: &str = "processed_commits.json";
const LEDGER_LIMIT: usize = 256;

#[derive(Default, Serialize, Deserialize)]
struct LedgerFile {
    entries: Vec<String>,
}

/// Commits that were already applied, so a redelivered push is a no-op.
pub struct ProcessedCommits {
    file_path: PathBuf,
    file: LedgerFile,
}

impl ProcessedCommits {
    pub fn load() -> AppResult<Self> {
        Self::load_from(config_directory()?.join(LEDGER_FILE_NAME))
    }

    pub(crate) fn load_from(path: PathBuf) -> AppResult<Self> {
        let file = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str::<LedgerFile>(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid commit ledger {}: {err}", path.display()))
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => LedgerFile::default(),
            Err(err) => return Err(AppError::Io(err)),
        };

        Ok(Self {
            file_path: path,
            file,
        })
    }

    pub fn contains(&self, repository: &str, commit_id: &str) -> bool {
        let key = Self::compute_key(repository, commit_id);
        self.file.entries.iter().any(|entry| *entry == key)
    }

    pub fn insert(&mut self, repository: &str, commit_id: &str) {
        let key = Self::compute_key(repository, commit_id);
        self.file.entries.retain(|entry| *entry != key);
        self.file.entries.push(key);

        if self.file.entries.len() > LEDGER_LIMIT {
            let overflow = self.file.entries.len() - LEDGER_LIMIT;
            self.file.entries.drain(0..overflow);
        }
    }

    pub fn save(&self) -> AppResult<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(&self.file)
            .map_err(|err| AppError::Configuration(format!("failed to write commit ledger: {err}")))?;
        fs::write(&self.file_path, data)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn compute_key(repository: &str, commit_id: &str) -> String {
        let mut hasher = Hasher::new();
        hasher.update(repository.as_bytes());
        hasher.update(b"\0");
        hasher.update(commit_id.as_bytes());
        hasher.finalize().to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remembers_commits_across_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LEDGER_FILE_NAME);

        let mut ledger = ProcessedCommits::load_from(path.clone()).unwrap();
        assert!(!ledger.contains("app", "c1"));
        ledger.insert("app", "c1");
        ledger.save().unwrap();

        let reloaded = ProcessedCommits::load_from(path).unwrap();
        assert!(reloaded.contains("app", "c1"));
        assert!(!reloaded.contains("other", "c1"));
    }

    #[test]
    fn drops_oldest_entries_past_limit() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ProcessedCommits::load_from(dir.path().join(LEDGER_FILE_NAME)).unwrap();
        for n in 0..=LEDGER_LIMIT {
            ledger.insert("app", &n.to_string());
        }
        assert!(!ledger.contains("app", "0"));
        assert!(ledger.contains("app", &LEDGER_LIMIT.to_string()));
    }
}
