//! File-based scan result storage
//!
//! One JSON file per completed job. Results are written once and never
//! mutated; the history and dashboard consumers read them back sorted
//! by finish time.

use std::fs;
use std::path::PathBuf;

use crate::models::ScanResult;

use super::ResultStore;

/// Result store writing one JSON file per job id
#[derive(Debug, Clone)]
pub struct FileResultStore {
    dir: PathBuf,
}

impl FileResultStore {
    /// Create a store rooted at `dir`, creating it if needed
    pub fn new(dir: PathBuf) -> anyhow::Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn result_file(&self, job_id: &str) -> PathBuf {
        self.dir.join(format!("{job_id}.json"))
    }

    fn load_dir(&self) -> anyhow::Result<Vec<ScanResult>> {
        let mut results = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_none_or(|e| e != "json") {
                continue;
            }
            let content = fs::read_to_string(&path)?;
            match serde_json::from_str::<ScanResult>(&content) {
                Ok(result) => results.push(result),
                Err(e) => {
                    log::warn!("Skipping unreadable result {}: {e}", path.display());
                },
            }
        }
        Ok(results)
    }
}

impl ResultStore for FileResultStore {
    fn save(&self, result: &ScanResult) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(result)?;
        fs::write(self.result_file(&result.job_id), content)?;
        Ok(())
    }

    fn load(&self, job_id: &str) -> anyhow::Result<Option<ScanResult>> {
        let path = self.result_file(job_id);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn for_repository(&self, repository: &str) -> anyhow::Result<Vec<ScanResult>> {
        let mut results: Vec<ScanResult> = self
            .load_dir()?
            .into_iter()
            .filter(|r| r.repository.eq_ignore_ascii_case(repository))
            .collect();
        results.sort_by(|a, b| b.finished_at.cmp(&a.finished_at));
        Ok(results)
    }

    fn load_all(&self) -> anyhow::Result<Vec<ScanResult>> {
        self.load_dir()
    }
}
