//! File-based job storage
//!
//! One JSON file per job under the jobs directory. Good enough for the
//! audit-trail requirement: records are small, written rarely, and
//! reloaded only at startup.

use std::fs;
use std::path::PathBuf;

use crate::models::ScanJob;

use super::JobStore;

/// Job store writing one JSON file per job
#[derive(Debug, Clone)]
pub struct FileJobStore {
    dir: PathBuf,
}

impl FileJobStore {
    /// Create a store rooted at `dir`, creating it if needed
    pub fn new(dir: PathBuf) -> anyhow::Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn job_file(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

impl JobStore for FileJobStore {
    fn save(&self, job: &ScanJob) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(job)?;
        fs::write(self.job_file(&job.id), content)?;
        Ok(())
    }

    fn load_all(&self) -> anyhow::Result<Vec<ScanJob>> {
        let mut jobs = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_none_or(|e| e != "json") {
                continue;
            }
            let content = fs::read_to_string(&path)?;
            match serde_json::from_str::<ScanJob>(&content) {
                Ok(job) => jobs.push(job),
                Err(e) => {
                    log::warn!("Skipping unreadable job record {}: {e}", path.display());
                },
            }
        }
        Ok(jobs)
    }
}
