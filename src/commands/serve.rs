//! `prescan serve` - run the webhook server and scan workers

use std::path::Path;
use std::sync::Arc;

use crate::api::AppState;
use crate::config::Config;
use crate::forge::GithubClient;
use crate::paths;
use crate::pipeline::Pipeline;
use crate::policy::PolicyStore;
use crate::queue::JobQueue;
use crate::scanner::ScanossScanner;
use crate::server;
use crate::storage::{FileJobStore, FileResultStore};

/// Wire the service together and serve until the process exits
pub fn serve(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = Config::load(config_path)?;
    let state_dir = config.effective_state_dir();
    log::info!("State directory: {}", state_dir.display());

    let policy = Arc::new(match &config.policy_file {
        Some(path) => PolicyStore::load(path)?,
        None => PolicyStore::builtin(),
    });
    log::info!("Policy loaded: {} licenses", policy.len());

    let job_store = FileJobStore::new(paths::jobs_dir(&state_dir))?;
    let queue = Arc::new(JobQueue::open(Box::new(job_store), config.max_attempts)?);
    let results = Arc::new(FileResultStore::new(paths::results_dir(&state_dir))?);
    let forge = Arc::new(GithubClient::new(&config, &state_dir)?);
    let scanner = Arc::new(ScanossScanner::new(
        config.scanner_command.clone(),
        config.scanner_timeout_secs,
        paths::reports_dir(&state_dir),
    ));

    let pipeline = Arc::new(Pipeline::new(
        Arc::clone(&queue),
        scanner,
        forge,
        results.clone(),
        Arc::clone(&policy),
        config.effective_workers(),
        config.result_url_base.clone(),
    ));
    let workers = pipeline.start();

    let state = Arc::new(AppState {
        queue,
        results,
        policy,
        page_size: config.page_size,
    });

    // Blocks for the lifetime of the process; the error path still
    // drains the workers so in-flight scans reach a terminal state.
    let served = server::tiny_http::serve(&config.bind, &state);

    pipeline.shutdown();
    for handle in workers {
        let _ = handle.join();
    }
    served
}
