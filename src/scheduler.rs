use console::style;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};
use tracing::{error, warn};
use walkdir::WalkDir;

use crate::filter::{Disposition, classify};
use crate::keymap::{UploadMode, directory_key, single_file_key};
use crate::s3::{Uploader, resolve_metadata};

pub const DEFAULT_WORKERS: usize = 10;

/// One file to transfer. Built during the walk, consumed exactly once by a
/// worker.
#[derive(Debug, Clone)]
pub struct UploadTask {
    pub local_path: PathBuf,
    pub remote_key: String,
}

/// Shared outcome counters for one run. Workers increment these inside the
/// mutex so the running counts in the log lines stay consistent.
#[derive(Debug, Default)]
pub struct TransferTally {
    pub uploaded: usize,
    pub failed: usize,
}

/// Fatal scheduling errors. Raised before any task is created; everything
/// after that point is tallied per file instead.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("source path does not exist: {0}")]
    SourceNotFound(PathBuf),
    #[error("unsupported path type (not a file or directory): {0}")]
    UnsupportedPathType(PathBuf),
}

struct UploadPlan {
    tasks: Vec<UploadTask>,
    excluded: Vec<PathBuf>,
    warned: Vec<PathBuf>,
}

/// Upload a file or directory tree and report whether every attempted
/// transfer succeeded. Elapsed time is printed on every outcome.
pub async fn run_upload(
    uploader: Arc<dyn Uploader>,
    source: &Path,
    dest: &str,
    mode: UploadMode,
    workers: usize,
) -> Result<bool, ScheduleError> {
    let start = Instant::now();
    let outcome = dispatch(uploader, source, dest, mode, workers).await;
    println!(
        "{}",
        style(format!("Time: {:.2}s", start.elapsed().as_secs_f64())).dim()
    );
    outcome
}

async fn dispatch(
    uploader: Arc<dyn Uploader>,
    source: &Path,
    dest: &str,
    mode: UploadMode,
    workers: usize,
) -> Result<bool, ScheduleError> {
    if !source.exists() {
        return Err(ScheduleError::SourceNotFound(source.to_path_buf()));
    }

    if source.is_file() {
        Ok(upload_single(uploader, source, dest).await)
    } else if source.is_dir() {
        Ok(upload_directory(uploader, source, dest, mode, workers).await)
    } else {
        Err(ScheduleError::UnsupportedPathType(source.to_path_buf()))
    }
}

/// Single-file source: no pool, one synchronous transfer.
async fn upload_single(uploader: Arc<dyn Uploader>, file: &Path, dest: &str) -> bool {
    match classify(file) {
        Disposition::Exclude => {
            // Nothing was uploaded, so the run as a whole did not succeed.
            println!(
                "{} {}",
                style("excluded .DS_Store file:").yellow(),
                file.display()
            );
            return false;
        }
        Disposition::Warn => print_hidden_file_warning(&[file.to_path_buf()]),
        Disposition::Include => {}
    }

    let remote_key = match single_file_key(file, dest) {
        Ok(key) => key,
        Err(e) => {
            error!("cannot map {} to a remote key: {e:#}", file.display());
            return false;
        }
    };

    println!("Uploading {} → {}", file.display(), remote_key);

    let task = UploadTask {
        local_path: file.to_path_buf(),
        remote_key,
    };
    let tally = Mutex::new(TransferTally::default());
    upload_one(&*uploader, &task, &tally).await;

    tally.lock().await.failed == 0
}

/// Directory source: walk, filter, then drain the task list through the
/// worker pool.
async fn upload_directory(
    uploader: Arc<dyn Uploader>,
    root: &Path,
    dest: &str,
    mode: UploadMode,
    workers: usize,
) -> bool {
    println!(
        "{}",
        style(format!("Uploading directory {} → /{}", root.display(), dest.trim_matches('/')))
            .cyan()
            .bold()
    );
    println!("{}", style(format!("Mode: {mode}")).dim());
    println!(
        "{}",
        style(format!("Concurrent uploads: up to {workers}")).dim()
    );

    let plan = plan_directory(root, dest, mode);

    if !plan.excluded.is_empty() {
        println!(
            "{}",
            style(format!(
                "Excluded {} .DS_Store file(s)",
                plan.excluded.len()
            ))
            .yellow()
        );
    }
    if !plan.warned.is_empty() {
        print_hidden_file_warning(&plan.warned);
    }

    println!("Found {} file(s) to upload", plan.tasks.len());

    if plan.tasks.is_empty() {
        println!("Nothing to upload");
        return true;
    }

    let tally = Arc::new(Mutex::new(TransferTally::default()));

    if plan.tasks.len() == 1 {
        // Not worth spinning up the pool for one file.
        upload_one(&*uploader, &plan.tasks[0], &tally).await;
    } else {
        drain_pool(uploader, plan.tasks, workers, Arc::clone(&tally)).await;
    }

    let tally = tally.lock().await;
    println!(
        "{}",
        style(format!(
            "Summary: {} uploaded, {} failed",
            tally.uploaded, tally.failed
        ))
        .bold()
    );
    tally.failed == 0
}

/// Walk the tree and turn every eligible file into a task. Task order
/// follows walk order; completion order is up to the network.
fn plan_directory(root: &Path, dest: &str, mode: UploadMode) -> UploadPlan {
    let mut tasks = Vec::new();
    let mut excluded = Vec::new();
    let mut warned = Vec::new();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        match classify(path) {
            Disposition::Exclude => {
                excluded.push(path.to_path_buf());
                continue;
            }
            Disposition::Warn => warned.push(path.to_path_buf()),
            Disposition::Include => {}
        }

        match directory_key(path, root, dest, mode) {
            Ok(remote_key) => tasks.push(UploadTask {
                local_path: path.to_path_buf(),
                remote_key,
            }),
            Err(e) => warn!("skipping {}: {e:#}", path.display()),
        }
    }

    UploadPlan {
        tasks,
        excluded,
        warned,
    }
}

/// Run the tasks through a bounded pool of workers. Returns once every task
/// has been attempted; no task outlives this call.
async fn drain_pool(
    uploader: Arc<dyn Uploader>,
    tasks: Vec<UploadTask>,
    workers: usize,
    tally: Arc<Mutex<TransferTally>>,
) {
    let (work_tx, work_rx) = mpsc::channel::<UploadTask>(100);
    let work_rx = Arc::new(Mutex::new(work_rx));

    let mut handles = Vec::new();
    for _ in 0..workers.max(1) {
        let work_rx = Arc::clone(&work_rx);
        let uploader = Arc::clone(&uploader);
        let tally = Arc::clone(&tally);

        handles.push(tokio::spawn(async move {
            loop {
                let task = {
                    let mut rx_guard = work_rx.lock().await;
                    rx_guard.recv().await
                };

                match task {
                    Some(task) => upload_one(&*uploader, &task, &tally).await,
                    None => break, // Channel closed
                }
            }
        }));
    }

    for task in tasks {
        if work_tx.send(task).await.is_err() {
            break;
        }
    }
    drop(work_tx); // Close channel to signal workers to exit

    for handle in handles {
        if let Err(e) = handle.await {
            error!("upload worker panicked: {e}");
        }
    }
}

/// Attempt one transfer and fold its result into the tally. A failure is
/// logged and counted, never propagated.
async fn upload_one(uploader: &dyn Uploader, task: &UploadTask, tally: &Mutex<TransferTally>) {
    let metadata = resolve_metadata(&task.local_path);
    let result = uploader
        .upload_file(&task.local_path, &task.remote_key, &metadata)
        .await;

    let mut tally = tally.lock().await;
    match result {
        Ok(()) => {
            tally.uploaded += 1;
            println!(
                "{} uploaded ({}): {} → {}",
                style("✓").green(),
                tally.uploaded,
                task.local_path.display(),
                task.remote_key
            );
        }
        Err(e) => {
            tally.failed += 1;
            error!("upload failed for {}: {e}", task.local_path.display());
            println!(
                "{} failed ({}): {} - {}",
                style("✗").red(),
                tally.failed,
                task.local_path.display(),
                style(e).red()
            );
        }
    }
}

fn print_hidden_file_warning(paths: &[PathBuf]) {
    println!(
        "{}",
        style(format!("Warning: uploading {} hidden file(s):", paths.len())).yellow()
    );
    for path in paths {
        println!("  {} {}", style("⚠").yellow(), path.display());
    }
    println!("  These are usually hidden files; make sure they are meant to be uploaded");
}
