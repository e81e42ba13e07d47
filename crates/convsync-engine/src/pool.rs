//! Fixed-size conversion worker pool
//!
//! N workers drain a shared FIFO of [`ConversionJob`] values until it is
//! exhausted. The whole queue is enqueued and closed before the workers
//! start, so draining ends exactly when every job has been processed and the
//! coordinator's join observes precisely that moment.

use crate::command::CommandTemplate;
use crate::job::{ConversionJob, JobOutcome};
use crate::output::OutputGate;
use convsync_types::{Error, Result, WorkerCount};
use std::process::Stdio;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

/// Configuration for the worker pool
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of concurrent workers
    pub workers: WorkerCount,
    /// Print shell-escaped command lines instead of executing them
    pub echo_only: bool,
    /// Print captured converter output even on success
    pub verbose: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: WorkerCount::resolve(num_cpus::get() as i64),
            echo_only: false,
            verbose: false,
        }
    }
}

/// Counters describing a drained pool run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Jobs whose converter exited successfully (or were echoed)
    pub completed: u64,
    /// Jobs whose converter failed to run or exited non-zero
    pub failed: u64,
}

impl PoolStats {
    /// Merge another stats block into this one
    pub fn merge(&mut self, other: &Self) {
        self.completed += other.completed;
        self.failed += other.failed;
    }

    /// Total number of processed jobs
    pub fn total(&self) -> u64 {
        self.completed + self.failed
    }
}

/// A fixed group of workers draining a shared job queue
#[derive(Debug, Clone)]
pub struct WorkerPool {
    config: PoolConfig,
    template: CommandTemplate,
    gate: OutputGate,
}

impl WorkerPool {
    /// Create a new pool
    pub fn new(config: PoolConfig, template: CommandTemplate, gate: OutputGate) -> Self {
        Self {
            config,
            template,
            gate,
        }
    }

    /// Process every job and block until the queue is drained.
    ///
    /// Per-job failures are counted, not propagated. An interrupt during the
    /// drain is reported through the gate and surfaces as
    /// [`Error::Cancelled`]; in-flight child processes are left to finish on
    /// their own.
    pub async fn run(&self, jobs: Vec<ConversionJob>) -> Result<PoolStats> {
        if jobs.is_empty() {
            return Ok(PoolStats::default());
        }

        let (tx, rx) = mpsc::unbounded_channel::<ConversionJob>();
        for job in jobs {
            tx.send(job)
                .map_err(|e| Error::other(format!("failed to enqueue job: {e}")))?;
        }
        // close the queue: workers exit when it runs dry
        drop(tx);
        let rx = Arc::new(Mutex::new(rx));

        let worker_count = self.config.workers.get();
        debug!(workers = worker_count, "starting conversion pool");

        let mut handles = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let rx = Arc::clone(&rx);
            let template = self.template.clone();
            let config = self.config.clone();
            let gate = self.gate.clone();

            handles.push(tokio::spawn(async move {
                let mut stats = PoolStats::default();
                loop {
                    let job = rx.lock().await.recv().await;
                    let Some(job) = job else { break };

                    debug!(worker = worker_id, job = %job.id, path = %job.relative.display(), "dequeued");
                    match process_job(&job, &template, &config, &gate).await {
                        JobOutcome::Completed => stats.completed += 1,
                        JobOutcome::Failed { error } => {
                            warn!(job = %job.id, "{error}");
                            stats.failed += 1;
                        }
                    }
                }
                stats
            }));
        }

        tokio::select! {
            results = futures::future::join_all(handles) => {
                let mut stats = PoolStats::default();
                for result in results {
                    let worker_stats =
                        result.map_err(|e| Error::other(format!("worker panicked: {e}")))?;
                    stats.merge(&worker_stats);
                }
                Ok(stats)
            }
            _ = tokio::signal::ctrl_c() => {
                self.gate.line("Interrupted").await;
                Err(Error::Cancelled)
            }
        }
    }
}

/// Run (or echo) the converter for one job
async fn process_job(
    job: &ConversionJob,
    template: &CommandTemplate,
    config: &PoolConfig,
    gate: &OutputGate,
) -> JobOutcome {
    let args = template.materialize(&job.source, &job.dest);

    if config.echo_only {
        gate.line(CommandTemplate::shell_join(&args)).await;
        return JobOutcome::Completed;
    }

    gate.line(format!("Converting: {}", job.source.display()))
        .await;

    if let Some(parent) = job.dest.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            return JobOutcome::Failed {
                error: Error::convert(
                    &job.relative,
                    format!("cannot create '{}': {e}", parent.display()),
                ),
            };
        }
    }

    let output = tokio::process::Command::new(&args[0])
        .args(&args[1..])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await;

    match output {
        Ok(output) => {
            let mut captured = String::from_utf8_lossy(&output.stdout).into_owned();
            captured.push_str(&String::from_utf8_lossy(&output.stderr));

            if !output.status.success() || config.verbose {
                gate.chunk(&captured).await;
            }

            if output.status.success() {
                JobOutcome::Completed
            } else {
                let message = match output.status.code() {
                    Some(code) => format!("converter exited with status {code}"),
                    None => "converter terminated by signal".to_string(),
                };
                JobOutcome::Failed {
                    error: Error::convert(&job.relative, message),
                }
            }
        }
        Err(e) => JobOutcome::Failed {
            error: Error::convert(&job.relative, format!("cannot run converter: {e}")),
        },
    }
}
