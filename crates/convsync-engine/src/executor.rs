//! Fixed-order application of sync plans
//!
//! The executor applies a conversion plan and a copy plan in one rigid
//! sequence: report, (dry-run stop | confirmation), deletions, copies,
//! conversions. Deletions always precede copies and copies always precede
//! conversions, so a freshly produced file can never be removed by a stale
//! entry from the same run and the two create stages never race on
//! directory creation.

use crate::command::CommandTemplate;
use crate::job::ConversionJob;
use crate::output::OutputGate;
use crate::pool::{PoolConfig, PoolStats, WorkerPool};
use convsync_config::Config;
use convsync_plan::{ExtRemap, SyncPlan};
use convsync_types::{Error, Result, WorkerCount};
use console::style;
use filetime::FileTime;
use std::path::{Path, PathBuf};
use tracing::info;

/// Options controlling an executor run
#[derive(Debug, Clone, Default)]
pub struct ExecutorOptions {
    /// Number of conversion workers
    pub workers: WorkerCount,
    /// Report the plan and echo command lines without mutating anything
    pub dry_run: bool,
    /// Proceed without the interactive confirmation prompt
    pub skip_confirmation: bool,
    /// Always print captured converter output
    pub verbose: bool,
}

impl ExecutorOptions {
    /// Create executor options from the main config
    pub fn from_config(config: &Config) -> Self {
        Self {
            workers: WorkerCount::resolve(config.execution.workers),
            dry_run: config.execution.dry_run,
            skip_confirmation: config.execution.skip_confirmation,
            verbose: config.execution.verbose,
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// All stages ran to the end of the drain
    Completed,
    /// Simulation: the plan was reported, nothing was mutated
    DryRun,
    /// The operator declined the confirmation prompt
    Declined,
}

/// Counters describing a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    /// How the run ended
    pub status: RunStatus,
    /// Destination files removed
    pub deleted: u64,
    /// Files copied through verbatim
    pub copied: u64,
    /// Conversions that completed successfully
    pub converted: u64,
    /// Conversions that failed (reported, not fatal)
    pub failed: u64,
}

impl SyncReport {
    fn ended(status: RunStatus) -> Self {
        Self {
            status,
            deleted: 0,
            copied: 0,
            converted: 0,
            failed: 0,
        }
    }
}

/// Applies sync plans against a destination tree
#[derive(Debug, Clone)]
pub struct SyncExecutor {
    source_root: PathBuf,
    dest_root: PathBuf,
    template: CommandTemplate,
    remap: ExtRemap,
    options: ExecutorOptions,
    gate: OutputGate,
}

impl SyncExecutor {
    /// Create a new executor
    pub fn new<P1: Into<PathBuf>, P2: Into<PathBuf>>(
        source_root: P1,
        dest_root: P2,
        template: CommandTemplate,
        remap: ExtRemap,
        options: ExecutorOptions,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            dest_root: dest_root.into(),
            template,
            remap,
            options,
            gate: OutputGate::new(),
        }
    }

    /// Use a shared output gate instead of a fresh one
    pub fn with_gate(mut self, gate: OutputGate) -> Self {
        self.gate = gate;
        self
    }

    /// Apply the two plans in fixed order and return what happened.
    ///
    /// `conversions` carries extension-remapped work for the external
    /// converter; `copies` carries verbatim copy-through work. Deletions
    /// from both plans run first, conversion deletes ahead of copy deletes.
    pub async fn execute(&self, conversions: SyncPlan, copies: SyncPlan) -> Result<SyncReport> {
        self.report_plan(&conversions, &copies).await;

        if self.options.dry_run {
            self.gate.line("-----DRY-RUN-----").await;
            let stats = self.run_pool(&conversions, true).await?;
            info!(echoed = stats.completed, "dry run finished");
            return Ok(SyncReport::ended(RunStatus::DryRun));
        }

        if !self.options.skip_confirmation && !Self::user_confirm().await? {
            self.gate.line("Aborted.").await;
            return Ok(SyncReport::ended(RunStatus::Declined));
        }
        self.gate.line("-----SYNCING-----").await;

        let deleted = self.apply_deletions(&conversions, &copies).await?;
        let copied = self.apply_copies(&copies).await?;
        let stats = self.run_pool(&conversions, false).await?;

        info!(
            deleted,
            copied,
            converted = stats.completed,
            failed = stats.failed,
            "sync finished"
        );
        Ok(SyncReport {
            status: RunStatus::Completed,
            deleted,
            copied,
            converted: stats.completed,
            failed: stats.failed,
        })
    }

    /// Print every planned action before anything executes
    async fn report_plan(&self, conversions: &SyncPlan, copies: &SyncPlan) {
        for path in conversions.to_delete.iter().chain(&copies.to_delete) {
            self.gate
                .line(format!("{}{}", style("delete :").red(), path.display()))
                .await;
        }
        for path in &copies.to_create {
            self.gate
                .line(format!("{}{}", style("copy   :").yellow(), path.display()))
                .await;
        }
        for path in &conversions.to_create {
            self.gate
                .line(format!("{}{}", style("convert:").green(), path.display()))
                .await;
        }
    }

    async fn user_confirm() -> Result<bool> {
        tokio::task::spawn_blocking(|| {
            dialoguer::Confirm::new()
                .with_prompt("Begin?")
                .default(false)
                .interact()
        })
        .await
        .map_err(|e| Error::other(format!("confirmation prompt failed: {e}")))?
        .map_err(|e| Error::other(format!("confirmation prompt failed: {e}")))
    }

    /// Remove stale destination files, conversion deletes first
    async fn apply_deletions(&self, conversions: &SyncPlan, copies: &SyncPlan) -> Result<u64> {
        let mut deleted = 0;
        for path in conversions.to_delete.iter().chain(&copies.to_delete) {
            let target = self.dest_root.join(path);
            self.gate
                .line(format!("Removing: {}", target.display()))
                .await;

            tokio::fs::remove_file(&target)
                .await
                .map_err(|e| Error::remove(&target, e.to_string()))?;
            self.collapse_empty_parents(&target).await?;
            deleted += 1;
        }
        Ok(deleted)
    }

    /// Remove now-empty ancestor directories, stopping at the destination root
    async fn collapse_empty_parents(&self, removed: &Path) -> Result<()> {
        let mut dir = removed.parent();
        while let Some(current) = dir {
            if current == self.dest_root || !current.starts_with(&self.dest_root) {
                break;
            }
            let mut entries = tokio::fs::read_dir(current)
                .await
                .map_err(|e| Error::remove(current, e.to_string()))?;
            if entries
                .next_entry()
                .await
                .map_err(|e| Error::remove(current, e.to_string()))?
                .is_some()
            {
                break;
            }
            tokio::fs::remove_dir(current)
                .await
                .map_err(|e| Error::remove(current, e.to_string()))?;
            dir = current.parent();
        }
        Ok(())
    }

    /// Copy-through files byte for byte, carrying the source timestamp
    async fn apply_copies(&self, copies: &SyncPlan) -> Result<u64> {
        let mut copied = 0;
        for path in &copies.to_create {
            let source = self.source_root.join(path);
            let dest = self.dest_root.join(path);
            self.gate
                .line(format!("Copying: {}", source.display()))
                .await;

            if let Some(parent) = dest.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| Error::copy(&source, &dest, e.to_string()))?;
            }
            tokio::fs::copy(&source, &dest)
                .await
                .map_err(|e| Error::copy(&source, &dest, e.to_string()))?;

            // carry the source mtime so the staleness check stays quiet on
            // the next run
            let metadata = tokio::fs::metadata(&source)
                .await
                .map_err(|e| Error::copy(&source, &dest, e.to_string()))?;
            filetime::set_file_mtime(&dest, FileTime::from_last_modification_time(&metadata))
                .map_err(|e| Error::copy(&source, &dest, e.to_string()))?;
            copied += 1;
        }
        Ok(copied)
    }

    /// Dispatch the conversion plan onto the worker pool and drain it
    async fn run_pool(&self, conversions: &SyncPlan, echo_only: bool) -> Result<PoolStats> {
        let jobs: Vec<ConversionJob> = conversions
            .to_create
            .iter()
            .map(|path| {
                ConversionJob::new(
                    path.clone(),
                    self.source_root.join(path),
                    self.dest_root.join(self.remap.apply(path)),
                )
            })
            .collect();

        let config = PoolConfig {
            workers: self.options.workers,
            echo_only,
            verbose: self.options.verbose,
        };
        WorkerPool::new(config, self.template.clone(), self.gate.clone())
            .run(jobs)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convsync_types::Extension;
    use std::fs;

    fn executor(source: &Path, dest: &Path, dry_run: bool) -> SyncExecutor {
        let template = CommandTemplate::new(vec![
            "cp".to_string(),
            "@source".to_string(),
            "@dest".to_string(),
        ])
        .unwrap();
        SyncExecutor::new(
            source,
            dest,
            template,
            ExtRemap::to(Extension::new("mp3").unwrap()),
            ExecutorOptions {
                workers: WorkerCount::new(2).unwrap(),
                dry_run,
                skip_confirmation: true,
                verbose: false,
            },
        )
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[tokio::test]
    async fn test_deletion_collapses_empty_ancestors() {
        let source = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        touch(&dest.path().join("album/disc2/stale.mp3"));
        touch(&dest.path().join("keep/current.mp3"));

        let conversions = SyncPlan {
            to_create: Vec::new(),
            to_delete: vec![PathBuf::from("album/disc2/stale.mp3")],
        };

        let report = executor(source.path(), dest.path(), false)
            .execute(conversions, SyncPlan::default())
            .await
            .unwrap();

        assert_eq!(report.status, RunStatus::Completed);
        assert_eq!(report.deleted, 1);
        // the emptied chain is gone, siblings and the root survive
        assert!(!dest.path().join("album").exists());
        assert!(dest.path().join("keep/current.mp3").is_file());
        assert!(dest.path().exists());
    }

    #[tokio::test]
    async fn test_missing_delete_target_is_fatal() {
        let source = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();

        let conversions = SyncPlan {
            to_create: Vec::new(),
            to_delete: vec![PathBuf::from("never-existed.mp3")],
        };

        let result = executor(source.path(), dest.path(), false)
            .execute(conversions, SyncPlan::default())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_copy_preserves_source_mtime() {
        let source = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let src_file = source.path().join("art/cover.jpg");
        touch(&src_file);
        let stamp = FileTime::from_unix_time(1_234_567, 0);
        filetime::set_file_mtime(&src_file, stamp).unwrap();

        let copies = SyncPlan {
            to_create: vec![PathBuf::from("art/cover.jpg")],
            to_delete: Vec::new(),
        };

        let report = executor(source.path(), dest.path(), false)
            .execute(SyncPlan::default(), copies)
            .await
            .unwrap();
        assert_eq!(report.copied, 1);

        let copied = dest.path().join("art/cover.jpg");
        let metadata = fs::metadata(&copied).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&metadata), stamp);
    }

    #[tokio::test]
    async fn test_dry_run_mutates_nothing() {
        let source = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        touch(&source.path().join("a.wav"));
        touch(&dest.path().join("stale.mp3"));

        let conversions = SyncPlan {
            to_create: vec![PathBuf::from("a.wav")],
            to_delete: vec![PathBuf::from("stale.mp3")],
        };

        let report = executor(source.path(), dest.path(), true)
            .execute(conversions, SyncPlan::default())
            .await
            .unwrap();

        assert_eq!(report.status, RunStatus::DryRun);
        assert!(dest.path().join("stale.mp3").is_file());
        assert!(!dest.path().join("a.mp3").exists());
    }
}
