//! Sync execution engine for convsync
//!
//! This crate applies a pair of [`convsync_plan::SyncPlan`] values to the
//! filesystem: deletions first, then verbatim copies, then conversions
//! dispatched onto a fixed-size worker pool that invokes an external
//! converter command per file.
//!
//! # Examples
//!
//! ```rust,no_run
//! use convsync_engine::{CommandTemplate, ExecutorOptions, SyncExecutor};
//! use convsync_plan::{ExtRemap, SyncPlan};
//! use convsync_types::Extension;
//!
//! # async fn example() -> convsync_types::Result<()> {
//! let template = CommandTemplate::new(vec![
//!     "ffmpeg".into(), "-i".into(), "@source".into(), "@dest".into(),
//! ])?;
//! let remap = ExtRemap::to(Extension::new("mp3")?);
//! let executor = SyncExecutor::new(
//!     "/music", "/portable", template, remap, ExecutorOptions::default(),
//! );
//! let report = executor
//!     .execute(SyncPlan::default(), SyncPlan::default())
//!     .await?;
//! println!("converted {} files", report.converted);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod command;
pub mod executor;
pub mod job;
pub mod output;
pub mod pool;

pub use command::{CommandTemplate, DEST_PLACEHOLDER, SOURCE_PLACEHOLDER};
pub use executor::{ExecutorOptions, RunStatus, SyncExecutor, SyncReport};
pub use job::{ConversionJob, JobId, JobOutcome};
pub use output::OutputGate;
pub use pool::{PoolConfig, PoolStats, WorkerPool};
