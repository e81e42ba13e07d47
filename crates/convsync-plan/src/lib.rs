//! Directory classification and merge-based tree diffing for convsync
//!
//! This crate turns two directory trees into a [`SyncPlan`]: the ordered
//! sets of files to create (convert or copy) and to delete. The pipeline is
//! deliberately plain data — the executor consumes a plan with no
//! back-reference to how it was computed.
//!
//! # Examples
//!
//! ```rust,no_run
//! use convsync_plan::{ExtRemap, SyncPlanner};
//! use convsync_types::{Extension, ExtensionSet};
//!
//! # fn example() -> convsync_types::Result<()> {
//! let planner = SyncPlanner::new("/music", "/portable");
//! let tracked = ExtensionSet::parse("flac,wav")?;
//! let remap = ExtRemap::to(Extension::new("mp3")?);
//! let plan = planner.plan(&tracked, &remap)?;
//! println!("{} to create, {} to delete", plan.to_create.len(), plan.to_delete.len());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use convsync_types::{ExtensionSet, Result};
use std::path::PathBuf;
use tracing::debug;

pub mod diff;
pub mod scan;

pub use diff::{DiffOptions, ExtRemap, TreeDiffer};
pub use scan::TreeScanner;

/// The output of the tree differ: what to create and what to delete.
///
/// `to_create` holds source-relative paths, `to_delete` destination-relative
/// paths; both are sorted in listing order. A plan is computed once per run
/// and consumed once — nothing is persisted across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    /// Source-relative paths that must be (re)created at the destination
    pub to_create: Vec<PathBuf>,
    /// Destination-relative paths with no corresponding source file
    pub to_delete: Vec<PathBuf>,
}

impl SyncPlan {
    /// Whether the plan contains no work at all
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_delete.is_empty()
    }
}

/// Computes sync plans for a source/destination root pair
#[derive(Debug, Clone)]
pub struct SyncPlanner {
    source_root: PathBuf,
    dest_root: PathBuf,
    options: DiffOptions,
}

impl SyncPlanner {
    /// Create a planner for the given roots with default diff options
    pub fn new<P1: Into<PathBuf>, P2: Into<PathBuf>>(source_root: P1, dest_root: P2) -> Self {
        Self {
            source_root: source_root.into(),
            dest_root: dest_root.into(),
            options: DiffOptions::default(),
        }
    }

    /// Set the diff options
    pub fn with_options(mut self, options: DiffOptions) -> Self {
        self.options = options;
        self
    }

    /// Compute the plan for one extension filter under one remap rule.
    ///
    /// The destination listing is filtered by the remap's target extension
    /// when one is set, otherwise by the same filter as the source. An empty
    /// filter tracks nothing and short-circuits to an empty plan before any
    /// traversal — in particular it must never produce deletions.
    pub fn plan(&self, filter: &ExtensionSet, remap: &ExtRemap) -> Result<SyncPlan> {
        if filter.is_empty() {
            return Ok(SyncPlan::default());
        }

        let source = TreeScanner::new(filter.clone()).scan(&self.source_root)?;

        let dest_filter = match remap.target() {
            Some(target) => ExtensionSet::single(target.clone()),
            None => filter.clone(),
        };
        let dest = TreeScanner::new(dest_filter).scan(&self.dest_root)?;

        let plan = TreeDiffer::new(self.options).diff(
            &self.source_root,
            &self.dest_root,
            &source,
            &dest,
            remap,
        )?;

        debug!(
            create = plan.to_create.len(),
            delete = plan.to_delete.len(),
            "computed sync plan"
        );
        Ok(plan)
    }
}
