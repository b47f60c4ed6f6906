//! Lap driver - main crawl orchestration logic
//!
//! A run is a fixed number of laps. Each lap:
//! 1. Fetches one page of submissions beyond the current frontier
//! 2. Normalizes every submission and its comment tree
//! 3. Flushes the batch to disk
//! 4. Folds the observed timestamps into the bound window and persists it
//!
//! Laps never overlap: the next lap's query depends on the window written by
//! the previous one.

use crate::config::RunConfig;
use crate::normalize::{normalize_comment, normalize_submission};
use crate::output::export_reddit_archive;
use crate::sources::{CommentExpander, Submission, SubmissionSearch};
use crate::state::{BoundWindow, LapPhase};
use crate::storage::params::{params_from, set_param};
use crate::storage::{OutputManager, Totals};
use crate::{ArchiveError, ConfigError};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Which side of the bound the crawl walks toward, fixed for the whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlDirection {
    /// Newer submissions, starting after `utc_after`
    After,
    /// Older submissions, starting before `utc_before` (or now)
    Before,
}

impl CrawlDirection {
    /// Resolves the direction and the first bound from the run options
    ///
    /// `now` is used as the starting bound when neither option is set.
    pub fn resolve(
        utc_after: Option<i64>,
        utc_before: Option<i64>,
        now: i64,
    ) -> Result<(Self, i64), ConfigError> {
        match (utc_after, utc_before) {
            (Some(after), Some(before)) => Err(ConfigError::ConflictingBounds { after, before }),
            (Some(after), None) => Ok((Self::After, after)),
            (None, Some(before)) => Ok((Self::Before, before)),
            (None, None) => Ok((Self::Before, now)),
        }
    }
}

/// Result of one completed lap
#[derive(Debug, Clone, PartialEq)]
pub struct LapOutcome {
    pub lap: u32,
    pub submissions: usize,
    pub comments: usize,
    /// Window after the lap; unchanged from the previous lap when it was empty
    pub window: BoundWindow,
    pub elapsed: Duration,
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: String,
    pub laps: Vec<LapOutcome>,
    pub totals: Totals,
    pub window: BoundWindow,
    pub workbook: PathBuf,
}

/// Drives the laps of one run
pub struct LapDriver {
    config: RunConfig,
    search: Box<dyn SubmissionSearch>,
    comments: Box<dyn CommentExpander>,
    output: OutputManager,
    direction: CrawlDirection,
    start_bound: i64,
    window: BoundWindow,
    phase: LapPhase,
}

impl LapDriver {
    /// Creates a driver and writes the run's initial `params.yaml`
    ///
    /// # Arguments
    ///
    /// * `config` - Run options (the secret is never persisted)
    /// * `search` - Submission search collaborator
    /// * `comments` - Comment-tree expansion collaborator
    /// * `output` - The initialized run directory
    /// * `config_hash` - Hash of the service config file, if one was used
    pub fn new(
        config: RunConfig,
        search: Box<dyn SubmissionSearch>,
        comments: Box<dyn CommentExpander>,
        output: OutputManager,
        config_hash: Option<String>,
    ) -> Result<Self, ArchiveError> {
        let now = chrono::Utc::now().timestamp();
        let (direction, start_bound) =
            CrawlDirection::resolve(config.utc_after, config.utc_before, now)?;

        let mut params = params_from(&config)?;
        set_param(&mut params, "run_id", output.run_id());
        set_param(&mut params, "direction", format!("{:?}", direction).to_lowercase());
        if let Some(hash) = config_hash {
            set_param(&mut params, "config_hash", hash);
        }
        output.persist_params(&params)?;

        Ok(Self {
            config,
            search,
            comments,
            output,
            direction,
            start_bound,
            window: BoundWindow::default(),
            phase: LapPhase::Idle,
        })
    }

    /// Seeds the window, e.g. from the `params.yaml` of an earlier run
    pub fn with_window(mut self, window: BoundWindow) -> Self {
        self.window = window;
        self
    }

    pub fn phase(&self) -> LapPhase {
        self.phase
    }

    pub fn window(&self) -> BoundWindow {
        self.window
    }

    pub fn direction(&self) -> CrawlDirection {
        self.direction
    }

    pub fn output(&self) -> &OutputManager {
        &self.output
    }

    /// The `(after, before)` pair for the next search; exactly one is set
    pub fn frontier(&self) -> (Option<i64>, Option<i64>) {
        match self.direction {
            CrawlDirection::After => (Some(self.window.upper.unwrap_or(self.start_bound)), None),
            CrawlDirection::Before => (None, Some(self.window.lower.unwrap_or(self.start_bound))),
        }
    }

    /// Runs every configured lap, then exports the run's workbook
    pub async fn run(&mut self) -> Result<RunSummary, ArchiveError> {
        let laps = self.config.laps;
        let mut outcomes = Vec::with_capacity(laps as usize);
        let start_time = Instant::now();

        tracing::info!(
            "Starting run {} for r/{}: {} laps of {} submissions, direction {:?}",
            self.output.run_id(),
            self.config.subreddit,
            laps,
            self.config.batch_size,
            self.direction
        );

        if laps == 0 {
            self.advance(LapPhase::Done)?;
        }

        for lap in 1..=laps {
            outcomes.push(self.run_lap(lap).await?);
        }

        let archive = self.output.archive();
        let workbook =
            export_reddit_archive(self.output.run_dir(), &archive.submissions, &archive.comments)?;

        let totals = self.output.totals();
        tracing::info!(
            "Run {} finished in {:.2?}: {} submissions, {} comments",
            self.output.run_id(),
            start_time.elapsed(),
            totals.submissions,
            totals.comments
        );
        tracing::info!("Reddit data exported to {}", workbook.display());

        Ok(RunSummary {
            run_id: self.output.run_id().to_string(),
            laps: outcomes,
            totals,
            window: self.window,
            workbook,
        })
    }

    /// Runs a single lap; lap numbers start at 1
    ///
    /// A lap-level error leaves the driver in `Failed`. Files and metadata of
    /// earlier laps stay as they were.
    pub async fn run_lap(&mut self, lap: u32) -> Result<LapOutcome, ArchiveError> {
        match self.lap(lap).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                if self.phase.can_transition_to(LapPhase::Failed) {
                    self.phase = LapPhase::Failed;
                }
                tracing::error!("Lap {} failed: {}", lap, e);
                Err(e)
            }
        }
    }

    async fn lap(&mut self, lap: u32) -> Result<LapOutcome, ArchiveError> {
        let started = Instant::now();
        tracing::info!("Processing lap {}/{}", lap, self.config.laps);

        self.advance(LapPhase::Fetching)?;
        let (after, before) = self.frontier();
        tracing::debug!("Searching after={:?} before={:?}", after, before);
        let submissions = self
            .search
            .search(after, before, self.config.batch_size)
            .await?;

        self.advance(LapPhase::Normalizing)?;
        for submission in &submissions {
            self.collect(submission).await;
        }

        self.advance(LapPhase::Flushing)?;
        let report = self.output.flush(&lap.to_string())?;

        self.advance(LapPhase::BoundUpdating)?;
        match BoundWindow::from_timestamps(submissions.iter().map(|s| s.created_utc)) {
            Some(window) => self.window = window,
            None => tracing::warn!(
                "Lap {} returned no submissions, keeping window {:?}..{:?}",
                lap,
                self.window.lower,
                self.window.upper
            ),
        }
        self.output.update_bounds_and_persist(self.window)?;

        let next = if lap >= self.config.laps {
            LapPhase::Done
        } else {
            LapPhase::Idle
        };
        self.advance(next)?;

        let elapsed = started.elapsed();
        tracing::info!(
            "Lap {}/{}: {} submissions, {} comments, elapsed time: {:.2}s",
            lap,
            self.config.laps,
            report.submissions,
            report.comments,
            elapsed.as_secs_f64()
        );

        Ok(LapOutcome {
            lap,
            submissions: report.submissions,
            comments: report.comments,
            window: self.window,
            elapsed,
        })
    }

    /// Records one submission and as much of its comment tree as the cap allows
    ///
    /// Comment failures are logged and never abort the lap.
    async fn collect(&mut self, submission: &Submission) {
        let (normalized, raw) = normalize_submission(submission);
        self.output.record_submission(normalized, raw);

        match self
            .comments
            .expand_comments(&submission.id, self.config.comments_cap)
            .await
        {
            Ok(forest) => {
                tracing::debug!(
                    "Submission {}: {} comments ({} collapsed)",
                    submission.id,
                    forest.len(),
                    forest.collapsed
                );
                for comment in &forest.comments {
                    let (normalized, raw) = normalize_comment(&submission.id, comment);
                    self.output.record_comment(normalized, raw);
                }
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    "Submission not found: `{}` - `{}` - `{}`",
                    submission.id,
                    submission.title,
                    submission.permalink
                );
            }
            Err(e) => {
                tracing::error!("Failed to collect comments of {}: {}", submission.id, e);
            }
        }
    }

    fn advance(&mut self, next: LapPhase) -> Result<(), ArchiveError> {
        if !self.phase.can_transition_to(next) {
            return Err(ArchiveError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        self.phase = next;
        Ok(())
    }
}
