//! Merges ingested detector reports into one Master Report.
//!
//! The merge is a fold over the successfully loaded reports, in the order
//! their paths were supplied:
//! - the verdict starts at `PASSED` and latches to `REJECTED` on the first
//!   report whose status is exactly `REJECTED`;
//! - every event is tagged with its report's `module` as `source_module`;
//! - the timeline is stably sorted by `start_time`, so ties keep report
//!   order and then within-report order.

use crate::report::ingest::{IngestOutcome, ingest_reports};
use crate::report::schema::{DetectorReport, Event, MasterReport, OverallStatus};
use log::{debug, info, warn};
use std::cmp::Ordering;
use std::path::Path;

/// Computes the overall verdict for a set of reports.
pub fn compute_verdict<'a, I>(reports: I) -> OverallStatus
where
    I: IntoIterator<Item = &'a DetectorReport>,
{
    reports
        .into_iter()
        .fold(OverallStatus::Passed, |verdict, report| {
            verdict.observe(&report.status)
        })
}

/// Tags and orders the events of `reports` into one timeline.
pub fn merge_timeline<I>(reports: I) -> Vec<Event>
where
    I: IntoIterator<Item = DetectorReport>,
{
    let mut timeline: Vec<Event> = reports.into_iter().flat_map(tag_events).collect();
    sort_timeline(&mut timeline);
    timeline
}

/// Stable ascending sort by `start_time`, absent timings first as `0.0`.
///
/// `-0.0` and `0.0` compare equal so they keep their input order.
pub fn sort_timeline(timeline: &mut [Event]) {
    timeline.sort_by(|a, b| {
        a.sort_time()
            .partial_cmp(&b.sort_time())
            .unwrap_or(Ordering::Equal)
    });
}

fn tag_events(report: DetectorReport) -> impl Iterator<Item = Event> {
    let module = report.module;
    report.events.into_iter().map(move |mut event| {
        // TODO: give events without a start_time their own "unknown timing"
        // bucket in the Master Report instead of ordering them at 0.0.
        if event.start_time.is_none() {
            debug!(
                "Event {:?} from {} has no usable start_time; ordering it at 0.0",
                event.kind.as_deref().unwrap_or("<untyped>"),
                module
            );
        }
        event.source_module = Some(module.clone());
        event
    })
}

/// Running state of the merge fold.
#[derive(Default)]
struct Tally {
    overall_status: OverallStatus,
    modules_run: usize,
    timeline: Vec<Event>,
}

impl Tally {
    fn absorb(mut self, report: DetectorReport) -> Self {
        info!("Merging {}... Status: {}", report.module, report.status);
        self.overall_status = self.overall_status.observe(&report.status);
        self.modules_run += 1;
        self.timeline.extend(tag_events(report));
        self
    }

    fn finish(mut self) -> MasterReport {
        sort_timeline(&mut self.timeline);
        MasterReport {
            overall_status: self.overall_status,
            modules_run: self.modules_run,
            timeline: self.timeline,
        }
    }
}

/// Builds the Master Report from ingestion outcomes; skipped inputs are ignored.
pub fn aggregate<I>(outcomes: I) -> MasterReport
where
    I: IntoIterator<Item = IngestOutcome>,
{
    outcomes
        .into_iter()
        .filter_map(IngestOutcome::into_report)
        .fold(Tally::default(), Tally::absorb)
        .finish()
}

/// Ingests `paths` in order and aggregates whatever could be read.
pub fn aggregate_paths<P: AsRef<Path>>(paths: &[P]) -> MasterReport {
    info!("Aggregating {} report(s)", paths.len());
    let outcomes = ingest_reports(paths);
    let skipped: Vec<String> = outcomes
        .iter()
        .filter(|outcome| !outcome.is_loaded())
        .map(|outcome| outcome.path().display().to_string())
        .collect();
    if !skipped.is_empty() {
        warn!("Skipped {} report(s): {}", skipped.len(), skipped.join(", "));
    }
    let master = aggregate(outcomes);
    info!(
        "Aggregation complete: {} module(s) merged, {} event(s), overall {}",
        master.modules_run,
        master.timeline.len(),
        master.overall_status
    );
    master
}
