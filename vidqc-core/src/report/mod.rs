// ============================================================================
// vidqc-core/src/report/mod.rs
// ============================================================================
//
// REPORTS: Detector Report Contract and Master Report Aggregation
//
// KEY COMPONENTS:
// - schema: DetectorReport, Event, MasterReport and their status types
// - ingest: reads report files into tagged outcomes (never fails)
// - aggregate: verdict fold and stable timeline merge
// - writer: deterministic JSON output

pub mod aggregate;
pub mod ingest;
pub mod schema;
pub mod writer;

pub use aggregate::{aggregate, aggregate_paths, compute_verdict, merge_timeline};
pub use ingest::{IngestOutcome, ingest_report, ingest_reports, parse_report};
pub use schema::{DetectorReport, Event, MasterReport, OverallStatus, ReportStatus};
pub use writer::{read_master_report, write_detector_report, write_master_report};
