//! Pretrial public safety assessment core.
//!
//! Two pure components live here: the release-conditions matrix (DMF) with its
//! severity escalation pipeline, and the case history partitioner that decides
//! which charges are pending for the assessment at hand. Scoring, intake
//! normalization and CSV import sit around them so the binary can run end to end.

pub mod assessment;
pub mod config;
pub mod error;
pub mod history;
pub mod telemetry;
