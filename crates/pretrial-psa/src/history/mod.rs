//! Case and charge history for the person being assessed.

pub mod domain;
mod import;
mod partition;

pub use domain::{AssessmentWindow, CaseId, CaseRecord, ChargeId, ChargeIdError, ChargeRecord};
pub use import::{parse_date, CaseHistory, CaseHistoryImporter, CaseImportError};
pub use partition::{partition_cases_for_assessment, CaseHistoryPartition, PartitionSummary};
