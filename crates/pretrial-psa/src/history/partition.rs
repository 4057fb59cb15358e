use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use super::domain::{AssessmentWindow, CaseId, CaseRecord, ChargeRecord};

/// Case history split into what is pending for the current assessment and
/// everything else. A case with both kinds of charges appears on both sides,
/// each side listing only its own charges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CaseHistoryPartition {
    pub relevant_cases: Vec<CaseRecord>,
    pub relevant_charges: BTreeMap<CaseId, Vec<ChargeRecord>>,
    pub other_cases: Vec<CaseRecord>,
    pub other_charges: BTreeMap<CaseId, Vec<ChargeRecord>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PartitionSummary {
    pub relevant_cases: usize,
    pub relevant_charges: usize,
    pub other_cases: usize,
    pub other_charges: usize,
}

impl CaseHistoryPartition {
    pub fn summary(&self) -> PartitionSummary {
        PartitionSummary {
            relevant_cases: self.relevant_cases.len(),
            relevant_charges: self.relevant_charges.values().map(Vec::len).sum(),
            other_cases: self.other_cases.len(),
            other_charges: self.other_charges.values().map(Vec::len).sum(),
        }
    }

    pub fn relevant_charges_for(&self, case_id: &CaseId) -> &[ChargeRecord] {
        self.relevant_charges
            .get(case_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn other_charges_for(&self, case_id: &CaseId) -> &[ChargeRecord] {
        self.other_charges
            .get(case_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn push_other(&mut self, case: &CaseRecord, charges: Vec<ChargeRecord>) {
        self.other_cases.push(case.clone());
        self.other_charges.insert(case.case_id.clone(), charges);
    }

    fn push_relevant(&mut self, case: &CaseRecord, charges: Vec<ChargeRecord>) {
        self.relevant_cases.push(case.clone());
        self.relevant_charges.insert(case.case_id.clone(), charges);
    }
}

/// Splits `case_history` against the window `[reference_date, closure_date)`.
///
/// A charge is pending when it has no disposition date or was disposed inside
/// the window. Without a reference date nothing can be anchored, so every case
/// and charge is reported as other. Cases without charges are reported as
/// other with an empty charge list. Input order is preserved and a repeated
/// case id is only reported once.
pub fn partition_cases_for_assessment(
    case_history: &[CaseRecord],
    charges_by_case: &BTreeMap<CaseId, Vec<ChargeRecord>>,
    reference_date: Option<NaiveDate>,
    closure_date: NaiveDate,
) -> CaseHistoryPartition {
    let mut partition = CaseHistoryPartition::default();
    let mut seen = BTreeSet::new();
    let case_history = case_history.iter().filter(|case| {
        let first = seen.insert(case.case_id.clone());
        if !first {
            warn!(case = %case.case_id, "ignoring repeated case id");
        }
        first
    });

    let Some(reference) = reference_date else {
        debug!("no reference date; reporting full history as other");
        for case in case_history {
            let charges = charges_by_case
                .get(&case.case_id)
                .cloned()
                .unwrap_or_default();
            partition.push_other(case, charges);
        }
        return partition;
    };

    let window = AssessmentWindow::new(reference, closure_date);

    for case in case_history {
        let charges = charges_by_case
            .get(&case.case_id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        if charges.is_empty() {
            partition.push_other(case, Vec::new());
            continue;
        }

        let (pending, resolved): (Vec<ChargeRecord>, Vec<ChargeRecord>) = charges
            .iter()
            .cloned()
            .partition(|charge| charge.is_pending_within(&window));

        if !pending.is_empty() {
            partition.push_relevant(case, pending);
        }
        if !resolved.is_empty() {
            partition.push_other(case, resolved);
        }
    }

    partition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::domain::ChargeId;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn case(id: &str) -> CaseRecord {
        CaseRecord {
            case_id: CaseId::from(id),
            file_date: Some(date(2023, 6, 1)),
        }
    }

    fn charge(case_id: &str, sequence: &str, disposed: Option<NaiveDate>) -> ChargeRecord {
        ChargeRecord {
            charge_id: ChargeId::new(case_id, sequence),
            description: Some(format!("count {sequence}")),
            statute: None,
            disposition_date: disposed,
        }
    }

    #[test]
    fn duplicate_case_ids_do_not_duplicate_charges_within_a_bucket() {
        let cases = vec![case("A"), case("A")];
        let mut charges = BTreeMap::new();
        charges.insert(CaseId::from("A"), vec![charge("A", "1", None)]);

        let partition = partition_cases_for_assessment(
            &cases,
            &charges,
            Some(date(2024, 1, 1)),
            date(2024, 2, 1),
        );

        assert_eq!(partition.relevant_cases.len(), 1);
        assert_eq!(partition.relevant_charges_for(&CaseId::from("A")).len(), 1);
        assert_eq!(partition.summary().relevant_charges, 1);
        assert!(partition.other_cases.is_empty());
    }

    #[test]
    fn duplicate_case_ids_are_reported_once_without_a_reference() {
        let cases = vec![case("A"), case("B"), case("A")];
        let partition =
            partition_cases_for_assessment(&cases, &BTreeMap::new(), None, date(2024, 2, 1));

        let ids: Vec<&str> = partition
            .other_cases
            .iter()
            .map(|case| case.case_id.as_str())
            .collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn charges_disposed_before_reference_are_other() {
        let cases = vec![case("B")];
        let mut charges = BTreeMap::new();
        charges.insert(
            CaseId::from("B"),
            vec![charge("B", "1", Some(date(2023, 12, 31)))],
        );

        let partition = partition_cases_for_assessment(
            &cases,
            &charges,
            Some(date(2024, 1, 1)),
            date(2024, 2, 1),
        );

        assert!(partition.relevant_cases.is_empty());
        assert_eq!(partition.other_cases, cases);
    }
}
