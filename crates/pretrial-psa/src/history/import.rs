use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use tracing::warn;

use super::domain::{CaseId, CaseRecord, ChargeId, ChargeIdError, ChargeRecord};
use super::partition::{partition_cases_for_assessment, CaseHistoryPartition};

#[derive(Debug)]
pub enum CaseImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    ChargeId { row: usize, source: ChargeIdError },
    DispositionDate { row: usize, value: String },
}

impl std::fmt::Display for CaseImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseImportError::Io(err) => write!(f, "failed to read case export: {}", err),
            CaseImportError::Csv(err) => write!(f, "invalid case CSV data: {}", err),
            CaseImportError::ChargeId { row, source } => {
                write!(f, "charge row {}: {}", row, source)
            }
            CaseImportError::DispositionDate { row, value } => {
                write!(f, "charge row {}: unparseable disposition date '{}'", row, value)
            }
        }
    }
}

impl std::error::Error for CaseImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CaseImportError::Io(err) => Some(err),
            CaseImportError::Csv(err) => Some(err),
            CaseImportError::ChargeId { source, .. } => Some(source),
            CaseImportError::DispositionDate { .. } => None,
        }
    }
}

impl From<std::io::Error> for CaseImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CaseImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Imported cases with their charges grouped by the case id embedded in each
/// charge id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseHistory {
    pub cases: Vec<CaseRecord>,
    pub charges_by_case: BTreeMap<CaseId, Vec<ChargeRecord>>,
}

impl CaseHistory {
    pub fn partition(
        &self,
        reference_date: Option<NaiveDate>,
        closure_date: NaiveDate,
    ) -> CaseHistoryPartition {
        partition_cases_for_assessment(
            &self.cases,
            &self.charges_by_case,
            reference_date,
            closure_date,
        )
    }
}

pub struct CaseHistoryImporter;

impl CaseHistoryImporter {
    pub fn from_paths<P: AsRef<Path>, Q: AsRef<Path>>(
        cases: P,
        charges: Q,
    ) -> Result<CaseHistory, CaseImportError> {
        let cases = std::fs::File::open(cases)?;
        let charges = std::fs::File::open(charges)?;
        Self::from_readers(cases, charges)
    }

    pub fn from_readers<C: Read, H: Read>(
        cases: C,
        charges: H,
    ) -> Result<CaseHistory, CaseImportError> {
        let cases = parse_cases(cases)?;
        let known: BTreeSet<CaseId> = cases.iter().map(|case| case.case_id.clone()).collect();

        let mut charges_by_case: BTreeMap<CaseId, Vec<ChargeRecord>> = BTreeMap::new();
        for charge in parse_charges(charges)? {
            if !known.contains(charge.case_id()) {
                warn!(charge = %charge.charge_id, "dropping charge for unknown case");
                continue;
            }
            charges_by_case
                .entry(charge.case_id().clone())
                .or_default()
                .push(charge);
        }

        Ok(CaseHistory {
            cases,
            charges_by_case,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CaseRow {
    #[serde(rename = "Case ID")]
    case_id: String,
    #[serde(rename = "File Date", default, deserialize_with = "empty_string_as_none")]
    file_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChargeRow {
    #[serde(rename = "Charge ID")]
    charge_id: String,
    #[serde(rename = "Description", default, deserialize_with = "empty_string_as_none")]
    description: Option<String>,
    #[serde(rename = "Statute", default, deserialize_with = "empty_string_as_none")]
    statute: Option<String>,
    #[serde(
        rename = "Disposition Date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    disposition_date: Option<String>,
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn parse_cases<R: Read>(reader: R) -> Result<Vec<CaseRecord>, CaseImportError> {
    let mut cases = Vec::new();
    let mut seen = BTreeSet::new();

    for record in csv_reader(reader).deserialize::<CaseRow>() {
        let row = record?;
        if row.case_id.is_empty() {
            warn!("skipping case row without a case id");
            continue;
        }
        if !seen.insert(row.case_id.clone()) {
            warn!(case = %row.case_id, "dropping duplicate case row");
            continue;
        }

        cases.push(CaseRecord {
            file_date: row.file_date.as_deref().and_then(|raw| {
                parse_date_logged(raw, "file date", &row.case_id)
            }),
            case_id: CaseId(row.case_id),
        });
    }

    Ok(cases)
}

fn parse_charges<R: Read>(reader: R) -> Result<Vec<ChargeRecord>, CaseImportError> {
    let mut charges = Vec::new();

    for (index, record) in csv_reader(reader).deserialize::<ChargeRow>().enumerate() {
        let row = record?;
        // header is line 1
        let line = index + 2;
        let charge_id: ChargeId = row
            .charge_id
            .parse()
            .map_err(|source| CaseImportError::ChargeId { row: line, source })?;
        // A garbled disposition must not read as "not yet disposed".
        let disposition_date = match row.disposition_date {
            Some(raw) => Some(parse_date(&raw).ok_or(CaseImportError::DispositionDate {
                row: line,
                value: raw,
            })?),
            None => None,
        };

        charges.push(ChargeRecord {
            charge_id,
            description: row.description,
            statute: row.statute,
            disposition_date,
        });
    }

    Ok(charges)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_date_logged(raw: &str, field: &str, id: &str) -> Option<NaiveDate> {
    let parsed = parse_date(raw);
    if parsed.is_none() {
        warn!(%id, field, value = raw, "unparseable date treated as absent");
    }
    parsed
}

/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and `MM/DD/YYYY`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    NaiveDate::parse_from_str(trimmed, "%m/%d/%Y").ok()
}
