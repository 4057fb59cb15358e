use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const CHARGE_ID_SEPARATOR: char = '|';

/// Court case identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CaseId(pub String);

impl CaseId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CaseId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChargeIdError {
    #[error("charge id '{0}' is missing the case separator '|'")]
    MissingSeparator(String),
    #[error("charge id '{0}' has an empty case id")]
    EmptyCaseId(String),
    #[error("charge id '{0}' has an empty sequence")]
    EmptySequence(String),
}

/// Charge identifier of the form `caseId|sequence`. The case id may itself
/// contain the separator; the sequence is whatever follows the last one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChargeId {
    pub case_id: CaseId,
    pub sequence: String,
}

impl ChargeId {
    pub fn new(case_id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            case_id: CaseId(case_id.into()),
            sequence: sequence.into(),
        }
    }
}

impl FromStr for ChargeId {
    type Err = ChargeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let (case_id, sequence) = raw
            .rsplit_once(CHARGE_ID_SEPARATOR)
            .ok_or_else(|| ChargeIdError::MissingSeparator(raw.to_string()))?;

        if case_id.trim().is_empty() {
            return Err(ChargeIdError::EmptyCaseId(raw.to_string()));
        }
        if sequence.trim().is_empty() {
            return Err(ChargeIdError::EmptySequence(raw.to_string()));
        }

        Ok(Self::new(case_id.trim(), sequence.trim()))
    }
}

impl fmt::Display for ChargeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.case_id, CHARGE_ID_SEPARATOR, self.sequence)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub case_id: CaseId,
    pub file_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeRecord {
    pub charge_id: ChargeId,
    pub description: Option<String>,
    pub statute: Option<String>,
    pub disposition_date: Option<NaiveDate>,
}

impl ChargeRecord {
    pub fn case_id(&self) -> &CaseId {
        &self.charge_id.case_id
    }

    /// Pending means undisposed, or disposed inside the assessment window.
    pub fn is_pending_within(&self, window: &AssessmentWindow) -> bool {
        match self.disposition_date {
            None => true,
            Some(date) => window.contains(date),
        }
    }
}

/// Half-open date range `[reference, closure)` anchoring an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentWindow {
    pub reference: NaiveDate,
    pub closure: NaiveDate,
}

impl AssessmentWindow {
    pub fn new(reference: NaiveDate, closure: NaiveDate) -> Self {
        Self { reference, closure }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.reference <= date && date < self.closure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn charge_id_splits_on_last_separator() {
        let id: ChargeId = "CR19-1042|3".parse().expect("charge id parses");
        assert_eq!(id.case_id, CaseId::from("CR19-1042"));
        assert_eq!(id.sequence, "3");
        assert_eq!(id.to_string(), "CR19-1042|3");

        let nested: ChargeId = "49CRI|19|0042|1".parse().expect("nested id parses");
        assert_eq!(nested.case_id.as_str(), "49CRI|19|0042");
        assert_eq!(nested.sequence, "1");
    }

    #[test]
    fn charge_id_rejects_malformed_values() {
        assert_eq!(
            "CR19-1042".parse::<ChargeId>(),
            Err(ChargeIdError::MissingSeparator("CR19-1042".to_string()))
        );
        assert!(matches!(
            "|2".parse::<ChargeId>(),
            Err(ChargeIdError::EmptyCaseId(_))
        ));
        assert!(matches!(
            "CR19-1042| ".parse::<ChargeId>(),
            Err(ChargeIdError::EmptySequence(_))
        ));
    }

    #[test]
    fn window_is_half_open() {
        let window = AssessmentWindow::new(date(2024, 3, 1), date(2024, 3, 15));
        assert!(window.contains(date(2024, 3, 1)));
        assert!(window.contains(date(2024, 3, 14)));
        assert!(!window.contains(date(2024, 3, 15)));
        assert!(!window.contains(date(2024, 2, 29)));
    }
}
