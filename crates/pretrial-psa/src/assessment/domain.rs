use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::dmf::charges::{CurrentCharge, StepChargeFlags};
use super::dmf::result::DmfContext;

/// Age bracket at the time of arrest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeAtArrest {
    TwentyOrYounger,
    TwentyOneOrTwentyTwo,
    TwentyThreeOrOlder,
}

impl AgeAtArrest {
    fn from_raw(value: &str) -> Option<Self> {
        match squash(value).as_str() {
            "20oryounger" | "under21" | "20orless" | "0" => Some(Self::TwentyOrYounger),
            "21or22" | "2122" | "21to22" | "1" => Some(Self::TwentyOneOrTwentyTwo),
            "23orolder" | "23+" | "23ormore" | "2" => Some(Self::TwentyThreeOrOlder),
            _ => None,
        }
    }

    pub const fn is_twenty_two_or_younger(self) -> bool {
        !matches!(self, Self::TwentyThreeOrOlder)
    }
}

/// Count of prior violent convictions, capped at three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorViolentConvictions {
    None,
    One,
    Two,
    ThreeOrMore,
}

impl PriorViolentConvictions {
    pub const fn from_count(count: u32) -> Self {
        match count {
            0 => Self::None,
            1 => Self::One,
            2 => Self::Two,
            _ => Self::ThreeOrMore,
        }
    }
}

/// Failures to appear in the past two years, capped at two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorFailureToAppearRecent {
    None,
    One,
    TwoOrMore,
}

impl PriorFailureToAppearRecent {
    pub const fn from_count(count: u32) -> Self {
        match count {
            0 => Self::None,
            1 => Self::One,
            _ => Self::TwoOrMore,
        }
    }
}

/// Risk factor fields that may carry a free-text note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactorField {
    AgeAtArrest,
    CurrentViolentOffense,
    PendingCharge,
    PriorMisdemeanor,
    PriorFelony,
    PriorViolentConvictions,
    PriorFailureToAppearRecent,
    PriorFailureToAppearOld,
    PriorSentenceToIncarceration,
    Context,
    Extradited,
    StepTwoCharges,
    StepFourCharges,
    SecondaryReleaseCharges,
    SecondaryHoldCharges,
}

/// Normalized PSA risk factors for one assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub age_at_arrest: AgeAtArrest,
    pub current_violent_offense: bool,
    pub pending_charge: bool,
    pub prior_misdemeanor: bool,
    pub prior_felony: bool,
    pub prior_violent_convictions: PriorViolentConvictions,
    pub prior_fta_recent: PriorFailureToAppearRecent,
    pub prior_fta_old: bool,
    pub prior_sentence_to_incarceration: bool,
    pub notes: BTreeMap<RiskFactorField, String>,
}

impl Default for RiskFactors {
    fn default() -> Self {
        Self::from_raw(RawRiskFactors::default())
    }
}

impl RiskFactors {
    pub fn from_raw(raw: RawRiskFactors) -> Self {
        let mut notes = BTreeMap::new();
        keep_note(&mut notes, RiskFactorField::AgeAtArrest, raw.age_at_arrest_notes);
        keep_note(
            &mut notes,
            RiskFactorField::CurrentViolentOffense,
            raw.current_violent_offense_notes,
        );
        keep_note(&mut notes, RiskFactorField::PendingCharge, raw.pending_charge_notes);
        keep_note(&mut notes, RiskFactorField::PriorMisdemeanor, raw.prior_misdemeanor_notes);
        keep_note(&mut notes, RiskFactorField::PriorFelony, raw.prior_felony_notes);
        keep_note(
            &mut notes,
            RiskFactorField::PriorViolentConvictions,
            raw.prior_violent_convictions_notes,
        );
        keep_note(
            &mut notes,
            RiskFactorField::PriorFailureToAppearRecent,
            raw.prior_fta_recent_notes,
        );
        keep_note(&mut notes, RiskFactorField::PriorFailureToAppearOld, raw.prior_fta_old_notes);
        keep_note(
            &mut notes,
            RiskFactorField::PriorSentenceToIncarceration,
            raw.prior_sentence_to_incarceration_notes,
        );

        Self {
            age_at_arrest: raw
                .age_at_arrest
                .as_deref()
                .and_then(AgeAtArrest::from_raw)
                .unwrap_or(AgeAtArrest::TwentyThreeOrOlder),
            current_violent_offense: raw.current_violent_offense.unwrap_or(false),
            pending_charge: raw.pending_charge.unwrap_or(false),
            prior_misdemeanor: raw.prior_misdemeanor.unwrap_or(false),
            prior_felony: raw.prior_felony.unwrap_or(false),
            prior_violent_convictions: PriorViolentConvictions::from_count(
                raw.prior_violent_convictions
                    .as_ref()
                    .map(RawCount::value)
                    .unwrap_or(0),
            ),
            prior_fta_recent: PriorFailureToAppearRecent::from_count(
                raw.prior_fta_recent.as_ref().map(RawCount::value).unwrap_or(0),
            ),
            prior_fta_old: raw.prior_fta_old.unwrap_or(false),
            prior_sentence_to_incarceration: raw.prior_sentence_to_incarceration.unwrap_or(false),
            notes,
        }
    }

    pub fn prior_conviction(&self) -> bool {
        self.prior_misdemeanor || self.prior_felony
    }
}

/// Inputs the escalation steps consult on top of the PSA scales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmfRiskFactors {
    pub context: DmfContext,
    pub extradited: bool,
    pub step_two_charges: bool,
    pub step_four_charges: bool,
    pub secondary_release_charges: bool,
    pub secondary_hold_charges: bool,
    pub notes: BTreeMap<RiskFactorField, String>,
}

impl DmfRiskFactors {
    pub fn new(context: DmfContext) -> Self {
        Self {
            context,
            extradited: false,
            step_two_charges: false,
            step_four_charges: false,
            secondary_release_charges: false,
            secondary_hold_charges: false,
            notes: BTreeMap::new(),
        }
    }

    /// Normalizes raw answers. Step flags are set when either the answer says
    /// so or one of the listed current charges falls on the step list. The
    /// secondary release/hold flags only survive in booking context.
    pub fn from_raw(raw: RawDmfRiskFactors, default_context: DmfContext) -> Self {
        let context = raw
            .context
            .as_deref()
            .and_then(DmfContext::from_loose)
            .unwrap_or(default_context);
        let charge_flags = StepChargeFlags::from_charges(&raw.current_charges);
        let booking = context == DmfContext::Booking;

        let mut notes = BTreeMap::new();
        keep_note(&mut notes, RiskFactorField::Context, raw.context_notes);
        keep_note(&mut notes, RiskFactorField::Extradited, raw.extradited_notes);
        keep_note(&mut notes, RiskFactorField::StepTwoCharges, raw.step_two_charges_notes);
        keep_note(&mut notes, RiskFactorField::StepFourCharges, raw.step_four_charges_notes);
        keep_note(
            &mut notes,
            RiskFactorField::SecondaryReleaseCharges,
            raw.secondary_release_charges_notes,
        );
        keep_note(
            &mut notes,
            RiskFactorField::SecondaryHoldCharges,
            raw.secondary_hold_charges_notes,
        );

        Self {
            context,
            extradited: raw.extradited.unwrap_or(false),
            step_two_charges: raw.step_two_charges.unwrap_or(false) || charge_flags.step_two,
            step_four_charges: raw.step_four_charges.unwrap_or(false) || charge_flags.step_four,
            secondary_release_charges: booking && raw.secondary_release_charges.unwrap_or(false),
            secondary_hold_charges: booking && raw.secondary_hold_charges.unwrap_or(false),
            notes,
        }
    }
}

/// Count answers arrive either as numbers or as form labels such as "3 or more".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCount {
    Number(u32),
    Text(String),
}

impl RawCount {
    pub fn value(&self) -> u32 {
        match self {
            RawCount::Number(count) => *count,
            RawCount::Text(text) => {
                let digits: String = text
                    .trim()
                    .chars()
                    .take_while(|ch| ch.is_ascii_digit())
                    .collect();
                digits.parse().unwrap_or(0)
            }
        }
    }
}

/// Risk factor answers as submitted by the intake form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRiskFactors {
    pub age_at_arrest: Option<String>,
    pub age_at_arrest_notes: Option<String>,
    pub current_violent_offense: Option<bool>,
    pub current_violent_offense_notes: Option<String>,
    pub pending_charge: Option<bool>,
    pub pending_charge_notes: Option<String>,
    pub prior_misdemeanor: Option<bool>,
    pub prior_misdemeanor_notes: Option<String>,
    pub prior_felony: Option<bool>,
    pub prior_felony_notes: Option<String>,
    pub prior_violent_convictions: Option<RawCount>,
    pub prior_violent_convictions_notes: Option<String>,
    pub prior_fta_recent: Option<RawCount>,
    pub prior_fta_recent_notes: Option<String>,
    pub prior_fta_old: Option<bool>,
    pub prior_fta_old_notes: Option<String>,
    pub prior_sentence_to_incarceration: Option<bool>,
    pub prior_sentence_to_incarceration_notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDmfRiskFactors {
    pub context: Option<String>,
    pub context_notes: Option<String>,
    pub extradited: Option<bool>,
    pub extradited_notes: Option<String>,
    pub step_two_charges: Option<bool>,
    pub step_two_charges_notes: Option<String>,
    pub step_four_charges: Option<bool>,
    pub step_four_charges_notes: Option<String>,
    pub secondary_release_charges: Option<bool>,
    pub secondary_release_charges_notes: Option<String>,
    pub secondary_hold_charges: Option<bool>,
    pub secondary_hold_charges_notes: Option<String>,
    pub current_charges: Vec<CurrentCharge>,
}

/// A complete assessment document: PSA answers plus the DMF inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assessment {
    pub risk_factors: RawRiskFactors,
    pub dmf_risk_factors: RawDmfRiskFactors,
}

fn keep_note(
    notes: &mut BTreeMap<RiskFactorField, String>,
    field: RiskFactorField,
    note: Option<String>,
) {
    if let Some(note) = note.filter(|value| !value.trim().is_empty()) {
        notes.insert(field, note.trim().to_string());
    }
}

fn squash(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '_' && *ch != '-')
        .flat_map(char::to_lowercase)
        .collect()
}
