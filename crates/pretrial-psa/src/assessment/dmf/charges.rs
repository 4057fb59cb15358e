use serde::{Deserialize, Serialize};

/// Statute categories the escalation steps care about. Anything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeCategory {
    Escape,
    MurderFirstDegree,
    MurderSecondDegree,
    RapeFirstDegree,
    RapeSecondDegree,
    RobberyFirstDegree,
    RobberySecondDegree,
    KidnappingFirstDegree,
    KidnappingSecondDegree,
    DomesticViolence,
    Stalking,
    ProtectionOrderViolation,
    AggravatedAssault,
    SexualContactWithMinor,
    SexOffenseAgainstVulnerableAdult,
    ArsonFirstDegree,
    OffenseResultingInDeath,
    OffenseInvolvingWeapon,
    #[serde(other)]
    Other,
}

/// How the charge relates to the listed offense. Attempts and pretrial
/// failures to appear on a listed offense count the same as the offense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeQualifier {
    #[default]
    Completed,
    Attempt,
    PretrialFailureToAppear,
}

pub const STEP_TWO_CATEGORIES: [ChargeCategory; 7] = [
    ChargeCategory::Escape,
    ChargeCategory::MurderFirstDegree,
    ChargeCategory::MurderSecondDegree,
    ChargeCategory::RapeFirstDegree,
    ChargeCategory::RapeSecondDegree,
    ChargeCategory::RobberyFirstDegree,
    ChargeCategory::KidnappingFirstDegree,
];

pub const STEP_FOUR_CATEGORIES: [ChargeCategory; 11] = [
    ChargeCategory::DomesticViolence,
    ChargeCategory::Stalking,
    ChargeCategory::ProtectionOrderViolation,
    ChargeCategory::AggravatedAssault,
    ChargeCategory::SexualContactWithMinor,
    ChargeCategory::SexOffenseAgainstVulnerableAdult,
    ChargeCategory::ArsonFirstDegree,
    ChargeCategory::RobberySecondDegree,
    ChargeCategory::KidnappingSecondDegree,
    ChargeCategory::OffenseResultingInDeath,
    ChargeCategory::OffenseInvolvingWeapon,
];

impl ChargeCategory {
    pub fn is_step_two(self) -> bool {
        STEP_TWO_CATEGORIES.contains(&self)
    }

    pub fn is_step_four(self) -> bool {
        STEP_FOUR_CATEGORIES.contains(&self)
    }
}

/// A charge on the arrest being assessed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentCharge {
    #[serde(default)]
    pub statute: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub category: ChargeCategory,
    #[serde(default)]
    pub qualifier: ChargeQualifier,
}

impl CurrentCharge {
    pub fn new(category: ChargeCategory, qualifier: ChargeQualifier) -> Self {
        Self {
            statute: None,
            description: None,
            category,
            qualifier,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StepChargeFlags {
    pub step_two: bool,
    pub step_four: bool,
}

impl StepChargeFlags {
    pub fn from_charges(charges: &[CurrentCharge]) -> Self {
        Self {
            step_two: charges.iter().any(|charge| charge.category.is_step_two()),
            step_four: charges.iter().any(|charge| charge.category.is_step_four()),
        }
    }
}
