use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decision point an assessment is made for; selects the matrix sub-table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DmfContext {
    Court,
    Booking,
}

impl DmfContext {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Court => "Court",
            Self::Booking => "Booking",
        }
    }

    /// Lenient parse used by intake, where unknown values fall back to a default.
    pub(crate) fn from_loose(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "court" | "court appearance" => Some(Self::Court),
            "booking" | "jail" => Some(Self::Booking),
            _ => None,
        }
    }
}

impl fmt::Display for DmfContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown decision context '{0}', expected court or booking")]
pub struct ContextParseError(pub String);

impl FromStr for DmfContext {
    type Err = ContextParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_loose(s).ok_or_else(|| ContextParseError(s.trim().to_string()))
    }
}

/// Severity tiers in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DmfColor {
    DarkGreen,
    LightGreen,
    Yellow,
    Orange,
    Red,
}

impl DmfColor {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::DarkGreen,
            Self::LightGreen,
            Self::Yellow,
            Self::Orange,
            Self::Red,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::DarkGreen => "Dark Green",
            Self::LightGreen => "Light Green",
            Self::Yellow => "Yellow",
            Self::Orange => "Orange",
            Self::Red => "Red",
        }
    }

    /// The next tier up; `Red` has none.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::DarkGreen => Some(Self::LightGreen),
            Self::LightGreen => Some(Self::Yellow),
            Self::Yellow => Some(Self::Orange),
            Self::Orange => Some(Self::Red),
            Self::Red => None,
        }
    }

    pub const fn release_type(self) -> ReleaseType {
        match self {
            Self::DarkGreen => ReleaseType::Release,
            Self::LightGreen | Self::Yellow | Self::Orange => ReleaseType::ReleaseWithConditions,
            Self::Red => ReleaseType::MaximumConditions,
        }
    }

    pub const fn conditions_level(self) -> Option<u8> {
        match self {
            Self::DarkGreen => Some(0),
            Self::LightGreen => Some(1),
            Self::Yellow => Some(2),
            Self::Orange => Some(3),
            Self::Red => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseType {
    Release,
    ReleaseWithConditions,
    MaximumConditions,
}

impl ReleaseType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Release => "Release",
            Self::ReleaseWithConditions => "Release with Conditions",
            Self::MaximumConditions => "Maximum Conditions",
        }
    }
}

/// Named release conditions a recommendation may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseCondition {
    Pr,
    PrRelease,
    EmOrBond,
    EmAndBond,
    CheckinMonthly,
    CheckinTwiceMonthly,
    CheckinWeekly,
    CheckinWeeklyAtLeast,
    IfApplicable247,
    HoldPendingJudicialReview,
}

impl ReleaseCondition {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pr => "PR",
            Self::PrRelease => "PR Release",
            Self::EmOrBond => "EM or Bond",
            Self::EmAndBond => "EM and Bond",
            Self::CheckinMonthly => "Check-in Monthly",
            Self::CheckinTwiceMonthly => "Check-in Twice Monthly",
            Self::CheckinWeekly => "Check-in Weekly",
            Self::CheckinWeeklyAtLeast => "Check-in Weekly (at least)",
            Self::IfApplicable247 => "If Applicable: 24/7",
            Self::HoldPendingJudicialReview => "Hold Pending Judicial Review",
        }
    }
}

/// A release recommendation. Values are never mutated; escalation and the
/// booking overrides build new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DmfResult {
    pub context: DmfContext,
    pub color: DmfColor,
    pub release_type: ReleaseType,
    pub conditions_level: Option<u8>,
    pub condition1: Option<ReleaseCondition>,
    pub condition2: Option<ReleaseCondition>,
    pub condition3: Option<ReleaseCondition>,
}

impl DmfResult {
    /// Result for `color` with the tier's release type and level and the given
    /// conditions (at most three are kept).
    pub(crate) fn with_conditions(
        context: DmfContext,
        color: DmfColor,
        conditions: &[ReleaseCondition],
    ) -> Self {
        let mut slots = conditions.iter().copied();
        Self {
            context,
            color,
            release_type: color.release_type(),
            conditions_level: color.conditions_level(),
            condition1: slots.next(),
            condition2: slots.next(),
            condition3: slots.next(),
        }
    }

    pub fn conditions(&self) -> Vec<ReleaseCondition> {
        [self.condition1, self.condition2, self.condition3]
            .into_iter()
            .flatten()
            .collect()
    }

    pub fn is_hold(&self) -> bool {
        self.condition1 == Some(ReleaseCondition::HoldPendingJudicialReview)
    }

    pub fn is_terminal(&self) -> bool {
        self.color == DmfColor::Red
    }

    pub fn summary(&self) -> String {
        let conditions = self
            .conditions()
            .into_iter()
            .map(ReleaseCondition::label)
            .collect::<Vec<_>>();

        let mut line = format!("{} / {}", self.color.label(), self.release_type.label());
        if let Some(level) = self.conditions_level {
            if self.release_type == ReleaseType::ReleaseWithConditions {
                line.push_str(&format!(" (level {level})"));
            }
        }
        if !conditions.is_empty() {
            line.push_str(": ");
            line.push_str(&conditions.join(", "));
        }
        line
    }
}
