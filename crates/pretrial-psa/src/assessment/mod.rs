//! Risk factor intake, PSA scoring, and the release-conditions matrix.

pub mod dmf;
pub mod domain;
pub mod scoring;

#[cfg(test)]
mod tests;

pub use dmf::charges::{ChargeCategory, ChargeQualifier, CurrentCharge, StepChargeFlags};
pub use dmf::result::{
    ContextParseError, DmfColor, DmfContext, DmfResult, ReleaseCondition, ReleaseType,
};
pub use dmf::{calculate_dmf, escalate_severity, lookup_decision, DmfDecision};
pub use domain::{
    AgeAtArrest, Assessment, DmfRiskFactors, PriorFailureToAppearRecent,
    PriorViolentConvictions, RawCount, RawDmfRiskFactors, RawRiskFactors, RiskFactorField,
    RiskFactors,
};
pub use scoring::{PsaScores, ScoreBreakdown};

use crate::config::ScoringConfig;
use serde::Serialize;
use tracing::info;

/// Stateless engine that takes a raw assessment through intake, scoring and
/// the matrix.
#[derive(Debug, Clone, Default)]
pub struct DmfEngine {
    config: ScoringConfig,
}

impl DmfEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn default_context(&self) -> DmfContext {
        self.config.default_context
    }

    pub fn assess(&self, assessment: Assessment) -> AssessmentOutcome {
        let risk_factors = RiskFactors::from_raw(assessment.risk_factors);
        let dmf_risk_factors =
            DmfRiskFactors::from_raw(assessment.dmf_risk_factors, self.config.default_context);
        let breakdown = scoring::score(&risk_factors);

        let decision = calculate_dmf(
            &breakdown.scores,
            risk_factors.current_violent_offense,
            &dmf_risk_factors,
        );

        match &decision {
            Some(decision) => info!(
                nca = breakdown.scores.nca,
                fta = breakdown.scores.fta,
                context = %dmf_risk_factors.context,
                color = decision.result.color.label(),
                "release recommendation computed"
            ),
            None => info!(
                nca = breakdown.scores.nca,
                fta = breakdown.scores.fta,
                context = %dmf_risk_factors.context,
                "no matrix entry for score combination"
            ),
        }

        AssessmentOutcome {
            risk_factors,
            dmf_risk_factors,
            breakdown,
            decision,
        }
    }
}

/// Output of a full assessment run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentOutcome {
    pub risk_factors: RiskFactors,
    pub dmf_risk_factors: DmfRiskFactors,
    pub breakdown: ScoreBreakdown,
    pub decision: Option<DmfDecision>,
}

impl AssessmentOutcome {
    pub fn scores(&self) -> PsaScores {
        self.breakdown.scores
    }

    pub fn recommendation(&self) -> Option<&DmfResult> {
        self.decision.as_ref().map(|decision| &decision.result)
    }

    pub fn summary(&self) -> String {
        match self.recommendation() {
            Some(result) => result.summary(),
            None => "no recommendation: score combination has no matrix entry".to_string(),
        }
    }
}
