pub mod charges;
mod escalation;
mod matrix;
pub mod result;

pub use escalation::escalate_severity;
pub use matrix::{defined_cells, lookup_decision, MAX_SCALE, MIN_SCALE};

use super::domain::DmfRiskFactors;
use super::scoring::PsaScores;
use escalation::{apply_secondary_hold, apply_secondary_release};
use result::DmfResult;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Final recommendation plus the trail of adjustments applied to the table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmfDecision {
    pub base: DmfResult,
    pub result: DmfResult,
    pub step_two_increase: bool,
    pub step_four_increase: bool,
    pub secondary_release: bool,
    pub secondary_hold: bool,
}

impl DmfDecision {
    pub fn escalations(&self) -> usize {
        usize::from(self.step_two_increase) + usize::from(self.step_four_increase)
    }
}

/// Whether the step-2 increase applies: extradition, a step-2 charge, or an
/// NVCA flag on a violent current offense.
pub fn step_two_triggered(nvca_flag: bool, current_violent: bool, factors: &DmfRiskFactors) -> bool {
    factors.extradited || factors.step_two_charges || (nvca_flag && current_violent)
}

/// Whether the step-4 increase applies: a step-4 charge, or an NVCA flag on a
/// non-violent current offense.
pub fn step_four_triggered(
    nvca_flag: bool,
    current_violent: bool,
    factors: &DmfRiskFactors,
) -> bool {
    factors.step_four_charges || (nvca_flag && !current_violent)
}

/// Runs the table lookup and the escalation steps. `None` when the score
/// combination has no matrix entry.
pub fn calculate_dmf(
    scores: &PsaScores,
    current_violent: bool,
    factors: &DmfRiskFactors,
) -> Option<DmfDecision> {
    let base = lookup_decision(scores.nca, scores.fta, factors.context)?;
    let mut result = base;

    let step_two_increase = step_two_triggered(scores.nvca_flag, current_violent, factors);
    if step_two_increase {
        result = escalate_severity(result);
        debug!(color = ?result.color, "step two increase applied");
    }

    let step_four_increase = step_four_triggered(scores.nvca_flag, current_violent, factors);
    if step_four_increase {
        result = escalate_severity(result);
        debug!(color = ?result.color, "step four increase applied");
    }

    let released = apply_secondary_release(result);
    let secondary_release =
        factors.secondary_release_charges && !factors.secondary_hold_charges && released != result;
    if secondary_release {
        result = released;
        debug!("secondary release charges override hold");
    }

    let held = apply_secondary_hold(result);
    let secondary_hold = factors.secondary_hold_charges && held != result;
    if secondary_hold {
        result = held;
        debug!("secondary hold charges override release");
    }

    Some(DmfDecision {
        base,
        result,
        step_two_increase,
        step_four_increase,
        secondary_release,
        secondary_hold,
    })
}
