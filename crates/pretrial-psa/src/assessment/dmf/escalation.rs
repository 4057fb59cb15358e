use super::matrix::canonical_conditions;
use super::result::{DmfContext, DmfResult, ReleaseCondition};

/// Moves a recommendation one tier up. Colour, release type and conditions
/// level advance together and the conditions become the new tier's standard
/// set for the result's context. Red is a fixed point.
pub fn escalate_severity(result: DmfResult) -> DmfResult {
    match result.color.next() {
        Some(color) => DmfResult::with_conditions(
            result.context,
            color,
            canonical_conditions(result.context, color),
        ),
        None => result,
    }
}

/// Booking only: a hold recommendation becomes a PR release.
pub(crate) fn apply_secondary_release(result: DmfResult) -> DmfResult {
    if result.context != DmfContext::Booking || !result.is_hold() {
        return result;
    }

    DmfResult {
        condition1: Some(ReleaseCondition::PrRelease),
        ..result
    }
}

/// Booking only: a release recommendation becomes a hold pending judicial review.
pub(crate) fn apply_secondary_hold(result: DmfResult) -> DmfResult {
    if result.context != DmfContext::Booking
        || result.condition1 != Some(ReleaseCondition::PrRelease)
    {
        return result;
    }

    DmfResult {
        condition1: Some(ReleaseCondition::HoldPendingJudicialReview),
        ..result
    }
}
