//! Release-conditions matrix keyed by NCA scale (rows) and FTA scale (columns).
//!
//! The table is sparse: combinations of a very low score on one scale with a
//! very high score on the other have no policy entry, and lookups for them
//! return `None`.

use super::result::{DmfColor, DmfContext, DmfResult, ReleaseCondition};
use ReleaseCondition::{
    CheckinMonthly, CheckinTwiceMonthly, CheckinWeekly, CheckinWeeklyAtLeast, EmOrBond,
    HoldPendingJudicialReview, IfApplicable247, Pr, PrRelease,
};

pub const MIN_SCALE: u8 = 1;
pub const MAX_SCALE: u8 = 6;

#[derive(Debug, Clone, Copy)]
struct Cell {
    color: DmfColor,
    conditions: &'static [ReleaseCondition],
}

const fn cell(color: DmfColor, conditions: &'static [ReleaseCondition]) -> Option<Cell> {
    Some(Cell { color, conditions })
}

const DG_PR: Option<Cell> = cell(DmfColor::DarkGreen, &[Pr]);
const LG_MONTHLY: Option<Cell> = cell(DmfColor::LightGreen, &[Pr, CheckinMonthly]);
const LG_TWICE_MONTHLY: Option<Cell> = cell(DmfColor::LightGreen, &[Pr, CheckinTwiceMonthly]);
const YE_WEEKLY: Option<Cell> = cell(DmfColor::Yellow, &[Pr, CheckinWeekly]);
const YE_EM_OR_BOND: Option<Cell> = cell(DmfColor::Yellow, &[EmOrBond, CheckinTwiceMonthly]);
const OR_EM_OR_BOND: Option<Cell> = cell(
    DmfColor::Orange,
    &[EmOrBond, CheckinWeeklyAtLeast, IfApplicable247],
);
const RE_MAX: Option<Cell> = cell(DmfColor::Red, &[]);

#[rustfmt::skip]
const COURT_MATRIX: [[Option<Cell>; 6]; 6] = [
    // FTA:   1              2              3                 4                 5              6
    [DG_PR,      DG_PR,         LG_TWICE_MONTHLY, LG_TWICE_MONTHLY, None,          None         ], // NCA 1
    [DG_PR,      LG_MONTHLY,    LG_TWICE_MONTHLY, YE_WEEKLY,        YE_WEEKLY,     None         ], // NCA 2
    [LG_MONTHLY, LG_MONTHLY,    YE_WEEKLY,        YE_WEEKLY,        OR_EM_OR_BOND, OR_EM_OR_BOND], // NCA 3
    [None,       YE_EM_OR_BOND, YE_EM_OR_BOND,    OR_EM_OR_BOND,    OR_EM_OR_BOND, RE_MAX       ], // NCA 4
    [None,       YE_EM_OR_BOND, OR_EM_OR_BOND,    OR_EM_OR_BOND,    RE_MAX,        RE_MAX       ], // NCA 5
    [None,       None,          OR_EM_OR_BOND,    RE_MAX,           RE_MAX,        RE_MAX       ], // NCA 6
];

const DG_RELEASE: Option<Cell> = cell(DmfColor::DarkGreen, &[PrRelease]);
const LG_RELEASE: Option<Cell> = cell(DmfColor::LightGreen, &[PrRelease]);
const YE_RELEASE: Option<Cell> = cell(DmfColor::Yellow, &[PrRelease]);
const OR_HOLD: Option<Cell> = cell(DmfColor::Orange, &[HoldPendingJudicialReview]);
const RE_HOLD: Option<Cell> = cell(DmfColor::Red, &[HoldPendingJudicialReview]);

// Booking recommendations are a release/hold decision only.
#[rustfmt::skip]
const BOOKING_MATRIX: [[Option<Cell>; 6]; 6] = [
    // FTA:   1           2           3           4           5        6
    [DG_RELEASE, DG_RELEASE, LG_RELEASE, LG_RELEASE, None,       None   ], // NCA 1
    [DG_RELEASE, LG_RELEASE, LG_RELEASE, YE_RELEASE, YE_RELEASE, None   ], // NCA 2
    [LG_RELEASE, LG_RELEASE, YE_RELEASE, YE_RELEASE, OR_HOLD,    OR_HOLD], // NCA 3
    [None,       YE_RELEASE, YE_RELEASE, OR_HOLD,    OR_HOLD,    RE_HOLD], // NCA 4
    [None,       YE_RELEASE, OR_HOLD,    OR_HOLD,    RE_HOLD,    RE_HOLD], // NCA 5
    [None,       None,       OR_HOLD,    RE_HOLD,    RE_HOLD,    RE_HOLD], // NCA 6
];

const fn table(context: DmfContext) -> &'static [[Option<Cell>; 6]; 6] {
    match context {
        DmfContext::Court => &COURT_MATRIX,
        DmfContext::Booking => &BOOKING_MATRIX,
    }
}

fn scale_index(score: u8) -> Option<usize> {
    (MIN_SCALE..=MAX_SCALE)
        .contains(&score)
        .then(|| usize::from(score - MIN_SCALE))
}

/// Looks up the recommendation for an NCA/FTA pair. Undefined cells and
/// out-of-range scores yield `None`, meaning no recommendation.
pub fn lookup_decision(nca: u8, fta: u8, context: DmfContext) -> Option<DmfResult> {
    let row = scale_index(nca)?;
    let column = scale_index(fta)?;
    let entry = table(context)[row][column]?;

    Some(DmfResult::with_conditions(
        context,
        entry.color,
        entry.conditions,
    ))
}

/// Every defined cell of the context's table as `(nca, fta, result)`, in row order.
pub fn defined_cells(context: DmfContext) -> Vec<(u8, u8, DmfResult)> {
    (MIN_SCALE..=MAX_SCALE)
        .flat_map(|nca| (MIN_SCALE..=MAX_SCALE).map(move |fta| (nca, fta)))
        .filter_map(|(nca, fta)| {
            lookup_decision(nca, fta, context).map(|result| (nca, fta, result))
        })
        .collect()
}

/// Conditions a freshly escalated result carries for `color`.
pub(crate) const fn canonical_conditions(
    context: DmfContext,
    color: DmfColor,
) -> &'static [ReleaseCondition] {
    match (context, color) {
        (DmfContext::Court, DmfColor::DarkGreen) => &[Pr],
        (DmfContext::Court, DmfColor::LightGreen) => &[Pr, CheckinMonthly],
        (DmfContext::Court, DmfColor::Yellow) => &[Pr, CheckinWeekly],
        (DmfContext::Court, DmfColor::Orange) => {
            &[EmOrBond, CheckinWeeklyAtLeast, IfApplicable247]
        }
        (DmfContext::Court, DmfColor::Red) => &[],
        (DmfContext::Booking, DmfColor::DarkGreen)
        | (DmfContext::Booking, DmfColor::LightGreen)
        | (DmfContext::Booking, DmfColor::Yellow) => &[PrRelease],
        (DmfContext::Booking, DmfColor::Orange) | (DmfContext::Booking, DmfColor::Red) => {
            &[HoldPendingJudicialReview]
        }
    }
}
