use serde::{Deserialize, Serialize};

use super::domain::{AgeAtArrest, PriorFailureToAppearRecent, PriorViolentConvictions, RiskFactors};

const NVCA_FLAG_THRESHOLD: u8 = 4;

/// Scaled PSA outputs consumed by the release-conditions matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsaScores {
    pub nca: u8,
    pub fta: u8,
    pub nvca_flag: bool,
}

/// Raw point totals alongside the scaled scores, kept for audit output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub nca_points: u8,
    pub fta_points: u8,
    pub nvca_points: u8,
    pub scores: PsaScores,
}

pub fn score(factors: &RiskFactors) -> ScoreBreakdown {
    let nca_points = nca_points(factors);
    let fta_points = fta_points(factors);
    let nvca_points = nvca_points(factors);

    ScoreBreakdown {
        nca_points,
        fta_points,
        nvca_points,
        scores: PsaScores {
            nca: scale_nca(nca_points),
            fta: scale_fta(fta_points),
            nvca_flag: nvca_points >= NVCA_FLAG_THRESHOLD,
        },
    }
}

fn violent_points(convictions: PriorViolentConvictions) -> u8 {
    match convictions {
        PriorViolentConvictions::None => 0,
        PriorViolentConvictions::One | PriorViolentConvictions::Two => 1,
        PriorViolentConvictions::ThreeOrMore => 2,
    }
}

fn nca_points(factors: &RiskFactors) -> u8 {
    let mut points = 0;
    if factors.age_at_arrest.is_twenty_two_or_younger() {
        points += 2;
    }
    if factors.pending_charge {
        points += 3;
    }
    if factors.prior_misdemeanor {
        points += 1;
    }
    if factors.prior_felony {
        points += 1;
    }
    points += violent_points(factors.prior_violent_convictions);
    points += match factors.prior_fta_recent {
        PriorFailureToAppearRecent::None => 0,
        PriorFailureToAppearRecent::One => 1,
        PriorFailureToAppearRecent::TwoOrMore => 2,
    };
    if factors.prior_sentence_to_incarceration {
        points += 2;
    }
    points
}

fn fta_points(factors: &RiskFactors) -> u8 {
    let mut points = 0;
    if factors.pending_charge {
        points += 1;
    }
    if factors.prior_conviction() {
        points += 1;
    }
    points += match factors.prior_fta_recent {
        PriorFailureToAppearRecent::None => 0,
        PriorFailureToAppearRecent::One => 2,
        PriorFailureToAppearRecent::TwoOrMore => 4,
    };
    if factors.prior_fta_old {
        points += 1;
    }
    points
}

fn nvca_points(factors: &RiskFactors) -> u8 {
    let mut points = 0;
    if factors.current_violent_offense {
        points += 2;
        if factors.age_at_arrest == AgeAtArrest::TwentyOrYounger {
            points += 1;
        }
    }
    if factors.pending_charge {
        points += 1;
    }
    if factors.prior_conviction() {
        points += 1;
    }
    points + violent_points(factors.prior_violent_convictions)
}

fn scale_nca(points: u8) -> u8 {
    match points {
        0 => 1,
        1..=2 => 2,
        3..=4 => 3,
        5..=6 => 4,
        7..=8 => 5,
        _ => 6,
    }
}

fn scale_fta(points: u8) -> u8 {
    match points {
        0 => 1,
        1 => 2,
        2 => 3,
        3..=4 => 4,
        5..=6 => 5,
        _ => 6,
    }
}
