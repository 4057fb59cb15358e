use crate::assessment::domain::DmfRiskFactors;
use crate::assessment::dmf::result::{DmfContext, DmfResult};
use crate::assessment::dmf::lookup_decision;
use crate::assessment::scoring::PsaScores;

pub(super) fn scores(nca: u8, fta: u8, nvca_flag: bool) -> PsaScores {
    PsaScores {
        nca,
        fta,
        nvca_flag,
    }
}

pub(super) fn court_factors() -> DmfRiskFactors {
    DmfRiskFactors::new(DmfContext::Court)
}

pub(super) fn booking_factors() -> DmfRiskFactors {
    DmfRiskFactors::new(DmfContext::Booking)
}

pub(super) fn entry(nca: u8, fta: u8, context: DmfContext) -> DmfResult {
    lookup_decision(nca, fta, context).expect("matrix entry defined")
}
