use chrono::{Local, NaiveDate};
use clap::Args;
use pretrial_psa::assessment::{
    calculate_dmf, Assessment, AssessmentOutcome, DmfContext, DmfDecision, DmfEngine,
    DmfRiskFactors, PsaScores,
};
use pretrial_psa::config::AppConfig;
use pretrial_psa::error::AppError;
use pretrial_psa::history::{
    self, CaseHistoryImporter, CaseHistoryPartition, CaseRecord, ChargeRecord,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::warn;

#[derive(Args, Debug, Default)]
pub(crate) struct DmfArgs {
    /// New Criminal Activity scale (1-6)
    #[arg(long)]
    pub(crate) nca: u8,
    /// Failure To Appear scale (1-6)
    #[arg(long)]
    pub(crate) fta: u8,
    /// Decision point (court or booking); defaults to PSA_DEFAULT_CONTEXT
    #[arg(long, value_parser = parse_context)]
    pub(crate) context: Option<DmfContext>,
    /// NVCA flag is set
    #[arg(long)]
    pub(crate) nvca: bool,
    /// Current offense is violent
    #[arg(long)]
    pub(crate) current_violent: bool,
    /// Subject was extradited on a current charge
    #[arg(long)]
    pub(crate) extradited: bool,
    /// A current charge is on the step-2 list
    #[arg(long)]
    pub(crate) step_two: bool,
    /// A current charge is on the step-4 list
    #[arg(long)]
    pub(crate) step_four: bool,
    /// Booking only: charges qualify for secondary release
    #[arg(long)]
    pub(crate) secondary_release: bool,
    /// Booking only: charges require a secondary hold
    #[arg(long)]
    pub(crate) secondary_hold: bool,
    /// Print JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Assessment document (JSON with risk_factors and dmf_risk_factors)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Context used when the document does not name one
    #[arg(long, value_parser = parse_context)]
    pub(crate) context: Option<DmfContext>,
    /// Print JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct HistoryArgs {
    /// Case export CSV (Case ID, File Date)
    #[arg(long)]
    pub(crate) cases: PathBuf,
    /// Charge export CSV (Charge ID, Description, Statute, Disposition Date)
    #[arg(long)]
    pub(crate) charges: PathBuf,
    /// Assessment reference date, usually the arrest date (YYYY-MM-DD or MM/DD/YYYY)
    #[arg(long)]
    pub(crate) reference: Option<String>,
    /// Date the assessment closed (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) closure: Option<NaiveDate>,
    /// Print JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

fn parse_context(raw: &str) -> Result<DmfContext, String> {
    raw.parse::<DmfContext>().map_err(|err| err.to_string())
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    history::parse_date(raw).ok_or_else(|| {
        format!("failed to parse '{raw}' (expected YYYY-MM-DD, MM/DD/YYYY or RFC 3339)")
    })
}

/// A reference date that does not parse is treated as missing.
fn reference_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?;
    match parse_date(raw) {
        Ok(date) => Some(date),
        Err(err) => {
            warn!(%err, "ignoring invalid reference date");
            None
        }
    }
}

/// A closure before the reference leaves an empty window; only undisposed
/// charges are then pending.
fn warn_if_window_empty(reference: Option<NaiveDate>, closure: NaiveDate) -> bool {
    match reference {
        Some(reference) if closure < reference => {
            warn!(%reference, %closure, "closure date precedes reference date");
            true
        }
        _ => false,
    }
}

#[derive(Debug, Serialize)]
struct DmfReport {
    scores: PsaScores,
    context: DmfContext,
    decision: Option<DmfDecision>,
}

fn dmf_report(args: &DmfArgs, config: &AppConfig) -> DmfReport {
    let context = args.context.unwrap_or(config.scoring.default_context);
    let scores = PsaScores {
        nca: args.nca,
        fta: args.fta,
        nvca_flag: args.nvca,
    };

    let mut factors = DmfRiskFactors::new(context);
    factors.extradited = args.extradited;
    factors.step_two_charges = args.step_two;
    factors.step_four_charges = args.step_four;
    factors.secondary_release_charges = args.secondary_release;
    factors.secondary_hold_charges = args.secondary_hold;

    DmfReport {
        scores,
        context,
        decision: calculate_dmf(&scores, args.current_violent, &factors),
    }
}

pub(crate) fn run_dmf(args: DmfArgs, config: &AppConfig) -> Result<(), AppError> {
    let report = dmf_report(&args, config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "NCA {} / FTA {} / NVCA {} ({})",
        report.scores.nca,
        report.scores.fta,
        if report.scores.nvca_flag { "yes" } else { "no" },
        report.context
    );
    render_decision(report.decision.as_ref());
    Ok(())
}

pub(crate) fn run_assess(args: AssessArgs, config: &AppConfig) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.input)?;
    let assessment: Assessment = serde_json::from_str(&raw)?;

    let mut scoring = config.scoring;
    if let Some(context) = args.context {
        scoring.default_context = context;
    }
    let outcome = DmfEngine::new(scoring).assess(assessment);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        render_outcome(&outcome);
    }
    Ok(())
}

pub(crate) fn run_history(args: HistoryArgs) -> Result<(), AppError> {
    let reference = reference_date(args.reference.as_deref());
    let closure = args
        .closure
        .unwrap_or_else(|| Local::now().date_naive());
    warn_if_window_empty(reference, closure);

    let history = CaseHistoryImporter::from_paths(&args.cases, &args.charges)?;
    let partition = history.partition(reference, closure);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&partition)?);
    } else {
        render_partition(&partition, reference, closure);
    }
    Ok(())
}

fn render_decision(decision: Option<&DmfDecision>) {
    let Some(decision) = decision else {
        println!("No recommendation: score combination has no matrix entry");
        return;
    };

    println!("Matrix entry: {}", decision.base.summary());
    if decision.step_two_increase {
        println!("- step 2 increase applied");
    }
    if decision.step_four_increase {
        println!("- step 4 increase applied");
    }
    if decision.secondary_release {
        println!("- secondary release charges: hold lifted");
    }
    if decision.secondary_hold {
        println!("- secondary hold charges: release held");
    }
    println!("Recommendation: {}", decision.result.summary());
}

fn render_outcome(outcome: &AssessmentOutcome) {
    let breakdown = &outcome.breakdown;
    println!("PSA scores");
    println!(
        "- NCA {} ({} points)",
        breakdown.scores.nca, breakdown.nca_points
    );
    println!(
        "- FTA {} ({} points)",
        breakdown.scores.fta, breakdown.fta_points
    );
    println!(
        "- NVCA flag {} ({} points)",
        if breakdown.scores.nvca_flag { "yes" } else { "no" },
        breakdown.nvca_points
    );
    println!("Context: {}", outcome.dmf_risk_factors.context);

    if !outcome.risk_factors.notes.is_empty() {
        println!("\nNotes");
        for (field, note) in &outcome.risk_factors.notes {
            println!("- {field:?}: {note}");
        }
    }

    println!();
    render_decision(outcome.decision.as_ref());
}

fn render_partition(
    partition: &CaseHistoryPartition,
    reference: Option<NaiveDate>,
    closure: NaiveDate,
) {
    match reference {
        Some(reference) => println!("Assessment window: {reference} -> {closure}"),
        None => println!("Assessment window: no reference date, nothing is pending"),
    }

    let summary = partition.summary();
    println!(
        "\nPending for this assessment: {} case(s), {} charge(s)",
        summary.relevant_cases, summary.relevant_charges
    );
    for case in &partition.relevant_cases {
        render_case(case, partition.relevant_charges_for(&case.case_id));
    }

    println!(
        "\nOther history: {} case(s), {} charge(s)",
        summary.other_cases, summary.other_charges
    );
    for case in &partition.other_cases {
        render_case(case, partition.other_charges_for(&case.case_id));
    }
}

fn render_case(case: &CaseRecord, charges: &[ChargeRecord]) {
    let filed = case
        .file_date
        .map(|date| date.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    println!("- {} (filed {})", case.case_id, filed);

    if charges.is_empty() {
        println!("    (no charge data)");
    }
    for charge in charges {
        let disposition = charge
            .disposition_date
            .map(|date| format!("disposed {date}"))
            .unwrap_or_else(|| "no disposition".to_string());
        println!(
            "    {} | {} | {}",
            charge.charge_id,
            charge.description.as_deref().unwrap_or("-"),
            disposition
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretrial_psa::assessment::DmfColor;
    use pretrial_psa::config::{AppEnvironment, ScoringConfig, TelemetryConfig};

    fn config(default_context: DmfContext) -> AppConfig {
        AppConfig {
            environment: AppEnvironment::Test,
            scoring: ScoringConfig { default_context },
            telemetry: TelemetryConfig {
                log_level: "info".to_string(),
            },
        }
    }

    #[test]
    fn dmf_report_uses_configured_context() {
        let args = DmfArgs {
            nca: 1,
            fta: 1,
            ..DmfArgs::default()
        };

        let report = dmf_report(&args, &config(DmfContext::Booking));

        assert_eq!(report.context, DmfContext::Booking);
        let decision = report.decision.expect("entry defined");
        assert_eq!(decision.result.color, DmfColor::DarkGreen);
    }

    #[test]
    fn dmf_report_applies_flags() {
        let args = DmfArgs {
            nca: 2,
            fta: 2,
            context: Some(DmfContext::Court),
            extradited: true,
            step_four: true,
            ..DmfArgs::default()
        };

        let report = dmf_report(&args, &config(DmfContext::Booking));

        let decision = report.decision.expect("entry defined");
        assert_eq!(decision.escalations(), 2);
        assert_eq!(decision.result.color, DmfColor::Orange);
    }

    #[test]
    fn out_of_range_scales_yield_no_recommendation() {
        let args = DmfArgs {
            nca: 9,
            fta: 2,
            ..DmfArgs::default()
        };

        assert!(dmf_report(&args, &config(DmfContext::Court)).decision.is_none());
    }

    #[test]
    fn invalid_reference_date_is_treated_as_missing() {
        assert_eq!(reference_date(None), None);
        assert_eq!(reference_date(Some("05/06/2024x")), None);
        assert_eq!(reference_date(Some("2024-13-45")), None);
        assert_eq!(
            reference_date(Some("2024-05-06")),
            NaiveDate::from_ymd_opt(2024, 5, 6)
        );
    }

    #[test]
    fn reference_date_accepts_export_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 6);
        assert_eq!(reference_date(Some("05/06/2024")), expected);
        assert_eq!(reference_date(Some("2024-05-06T08:15:00Z")), expected);
        assert_eq!(parse_date("05/06/2024").ok(), expected);
    }

    #[test]
    fn closure_before_reference_still_partitions() {
        let reference = NaiveDate::from_ymd_opt(2024, 5, 6).expect("valid date");
        let closure = NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date");
        assert!(warn_if_window_empty(Some(reference), closure));
        assert!(!warn_if_window_empty(Some(closure), reference));
        assert!(!warn_if_window_empty(None, closure));

        let cases = "Case ID,File Date\nCR-1,2024-05-01\n";
        let charges = "Charge ID,Description,Statute,Disposition Date\n\
CR-1|1,Theft,,\n\
CR-1|2,Trespass,,2024-05-03\n";
        let history = CaseHistoryImporter::from_readers(
            std::io::Cursor::new(cases),
            std::io::Cursor::new(charges),
        )
        .expect("import succeeds");

        let summary = history.partition(Some(reference), closure).summary();
        assert_eq!(summary.relevant_charges, 1);
        assert_eq!(summary.other_charges, 1);
    }

    #[test]
    fn context_parser_reports_unknown_values() {
        assert_eq!(parse_context("booking"), Ok(DmfContext::Booking));
        assert!(parse_context("arraignment")
            .expect_err("unknown context")
            .contains("arraignment"));
    }
}
