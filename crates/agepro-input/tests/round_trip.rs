//! Whole-file read/write tests.
//!
//! Canonical files must be reproduced byte for byte; non-canonical files
//! (blank lines, sections out of order) must read into the same document.

use agepro_input::harvest::{PStarAnalysis, RebuilderTarget, TargetType};
use agepro_input::options::{Bounds, Percentile, RefPoint, ReportScale, RetroAdjust};
use agepro_input::recruit::{EmpiricalKind, EmpiricalRecruitment};
use agepro_input::{
    AnalysisType, CodecConfig, FormatVersion, GeneralParameters, HarvestCalculation,
    LineCursor, RecruitmentModel, ScenarioDocument, TableKind,
};

/// Three years, three ages, one fleet, empirical recruitment (model 3).
const BASE: &str = "\
AGEPRO VERSION 4.0
[CASEID]
Georges Bank test stock
[GENERAL]
1990  1992  1  3  100  1  1  0  42
[BOOTSTRAP]
100  1000
case.bsn
[STOCK_WEIGHT]
0  0
0.1  0.5  1.2
0.1  0.1  0.1
[SSB_WEIGHT]
-1  0
0.1  0.5  1.2
0.1  0.1  0.1
[MEAN_WEIGHT]
0  0
0.2  0.6  1.3
0.1  0.1  0.1
[CATCH_WEIGHT]
-3  0
0.2  0.6  1.3
0.1  0.1  0.1
[NATMORT]
0  0
0.2  0.2  0.2
0  0  0
[BIOLOGICAL]
0
0.25
0.25
[MATURITY]
0  0
0.1  0.5  1
0  0  0
[FISHERY]
0  0
0.1  0.6  1
0  0  0
[RECRUIT]
1000  1000  500
3
1
1
1
3
1200  1500  900
[HARVEST]
0  0  0
0.5  0.5  0.5
[OPTIONS]
1  0  0
";

fn read(text: &str) -> ScenarioDocument {
    ScenarioDocument::from_text(text, &CodecConfig::default()).expect("file should read")
}

fn assert_round_trip(text: &str) -> ScenarioDocument {
    let document = read(text);
    assert_eq!(document.to_text().unwrap(), text);
    document
}

// =============================================================================
// Canonical files
// =============================================================================

#[test]
fn test_base_case_round_trips() {
    let document = assert_round_trip(BASE);
    assert_eq!(document.version, FormatVersion::V4_0);
    assert_eq!(document.case_id, "Georges Bank test stock");
    assert_eq!(document.general.year_sequence(), vec![1990, 1991, 1992]);
    assert_eq!(document.analysis_type(), AnalysisType::Standard);
    assert!(!document.has_refpoint());
    assert!(document.validate(&CodecConfig::default()).is_valid());
}

#[test]
fn test_empirical_recruitment_is_reproduced() {
    let document = read(BASE);
    let recruitment = &document.recruitment;
    assert_eq!(recruitment.model_numbers(), vec![3]);
    for year in 0..3 {
        assert_eq!(recruitment.probabilities.get(year, 0), Some(1.0));
    }
    let RecruitmentModel::Empirical(empirical) = &recruitment.models[0] else {
        panic!("expected an empirical model");
    };
    assert_eq!(empirical.kind, EmpiricalKind::Recruitment);
    assert_eq!(empirical.observations.column(0), vec![Some(1200.0), Some(1500.0), Some(900.0)]);
}

#[test]
fn test_weight_references_are_kept() {
    let document = read(BASE);
    assert_eq!(
        document.ssb_weight.weight_reference(),
        Some(TableKind::StockWeight)
    );
    assert_eq!(
        document.catch_weight.weight_reference(),
        Some(TableKind::MeanWeight)
    );
}

#[test]
fn test_version_4_25_round_trips() {
    let text = BASE.replace("AGEPRO VERSION 4.0", "AGEPRO VERSION 4.25");
    let document = assert_round_trip(&text);
    assert_eq!(document.version, FormatVersion::V4_25);
}

#[test]
fn test_discard_sections_round_trip() {
    let text = BASE
        .replace("1  3  100  1  1  0  42", "1  3  100  1  1  1  42")
        .replace(
            "[NATMORT]",
            "[DISC_WEIGHT]\n-4  0\n0.2  0.6  1.3\n0.1  0.1  0.1\n[NATMORT]",
        )
        .replace(
            "[RECRUIT]",
            "[DISCARD]\n0  0\n0.1  0.1  0.1\n0  0  0\n[RECRUIT]",
        );
    let document = assert_round_trip(&text);
    assert_eq!(
        document.discard_weight.as_ref().and_then(|t| t.weight_reference()),
        Some(TableKind::CatchWeight)
    );
    assert!(document.discard.is_some());
    assert!(document.validate(&CodecConfig::default()).is_valid());
}

#[test]
fn test_optional_sections_round_trip() {
    let text = BASE
        .replace(
            "[OPTIONS]",
            "[REBUILD]\n1992  5000  0  60\n[REFPOINT]\n5000  8000  7000  0.3\n[BOUNDS]\n10  1\n\
             [RETROADJUST]\n1  0.9  0.8\n[OPTIONS]",
        )
        .replace("1  0  0\n", "1  0  0\n[SCALE]\n1000  1000  1000\n[PERC]\n75\n");
    let document = assert_round_trip(&text);

    assert_eq!(document.analysis_type(), AnalysisType::Rebuilder);
    assert_eq!(
        document.calculation,
        HarvestCalculation::Rebuilder(RebuilderTarget {
            target_year: 1992,
            target_value: 5000.0,
            target_type: TargetType::SpawningBiomass,
            confidence: 60.0,
        })
    );
    assert_eq!(document.bounds, Some(Bounds::default()));
    assert_eq!(document.retro_adjust.as_ref().map(|r| r.factors.len()), Some(3));
    assert_eq!(document.scale, Some(ReportScale::default()));
    assert_eq!(document.percentile, Some(Percentile(75.0)));
    assert!(document.has_refpoint() && document.has_bounds() && document.has_percentile());
    assert!(document.validate(&CodecConfig::default()).is_valid());
}

#[test]
fn test_pstar_round_trips() {
    let text = BASE.replace("[OPTIONS]", "[PSTAR]\n3\n0.1  0.3  0.5\n0.25\n1992\n[OPTIONS]");
    let document = assert_round_trip(&text);
    assert_eq!(document.analysis_type(), AnalysisType::PStar);
}

// =============================================================================
// Non-canonical input
// =============================================================================

#[test]
fn test_blank_lines_between_sections_are_ignored() {
    let spaced = BASE.replace("\n[", "\n\n[");
    assert_eq!(read(&spaced), read(BASE));
}

#[test]
fn test_sections_read_in_any_order_after_general() {
    let options = "[OPTIONS]\n1  0  0\n";
    let harvest = "[HARVEST]\n0  0  0\n0.5  0.5  0.5\n";
    let caseid = "[CASEID]\nGeorges Bank test stock\n";
    let reordered = BASE
        .replace(options, "")
        .replace(harvest, "")
        .replace(caseid, "")
        .replace("[BOOTSTRAP]", &format!("{options}{harvest}[BOOTSTRAP]"))
        + caseid;
    assert_ne!(reordered, BASE);

    let document = read(&reordered);
    assert_eq!(document, read(BASE));
    assert_eq!(document.case_id, "Georges Bank test stock");
    assert!(document.options.summary_report);

    // Writing restores canonical order.
    assert_eq!(document.to_text().unwrap(), BASE);
}

#[test]
fn test_caseid_may_precede_general() {
    let document = read(BASE);
    let moved = BASE.replace(
        "[CASEID]\nGeorges Bank test stock\n[GENERAL]\n1990  1992  1  3  100  1  1  0  42\n",
        "[GENERAL]\n1990  1992  1  3  100  1  1  0  42\n[CASEID]\nGeorges Bank test stock\n",
    );
    assert_ne!(moved, BASE);
    assert_eq!(read(&moved), document);
}

#[test]
fn test_reader_accepts_crlf_and_extra_whitespace() {
    let messy = BASE.replace("0.1  0.5  1.2", " 0.1\t0.5   1.2 ").replace('\n', "\r\n");
    assert_eq!(read(&messy), read(BASE));
}

#[test]
fn test_cursor_over_owned_lines() {
    let lines: Vec<String> = BASE.lines().map(str::to_owned).collect();
    let mut cursor = LineCursor::from_lines(lines.clone());
    let document = ScenarioDocument::read(&mut cursor, &CodecConfig::default()).unwrap();
    assert_eq!(document.to_lines().unwrap(), lines);
}

// =============================================================================
// Programmatic construction
// =============================================================================

fn general() -> GeneralParameters {
    GeneralParameters {
        first_year: 1990,
        last_year: 1992,
        first_age: 1,
        last_age: 3,
        num_sims: 100,
        num_fleets: 1,
        num_recruit_models: 1,
        discards: false,
        seed: 42,
    }
}

#[test]
fn test_new_case_needs_model_selection_before_write() {
    let mut document = ScenarioDocument::new_case(general());
    assert!(document.to_text().is_err());

    let model = document.recruitment.select_model(0, 3).unwrap();
    let RecruitmentModel::Empirical(empirical) = model else {
        panic!("expected an empirical model");
    };
    *empirical = EmpiricalRecruitment::with_observations(EmpiricalKind::Recruitment, 2);
    empirical.observations.set(0, 0, 1200.0);
    empirical.observations.set(1, 0, 900.0);

    let text = document.to_text().unwrap();
    assert_eq!(read(&text), document);
}

#[test]
fn test_new_case_shapes_tables_from_general() {
    let mut parameters = general();
    parameters.num_fleets = 2;
    parameters.discards = true;
    let document = ScenarioDocument::new_case(parameters);
    for kind in TableKind::ALL {
        let table = document.table(kind).expect("discard tables are created");
        assert!(table.validate(3, 3, 2).is_valid(), "{kind:?} is misshaped");
    }
    assert_eq!(document.harvest.values.shape(), (3, 2));
    assert_eq!(document.recruitment.probabilities.shape(), (3, 1));
}

#[test]
fn test_document_validation_collects_every_problem() {
    let mut document = read(BASE);
    document.calculation = HarvestCalculation::PStar(PStarAnalysis {
        levels: vec![0.1, 0.5, 0.3],
        overfishing_f: 0.25,
        target_year: 1991,
    });
    document.refpoint = Some(RefPoint {
        f_threshold: -1.0,
        ..RefPoint::default()
    });
    document.retro_adjust = Some(RetroAdjust {
        factors: vec![1.0, 1.0],
    });

    let report = document.validate(&CodecConfig::default());
    assert_eq!(report.len(), 3);
    assert!(
        report
            .messages
            .contains(&"PSTAR: P-star levels must be in ascending order".to_string())
    );
    assert!(report.messages.iter().any(|m| m.starts_with("REFPOINT: ")));
    assert!(report.messages.iter().any(|m| m.starts_with("RETROADJUST: ")));
}

#[test]
fn test_document_serializes_to_json() {
    let document = read(BASE);
    let json = serde_json::to_string(&document).unwrap();
    let restored: ScenarioDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, document);
}
