//! Error handling tests for the input file reader and writer.
//!
//! Every failure must carry the right variant, its taxonomy kind and,
//! where the input has one, the 1-based line it refers to.

use agepro_input::{CodecConfig, Error, ErrorKind, ScenarioDocument};

/// Line numbers used below: [RECRUIT] is line 41, its model-number line 43,
/// the probability rows 44-46, [OPTIONS] line 52.
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

const RECRUIT_HEADER: &str = "1000  1000  500\n3\n1\n1\n1\n";

/// Helper to verify that reading fails.
fn read_err(text: &str, config: &CodecConfig) -> Error {
    match ScenarioDocument::from_text(text, config) {
        Ok(_) => panic!("Expected a read error, but reading succeeded"),
        Err(err) => err,
    }
}

fn lenient_err(text: &str) -> Error {
    read_err(text, &CodecConfig::default())
}

// =============================================================================
// Version line
// =============================================================================

#[test]
fn test_incompatible_version() {
    let err = lenient_err(&BASE.replace("VERSION 4.0", "VERSION 3.2"));
    assert_eq!(
        err,
        Error::IncompatibleVersion {
            line: 1,
            found: "AGEPRO VERSION 3.2".to_string()
        }
    );
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[test]
fn test_unknown_version() {
    let err = lenient_err(&BASE.replace("VERSION 4.0", "VERSION 5.0"));
    assert!(matches!(err, Error::UnknownVersion { line: 1, .. }));
}

#[test]
fn test_empty_input_is_truncated() {
    assert_eq!(lenient_err(""), Error::TruncatedInput { line: 0 });
}

// =============================================================================
// Section dispatch
// =============================================================================

#[test]
fn test_section_before_general() {
    let err = lenient_err("AGEPRO VERSION 4.0\n[BOOTSTRAP]\n100  1000\ncase.bsn\n");
    assert_eq!(
        err,
        Error::GeneralNotParsed {
            line: 2,
            tag: "BOOTSTRAP".to_string()
        }
    );
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_general_is_required() {
    let err = lenient_err("AGEPRO VERSION 4.0\n[CASEID]\nno general here\n");
    assert_eq!(
        err,
        Error::MissingSection {
            tag: "GENERAL".to_string()
        }
    );
}

#[test]
fn test_general_may_appear_only_once() {
    let text = BASE.replace(
        "[OPTIONS]",
        "[GENERAL]\n1990  1992  1  4  100  1  1  0  42\n[OPTIONS]",
    );
    let err = lenient_err(&text);
    assert_eq!(
        err,
        Error::DuplicateSection {
            line: 52,
            tag: "GENERAL".to_string()
        }
    );
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert_eq!(err.line(), Some(52));
}

#[test]
fn test_mandatory_sections_are_required() {
    let err = lenient_err(&BASE.replace("[HARVEST]\n0  0  0\n0.5  0.5  0.5\n", ""));
    assert_eq!(
        err,
        Error::MissingSection {
            tag: "HARVEST".to_string()
        }
    );

    let err = lenient_err(
        "AGEPRO VERSION 4.0\n[GENERAL]\n1990  1992  1  3  100  1  1  0  42\n[OPTIONS]\n1  0  0\n",
    );
    assert_eq!(
        err,
        Error::MissingSection {
            tag: "BOOTSTRAP".to_string()
        }
    );
    assert_eq!(err.kind(), ErrorKind::InvalidModelState);
}

#[test]
fn test_discard_tables_are_required_when_modeled() {
    let text = BASE.replace("1  3  100  1  1  0  42", "1  3  100  1  1  1  42");
    assert_eq!(
        lenient_err(&text),
        Error::MissingSection {
            tag: "DISC_WEIGHT".to_string()
        }
    );
}

#[test]
fn test_unknown_section_lenient_and_strict() {
    let text = BASE.replace("[OPTIONS]", "[FLEETS]\n3  4\n[OPTIONS]");

    let document = ScenarioDocument::from_text(&text, &CodecConfig::default()).unwrap();
    let expected = ScenarioDocument::from_text(BASE, &CodecConfig::default()).unwrap();
    assert_eq!(document, expected);

    let err = read_err(&text, &CodecConfig::strict());
    assert_eq!(
        err,
        Error::UnknownSection {
            line: 52,
            tag: "FLEETS".to_string()
        }
    );
}

#[test]
fn test_stray_line_strict() {
    let text = format!("{BASE}trailing notes\n");
    assert!(ScenarioDocument::from_text(&text, &CodecConfig::default()).is_ok());

    let err = read_err(&text, &CodecConfig::strict());
    assert_eq!(
        err,
        Error::UnexpectedLine {
            line: 54,
            text: "trailing notes".to_string()
        }
    );
}

#[test]
fn test_rebuild_and_pstar_conflict() {
    let text = BASE.replace(
        "[OPTIONS]",
        "[REBUILD]\n1992  5000  0  60\n[PSTAR]\n1\n0.5\n0.25\n1992\n[OPTIONS]",
    );
    let err = lenient_err(&text);
    assert_eq!(
        err,
        Error::ConflictingAnalysis {
            line: 54,
            tag: "PSTAR".to_string()
        }
    );
}

#[test]
fn test_target_year_outside_projection() {
    let text = BASE.replace("[OPTIONS]", "[REBUILD]\n2005  5000  0  60\n[OPTIONS]");
    let err = lenient_err(&text);
    assert!(matches!(
        err,
        Error::TargetYearOutOfRange {
            line: 53,
            year: 2005,
            first: 1990,
            last: 1992
        }
    ));
    assert_eq!(err.kind(), ErrorKind::Ordering);
}

// =============================================================================
// Record format
// =============================================================================

#[test]
fn test_general_field_count() {
    let err = lenient_err(&BASE.replace("1  3  100  1  1  0  42", "1  3  100  1  1  0"));
    assert_eq!(
        err,
        Error::FieldCountMismatch {
            line: 5,
            expected: 9,
            found: 8
        }
    );
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_invalid_flag() {
    let err = lenient_err(&BASE.replace("[OPTIONS]\n1  0  0", "[OPTIONS]\n1  2  0"));
    assert_eq!(
        err,
        Error::InvalidFlag {
            line: 53,
            token: "2".to_string()
        }
    );
}

#[test]
fn test_number_format() {
    let err = lenient_err(&BASE.replace("0.2  0.2  0.2", "0.2  x0.2  0.2"));
    assert!(matches!(err, Error::NumberFormat { line: 27, ref token } if token == "x0.2"));
}

#[test]
fn test_truncated_section() {
    let cut = BASE.find("0.5  0.5  0.5").unwrap();
    let err = lenient_err(&BASE[..cut]);
    assert_eq!(err, Error::TruncatedInput { line: 50 });
}

#[test]
fn test_extreme_years_are_rejected() {
    let err = lenient_err(&BASE.replace("1990  1992  1  3", "-2147483648  2147483647  1  3"));
    assert_eq!(
        err,
        Error::DimensionTooLarge {
            line: 5,
            name: "projection year count",
            value: 4_294_967_296,
            max: 1000
        }
    );
    assert_eq!(err.kind(), ErrorKind::Ordering);
}

#[test]
fn test_catch_weight_option_outside_whitelist() {
    let err = lenient_err(&BASE.replace("[CATCH_WEIGHT]\n-3  0", "[CATCH_WEIGHT]\n-4  0"));
    assert!(matches!(
        err,
        Error::InvalidOptionCode { line: 22, code: -4, ref table, .. } if table == "CATCH_WEIGHT"
    ));
}

// =============================================================================
// Recruitment
// =============================================================================

#[test]
fn test_probability_row_must_sum_to_one() {
    let text = BASE.replace(RECRUIT_HEADER, "1000  1000  500\n3\n1\n0.97\n1\n");
    let err = lenient_err(&text);
    assert!(matches!(
        err,
        Error::ProbabilityNormalization { line: 45, year: 1991, .. }
    ));
    assert_eq!(err.kind(), ErrorKind::Normalization);
}

#[test]
fn test_probability_tolerance() {
    let text = BASE.replace(RECRUIT_HEADER, "1000  1000  500\n3\n1\n1.000001\n1\n");
    assert!(ScenarioDocument::from_text(&text, &CodecConfig::default()).is_ok());
}

#[test]
fn test_model_count_mismatch() {
    let text = BASE
        .replace("100  1  1  0  42", "100  1  4  0  42")
        .replace(RECRUIT_HEADER, "1000  1000  500\n3  3  3\n");
    let err = lenient_err(&text);
    assert_eq!(
        err,
        Error::ModelCountMismatch {
            line: 43,
            expected: 4,
            found: 3
        }
    );
    assert_eq!(err.kind(), ErrorKind::CountMismatch);
}

#[test]
fn test_huge_observation_count_is_a_field_count_error() {
    let text = BASE.replace("\n3\n1200  1500  900", "\n1000000000000000000\n1200  1500  900");
    let err = lenient_err(&text);
    assert_eq!(
        err,
        Error::FieldCountMismatch {
            line: 48,
            expected: 1_000_000_000_000_000_000,
            found: 3
        }
    );
}

#[test]
fn test_duplicate_markov_model() {
    let text = BASE.replace("100  1  1  0  42", "100  1  3  0  42").replace(
        RECRUIT_HEADER,
        "1000  1000  500\n1  1  5\n0.5  0.25  0.25\n0.5  0.25  0.25\n0.5  0.25  0.25\n",
    );
    assert_eq!(lenient_err(&text), Error::DuplicateMarkovModel { count: 2 });
}

#[test]
fn test_unknown_model_number() {
    let text = BASE.replace(RECRUIT_HEADER, "1000  1000  500\n9\n1\n1\n1\n");
    let err = lenient_err(&text);
    assert_eq!(err, Error::UnknownModelNumber { number: 9 });
    assert_eq!(err.line(), None);
}

// =============================================================================
// Writing
// =============================================================================

#[test]
fn test_write_requires_discard_tables() {
    let mut document = ScenarioDocument::from_text(BASE, &CodecConfig::default()).unwrap();
    document.general.discards = true;

    let err = document.to_text().unwrap_err();
    assert_eq!(
        err,
        Error::MissingSection {
            tag: "DISC_WEIGHT".to_string()
        }
    );
    assert_eq!(err.kind(), ErrorKind::InvalidModelState);

    let report = document.validate(&CodecConfig::default());
    assert_eq!(report.len(), 2);
}

#[test]
fn test_write_blank_harvest_cell() {
    let mut document = ScenarioDocument::from_text(BASE, &CodecConfig::default()).unwrap();
    document.harvest.values.clear(1, 0);
    assert!(matches!(
        document.to_text(),
        Err(Error::BlankCell { row: 1, column: 0, .. })
    ));
    assert!(!document.validate(&CodecConfig::default()).is_valid());
}
