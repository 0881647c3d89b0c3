//! Tests for the harvest sections.

use super::*;
use crate::cursor::LineCursor;
use crate::error::{Error, ErrorKind};

#[test]
fn test_harvest_table_read_write() {
    let mut cursor = LineCursor::from_text("0 1 2\n0.5 1000 1200\n0.2 50 60\n");
    let table = HarvestTable::read(&mut cursor, 3, 2).unwrap();
    assert_eq!(
        table.specs,
        vec![
            HarvestSpec::FMultiplier,
            HarvestSpec::Landings,
            HarvestSpec::Removals
        ]
    );
    assert_eq!(table.values.get(1, 0), Some(1000.0));
    assert_eq!(table.values.get(2, 1), Some(60.0));
    assert!(table.validate(3, 2).is_valid());

    let mut lines = Vec::new();
    table.write(&mut lines).unwrap();
    assert_eq!(lines, vec!["0  1  2", "0.5  1000  1200", "0.2  50  60"]);
}

#[test]
fn test_harvest_rejects_unknown_spec_code() {
    let mut cursor = LineCursor::from_text("0 3\n1 1\n");
    let err = HarvestTable::read(&mut cursor, 2, 1).unwrap_err();
    assert!(matches!(err, Error::InvalidOptionCode { line: 1, code: 3, .. }));
}

#[test]
fn test_harvest_new_case_is_valid() {
    let table = HarvestTable::new_case(4, 2);
    assert!(table.validate(4, 2).is_valid());
    assert!(!table.validate(5, 2).is_valid());
}

#[test]
fn test_rebuilder_read_write() {
    let mut cursor = LineCursor::from_text("2000 25000 0 60\n");
    let target = RebuilderTarget::read(&mut cursor, 1990..=2005).unwrap();
    assert_eq!(target.target_type, TargetType::SpawningBiomass);
    assert_eq!(target.confidence, 60.0);

    let mut lines = Vec::new();
    target.write(&mut lines);
    assert_eq!(lines, vec!["2000  25000  0  60"]);
}

#[test]
fn test_rebuilder_target_year_outside_projection() {
    let mut cursor = LineCursor::from_text("2010 25000 0 60\n");
    let err = RebuilderTarget::read(&mut cursor, 1990..=2005).unwrap_err();
    assert_eq!(
        err,
        Error::TargetYearOutOfRange {
            line: 1,
            year: 2010,
            first: 1990,
            last: 2005
        }
    );
    assert_eq!(err.kind(), ErrorKind::Ordering);
}

#[test]
fn test_rebuilder_validation() {
    let target = RebuilderTarget {
        target_year: 2001,
        target_value: 1.0,
        target_type: TargetType::MeanBiomass,
        confidence: 150.0,
    };
    let report = target.validate(1990..=2000);
    assert_eq!(report.len(), 2);
}

#[test]
fn test_pstar_read_write() {
    let mut cursor = LineCursor::from_text("3\n0.1 0.3 0.5\n0.25\n1995\n");
    let pstar = PStarAnalysis::read(&mut cursor, 1990..=2000).unwrap();
    assert_eq!(pstar.levels, vec![0.1, 0.3, 0.5]);
    assert!(pstar.validate(1990..=2000).is_valid());

    let mut lines = Vec::new();
    pstar.write(&mut lines);
    assert_eq!(lines, vec!["3", "0.1  0.3  0.5", "0.25", "1995"]);
}

#[test]
fn test_pstar_levels_must_ascend() {
    let pstar = PStarAnalysis {
        levels: vec![0.1, 0.5, 0.3],
        overfishing_f: 0.25,
        target_year: 1995,
    };
    let report = pstar.validate(1990..=2000);
    assert_eq!(report.messages, vec!["P-star levels must be in ascending order"]);

    let pstar = PStarAnalysis {
        levels: vec![0.1, 0.3, 0.5],
        ..pstar
    };
    assert!(pstar.validate(1990..=2000).is_valid());
}

#[test]
fn test_calculation_analysis_type() {
    assert_eq!(
        HarvestCalculation::default().analysis_type(),
        AnalysisType::Standard
    );
    let pstar = HarvestCalculation::PStar(PStarAnalysis {
        levels: vec![0.5],
        overfishing_f: 0.2,
        target_year: 1990,
    });
    assert_eq!(pstar.analysis_type(), AnalysisType::PStar);
    assert_eq!(pstar.tag(), Some("PSTAR"));
}
