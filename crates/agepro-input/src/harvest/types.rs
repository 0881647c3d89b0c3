//! Harvest type definitions and section codecs.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::cursor::{LineCursor, LineSink, join_fields};
use crate::error::{Error, Result};
use crate::table::Matrix;
use crate::validate::ValidationReport;

/// How a year's harvest value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarvestSpec {
    /// Multiplier on fishing mortality.
    FMultiplier,
    /// Landings quota.
    Landings,
    /// Total removals (landings plus discards).
    Removals,
}

impl HarvestSpec {
    pub const CODES: [i64; 3] = [0, 1, 2];

    pub fn code(self) -> i64 {
        match self {
            HarvestSpec::FMultiplier => 0,
            HarvestSpec::Landings => 1,
            HarvestSpec::Removals => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(HarvestSpec::FMultiplier),
            1 => Some(HarvestSpec::Landings),
            2 => Some(HarvestSpec::Removals),
            _ => None,
        }
    }
}

/// Contents of the `[HARVEST]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HarvestTable {
    /// One entry per projection year.
    pub specs: Vec<HarvestSpec>,
    /// One row per projection year, one column per fleet.
    pub values: Matrix,
}

impl HarvestTable {
    /// F-multiplier harvest of zero in every year for every fleet.
    pub fn new_case(num_years: usize, num_fleets: usize) -> Self {
        Self {
            specs: vec![HarvestSpec::FMultiplier; num_years],
            values: Matrix::filled(num_years, num_fleets, 0.0),
        }
    }

    pub fn read(cursor: &mut LineCursor<'_>, num_years: usize, num_fleets: usize) -> Result<Self> {
        let record = cursor.next_record()?;
        let codes: Vec<i64> = record.parse_all(num_years)?;
        let specs = codes
            .into_iter()
            .map(|code| {
                HarvestSpec::from_code(code).ok_or_else(|| Error::InvalidOptionCode {
                    line: record.line(),
                    table: "HARVEST".to_string(),
                    code,
                    allowed: HarvestSpec::CODES.to_vec(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let values = Matrix::read_transposed(cursor, num_years, num_fleets)?;
        Ok(Self { specs, values })
    }

    pub fn write(&self, sink: &mut dyn LineSink) -> Result<()> {
        sink.push_line(join_fields(self.specs.iter().map(|s| s.code())));
        self.values.write_transposed("harvest values", sink)
    }

    pub fn validate(&self, num_years: usize, num_fleets: usize) -> ValidationReport {
        let mut report = ValidationReport::new();
        report.require(self.specs.len() == num_years, || {
            format!(
                "{} harvest specifications, expected {num_years}",
                self.specs.len()
            )
        });
        if self.values.shape() != (num_years, num_fleets) {
            report.push(format!(
                "harvest value table is {}x{}, expected {num_years}x{num_fleets}",
                self.values.rows(),
                self.values.columns()
            ));
        } else {
            report.require(self.values.is_complete(), || {
                "harvest value table has blank cells".to_string()
            });
            report.require(self.values.cells().iter().flatten().all(|v| *v >= 0.0), || {
                "harvest values must not be negative".to_string()
            });
        }
        report
    }
}

/// Biomass measure a rebuilding target refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetType {
    SpawningBiomass,
    StockBiomass,
    MeanBiomass,
}

impl TargetType {
    pub const CODES: [i64; 3] = [0, 1, 2];

    pub fn code(self) -> i64 {
        match self {
            TargetType::SpawningBiomass => 0,
            TargetType::StockBiomass => 1,
            TargetType::MeanBiomass => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(TargetType::SpawningBiomass),
            1 => Some(TargetType::StockBiomass),
            2 => Some(TargetType::MeanBiomass),
            _ => None,
        }
    }
}

/// `[REBUILD]`: find the F that rebuilds the stock by a target year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebuilderTarget {
    pub target_year: i32,
    pub target_value: f64,
    pub target_type: TargetType,
    /// Percent confidence of reaching the target, 0-100.
    pub confidence: f64,
}

impl RebuilderTarget {
    pub fn read(cursor: &mut LineCursor<'_>, years: RangeInclusive<i32>) -> Result<Self> {
        let record = cursor.next_record()?;
        record.expect_len(4)?;
        let target_year: i32 = record.parse(0)?;
        check_target_year(target_year, &years, record.line())?;
        let code: i64 = record.parse(2)?;
        let target_type = TargetType::from_code(code).ok_or_else(|| Error::InvalidOptionCode {
            line: record.line(),
            table: "REBUILD".to_string(),
            code,
            allowed: TargetType::CODES.to_vec(),
        })?;
        Ok(Self {
            target_year,
            target_value: record.parse(1)?,
            target_type,
            confidence: record.parse(3)?,
        })
    }

    pub fn write(&self, sink: &mut dyn LineSink) {
        sink.push_line(join_fields([
            self.target_year.to_string(),
            self.target_value.to_string(),
            self.target_type.code().to_string(),
            self.confidence.to_string(),
        ]));
    }

    pub fn validate(&self, years: RangeInclusive<i32>) -> ValidationReport {
        let mut report = ValidationReport::new();
        report.require(years.contains(&self.target_year), || {
            format!(
                "rebuilder target year {} is outside the projection {}-{}",
                self.target_year,
                years.start(),
                years.end()
            )
        });
        report.require(self.target_value > 0.0, || {
            "rebuilder target value must be positive".to_string()
        });
        report.require((0.0..=100.0).contains(&self.confidence), || {
            format!(
                "rebuilder confidence {} must be between 0 and 100",
                self.confidence
            )
        });
        report
    }
}

/// `[PSTAR]`: harvest levels for a set of overfishing probabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PStarAnalysis {
    /// Probabilities of overfishing, non-decreasing.
    pub levels: Vec<f64>,
    pub overfishing_f: f64,
    pub target_year: i32,
}

impl PStarAnalysis {
    pub fn read(cursor: &mut LineCursor<'_>, years: RangeInclusive<i32>) -> Result<Self> {
        let count: usize = cursor.next_record()?.expect_len(1)?.parse(0)?;
        let levels: Vec<f64> = cursor.next_record()?.parse_all(count)?;
        let overfishing_f: f64 = cursor.next_record()?.expect_len(1)?.parse(0)?;
        let record = cursor.next_record()?;
        let target_year: i32 = record.expect_len(1)?.parse(0)?;
        check_target_year(target_year, &years, record.line())?;
        Ok(Self {
            levels,
            overfishing_f,
            target_year,
        })
    }

    pub fn write(&self, sink: &mut dyn LineSink) {
        sink.push_line(self.levels.len().to_string());
        sink.push_line(join_fields(&self.levels));
        sink.push_line(self.overfishing_f.to_string());
        sink.push_line(self.target_year.to_string());
    }

    pub fn validate(&self, years: RangeInclusive<i32>) -> ValidationReport {
        let mut report = ValidationReport::new();
        report.require(!self.levels.is_empty(), || {
            "P-star analysis needs at least one level".to_string()
        });
        report.require(self.levels.windows(2).all(|w| w[0] <= w[1]), || {
            "P-star levels must be in ascending order".to_string()
        });
        report.require(self.levels.iter().all(|p| *p > 0.0 && *p <= 1.0), || {
            "P-star levels must be probabilities in (0, 1]".to_string()
        });
        report.require(self.overfishing_f > 0.0, || {
            "P-star overfishing F must be positive".to_string()
        });
        report.require(years.contains(&self.target_year), || {
            format!(
                "P-star target year {} is outside the projection {}-{}",
                self.target_year,
                years.start(),
                years.end()
            )
        });
        report
    }
}

/// Which analysis the case runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisType {
    Standard,
    Rebuilder,
    PStar,
}

/// Auxiliary harvest calculation attached to the harvest table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum HarvestCalculation {
    #[default]
    Standard,
    Rebuilder(RebuilderTarget),
    PStar(PStarAnalysis),
}

impl HarvestCalculation {
    pub fn analysis_type(&self) -> AnalysisType {
        match self {
            HarvestCalculation::Standard => AnalysisType::Standard,
            HarvestCalculation::Rebuilder(_) => AnalysisType::Rebuilder,
            HarvestCalculation::PStar(_) => AnalysisType::PStar,
        }
    }

    /// Section tag of the calculation, if it has one.
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            HarvestCalculation::Standard => None,
            HarvestCalculation::Rebuilder(_) => Some("REBUILD"),
            HarvestCalculation::PStar(_) => Some("PSTAR"),
        }
    }

    pub fn write(&self, sink: &mut dyn LineSink) {
        match self {
            HarvestCalculation::Standard => {}
            HarvestCalculation::Rebuilder(target) => target.write(sink),
            HarvestCalculation::PStar(pstar) => pstar.write(sink),
        }
    }

    pub fn validate(&self, years: RangeInclusive<i32>) -> ValidationReport {
        match self {
            HarvestCalculation::Standard => ValidationReport::new(),
            HarvestCalculation::Rebuilder(target) => target.validate(years),
            HarvestCalculation::PStar(pstar) => pstar.validate(years),
        }
    }
}

fn check_target_year(year: i32, years: &RangeInclusive<i32>, line: usize) -> Result<()> {
    if years.contains(&year) {
        Ok(())
    } else {
        Err(Error::TargetYearOutOfRange {
            line,
            year,
            first: *years.start(),
            last: *years.end(),
        })
    }
}
