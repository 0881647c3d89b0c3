//! Bootstrap, biological timing and report option sections

use serde::{Deserialize, Serialize};

use crate::cursor::{LineCursor, LineSink, flag_str, join_fields};
use crate::error::Result;
use crate::validate::ValidationReport;

/// `[BOOTSTRAP]`: initial population vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bootstrap {
    pub num_bootstraps: usize,
    pub population_scale: f64,
    pub file: String,
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self {
            num_bootstraps: 0,
            population_scale: 1.0,
            file: String::new(),
        }
    }
}

impl Bootstrap {
    pub fn read(cursor: &mut LineCursor<'_>) -> Result<Self> {
        let record = cursor.next_record()?;
        record.expect_len(2)?;
        Ok(Self {
            num_bootstraps: record.parse(0)?,
            population_scale: record.parse(1)?,
            file: cursor.next_line()?.trim().to_string(),
        })
    }

    pub fn write(&self, sink: &mut dyn LineSink) {
        sink.push_line(join_fields([
            self.num_bootstraps.to_string(),
            self.population_scale.to_string(),
        ]));
        sink.push_line(self.file.clone());
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        report.require(self.num_bootstraps > 0, || {
            "number of bootstraps must be greater than zero".to_string()
        });
        report.require(self.population_scale > 0.0, || {
            "population scaling factor must be positive".to_string()
        });
        report.require(!self.file.trim().is_empty(), || {
            "bootstrap file name is empty".to_string()
        });
        report
    }
}

/// `[BIOLOGICAL]`: fraction of F and M that occurs before spawning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Biological {
    pub time_varying: bool,
    /// One entry per year when time-varying, else one entry.
    pub fishing_fraction: Vec<f64>,
    pub natural_fraction: Vec<f64>,
}

impl Biological {
    /// Spawning at the start of the year.
    pub fn new_case() -> Self {
        Self {
            time_varying: false,
            fishing_fraction: vec![0.0],
            natural_fraction: vec![0.0],
        }
    }

    pub fn read(cursor: &mut LineCursor<'_>, num_years: usize) -> Result<Self> {
        let time_varying = cursor.next_record()?.expect_len(1)?.flag(0)?;
        let len = if time_varying { num_years } else { 1 };
        Ok(Self {
            time_varying,
            fishing_fraction: cursor.next_record()?.parse_all(len)?,
            natural_fraction: cursor.next_record()?.parse_all(len)?,
        })
    }

    pub fn write(&self, sink: &mut dyn LineSink) {
        sink.push_line(flag_str(self.time_varying).to_string());
        sink.push_line(join_fields(&self.fishing_fraction));
        sink.push_line(join_fields(&self.natural_fraction));
    }

    pub fn validate(&self, num_years: usize) -> ValidationReport {
        let mut report = ValidationReport::new();
        let expected = if self.time_varying { num_years } else { 1 };
        for (name, values) in [
            ("fishing mortality", &self.fishing_fraction),
            ("natural mortality", &self.natural_fraction),
        ] {
            report.require(values.len() == expected, || {
                format!(
                    "{name} fractions hold {} values, expected {expected}",
                    values.len()
                )
            });
            report.require(values.iter().all(|v| (0.0..=1.0).contains(v)), || {
                format!("{name} fractions must be between 0 and 1")
            });
        }
        report
    }
}

/// `[REFPOINT]`: biological reference point thresholds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefPoint {
    pub ssb_threshold: f64,
    pub stock_biomass_threshold: f64,
    pub mean_biomass_threshold: f64,
    pub f_threshold: f64,
}

impl RefPoint {
    pub fn read(cursor: &mut LineCursor<'_>) -> Result<Self> {
        let values: Vec<f64> = cursor.next_record()?.parse_all(4)?;
        Ok(Self {
            ssb_threshold: values[0],
            stock_biomass_threshold: values[1],
            mean_biomass_threshold: values[2],
            f_threshold: values[3],
        })
    }

    pub fn write(&self, sink: &mut dyn LineSink) {
        sink.push_line(join_fields([
            self.ssb_threshold,
            self.stock_biomass_threshold,
            self.mean_biomass_threshold,
            self.f_threshold,
        ]));
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        report.require(
            [
                self.ssb_threshold,
                self.stock_biomass_threshold,
                self.mean_biomass_threshold,
                self.f_threshold,
            ]
            .iter()
            .all(|v| *v >= 0.0),
            || "reference point thresholds must not be negative".to_string(),
        );
        report
    }
}

/// `[BOUNDS]`: upper limits on sampled weights and natural mortality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub max_weight: f64,
    pub max_natural_mortality: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            max_weight: 10.0,
            max_natural_mortality: 1.0,
        }
    }
}

impl Bounds {
    pub fn read(cursor: &mut LineCursor<'_>) -> Result<Self> {
        let record = cursor.next_record()?;
        record.expect_len(2)?;
        Ok(Self {
            max_weight: record.parse(0)?,
            max_natural_mortality: record.parse(1)?,
        })
    }

    pub fn write(&self, sink: &mut dyn LineSink) {
        sink.push_line(join_fields([self.max_weight, self.max_natural_mortality]));
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        report.require(self.max_weight > 0.0, || {
            "maximum weight bound must be positive".to_string()
        });
        report.require(self.max_natural_mortality > 0.0, || {
            "maximum natural mortality bound must be positive".to_string()
        });
        report
    }
}

/// `[RETROADJUST]`: per-age retrospective bias adjustment factors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetroAdjust {
    pub factors: Vec<f64>,
}

impl RetroAdjust {
    pub fn read(cursor: &mut LineCursor<'_>, num_ages: usize) -> Result<Self> {
        Ok(Self {
            factors: cursor.next_record()?.parse_all(num_ages)?,
        })
    }

    pub fn write(&self, sink: &mut dyn LineSink) {
        sink.push_line(join_fields(&self.factors));
    }

    pub fn validate(&self, num_ages: usize) -> ValidationReport {
        let mut report = ValidationReport::new();
        report.require(self.factors.len() == num_ages, || {
            format!(
                "{} retrospective adjustment factors, expected {num_ages}",
                self.factors.len()
            )
        });
        report.require(self.factors.iter().all(|v| *v > 0.0), || {
            "retrospective adjustment factors must be positive".to_string()
        });
        report
    }
}

/// `[OPTIONS]`: which auxiliary outputs the projection writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    pub summary_report: bool,
    pub aux_stochastic_files: bool,
    pub export_r: bool,
}

impl ReportOptions {
    pub fn read(cursor: &mut LineCursor<'_>) -> Result<Self> {
        let record = cursor.next_record()?;
        record.expect_len(3)?;
        Ok(Self {
            summary_report: record.flag(0)?,
            aux_stochastic_files: record.flag(1)?,
            export_r: record.flag(2)?,
        })
    }

    pub fn write(&self, sink: &mut dyn LineSink) {
        sink.push_line(join_fields([
            flag_str(self.summary_report),
            flag_str(self.aux_stochastic_files),
            flag_str(self.export_r),
        ]));
    }
}

/// `[SCALE]`: output units for biomass, recruits and stock numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportScale {
    pub biomass: f64,
    pub recruits: f64,
    pub stock_numbers: f64,
}

impl Default for ReportScale {
    fn default() -> Self {
        Self {
            biomass: 1000.0,
            recruits: 1000.0,
            stock_numbers: 1000.0,
        }
    }
}

impl ReportScale {
    pub fn read(cursor: &mut LineCursor<'_>) -> Result<Self> {
        let values: Vec<f64> = cursor.next_record()?.parse_all(3)?;
        Ok(Self {
            biomass: values[0],
            recruits: values[1],
            stock_numbers: values[2],
        })
    }

    pub fn write(&self, sink: &mut dyn LineSink) {
        sink.push_line(join_fields([self.biomass, self.recruits, self.stock_numbers]));
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        report.require(
            self.biomass > 0.0 && self.recruits > 0.0 && self.stock_numbers > 0.0,
            || "report scaling factors must be positive".to_string(),
        );
        report
    }
}

/// `[PERC]`: percentile reported alongside the summary statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Percentile(pub f64);

impl Percentile {
    pub fn read(cursor: &mut LineCursor<'_>) -> Result<Self> {
        Ok(Self(cursor.next_record()?.expect_len(1)?.parse(0)?))
    }

    pub fn write(&self, sink: &mut dyn LineSink) {
        sink.push_line(self.0.to_string());
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        report.require((0.0..=100.0).contains(&self.0), || {
            format!("report percentile {} must be between 0 and 100", self.0)
        });
        report
    }
}
