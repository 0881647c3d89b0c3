//! Version line and general run parameters

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::cursor::{LineCursor, LineSink, flag_str, join_fields};
use crate::error::{Error, Result};
use crate::validate::ValidationReport;

/// Input file versions older than the supported grammar.
pub const INCOMPATIBLE_VERSIONS: [&str; 2] = ["AGEPRO VERSION 3.2", "AGEPRO VERSION 3.3"];

/// Largest year span, age span, fleet count or model count a case may declare.
pub const MAX_DIMENSION: usize = 1000;

/// Supported input file versions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatVersion {
    #[default]
    V4_0,
    V4_25,
}

impl FormatVersion {
    pub const ALL: [FormatVersion; 2] = [FormatVersion::V4_0, FormatVersion::V4_25];

    /// The exact first line of a file in this version.
    pub fn literal(self) -> &'static str {
        match self {
            FormatVersion::V4_0 => "AGEPRO VERSION 4.0",
            FormatVersion::V4_25 => "AGEPRO VERSION 4.25",
        }
    }

    /// Recognize a version line.
    pub fn parse(text: &str, line: usize) -> Result<Self> {
        let text = text.trim();
        if let Some(version) = Self::ALL.into_iter().find(|v| v.literal() == text) {
            return Ok(version);
        }
        if INCOMPATIBLE_VERSIONS.contains(&text) {
            return Err(Error::IncompatibleVersion {
                line,
                found: text.to_string(),
            });
        }
        Err(Error::UnknownVersion {
            line,
            found: text.to_string(),
        })
    }
}

/// Contents of the `[GENERAL]` section.
///
/// Every count-dependent section is shaped by these values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralParameters {
    pub first_year: i32,
    pub last_year: i32,
    pub first_age: i32,
    pub last_age: i32,
    pub num_sims: usize,
    pub num_fleets: usize,
    pub num_recruit_models: usize,
    pub discards: bool,
    pub seed: i64,
}

impl Default for GeneralParameters {
    fn default() -> Self {
        Self {
            first_year: 0,
            last_year: 0,
            first_age: 1,
            last_age: 1,
            num_sims: 1000,
            num_fleets: 1,
            num_recruit_models: 1,
            discards: false,
            seed: 0,
        }
    }
}

impl GeneralParameters {
    pub fn num_years(&self) -> usize {
        span(self.first_year, self.last_year)
    }

    pub fn num_ages(&self) -> usize {
        span(self.first_age, self.last_age)
    }

    /// Projection years, `first_year` onwards.
    pub fn years(&self) -> RangeInclusive<i32> {
        let last = i64::from(self.first_year) + self.num_years() as i64 - 1;
        self.first_year..=i32::try_from(last).unwrap_or(i32::MAX)
    }

    pub fn year_sequence(&self) -> Vec<i32> {
        self.years().collect()
    }

    /// Read the record and check its counts against [`MAX_DIMENSION`].
    pub fn read(cursor: &mut LineCursor<'_>) -> Result<Self> {
        let record = cursor.next_record()?;
        record.expect_len(9)?;
        let general = Self {
            first_year: record.parse(0)?,
            last_year: record.parse(1)?,
            first_age: record.parse(2)?,
            last_age: record.parse(3)?,
            num_sims: record.parse(4)?,
            num_fleets: record.parse(5)?,
            num_recruit_models: record.parse(6)?,
            discards: record.flag(7)?,
            seed: record.parse(8)?,
        };
        if let Some((name, value)) = general.oversized().next() {
            return Err(Error::DimensionTooLarge {
                line: record.line(),
                name,
                value: value as u64,
                max: MAX_DIMENSION as u64,
            });
        }
        Ok(general)
    }

    fn oversized(&self) -> impl Iterator<Item = (&'static str, usize)> {
        [
            ("projection year count", self.num_years()),
            ("age count", self.num_ages()),
            ("fleet count", self.num_fleets),
            ("recruitment model count", self.num_recruit_models),
        ]
        .into_iter()
        .filter(|(_, value)| *value > MAX_DIMENSION)
    }

    pub fn write(&self, sink: &mut dyn LineSink) {
        sink.push_line(join_fields([
            self.first_year.to_string(),
            self.last_year.to_string(),
            self.first_age.to_string(),
            self.last_age.to_string(),
            self.num_sims.to_string(),
            self.num_fleets.to_string(),
            self.num_recruit_models.to_string(),
            flag_str(self.discards).to_string(),
            self.seed.to_string(),
        ]));
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        report.require(self.last_year >= self.first_year, || {
            format!(
                "last year {} precedes first year {}",
                self.last_year, self.first_year
            )
        });
        report.require(self.last_age >= self.first_age, || {
            format!(
                "last age {} precedes first age {}",
                self.last_age, self.first_age
            )
        });
        report.require(self.first_age >= 0, || "first age must not be negative".to_string());
        report.require(self.num_sims > 0, || {
            "number of simulations must be greater than zero".to_string()
        });
        report.require(self.num_fleets > 0, || {
            "number of fleets must be greater than zero".to_string()
        });
        report.require(self.num_recruit_models > 0, || {
            "number of recruitment models must be greater than zero".to_string()
        });
        for (name, value) in self.oversized() {
            report.push(format!("{name} {value} exceeds the limit of {MAX_DIMENSION}"));
        }
        report
    }
}

/// Inclusive count of values between two bounds, in either order.
fn span(first: i32, last: i32) -> usize {
    let distance = (i64::from(last) - i64::from(first)).unsigned_abs();
    usize::try_from(distance).unwrap_or(usize::MAX).saturating_add(1)
}
