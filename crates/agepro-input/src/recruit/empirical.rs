//! Empirical recruitment variants
//!
//! Observations are stored one observation per row: column 0 holds
//! recruits, column 1 (when present) the paired spawning biomass. On file
//! each column is written as its own line.

use serde::{Deserialize, Serialize};

use crate::cursor::{LineCursor, LineSink, join_fields};
use crate::error::Result;
use crate::table::{Cell, Matrix};
use crate::validate::ValidationReport;

use super::model::{RecruitContext, required};

/// Distribution family of a single-stage empirical model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmpiricalKind {
    /// Recruits per unit of spawning biomass (model 2).
    RecruitsPerSsb,
    /// Recruitment distribution (model 3).
    Recruitment,
    /// Cumulative distribution function of recruitment (model 14).
    CumulativeDistribution,
    /// Fixed recruitment series (model 20).
    Fixed,
}

impl EmpiricalKind {
    pub fn model_number(self) -> i64 {
        match self {
            EmpiricalKind::RecruitsPerSsb => 2,
            EmpiricalKind::Recruitment => 3,
            EmpiricalKind::CumulativeDistribution => 14,
            EmpiricalKind::Fixed => 20,
        }
    }

    pub fn with_ssb(self) -> bool {
        self == EmpiricalKind::RecruitsPerSsb
    }
}

/// Models 2, 3, 14 and 20.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmpiricalRecruitment {
    pub kind: EmpiricalKind,
    pub observations: Matrix,
}

impl EmpiricalRecruitment {
    pub fn new(kind: EmpiricalKind) -> Self {
        Self {
            kind,
            observations: Matrix::blank(0, columns(kind.with_ssb())),
        }
    }

    /// Blank observation table with `count` rows.
    pub fn with_observations(kind: EmpiricalKind, count: usize) -> Self {
        Self {
            kind,
            observations: Matrix::blank(count, columns(kind.with_ssb())),
        }
    }

    pub fn count(&self) -> usize {
        self.observations.rows()
    }

    pub(crate) fn read(&mut self, cursor: &mut LineCursor<'_>) -> Result<()> {
        let count: usize = cursor.next_record()?.expect_len(1)?.parse(0)?;
        self.observations =
            Matrix::read_transposed(cursor, count, columns(self.kind.with_ssb()))?;
        Ok(())
    }

    pub(crate) fn write(&self, sink: &mut dyn LineSink) -> Result<()> {
        sink.push_line(self.count().to_string());
        self.observations.write_transposed("empirical observations", sink)
    }

    pub(crate) fn validate(&self, ctx: &RecruitContext<'_>) -> ValidationReport {
        let mut report = ValidationReport::new();
        check_observations(&mut report, "observations", &self.observations, ctx);
        if self.kind == EmpiricalKind::Fixed {
            let expected = ctx.num_years.saturating_sub(1);
            report.require(self.count() == expected, || {
                format!(
                    "fixed recruitment has {} observations, expected {expected}",
                    self.count()
                )
            });
        }
        report
    }
}

/// Two-stage empirical models 4 (with SSB) and 15 (recruitment CDF).
///
/// Stage one applies below the SSB break value, stage two at or above it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoStageEmpirical {
    pub with_ssb: bool,
    pub stage_one: Matrix,
    pub stage_two: Matrix,
    pub ssb_break: Cell,
}

impl TwoStageEmpirical {
    pub fn new(with_ssb: bool) -> Self {
        Self {
            with_ssb,
            stage_one: Matrix::blank(0, columns(with_ssb)),
            stage_two: Matrix::blank(0, columns(with_ssb)),
            ssb_break: None,
        }
    }

    pub fn model_number(&self) -> i64 {
        if self.with_ssb { 4 } else { 15 }
    }

    pub(crate) fn read(&mut self, cursor: &mut LineCursor<'_>) -> Result<()> {
        let counts = cursor.next_record()?;
        counts.expect_len(2)?;
        let first: usize = counts.parse(0)?;
        let second: usize = counts.parse(1)?;
        let cols = columns(self.with_ssb);
        self.stage_one = Matrix::read_transposed(cursor, first, cols)?;
        self.stage_two = Matrix::read_transposed(cursor, second, cols)?;
        self.ssb_break = Some(cursor.next_record()?.expect_len(1)?.parse(0)?);
        Ok(())
    }

    pub(crate) fn write(&self, sink: &mut dyn LineSink) -> Result<()> {
        sink.push_line(join_fields([self.stage_one.rows(), self.stage_two.rows()]));
        self.stage_one.write_transposed("stage one observations", sink)?;
        self.stage_two.write_transposed("stage two observations", sink)?;
        sink.push_line(required(self.ssb_break, "SSB break value")?.to_string());
        Ok(())
    }

    pub(crate) fn validate(&self, ctx: &RecruitContext<'_>) -> ValidationReport {
        let mut report = ValidationReport::new();
        check_observations(&mut report, "stage one observations", &self.stage_one, ctx);
        check_observations(&mut report, "stage two observations", &self.stage_two, ctx);
        check_significant(&mut report, "SSB break value", self.ssb_break, ctx);
        report
    }
}

/// Model 21: empirical CDF whose lower tail declines linearly to zero
/// below the SSB hinge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmpiricalCdfZero {
    pub observations: Matrix,
    pub ssb_hinge: Cell,
}

impl Default for EmpiricalCdfZero {
    fn default() -> Self {
        Self {
            observations: Matrix::blank(0, 1),
            ssb_hinge: None,
        }
    }
}

impl EmpiricalCdfZero {
    pub(crate) fn read(&mut self, cursor: &mut LineCursor<'_>) -> Result<()> {
        let count: usize = cursor.next_record()?.expect_len(1)?.parse(0)?;
        self.observations = Matrix::read_transposed(cursor, count, 1)?;
        self.ssb_hinge = Some(cursor.next_record()?.expect_len(1)?.parse(0)?);
        Ok(())
    }

    pub(crate) fn write(&self, sink: &mut dyn LineSink) -> Result<()> {
        sink.push_line(self.observations.rows().to_string());
        self.observations.write_transposed("empirical observations", sink)?;
        sink.push_line(required(self.ssb_hinge, "SSB hinge value")?.to_string());
        Ok(())
    }

    pub(crate) fn validate(&self, ctx: &RecruitContext<'_>) -> ValidationReport {
        let mut report = ValidationReport::new();
        check_observations(&mut report, "observations", &self.observations, ctx);
        check_significant(&mut report, "SSB hinge value", self.ssb_hinge, ctx);
        report
    }
}

fn columns(with_ssb: bool) -> usize {
    if with_ssb { 2 } else { 1 }
}

fn check_observations(
    report: &mut ValidationReport,
    name: &str,
    observations: &Matrix,
    ctx: &RecruitContext<'_>,
) {
    let floor = ctx.config.empirical_floor;
    report.require(observations.rows() > 0, || format!("{name} are empty"));
    report.require(observations.is_complete(), || {
        format!("{name} have blank cells")
    });
    report.require(
        observations.cells().iter().flatten().all(|v| *v > floor),
        || format!("{name} must all be greater than {floor}"),
    );
    report.require(observations.rows() <= ctx.max_observations, || {
        format!(
            "{name} count {} exceeds the maximum of {}",
            observations.rows(),
            ctx.max_observations
        )
    });
}

fn check_significant(
    report: &mut ValidationReport,
    name: &str,
    value: Cell,
    ctx: &RecruitContext<'_>,
) {
    let floor = ctx.config.empirical_floor;
    match value {
        None => report.push(format!("{name} is missing")),
        Some(v) if v <= floor => report.push(format!("{name} must be greater than {floor}")),
        Some(_) => {}
    }
}
