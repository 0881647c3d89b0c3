//! Recruitment model variants and factory

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::CodecConfig;
use crate::cursor::{LineCursor, LineSink};
use crate::error::{Error, Result};
use crate::table::Cell;
use crate::validate::ValidationReport;

use super::empirical::{EmpiricalCdfZero, EmpiricalKind, EmpiricalRecruitment, TwoStageEmpirical};
use super::markov::MarkovMatrix;
use super::parametric::{CurveForm, ParametricCurve, ParametricLognormal};
use super::predictor::{PredictorForm, PredictorRecruitment};

/// Model number of the Markov matrix variant.
pub const MARKOV_MODEL_NUMBER: i64 = 1;

/// Case dimensions and limits a model needs beyond its own lines.
#[derive(Debug, Clone, Copy)]
pub struct RecruitContext<'c> {
    pub num_years: usize,
    pub max_observations: usize,
    pub config: &'c CodecConfig,
}

/// One recruitment process.
///
/// `Null` stands for a slot the user has not chosen a model for yet. Every
/// read, write or validate call on it fails with [`Error::NullModel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecruitmentModel {
    Null,
    Markov(MarkovMatrix),
    Empirical(EmpiricalRecruitment),
    TwoStage(TwoStageEmpirical),
    CdfZero(EmpiricalCdfZero),
    Curve(ParametricCurve),
    Lognormal(ParametricLognormal),
    Predictor(PredictorRecruitment),
}

impl RecruitmentModel {
    /// Empty model for `model_number`.
    ///
    /// Defined for 0-8 and 10-21. Number 9 was retired from the format and
    /// is rejected along with anything out of range.
    pub fn create(model_number: i64) -> Result<Self> {
        let model = match model_number {
            0 => RecruitmentModel::Null,
            1 => RecruitmentModel::Markov(MarkovMatrix::default()),
            2 => RecruitmentModel::Empirical(EmpiricalRecruitment::new(
                EmpiricalKind::RecruitsPerSsb,
            )),
            3 => RecruitmentModel::Empirical(EmpiricalRecruitment::new(
                EmpiricalKind::Recruitment,
            )),
            4 => RecruitmentModel::TwoStage(TwoStageEmpirical::new(true)),
            5 => RecruitmentModel::Curve(ParametricCurve::new(CurveForm::BevertonHolt, false)),
            6 => RecruitmentModel::Curve(ParametricCurve::new(CurveForm::Ricker, false)),
            7 => RecruitmentModel::Curve(ParametricCurve::new(CurveForm::Shepherd, false)),
            8 => RecruitmentModel::Lognormal(ParametricLognormal::new(false)),
            10 => RecruitmentModel::Curve(ParametricCurve::new(CurveForm::BevertonHolt, true)),
            11 => RecruitmentModel::Curve(ParametricCurve::new(CurveForm::Ricker, true)),
            12 => RecruitmentModel::Curve(ParametricCurve::new(CurveForm::Shepherd, true)),
            13 => RecruitmentModel::Lognormal(ParametricLognormal::new(true)),
            14 => RecruitmentModel::Empirical(EmpiricalRecruitment::new(
                EmpiricalKind::CumulativeDistribution,
            )),
            15 => RecruitmentModel::TwoStage(TwoStageEmpirical::new(false)),
            16 => RecruitmentModel::Predictor(PredictorRecruitment::new(
                PredictorForm::LinearRecruitsPerSsb,
            )),
            17 => RecruitmentModel::Predictor(PredictorRecruitment::new(
                PredictorForm::LoglinearRecruitsPerSsb,
            )),
            18 => RecruitmentModel::Predictor(PredictorRecruitment::new(
                PredictorForm::LinearRecruitment,
            )),
            19 => RecruitmentModel::Predictor(PredictorRecruitment::new(
                PredictorForm::LoglinearRecruitment,
            )),
            20 => RecruitmentModel::Empirical(EmpiricalRecruitment::new(EmpiricalKind::Fixed)),
            21 => RecruitmentModel::CdfZero(EmpiricalCdfZero::default()),
            number => return Err(Error::UnknownModelNumber { number }),
        };
        Ok(model)
    }

    /// Number written in the model-number line.
    pub fn model_number(&self) -> i64 {
        match self {
            RecruitmentModel::Null => 0,
            RecruitmentModel::Markov(_) => MARKOV_MODEL_NUMBER,
            RecruitmentModel::Empirical(m) => m.kind.model_number(),
            RecruitmentModel::TwoStage(m) => m.model_number(),
            RecruitmentModel::CdfZero(_) => 21,
            RecruitmentModel::Curve(m) => m.model_number(),
            RecruitmentModel::Lognormal(m) => m.model_number(),
            RecruitmentModel::Predictor(m) => m.form.model_number(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self.model_number() {
            0 => "None Selected",
            1 => "Markov Matrix",
            2 => "Empirical Recruits per Spawning Biomass Distribution",
            3 => "Empirical Recruitment Distribution",
            4 => "Two-Stage Empirical Recruits per Spawning Biomass Distribution",
            5 => "Beverton-Holt Curve w/ Lognormal Error",
            6 => "Ricker Curve w/ Lognormal Error",
            7 => "Shepherd Curve w/ Lognormal Error",
            8 => "Lognormal Distribution",
            10 => "Beverton-Holt Curve w/ Autocorrelated Lognormal Error",
            11 => "Ricker Curve w/ Autocorrelated Lognormal Error",
            12 => "Shepherd Curve w/ Autocorrelated Lognormal Error",
            13 => "Autocorrelated Lognormal Distribution",
            14 => "Empirical Cumulative Distribution Function of Recruitment",
            15 => "Two-Stage Empirical Cumulative Distribution Function of Recruitment",
            16 => "Linear Recruits per Spawning Biomass Predictor w/ Normal Error",
            17 => "Loglinear Recruits per Spawning Biomass Predictor w/ Lognormal Error",
            18 => "Linear Recruitment Predictor w/ Normal Error",
            19 => "Loglinear Recruitment Predictor w/ Lognormal Error",
            20 => "Fixed Recruitment",
            _ => "Empirical CDF of Recruitment w/ Linear Decline to Zero",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RecruitmentModel::Null)
    }

    pub fn is_markov(&self) -> bool {
        matches!(self, RecruitmentModel::Markov(_))
    }

    /// Consume this model's payload lines.
    pub fn read(&mut self, cursor: &mut LineCursor<'_>, num_years: usize) -> Result<()> {
        match self {
            RecruitmentModel::Null => Err(Error::NullModel { operation: "read" }),
            RecruitmentModel::Markov(m) => m.read(cursor),
            RecruitmentModel::Empirical(m) => m.read(cursor),
            RecruitmentModel::TwoStage(m) => m.read(cursor),
            RecruitmentModel::CdfZero(m) => m.read(cursor),
            RecruitmentModel::Curve(m) => m.read(cursor),
            RecruitmentModel::Lognormal(m) => m.read(cursor),
            RecruitmentModel::Predictor(m) => m.read(cursor, num_years),
        }
    }

    /// Write this model's payload lines.
    pub fn write(&self, sink: &mut dyn LineSink) -> Result<()> {
        match self {
            RecruitmentModel::Null => Err(Error::NullModel { operation: "write" }),
            RecruitmentModel::Markov(m) => m.write(sink),
            RecruitmentModel::Empirical(m) => m.write(sink),
            RecruitmentModel::TwoStage(m) => m.write(sink),
            RecruitmentModel::CdfZero(m) => m.write(sink),
            RecruitmentModel::Curve(m) => m.write(sink),
            RecruitmentModel::Lognormal(m) => m.write(sink),
            RecruitmentModel::Predictor(m) => m.write(sink),
        }
    }

    /// Check the model's parameters against the case.
    pub fn validate(&self, ctx: &RecruitContext<'_>) -> Result<ValidationReport> {
        let report = match self {
            RecruitmentModel::Null => return Err(Error::NullModel { operation: "validate" }),
            RecruitmentModel::Markov(m) => m.validate(ctx),
            RecruitmentModel::Empirical(m) => m.validate(ctx),
            RecruitmentModel::TwoStage(m) => m.validate(ctx),
            RecruitmentModel::CdfZero(m) => m.validate(ctx),
            RecruitmentModel::Curve(m) => m.validate(ctx),
            RecruitmentModel::Lognormal(m) => m.validate(ctx),
            RecruitmentModel::Predictor(m) => m.validate(ctx),
        };
        Ok(report)
    }
}

impl fmt::Display for RecruitmentModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.model_number())
    }
}

/// Value of a required single cell, failing like a blank table cell.
pub(super) fn required(cell: Cell, name: &str) -> Result<f64> {
    cell.ok_or_else(|| Error::BlankCell {
        table: name.to_string(),
        row: 0,
        column: 0,
    })
}
