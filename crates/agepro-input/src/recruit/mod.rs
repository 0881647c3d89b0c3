//! Recruitment subsystem
//!
//! The `[RECRUIT]` section selects one or more recruitment models and the
//! probability of each being used in every projection year.
//!
//! # File Format
//!
//! ```text
//! [RECRUIT]
//! 1000  1000  50        recruit scale, SSB scale, max observations
//! 3  5                  model numbers, one per configured model
//! 0.5  0.5              probability row per projection year
//! 0.5  0.5
//! ...                   payload of each model, in declared order
//! ```
//!
//! # Invariants
//!
//! - The model-number line holds exactly as many entries as `[GENERAL]` declares.
//! - Every probability row sums to one within the configured tolerance.
//! - At most one model is a Markov matrix.

mod empirical;
mod markov;
mod model;
mod parametric;
mod predictor;


pub use empirical::{EmpiricalCdfZero, EmpiricalKind, EmpiricalRecruitment, TwoStageEmpirical};
pub use markov::MarkovMatrix;
pub use model::{MARKOV_MODEL_NUMBER, RecruitContext, RecruitmentModel};
pub use parametric::{Autocorrelation, CurveForm, ParametricCurve, ParametricLognormal};
pub use predictor::{PredictorForm, PredictorRecruitment};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::CodecConfig;
use crate::cursor::{LineCursor, LineSink, join_fields};
use crate::error::{Error, Result};
use crate::table::Matrix;
use crate::validate::ValidationReport;

/// Contents of the `[RECRUIT]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recruitment {
    /// Multiplier converting recruitment to absolute numbers.
    pub recruit_scale: f64,
    /// Multiplier converting SSB to absolute weight.
    pub ssb_scale: f64,
    /// Largest number of observations an empirical model may hold.
    pub max_observations: usize,
    /// One row per projection year, one column per model.
    pub probabilities: Matrix,
    pub models: Vec<RecruitmentModel>,
}

impl Default for Recruitment {
    fn default() -> Self {
        Self {
            recruit_scale: 1.0,
            ssb_scale: 1.0,
            max_observations: 500,
            probabilities: Matrix::default(),
            models: Vec::new(),
        }
    }
}

impl Recruitment {
    /// Unselected models with equal probabilities in every year.
    pub fn new_case(num_years: usize, num_models: usize) -> Self {
        let share = if num_models == 0 {
            0.0
        } else {
            1.0 / num_models as f64
        };
        Self {
            probabilities: Matrix::filled(num_years, num_models, share),
            models: vec![RecruitmentModel::Null; num_models],
            ..Self::default()
        }
    }

    pub fn model_numbers(&self) -> Vec<i64> {
        self.models.iter().map(RecruitmentModel::model_number).collect()
    }

    pub fn markov_count(&self) -> usize {
        self.models.iter().filter(|m| m.is_markov()).count()
    }

    /// Replace the model in slot `index` with an empty `model_number` model.
    ///
    /// Selecting a second Markov matrix fails with [`Error::DuplicateMarkovModel`].
    pub fn select_model(&mut self, index: usize, model_number: i64) -> Result<&mut RecruitmentModel> {
        let model = RecruitmentModel::create(model_number)?;
        let other_markov = self
            .models
            .iter()
            .enumerate()
            .filter(|(i, m)| *i != index && m.is_markov())
            .count();
        if model.is_markov() && other_markov > 0 {
            return Err(Error::DuplicateMarkovModel {
                count: other_markov + 1,
            });
        }
        if index >= self.models.len() {
            self.models.resize(index + 1, RecruitmentModel::Null);
        }
        self.models[index] = model;
        Ok(&mut self.models[index])
    }

    /// Read the section body.
    pub fn read(
        cursor: &mut LineCursor<'_>,
        first_year: i32,
        num_years: usize,
        num_models: usize,
        config: &CodecConfig,
    ) -> Result<Self> {
        let scales = cursor.next_record()?;
        scales.expect_len(3)?;
        let recruit_scale: f64 = scales.parse(0)?;
        let ssb_scale: f64 = scales.parse(1)?;
        let max_observations: usize = scales.parse(2)?;

        let numbers = cursor.next_record()?;
        if numbers.len() != num_models {
            return Err(Error::ModelCountMismatch {
                line: numbers.line(),
                expected: num_models,
                found: numbers.len(),
            });
        }
        let model_numbers: Vec<i64> = numbers.parse_all(num_models)?;

        let mut probabilities = Matrix::blank(num_years, num_models);
        for row in 0..num_years {
            let record = cursor.next_record()?;
            let values: Vec<f64> = record.parse_all(num_models)?;
            let sum: f64 = values.iter().sum();
            if !config.is_normalized(sum) {
                return Err(Error::ProbabilityNormalization {
                    line: record.line(),
                    year: first_year + row as i32,
                    sum,
                });
            }
            for (column, value) in values.into_iter().enumerate() {
                probabilities.set(row, column, value);
            }
        }

        let mut models = model_numbers
            .iter()
            .map(|n| RecruitmentModel::create(*n))
            .collect::<Result<Vec<_>>>()?;
        let markov = models.iter().filter(|m| m.is_markov()).count();
        if markov > 1 {
            return Err(Error::DuplicateMarkovModel { count: markov });
        }

        for model in &mut models {
            model.read(cursor, num_years)?;
            trace!(model = model.model_number(), line = cursor.line_number(), "recruitment model read");
        }
        debug!(models = ?model_numbers, "recruitment read");

        Ok(Self {
            recruit_scale,
            ssb_scale,
            max_observations,
            probabilities,
            models,
        })
    }

    /// Write the section body.
    pub fn write(&self, sink: &mut dyn LineSink) -> Result<()> {
        sink.push_line(join_fields([
            self.recruit_scale.to_string(),
            self.ssb_scale.to_string(),
            self.max_observations.to_string(),
        ]));
        sink.push_line(join_fields(self.model_numbers()));
        self.probabilities.write("recruitment probabilities", sink)?;
        for model in &self.models {
            model.write(sink)?;
        }
        Ok(())
    }

    /// Probability rows, model selection and every model's parameters.
    pub fn validate(
        &self,
        first_year: i32,
        num_years: usize,
        num_models: usize,
        config: &CodecConfig,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();
        report.require(self.models.len() == num_models, || {
            format!(
                "{} recruitment models configured, expected {num_models}",
                self.models.len()
            )
        });
        report.require(self.markov_count() <= 1, || {
            format!(
                "only one Markov matrix model is allowed, found {}",
                self.markov_count()
            )
        });
        report.require(self.recruit_scale > 0.0, || {
            "recruitment scaling factor must be positive".to_string()
        });
        report.require(self.ssb_scale > 0.0, || {
            "SSB scaling factor must be positive".to_string()
        });

        if self.probabilities.shape() != (num_years, num_models) {
            report.push(format!(
                "probability table is {}x{}, expected {num_years}x{num_models}",
                self.probabilities.rows(),
                self.probabilities.columns()
            ));
        } else {
            for row in 0..num_years {
                let year = first_year + row as i32;
                if self.probabilities.row(row).iter().any(Option::is_none) {
                    report.push(format!("probabilities for year {year} have blank cells"));
                    continue;
                }
                let sum = self.probabilities.row_sum(row);
                report.require(config.is_normalized(sum), || {
                    format!("probabilities for year {year} sum to {sum}, expected 1")
                });
            }
        }

        let ctx = RecruitContext {
            num_years,
            max_observations: self.max_observations,
            config,
        };
        for (i, model) in self.models.iter().enumerate() {
            match model.validate(&ctx) {
                Ok(model_report) => report.merge(
                    &format!("recruitment model {} ({})", i + 1, model.name()),
                    model_report,
                ),
                Err(_) => report.push(format!("recruitment model {} is not selected", i + 1)),
            }
        }
        report
    }
}
