//! Linear and log-linear predictor recruitment (models 16-19).
//!
//! ```text
//! p  variance  intercept
//! c1 .. cp                  coefficients
//! x(1,y1) .. x(1,yN)        one line per predictor, one value per year
//! ```

use serde::{Deserialize, Serialize};

use crate::cursor::{LineCursor, LineSink, join_fields};
use crate::error::Result;
use crate::table::{Cell, Matrix, Vector, format_cells, read_vector};
use crate::validate::ValidationReport;

use super::model::{RecruitContext, required};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredictorForm {
    /// Recruits per SSB, normal error (model 16).
    LinearRecruitsPerSsb,
    /// Recruits per SSB, lognormal error (model 17).
    LoglinearRecruitsPerSsb,
    /// Recruitment, normal error (model 18).
    LinearRecruitment,
    /// Recruitment, lognormal error (model 19).
    LoglinearRecruitment,
}

impl PredictorForm {
    pub fn model_number(self) -> i64 {
        match self {
            PredictorForm::LinearRecruitsPerSsb => 16,
            PredictorForm::LoglinearRecruitsPerSsb => 17,
            PredictorForm::LinearRecruitment => 18,
            PredictorForm::LoglinearRecruitment => 19,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorRecruitment {
    pub form: PredictorForm,
    pub variance: Cell,
    pub intercept: Cell,
    pub coefficients: Vector,
    /// One row per projection year, one column per predictor.
    pub observations: Matrix,
}

impl PredictorRecruitment {
    pub fn new(form: PredictorForm) -> Self {
        Self {
            form,
            variance: None,
            intercept: None,
            coefficients: Vec::new(),
            observations: Matrix::default(),
        }
    }

    pub fn num_predictors(&self) -> usize {
        self.coefficients.len()
    }

    pub(crate) fn read(&mut self, cursor: &mut LineCursor<'_>, num_years: usize) -> Result<()> {
        let header = cursor.next_record()?;
        header.expect_len(3)?;
        let predictors: usize = header.parse(0)?;
        self.variance = Some(header.parse(1)?);
        self.intercept = Some(header.parse(2)?);
        self.coefficients = read_vector(cursor, predictors)?;
        self.observations = Matrix::read_transposed(cursor, num_years, predictors)?;
        Ok(())
    }

    pub(crate) fn write(&self, sink: &mut dyn LineSink) -> Result<()> {
        sink.push_line(join_fields([
            self.num_predictors().to_string(),
            required(self.variance, "predictor variance")?.to_string(),
            required(self.intercept, "predictor intercept")?.to_string(),
        ]));
        sink.push_line(format_cells("predictor coefficients", 0, &self.coefficients)?);
        self.observations
            .write_transposed("predictor observations", sink)
    }

    pub(crate) fn validate(&self, ctx: &RecruitContext<'_>) -> ValidationReport {
        let mut report = ValidationReport::new();
        let predictors = self.num_predictors();
        let max = ctx.config.max_predictors;
        report.require(predictors > 0, || {
            "number of predictors must be greater than zero".to_string()
        });
        report.require(predictors <= max, || {
            format!("{predictors} predictors exceeds the maximum of {max}")
        });
        report.require(self.variance.is_some(), || "variance is missing".to_string());
        report.require(self.intercept.is_some(), || {
            "intercept is missing".to_string()
        });
        report.require(self.coefficients.iter().all(Option::is_some), || {
            "coefficients have blank cells".to_string()
        });
        if self.observations.shape() != (ctx.num_years, predictors) {
            report.push(format!(
                "observation table is {}x{}, expected {}x{predictors}",
                self.observations.rows(),
                self.observations.columns(),
                ctx.num_years
            ));
        } else {
            report.require(self.observations.is_complete(), || {
                "observation table has blank cells".to_string()
            });
        }
        report
    }
}
