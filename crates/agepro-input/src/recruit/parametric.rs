//! Parametric recruitment models with lognormal error.

use serde::{Deserialize, Serialize};

use crate::cursor::{LineCursor, LineSink, join_fields};
use crate::error::Result;
use crate::table::Cell;
use crate::validate::ValidationReport;

use super::model::{RecruitContext, required};

/// Stock-recruitment curve family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveForm {
    BevertonHolt,
    Ricker,
    Shepherd,
}

impl CurveForm {
    pub fn model_number(self, autocorrelated: bool) -> i64 {
        match (self, autocorrelated) {
            (CurveForm::BevertonHolt, false) => 5,
            (CurveForm::Ricker, false) => 6,
            (CurveForm::Shepherd, false) => 7,
            (CurveForm::BevertonHolt, true) => 10,
            (CurveForm::Ricker, true) => 11,
            (CurveForm::Shepherd, true) => 12,
        }
    }
}

/// Lag-1 autocorrelation of the lognormal residuals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Autocorrelation {
    pub phi: Cell,
    pub last_residual: Cell,
}

impl Autocorrelation {
    fn read(cursor: &mut LineCursor<'_>) -> Result<Self> {
        let record = cursor.next_record()?;
        record.expect_len(2)?;
        Ok(Self {
            phi: Some(record.parse(0)?),
            last_residual: Some(record.parse(1)?),
        })
    }

    fn write(&self, sink: &mut dyn LineSink) -> Result<()> {
        sink.push_line(join_fields([
            required(self.phi, "autocorrelation phi")?,
            required(self.last_residual, "last residual")?,
        ]));
        Ok(())
    }

    fn validate(&self, report: &mut ValidationReport) {
        report.require(self.phi.is_some(), || {
            "autocorrelation phi is missing".to_string()
        });
        report.require(self.last_residual.is_some(), || {
            "last residual is missing".to_string()
        });
    }
}

/// Beverton-Holt, Ricker and Shepherd curves (models 5-7, 10-12).
///
/// ```text
/// alpha  beta  variance          Beverton-Holt, Ricker
/// alpha  beta  k                 Shepherd
/// variance
/// phi  last_residual             autocorrelated forms only
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParametricCurve {
    pub form: CurveForm,
    pub alpha: Cell,
    pub beta: Cell,
    /// Shepherd shape parameter. Unused by the other forms.
    pub k: Cell,
    pub variance: Cell,
    pub autocorrelation: Option<Autocorrelation>,
}

impl ParametricCurve {
    pub fn new(form: CurveForm, autocorrelated: bool) -> Self {
        Self {
            form,
            alpha: None,
            beta: None,
            k: None,
            variance: None,
            autocorrelation: autocorrelated.then(Autocorrelation::default),
        }
    }

    pub fn model_number(&self) -> i64 {
        self.form.model_number(self.autocorrelation.is_some())
    }

    pub(crate) fn read(&mut self, cursor: &mut LineCursor<'_>) -> Result<()> {
        let record = cursor.next_record()?;
        record.expect_len(3)?;
        self.alpha = Some(record.parse(0)?);
        self.beta = Some(record.parse(1)?);
        if self.form == CurveForm::Shepherd {
            self.k = Some(record.parse(2)?);
            self.variance = Some(cursor.next_record()?.expect_len(1)?.parse(0)?);
        } else {
            self.variance = Some(record.parse(2)?);
        }
        if self.autocorrelation.is_some() {
            self.autocorrelation = Some(Autocorrelation::read(cursor)?);
        }
        Ok(())
    }

    pub(crate) fn write(&self, sink: &mut dyn LineSink) -> Result<()> {
        let alpha = required(self.alpha, "alpha")?;
        let beta = required(self.beta, "beta")?;
        let variance = required(self.variance, "variance")?;
        if self.form == CurveForm::Shepherd {
            sink.push_line(join_fields([alpha, beta, required(self.k, "k")?]));
            sink.push_line(variance.to_string());
        } else {
            sink.push_line(join_fields([alpha, beta, variance]));
        }
        if let Some(autocorrelation) = &self.autocorrelation {
            autocorrelation.write(sink)?;
        }
        Ok(())
    }

    pub(crate) fn validate(&self, ctx: &RecruitContext<'_>) -> ValidationReport {
        let mut report = ValidationReport::new();
        let floor = ctx.config.parametric_floor;
        check_parameter(&mut report, "alpha", self.alpha, floor);
        check_parameter(&mut report, "beta", self.beta, floor);
        if self.form == CurveForm::Shepherd {
            check_parameter(&mut report, "k", self.k, floor);
        }
        check_parameter(&mut report, "variance", self.variance, floor);
        if let Some(autocorrelation) = &self.autocorrelation {
            autocorrelation.validate(&mut report);
        }
        report
    }
}

/// Lognormal recruitment distribution (models 8 and 13).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParametricLognormal {
    pub mean: Cell,
    pub std_dev: Cell,
    pub autocorrelation: Option<Autocorrelation>,
}

impl ParametricLognormal {
    pub fn new(autocorrelated: bool) -> Self {
        Self {
            mean: None,
            std_dev: None,
            autocorrelation: autocorrelated.then(Autocorrelation::default),
        }
    }

    pub fn model_number(&self) -> i64 {
        if self.autocorrelation.is_some() { 13 } else { 8 }
    }

    pub(crate) fn read(&mut self, cursor: &mut LineCursor<'_>) -> Result<()> {
        let record = cursor.next_record()?;
        record.expect_len(2)?;
        self.mean = Some(record.parse(0)?);
        self.std_dev = Some(record.parse(1)?);
        if self.autocorrelation.is_some() {
            self.autocorrelation = Some(Autocorrelation::read(cursor)?);
        }
        Ok(())
    }

    pub(crate) fn write(&self, sink: &mut dyn LineSink) -> Result<()> {
        sink.push_line(join_fields([
            required(self.mean, "mean")?,
            required(self.std_dev, "standard deviation")?,
        ]));
        if let Some(autocorrelation) = &self.autocorrelation {
            autocorrelation.write(sink)?;
        }
        Ok(())
    }

    pub(crate) fn validate(&self, ctx: &RecruitContext<'_>) -> ValidationReport {
        let mut report = ValidationReport::new();
        let floor = ctx.config.parametric_floor;
        check_parameter(&mut report, "mean", self.mean, floor);
        check_parameter(&mut report, "standard deviation", self.std_dev, floor);
        if let Some(autocorrelation) = &self.autocorrelation {
            autocorrelation.validate(&mut report);
        }
        report
    }
}

fn check_parameter(report: &mut ValidationReport, name: &str, value: Cell, floor: f64) {
    match value {
        None => report.push(format!("{name} is missing")),
        Some(v) if v <= floor => report.push(format!("{name} must be greater than {floor}")),
        Some(_) => {}
    }
}
