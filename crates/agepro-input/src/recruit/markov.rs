//! Markov matrix recruitment (model 1).
//!
//! Recruitment is drawn from a discrete set of levels with probabilities
//! conditioned on which SSB interval the stock falls into.

use serde::{Deserialize, Serialize};

use crate::cursor::{LineCursor, LineSink, join_fields};
use crate::error::Result;
use crate::table::{Matrix, Vector, format_cells, read_vector};
use crate::validate::ValidationReport;

use super::model::RecruitContext;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkovMatrix {
    pub recruitment_levels: Vector,
    pub ssb_cut_points: Vector,
    /// One row per SSB level, one column per recruitment level.
    pub probabilities: Matrix,
}

impl MarkovMatrix {
    /// Blank matrix with the given level counts.
    pub fn with_levels(recruitment_levels: usize, ssb_levels: usize) -> Self {
        Self {
            recruitment_levels: vec![None; recruitment_levels],
            ssb_cut_points: vec![None; ssb_levels],
            probabilities: Matrix::blank(ssb_levels, recruitment_levels),
        }
    }

    pub fn num_recruitment_levels(&self) -> usize {
        self.recruitment_levels.len()
    }

    pub fn num_ssb_levels(&self) -> usize {
        self.ssb_cut_points.len()
    }

    pub(crate) fn read(&mut self, cursor: &mut LineCursor<'_>) -> Result<()> {
        let counts = cursor.next_record()?;
        counts.expect_len(2)?;
        let recruit_levels: usize = counts.parse(0)?;
        let ssb_levels: usize = counts.parse(1)?;
        self.recruitment_levels = read_vector(cursor, recruit_levels)?;
        self.ssb_cut_points = read_vector(cursor, ssb_levels)?;
        self.probabilities = Matrix::read(cursor, ssb_levels, recruit_levels)?;
        Ok(())
    }

    pub(crate) fn write(&self, sink: &mut dyn LineSink) -> Result<()> {
        sink.push_line(join_fields([
            self.num_recruitment_levels(),
            self.num_ssb_levels(),
        ]));
        sink.push_line(format_cells(
            "Markov recruitment levels",
            0,
            &self.recruitment_levels,
        )?);
        sink.push_line(format_cells("Markov SSB cut points", 0, &self.ssb_cut_points)?);
        self.probabilities.write("Markov probabilities", sink)
    }

    pub(crate) fn validate(&self, ctx: &RecruitContext<'_>) -> ValidationReport {
        let mut report = ValidationReport::new();
        report.require(self.num_recruitment_levels() > 0, || {
            "number of recruitment levels must be greater than zero".to_string()
        });
        report.require(self.num_ssb_levels() > 0, || {
            "number of SSB levels must be greater than zero".to_string()
        });
        report.require(self.recruitment_levels.iter().all(Option::is_some), || {
            "recruitment levels have blank cells".to_string()
        });
        report.require(self.ssb_cut_points.iter().all(Option::is_some), || {
            "SSB cut points have blank cells".to_string()
        });

        let expected = (self.num_ssb_levels(), self.num_recruitment_levels());
        if self.probabilities.shape() != expected {
            report.push(format!(
                "probability table is {}x{}, expected {}x{}",
                self.probabilities.rows(),
                self.probabilities.columns(),
                expected.0,
                expected.1
            ));
        } else if !self.probabilities.is_complete() {
            report.push("probability table has blank cells");
        } else {
            for row in 0..self.probabilities.rows() {
                let sum = self.probabilities.row_sum(row);
                report.require(ctx.config.is_normalized(sum), || {
                    format!("probabilities for SSB level {} sum to {sum}", row + 1)
                });
            }
        }
        report
    }
}
