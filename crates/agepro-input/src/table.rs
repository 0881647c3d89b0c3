//! Age-indexed stochastic tables
//!
//! Most biological inputs share one layout: an option line followed by
//! either the name of an external data file or a block of per-age values
//! and a block of per-age coefficients of variation.
//!
//! ```text
//! [CATCH_WEIGHT]
//! 0  1                 <- option code, time-varying flag
//! 0.1  0.5  1.2        <- N value rows (years x fleets, or fleets)
//! 0.1  0.6  1.3
//! 0.05  0.05  0.05     <- fleet rows of CVs
//! ```

use serde::{Deserialize, Serialize};

use crate::cursor::{LineCursor, LineSink, flag_str, join_fields};
use crate::error::{Error, Result};
use crate::validate::ValidationReport;

/// Table option code meaning "values are given in this file".
pub const OPTION_SPECIFIED: i64 = 0;

/// Table option code meaning "values are read from an external data file".
pub const OPTION_EXTERNAL_FILE: i64 = 1;

/// A cell that may be left blank by a caller building a case by hand.
pub type Cell = Option<f64>;

/// Ordered run of cells.
pub type Vector = Vec<Cell>;

/// Rectangular, row-major grid of cells.
///
/// Cells read from a file are always filled; blank cells only arise from
/// programmatic construction and make the table unwritable until filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
}

impl Matrix {
    /// All-blank matrix.
    pub fn blank(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![None; rows * columns],
        }
    }

    /// Matrix with every cell set to `value`.
    pub fn filled(rows: usize, columns: usize, value: f64) -> Self {
        Self {
            rows,
            columns,
            cells: vec![Some(value); rows * columns],
        }
    }

    /// Build from rows; short rows are padded with blank cells.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut matrix = Self::blank(rows.len(), columns);
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                matrix.set(r, c, value);
            }
        }
        matrix
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    pub fn get(&self, row: usize, column: usize) -> Cell {
        if row < self.rows && column < self.columns {
            self.cells[row * self.columns + column]
        } else {
            None
        }
    }

    /// Set a cell. Out-of-range coordinates are ignored.
    pub fn set(&mut self, row: usize, column: usize, value: f64) {
        if row < self.rows && column < self.columns {
            self.cells[row * self.columns + column] = Some(value);
        }
    }

    pub fn clear(&mut self, row: usize, column: usize) {
        if row < self.rows && column < self.columns {
            self.cells[row * self.columns + column] = None;
        }
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row.min(self.rows) * self.columns;
        let end = (row + 1).min(self.rows) * self.columns;
        &self.cells[start..end.max(start)]
    }

    pub fn column(&self, column: usize) -> Vector {
        (0..self.rows).map(|r| self.get(r, column)).collect()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Whether no cell is blank.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Sum of the filled cells of `row`.
    pub fn row_sum(&self, row: usize) -> f64 {
        self.row(row).iter().flatten().sum()
    }

    /// Read `rows` records of exactly `columns` numbers each.
    ///
    /// Storage grows with the records actually read, so a corrupt count
    /// fails on the data rather than on allocation.
    pub fn read(cursor: &mut LineCursor<'_>, rows: usize, columns: usize) -> Result<Self> {
        let mut cells = Vec::new();
        for _ in 0..rows {
            let record = cursor.next_record()?;
            cells.extend(record.parse_all::<f64>(columns)?.into_iter().map(Some));
        }
        Ok(Self {
            rows,
            columns,
            cells,
        })
    }

    /// Read a matrix stored column by column: `columns` records of `rows` numbers.
    pub fn read_transposed(
        cursor: &mut LineCursor<'_>,
        rows: usize,
        columns: usize,
    ) -> Result<Self> {
        let mut stored = Vec::new();
        for _ in 0..columns {
            stored.push(cursor.next_record()?.parse_all::<f64>(rows)?);
        }
        let mut matrix = Self::blank(rows, stored.len());
        for (c, column) in stored.into_iter().enumerate() {
            for (r, value) in column.into_iter().enumerate() {
                matrix.set(r, c, value);
            }
        }
        Ok(matrix)
    }

    /// One line per row.
    pub fn write(&self, name: &str, sink: &mut dyn LineSink) -> Result<()> {
        for r in 0..self.rows {
            sink.push_line(format_cells(name, r, self.row(r))?);
        }
        Ok(())
    }

    /// One line per column.
    pub fn write_transposed(&self, name: &str, sink: &mut dyn LineSink) -> Result<()> {
        for c in 0..self.columns {
            let column = self.column(c);
            let values = column
                .iter()
                .enumerate()
                .map(|(r, cell)| {
                    cell.ok_or_else(|| Error::BlankCell {
                        table: name.to_string(),
                        row: r,
                        column: c,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            sink.push_line(join_fields(values));
        }
        Ok(())
    }
}

/// Read one record of exactly `len` numbers as a vector.
pub fn read_vector(cursor: &mut LineCursor<'_>, len: usize) -> Result<Vector> {
    let record = cursor.next_record()?;
    Ok(record.parse_all::<f64>(len)?.into_iter().map(Some).collect())
}

/// Join a row of cells, failing on the first blank one.
pub fn format_cells(name: &str, row: usize, cells: &[Cell]) -> Result<String> {
    let values = cells
        .iter()
        .enumerate()
        .map(|(c, cell)| {
            cell.ok_or_else(|| Error::BlankCell {
                table: name.to_string(),
                row,
                column: c,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(join_fields(values))
}

/// Which stochastic table a section holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
    StockWeight,
    SsbWeight,
    MeanWeight,
    CatchWeight,
    DiscardWeight,
    NaturalMortality,
    Maturity,
    Fishery,
    Discard,
}

impl TableKind {
    pub const ALL: [TableKind; 9] = [
        TableKind::StockWeight,
        TableKind::SsbWeight,
        TableKind::MeanWeight,
        TableKind::CatchWeight,
        TableKind::DiscardWeight,
        TableKind::NaturalMortality,
        TableKind::Maturity,
        TableKind::Fishery,
        TableKind::Discard,
    ];

    /// Section tag, without brackets.
    pub fn tag(self) -> &'static str {
        match self {
            TableKind::StockWeight => "STOCK_WEIGHT",
            TableKind::SsbWeight => "SSB_WEIGHT",
            TableKind::MeanWeight => "MEAN_WEIGHT",
            TableKind::CatchWeight => "CATCH_WEIGHT",
            TableKind::DiscardWeight => "DISC_WEIGHT",
            TableKind::NaturalMortality => "NATMORT",
            TableKind::Maturity => "MATURITY",
            TableKind::Fishery => "FISHERY",
            TableKind::Discard => "DISCARD",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Option codes accepted on the table's option line.
    ///
    /// Negative codes on weight tables reuse another weight table.
    pub fn allowed_options(self) -> &'static [i64] {
        match self {
            TableKind::StockWeight => &[1, 0],
            TableKind::SsbWeight => &[1, 0, -1],
            TableKind::MeanWeight => &[1, 0, -1, -2],
            TableKind::CatchWeight => &[1, 0, -1, -2, -3],
            TableKind::DiscardWeight => &[1, 0, -1, -2, -3, -4],
            TableKind::NaturalMortality
            | TableKind::Maturity
            | TableKind::Fishery
            | TableKind::Discard => &[1, 0],
        }
    }

    pub fn is_weight(self) -> bool {
        matches!(
            self,
            TableKind::StockWeight
                | TableKind::SsbWeight
                | TableKind::MeanWeight
                | TableKind::CatchWeight
                | TableKind::DiscardWeight
        )
    }

    /// Whether rows repeat per fleet.
    pub fn is_fleet_dependent(self) -> bool {
        matches!(
            self,
            TableKind::CatchWeight
                | TableKind::DiscardWeight
                | TableKind::Fishery
                | TableKind::Discard
        )
    }

    /// Whether the table only exists when the case models discards.
    pub fn requires_discards(self) -> bool {
        matches!(self, TableKind::DiscardWeight | TableKind::Discard)
    }

    /// Fleet row count for a case with `num_fleets` fleets.
    pub fn fleets(self, num_fleets: usize) -> usize {
        if self.is_fleet_dependent() {
            num_fleets
        } else {
            1
        }
    }

    fn check_option(self, code: i64, line: usize) -> Result<()> {
        if self.allowed_options().contains(&code) {
            Ok(())
        } else {
            Err(Error::InvalidOptionCode {
                line,
                table: self.tag().to_string(),
                code,
                allowed: self.allowed_options().to_vec(),
            })
        }
    }
}

/// Where a table's values come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableData {
    Specified {
        values: Matrix,
        coefficient_of_variation: Matrix,
    },
    External {
        file: String,
    },
}

/// Rows and columns a table must have for a given case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableShape {
    pub value_rows: usize,
    pub cv_rows: usize,
    pub ages: usize,
}

impl TableShape {
    pub fn new(
        kind: TableKind,
        time_varying: bool,
        num_years: usize,
        num_ages: usize,
        num_fleets: usize,
    ) -> Self {
        let fleets = kind.fleets(num_fleets);
        Self {
            value_rows: if time_varying {
                num_years.saturating_mul(fleets)
            } else {
                fleets
            },
            cv_rows: fleets,
            ages: num_ages,
        }
    }
}

/// One stochastic age table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeTable {
    kind: TableKind,
    option: i64,
    time_varying: bool,
    data: TableData,
}

impl AgeTable {
    /// Table with the given option code and blank data of the right shape.
    ///
    /// Fails with [`Error::InvalidOptionCode`] when `option` is not in the
    /// kind's whitelist.
    pub fn new(
        kind: TableKind,
        option: i64,
        time_varying: bool,
        num_years: usize,
        num_ages: usize,
        num_fleets: usize,
    ) -> Result<Self> {
        kind.check_option(option, 0)?;
        let data = if option == OPTION_EXTERNAL_FILE {
            TableData::External {
                file: String::new(),
            }
        } else {
            let shape = TableShape::new(kind, time_varying, num_years, num_ages, num_fleets);
            TableData::Specified {
                values: Matrix::blank(shape.value_rows, shape.ages),
                coefficient_of_variation: Matrix::blank(shape.cv_rows, shape.ages),
            }
        };
        Ok(Self {
            kind,
            option,
            time_varying,
            data,
        })
    }

    /// Zero-valued, zero-CV specified table.
    pub fn neutral(kind: TableKind, num_ages: usize, num_fleets: usize) -> Self {
        let fleets = kind.fleets(num_fleets);
        Self {
            kind,
            option: OPTION_SPECIFIED,
            time_varying: false,
            data: TableData::Specified {
                values: Matrix::filled(fleets, num_ages, 0.0),
                coefficient_of_variation: Matrix::filled(fleets, num_ages, 0.0),
            },
        }
    }

    /// Table whose values live in an external data file.
    pub fn external(kind: TableKind, time_varying: bool, file: impl Into<String>) -> Self {
        Self {
            kind,
            option: OPTION_EXTERNAL_FILE,
            time_varying,
            data: TableData::External { file: file.into() },
        }
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn option(&self) -> i64 {
        self.option
    }

    pub fn time_varying(&self) -> bool {
        self.time_varying
    }

    pub fn data(&self) -> &TableData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut TableData {
        &mut self.data
    }

    pub fn is_external(&self) -> bool {
        matches!(self.data, TableData::External { .. })
    }

    /// Weight table this one defers to through a negative option code.
    pub fn weight_reference(&self) -> Option<TableKind> {
        if !self.kind.is_weight() {
            return None;
        }
        match self.option {
            -1 => Some(TableKind::StockWeight),
            -2 => Some(TableKind::SsbWeight),
            -3 => Some(TableKind::MeanWeight),
            -4 => Some(TableKind::CatchWeight),
            _ => None,
        }
    }

    /// Replace the data with in-file values.
    pub fn set_specified(
        &mut self,
        option: i64,
        time_varying: bool,
        values: Matrix,
        coefficient_of_variation: Matrix,
    ) -> Result<()> {
        self.kind.check_option(option, 0)?;
        if option == OPTION_EXTERNAL_FILE {
            return Err(Error::InvalidOptionCode {
                line: 0,
                table: self.kind.tag().to_string(),
                code: option,
                allowed: self
                    .kind
                    .allowed_options()
                    .iter()
                    .copied()
                    .filter(|c| *c != OPTION_EXTERNAL_FILE)
                    .collect(),
            });
        }
        self.option = option;
        self.time_varying = time_varying;
        self.data = TableData::Specified {
            values,
            coefficient_of_variation,
        };
        Ok(())
    }

    /// Point the table at an external data file.
    pub fn set_external(&mut self, file: impl Into<String>) {
        self.option = OPTION_EXTERNAL_FILE;
        self.data = TableData::External { file: file.into() };
    }

    /// Read the option line and the data that follows it.
    pub fn read(
        cursor: &mut LineCursor<'_>,
        kind: TableKind,
        num_years: usize,
        num_ages: usize,
        num_fleets: usize,
    ) -> Result<Self> {
        let header = cursor.next_record()?;
        header.expect_len(2)?;
        let option: i64 = header.parse(0)?;
        kind.check_option(option, header.line())?;
        let time_varying = header.flag(1)?;

        let data = if option == OPTION_EXTERNAL_FILE {
            TableData::External {
                file: cursor.next_line()?.trim().to_string(),
            }
        } else {
            let shape = TableShape::new(kind, time_varying, num_years, num_ages, num_fleets);
            TableData::Specified {
                values: Matrix::read(cursor, shape.value_rows, shape.ages)?,
                coefficient_of_variation: Matrix::read(cursor, shape.cv_rows, shape.ages)?,
            }
        };
        tracing::trace!(table = kind.tag(), option, time_varying, "age table read");

        Ok(Self {
            kind,
            option,
            time_varying,
            data,
        })
    }

    /// Write the option line and data, without the section tag.
    pub fn write(&self, sink: &mut dyn LineSink) -> Result<()> {
        sink.push_line(join_fields([
            self.option.to_string(),
            flag_str(self.time_varying).to_string(),
        ]));
        match &self.data {
            TableData::External { file } => sink.push_line(file.clone()),
            TableData::Specified {
                values,
                coefficient_of_variation,
            } => {
                values.write(self.kind.tag(), sink)?;
                let cv_name = format!("{} CV", self.kind.tag());
                coefficient_of_variation.write(&cv_name, sink)?;
            }
        }
        Ok(())
    }

    /// Check shape and content against the case dimensions.
    pub fn validate(
        &self,
        num_years: usize,
        num_ages: usize,
        num_fleets: usize,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();
        report.require(self.kind.allowed_options().contains(&self.option), || {
            format!("option code {} is not allowed", self.option)
        });

        match &self.data {
            TableData::External { file } => {
                report.require(!file.trim().is_empty(), || {
                    "external data file name is empty".to_string()
                });
            }
            TableData::Specified {
                values,
                coefficient_of_variation,
            } => {
                report.require(self.option != OPTION_EXTERNAL_FILE, || {
                    "option 1 requires an external data file".to_string()
                });
                let shape =
                    TableShape::new(self.kind, self.time_varying, num_years, num_ages, num_fleets);
                check_block(&mut report, "values", values, shape.value_rows, shape.ages);
                check_block(
                    &mut report,
                    "coefficients of variation",
                    coefficient_of_variation,
                    shape.cv_rows,
                    shape.ages,
                );
            }
        }
        report
    }
}

fn check_block(
    report: &mut ValidationReport,
    name: &str,
    matrix: &Matrix,
    rows: usize,
    columns: usize,
) {
    if matrix.shape() != (rows, columns) {
        report.push(format!(
            "{name} table is {}x{}, expected {rows}x{columns}",
            matrix.rows(),
            matrix.columns()
        ));
        return;
    }
    report.require(matrix.is_complete(), || {
        format!("{name} table has blank cells")
    });
    report.require(matrix.cells().iter().flatten().all(|v| *v >= 0.0), || {
        format!("{name} table has negative values")
    });
}
