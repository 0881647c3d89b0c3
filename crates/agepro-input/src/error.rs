//! Codec errors
//!
//! Every failure raised while reading or writing an input file is an [`Error`].
//! Validation problems on a well-formed document are not errors; they are
//! collected in a [`ValidationReport`](crate::validate::ValidationReport).

use thiserror::Error;

/// Codec result type
pub type Result<T> = std::result::Result<T, Error>;

/// Broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Token count or numeric conversion failures.
    Format,
    /// Unknown or incompatible version, unknown model number, unknown section.
    Structural,
    /// Declared and actual counts disagree.
    CountMismatch,
    /// Recruitment probabilities do not sum to one.
    Normalization,
    /// A value falls outside the order or range it must respect.
    Ordering,
    /// Operation on the unselected recruitment model or an incomplete table.
    InvalidModelState,
}

/// Codec errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("unexpected end of input after line {line}")]
    TruncatedInput { line: usize },

    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCountMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: cannot parse '{token}' as a number")]
    NumberFormat { line: usize, token: String },

    #[error("line {line}: expected a 0/1 flag, found '{token}'")]
    InvalidFlag { line: usize, token: String },

    #[error("line {line}: unsupported input file version '{found}'")]
    UnknownVersion { line: usize, found: String },

    #[error("line {line}: input file version '{found}' is incompatible with this reader")]
    IncompatibleVersion { line: usize, found: String },

    #[error("line {line}: unknown section {tag}")]
    UnknownSection { line: usize, tag: String },

    #[error("line {line}: expected a section tag, found '{text}'")]
    UnexpectedLine { line: usize, text: String },

    #[error("line {line}: section {tag} requires [GENERAL] to be read first")]
    GeneralNotParsed { line: usize, tag: String },

    #[error("line {line}: section [{tag}] may only appear once")]
    DuplicateSection { line: usize, tag: String },

    #[error("line {line}: {name} {value} exceeds the limit of {max}")]
    DimensionTooLarge {
        line: usize,
        name: &'static str,
        value: u64,
        max: u64,
    },

    #[error("unknown recruitment model number {number}")]
    UnknownModelNumber { number: i64 },

    #[error("line {line}: option code {code} is not valid for {table} (allowed: {allowed:?})")]
    InvalidOptionCode {
        line: usize,
        table: String,
        code: i64,
        allowed: Vec<i64>,
    },

    #[error("line {line}: expected {expected} recruitment models, found {found}")]
    ModelCountMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: recruitment probabilities for year {year} sum to {sum}, expected 1")]
    ProbabilityNormalization { line: usize, year: i32, sum: f64 },

    #[error("only one Markov matrix recruitment model is allowed, found {count}")]
    DuplicateMarkovModel { count: usize },

    #[error("line {line}: [{tag}] conflicts with an analysis already selected")]
    ConflictingAnalysis { line: usize, tag: String },

    #[error("line {line}: target year {year} is outside the projection {first}-{last}")]
    TargetYearOutOfRange {
        line: usize,
        year: i32,
        first: i32,
        last: i32,
    },

    #[error("cannot {operation} a recruitment model that has not been selected")]
    NullModel { operation: &'static str },

    #[error("{table} has a blank cell at row {row}, column {column}")]
    BlankCell {
        table: String,
        row: usize,
        column: usize,
    },

    #[error("section [{tag}] is required but has no data")]
    MissingSection { tag: String },
}

impl Error {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TruncatedInput { .. }
            | Error::FieldCountMismatch { .. }
            | Error::NumberFormat { .. }
            | Error::InvalidFlag { .. }
            | Error::BlankCell { .. } => ErrorKind::Format,
            Error::UnknownVersion { .. }
            | Error::IncompatibleVersion { .. }
            | Error::UnknownSection { .. }
            | Error::UnexpectedLine { .. }
            | Error::GeneralNotParsed { .. }
            | Error::DuplicateSection { .. }
            | Error::UnknownModelNumber { .. }
            | Error::InvalidOptionCode { .. }
            | Error::DuplicateMarkovModel { .. }
            | Error::ConflictingAnalysis { .. } => ErrorKind::Structural,
            Error::ModelCountMismatch { .. } => ErrorKind::CountMismatch,
            Error::ProbabilityNormalization { .. } => ErrorKind::Normalization,
            Error::TargetYearOutOfRange { .. } | Error::DimensionTooLarge { .. } => {
                ErrorKind::Ordering
            }
            Error::NullModel { .. } | Error::MissingSection { .. } => {
                ErrorKind::InvalidModelState
            }
        }
    }

    /// Input line the error refers to, when it refers to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::TruncatedInput { line }
            | Error::FieldCountMismatch { line, .. }
            | Error::NumberFormat { line, .. }
            | Error::InvalidFlag { line, .. }
            | Error::UnknownVersion { line, .. }
            | Error::IncompatibleVersion { line, .. }
            | Error::UnknownSection { line, .. }
            | Error::UnexpectedLine { line, .. }
            | Error::GeneralNotParsed { line, .. }
            | Error::DuplicateSection { line, .. }
            | Error::DimensionTooLarge { line, .. }
            | Error::InvalidOptionCode { line, .. }
            | Error::ModelCountMismatch { line, .. }
            | Error::ProbabilityNormalization { line, .. }
            | Error::ConflictingAnalysis { line, .. }
            | Error::TargetYearOutOfRange { line, .. } => Some(*line),
            Error::UnknownModelNumber { .. }
            | Error::DuplicateMarkovModel { .. }
            | Error::NullModel { .. }
            | Error::BlankCell { .. }
            | Error::MissingSection { .. } => None,
        }
    }
}
