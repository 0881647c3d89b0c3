//! AGEPRO Input
//!
//! Reads, writes and validates AGEPRO projection input files: a version
//! line followed by bracketed sections describing the stock, its fleets,
//! recruitment and the harvest scenario.
//!
//! ```no_run
//! use agepro_input::{CodecConfig, ScenarioDocument};
//!
//! let text = std::fs::read_to_string("case.inp")?;
//! let config = CodecConfig::default();
//! let document = ScenarioDocument::from_text(&text, &config)?;
//! let report = document.validate(&config);
//! if !report.is_valid() {
//!     eprintln!("{report}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod cursor;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod general;
pub mod harvest;
pub mod options;
pub mod recruit;
pub mod table;
pub mod validate;

pub use config::{CodecConfig, Profile};
pub use cursor::{LineCursor, LineSink, LineSource};
pub use dispatch::{Section, SectionDispatcher};
pub use document::ScenarioDocument;
pub use error::{Error, ErrorKind, Result};
pub use general::{FormatVersion, GeneralParameters};
pub use harvest::{AnalysisType, HarvestCalculation};
pub use recruit::{Recruitment, RecruitmentModel};
pub use table::{AgeTable, Matrix, TableKind};
pub use validate::ValidationReport;
