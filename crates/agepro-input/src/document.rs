//! Scenario document, the aggregate root of an input file.

use serde::{Deserialize, Serialize};

use crate::config::CodecConfig;
use crate::cursor::{LineCursor, LineSink};
use crate::dispatch::SectionDispatcher;
use crate::error::Result;
use crate::general::{FormatVersion, GeneralParameters};
use crate::harvest::{AnalysisType, HarvestCalculation, HarvestTable};
use crate::options::{
    Biological, Bootstrap, Bounds, Percentile, RefPoint, ReportOptions, ReportScale, RetroAdjust,
};
use crate::recruit::Recruitment;
use crate::table::{AgeTable, TableKind};
use crate::validate::ValidationReport;

/// A complete projection case.
///
/// Optional sections are `Option` fields: a section is written exactly
/// when its field is set. The two discard tables are written when
/// [`GeneralParameters::discards`] is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDocument {
    pub version: FormatVersion,
    pub case_id: String,
    pub general: GeneralParameters,
    pub bootstrap: Bootstrap,
    pub stock_weight: AgeTable,
    pub ssb_weight: AgeTable,
    pub mean_weight: AgeTable,
    pub catch_weight: AgeTable,
    pub discard_weight: Option<AgeTable>,
    pub natural_mortality: AgeTable,
    pub biological: Biological,
    pub maturity: AgeTable,
    pub fishery: AgeTable,
    pub discard: Option<AgeTable>,
    pub recruitment: Recruitment,
    pub harvest: HarvestTable,
    pub calculation: HarvestCalculation,
    pub refpoint: Option<RefPoint>,
    pub bounds: Option<Bounds>,
    pub retro_adjust: Option<RetroAdjust>,
    pub options: ReportOptions,
    pub scale: Option<ReportScale>,
    pub percentile: Option<Percentile>,
}

impl Default for ScenarioDocument {
    fn default() -> Self {
        Self {
            version: FormatVersion::default(),
            case_id: String::new(),
            general: GeneralParameters::default(),
            bootstrap: Bootstrap::default(),
            stock_weight: AgeTable::neutral(TableKind::StockWeight, 0, 0),
            ssb_weight: AgeTable::neutral(TableKind::SsbWeight, 0, 0),
            mean_weight: AgeTable::neutral(TableKind::MeanWeight, 0, 0),
            catch_weight: AgeTable::neutral(TableKind::CatchWeight, 0, 0),
            discard_weight: None,
            natural_mortality: AgeTable::neutral(TableKind::NaturalMortality, 0, 0),
            biological: Biological::new_case(),
            maturity: AgeTable::neutral(TableKind::Maturity, 0, 0),
            fishery: AgeTable::neutral(TableKind::Fishery, 0, 0),
            discard: None,
            recruitment: Recruitment::default(),
            harvest: HarvestTable::default(),
            calculation: HarvestCalculation::Standard,
            refpoint: None,
            bounds: None,
            retro_adjust: None,
            options: ReportOptions::default(),
            scale: None,
            percentile: None,
        }
    }
}

impl ScenarioDocument {
    /// Empty document, to be filled by a read pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// Document shaped by `general` with neutral defaults everywhere.
    ///
    /// Recruitment slots are left unselected; choose them with
    /// [`Recruitment::select_model`] before writing.
    pub fn new_case(general: GeneralParameters) -> Self {
        let ages = general.num_ages();
        let fleets = general.num_fleets;
        let years = general.num_years();
        let discards = general.discards;
        let discard_table = |kind| discards.then(|| AgeTable::neutral(kind, ages, fleets));
        Self {
            stock_weight: AgeTable::neutral(TableKind::StockWeight, ages, fleets),
            ssb_weight: AgeTable::neutral(TableKind::SsbWeight, ages, fleets),
            mean_weight: AgeTable::neutral(TableKind::MeanWeight, ages, fleets),
            catch_weight: AgeTable::neutral(TableKind::CatchWeight, ages, fleets),
            discard_weight: discard_table(TableKind::DiscardWeight),
            natural_mortality: AgeTable::neutral(TableKind::NaturalMortality, ages, fleets),
            maturity: AgeTable::neutral(TableKind::Maturity, ages, fleets),
            fishery: AgeTable::neutral(TableKind::Fishery, ages, fleets),
            discard: discard_table(TableKind::Discard),
            recruitment: Recruitment::new_case(years, general.num_recruit_models),
            harvest: HarvestTable::new_case(years, fleets),
            general,
            ..Self::default()
        }
    }

    /// Read a document with the given settings.
    pub fn read(cursor: &mut LineCursor<'_>, config: &CodecConfig) -> Result<Self> {
        SectionDispatcher::new(config).read(cursor)
    }

    /// Read a document from in-memory text.
    pub fn from_text(text: &str, config: &CodecConfig) -> Result<Self> {
        Self::read(&mut LineCursor::from_text(text), config)
    }

    /// Write the document in canonical section order.
    pub fn write(&self, sink: &mut dyn LineSink) -> Result<()> {
        SectionDispatcher::write(self, sink)
    }

    pub fn to_lines(&self) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        self.write(&mut lines)?;
        Ok(lines)
    }

    /// Serialized text, newline-terminated.
    pub fn to_text(&self) -> Result<String> {
        let mut text = self.to_lines()?.join("\n");
        text.push('\n');
        Ok(text)
    }

    pub fn analysis_type(&self) -> AnalysisType {
        self.calculation.analysis_type()
    }

    pub fn has_refpoint(&self) -> bool {
        self.refpoint.is_some()
    }

    pub fn has_bounds(&self) -> bool {
        self.bounds.is_some()
    }

    pub fn has_retro_adjust(&self) -> bool {
        self.retro_adjust.is_some()
    }

    pub fn has_scale(&self) -> bool {
        self.scale.is_some()
    }

    pub fn has_percentile(&self) -> bool {
        self.percentile.is_some()
    }

    /// Stochastic table of the given kind, if the document holds one.
    pub fn table(&self, kind: TableKind) -> Option<&AgeTable> {
        match kind {
            TableKind::StockWeight => Some(&self.stock_weight),
            TableKind::SsbWeight => Some(&self.ssb_weight),
            TableKind::MeanWeight => Some(&self.mean_weight),
            TableKind::CatchWeight => Some(&self.catch_weight),
            TableKind::DiscardWeight => self.discard_weight.as_ref(),
            TableKind::NaturalMortality => Some(&self.natural_mortality),
            TableKind::Maturity => Some(&self.maturity),
            TableKind::Fishery => Some(&self.fishery),
            TableKind::Discard => self.discard.as_ref(),
        }
    }

    /// Store `table` in the slot matching its kind.
    pub fn set_table(&mut self, table: AgeTable) {
        match table.kind() {
            TableKind::StockWeight => self.stock_weight = table,
            TableKind::SsbWeight => self.ssb_weight = table,
            TableKind::MeanWeight => self.mean_weight = table,
            TableKind::CatchWeight => self.catch_weight = table,
            TableKind::DiscardWeight => self.discard_weight = Some(table),
            TableKind::NaturalMortality => self.natural_mortality = table,
            TableKind::Maturity => self.maturity = table,
            TableKind::Fishery => self.fishery = table,
            TableKind::Discard => self.discard = Some(table),
        }
    }

    /// Check every section against the case dimensions.
    pub fn validate(&self, config: &CodecConfig) -> ValidationReport {
        let general = &self.general;
        let years = general.num_years();
        let ages = general.num_ages();
        let fleets = general.num_fleets;

        let mut report = ValidationReport::new();
        report.merge("GENERAL", general.validate());
        report.merge("BOOTSTRAP", self.bootstrap.validate());

        for kind in TableKind::ALL {
            match self.table(kind) {
                Some(table) if !kind.requires_discards() || general.discards => {
                    report.merge(kind.tag(), table.validate(years, ages, fleets));
                }
                None if general.discards => {
                    report.push(format!("{}: section is required when discards are modeled", kind.tag()));
                }
                _ => {}
            }
        }

        report.merge("BIOLOGICAL", self.biological.validate(years));
        report.merge(
            "RECRUIT",
            self.recruitment.validate(
                general.first_year,
                years,
                general.num_recruit_models,
                config,
            ),
        );
        report.merge("HARVEST", self.harvest.validate(years, fleets));
        if let Some(tag) = self.calculation.tag() {
            report.merge(tag, self.calculation.validate(general.years()));
        }
        if let Some(refpoint) = &self.refpoint {
            report.merge("REFPOINT", refpoint.validate());
        }
        if let Some(bounds) = &self.bounds {
            report.merge("BOUNDS", bounds.validate());
        }
        if let Some(retro) = &self.retro_adjust {
            report.merge("RETROADJUST", retro.validate(ages));
        }
        if let Some(scale) = &self.scale {
            report.merge("SCALE", scale.validate());
        }
        if let Some(percentile) = &self.percentile {
            report.merge("PERC", percentile.validate());
        }
        report
    }
}
