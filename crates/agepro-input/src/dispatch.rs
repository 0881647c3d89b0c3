//! Section dispatcher
//!
//! Drives a whole-file read or write. After the version line the reader
//! loops over `[TAG]` lines, handing each section body to its codec. The
//! writer emits every section in canonical order.
//!
//! # File Format
//!
//! ```text
//! AGEPRO VERSION 4.0
//! [CASEID]
//! Georges Bank yellowtail flounder
//! [GENERAL]
//! 1990  1992  1  3  100  1  1  0  42
//! [BOOTSTRAP]
//! ...
//! ```
//!
//! Blank lines between sections are ignored. Sections may appear in any
//! order on read, except that everything but `[CASEID]` is shaped by
//! `[GENERAL]` and must follow it. `[GENERAL]` itself appears once. Every
//! mandatory section must be present by the end of the file.

use std::collections::HashSet;

use tracing::{debug, info, trace, warn};

use crate::config::CodecConfig;
use crate::cursor::{LineCursor, LineSink};
use crate::document::ScenarioDocument;
use crate::error::{Error, Result};
use crate::general::{FormatVersion, GeneralParameters};
use crate::harvest::{HarvestCalculation, HarvestTable, PStarAnalysis, RebuilderTarget};
use crate::options::{
    Biological, Bootstrap, Bounds, Percentile, RefPoint, ReportOptions, ReportScale, RetroAdjust,
};
use crate::recruit::Recruitment;
use crate::table::{AgeTable, TableKind};

/// A recognized section tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    CaseId,
    General,
    Bootstrap,
    Table(TableKind),
    Biological,
    Recruit,
    Harvest,
    Rebuild,
    PStar,
    RefPoint,
    Bounds,
    RetroAdjust,
    Options,
    Scale,
    Percentile,
}

impl Section {
    /// Look up a tag given without its brackets.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let section = match tag {
            "CASEID" => Section::CaseId,
            "GENERAL" => Section::General,
            "BOOTSTRAP" => Section::Bootstrap,
            "BIOLOGICAL" => Section::Biological,
            "RECRUIT" => Section::Recruit,
            "HARVEST" => Section::Harvest,
            "REBUILD" => Section::Rebuild,
            "PSTAR" => Section::PStar,
            "REFPOINT" => Section::RefPoint,
            "BOUNDS" => Section::Bounds,
            "RETROADJUST" => Section::RetroAdjust,
            "OPTIONS" => Section::Options,
            "SCALE" => Section::Scale,
            "PERC" => Section::Percentile,
            other => Section::Table(TableKind::from_tag(other)?),
        };
        Some(section)
    }

    pub fn tag(self) -> &'static str {
        match self {
            Section::CaseId => "CASEID",
            Section::General => "GENERAL",
            Section::Bootstrap => "BOOTSTRAP",
            Section::Table(kind) => kind.tag(),
            Section::Biological => "BIOLOGICAL",
            Section::Recruit => "RECRUIT",
            Section::Harvest => "HARVEST",
            Section::Rebuild => "REBUILD",
            Section::PStar => "PSTAR",
            Section::RefPoint => "REFPOINT",
            Section::Bounds => "BOUNDS",
            Section::RetroAdjust => "RETROADJUST",
            Section::Options => "OPTIONS",
            Section::Scale => "SCALE",
            Section::Percentile => "PERC",
        }
    }

    /// Whether the section may only be read after `[GENERAL]`.
    pub fn needs_general(self) -> bool {
        !matches!(self, Section::CaseId | Section::General)
    }

    /// Sections every file must carry, in canonical order. The discard
    /// tables are included when the case models discards.
    pub fn mandatory(discards: bool) -> Vec<Section> {
        let mut sections = vec![
            Section::General,
            Section::Bootstrap,
            Section::Table(TableKind::StockWeight),
            Section::Table(TableKind::SsbWeight),
            Section::Table(TableKind::MeanWeight),
            Section::Table(TableKind::CatchWeight),
            Section::Table(TableKind::DiscardWeight),
            Section::Table(TableKind::NaturalMortality),
            Section::Biological,
            Section::Table(TableKind::Maturity),
            Section::Table(TableKind::Fishery),
            Section::Table(TableKind::Discard),
            Section::Recruit,
            Section::Harvest,
            Section::Options,
        ];
        if !discards {
            sections.retain(|s| !matches!(s, Section::Table(kind) if kind.requires_discards()));
        }
        sections
    }
}

/// Whole-file reader and writer for [`ScenarioDocument`].
pub struct SectionDispatcher<'c> {
    config: &'c CodecConfig,
}

impl<'c> SectionDispatcher<'c> {
    pub fn new(config: &'c CodecConfig) -> Self {
        Self { config }
    }

    /// Read a complete document.
    pub fn read(&self, cursor: &mut LineCursor<'_>) -> Result<ScenarioDocument> {
        let mut document = ScenarioDocument::new();
        let version_line = cursor.next_line()?;
        document.version = FormatVersion::parse(&version_line, cursor.line_number())?;
        debug!(version = document.version.literal(), "version line read");

        let mut seen = HashSet::new();
        let mut sections = 0usize;
        while !cursor.at_end() {
            let line = cursor.next_line()?;
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            let line_number = cursor.line_number();

            let Some(tag) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) else {
                if self.config.is_strict() {
                    return Err(Error::UnexpectedLine {
                        line: line_number,
                        text: text.to_string(),
                    });
                }
                trace!(line = line_number, "skipping line outside a known section");
                continue;
            };

            let Some(section) = Section::from_tag(tag) else {
                if self.config.is_strict() {
                    return Err(Error::UnknownSection {
                        line: line_number,
                        tag: tag.to_string(),
                    });
                }
                warn!(line = line_number, tag, "skipping unknown section");
                continue;
            };

            let general_read = seen.contains(&Section::General);
            if section.needs_general() && !general_read {
                return Err(Error::GeneralNotParsed {
                    line: line_number,
                    tag: tag.to_string(),
                });
            }
            // Tables read so far are shaped by the first [GENERAL].
            if section == Section::General && general_read {
                return Err(Error::DuplicateSection {
                    line: line_number,
                    tag: tag.to_string(),
                });
            }

            debug!(section = section.tag(), line = line_number, "reading section");
            self.read_section(section, line_number, cursor, &mut document)?;
            seen.insert(section);
            sections += 1;
        }

        if !seen.contains(&Section::General) {
            return Err(Error::MissingSection {
                tag: Section::General.tag().to_string(),
            });
        }
        if let Some(missing) = Section::mandatory(document.general.discards)
            .into_iter()
            .find(|section| !seen.contains(section))
        {
            return Err(Error::MissingSection {
                tag: missing.tag().to_string(),
            });
        }
        info!(
            sections,
            lines = cursor.line_number(),
            analysis = ?document.analysis_type(),
            "input file read"
        );
        Ok(document)
    }

    fn read_section(
        &self,
        section: Section,
        line: usize,
        cursor: &mut LineCursor<'_>,
        document: &mut ScenarioDocument,
    ) -> Result<()> {
        let general = document.general.clone();
        let years = general.num_years();
        let ages = general.num_ages();
        let fleets = general.num_fleets;

        match section {
            Section::CaseId => {
                document.case_id = cursor.next_line()?.trim_end().to_string();
            }
            Section::General => document.general = GeneralParameters::read(cursor)?,
            Section::Bootstrap => document.bootstrap = Bootstrap::read(cursor)?,
            Section::Table(kind) => {
                let table = AgeTable::read(cursor, kind, years, ages, fleets)?;
                document.set_table(table);
            }
            Section::Biological => document.biological = Biological::read(cursor, years)?,
            Section::Recruit => {
                document.recruitment = Recruitment::read(
                    cursor,
                    general.first_year,
                    years,
                    general.num_recruit_models,
                    self.config,
                )?;
            }
            Section::Harvest => document.harvest = HarvestTable::read(cursor, years, fleets)?,
            Section::Rebuild | Section::PStar => {
                if document.calculation != HarvestCalculation::Standard {
                    return Err(Error::ConflictingAnalysis {
                        line,
                        tag: section.tag().to_string(),
                    });
                }
                document.calculation = if section == Section::Rebuild {
                    HarvestCalculation::Rebuilder(RebuilderTarget::read(cursor, general.years())?)
                } else {
                    HarvestCalculation::PStar(PStarAnalysis::read(cursor, general.years())?)
                };
            }
            Section::RefPoint => document.refpoint = Some(RefPoint::read(cursor)?),
            Section::Bounds => document.bounds = Some(Bounds::read(cursor)?),
            Section::RetroAdjust => {
                document.retro_adjust = Some(RetroAdjust::read(cursor, ages)?);
            }
            Section::Options => document.options = ReportOptions::read(cursor)?,
            Section::Scale => document.scale = Some(ReportScale::read(cursor)?),
            Section::Percentile => document.percentile = Some(Percentile::read(cursor)?),
        }
        Ok(())
    }

    /// Write a complete document in canonical order.
    pub fn write(document: &ScenarioDocument, sink: &mut dyn LineSink) -> Result<()> {
        sink.push_line(document.version.literal().to_string());

        push_tag(sink, Section::CaseId);
        sink.push_line(document.case_id.clone());
        push_tag(sink, Section::General);
        document.general.write(sink);
        push_tag(sink, Section::Bootstrap);
        document.bootstrap.write(sink);

        for kind in [
            TableKind::StockWeight,
            TableKind::SsbWeight,
            TableKind::MeanWeight,
            TableKind::CatchWeight,
            TableKind::DiscardWeight,
        ] {
            write_table(document, kind, sink)?;
        }
        write_table(document, TableKind::NaturalMortality, sink)?;
        push_tag(sink, Section::Biological);
        document.biological.write(sink);
        for kind in [TableKind::Maturity, TableKind::Fishery, TableKind::Discard] {
            write_table(document, kind, sink)?;
        }

        push_tag(sink, Section::Recruit);
        document.recruitment.write(sink)?;
        push_tag(sink, Section::Harvest);
        document.harvest.write(sink)?;
        if let Some(tag) = document.calculation.tag() {
            sink.push_line(format!("[{tag}]"));
            document.calculation.write(sink);
        }

        if let Some(refpoint) = &document.refpoint {
            push_tag(sink, Section::RefPoint);
            refpoint.write(sink);
        }
        if let Some(bounds) = &document.bounds {
            push_tag(sink, Section::Bounds);
            bounds.write(sink);
        }
        if let Some(retro) = &document.retro_adjust {
            push_tag(sink, Section::RetroAdjust);
            retro.write(sink);
        }
        push_tag(sink, Section::Options);
        document.options.write(sink);
        if let Some(scale) = &document.scale {
            push_tag(sink, Section::Scale);
            scale.write(sink);
        }
        if let Some(percentile) = &document.percentile {
            push_tag(sink, Section::Percentile);
            percentile.write(sink);
        }

        sink.flush();
        Ok(())
    }
}

fn push_tag(sink: &mut dyn LineSink, section: Section) {
    sink.push_line(format!("[{}]", section.tag()));
}

/// Discard tables are written only when the case models discards.
fn write_table(document: &ScenarioDocument, kind: TableKind, sink: &mut dyn LineSink) -> Result<()> {
    if kind.requires_discards() && !document.general.discards {
        return Ok(());
    }
    let table = document.table(kind).ok_or_else(|| Error::MissingSection {
        tag: kind.tag().to_string(),
    })?;
    push_tag(sink, Section::Table(kind));
    table.write(sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_tags_round_trip() {
        for tag in [
            "CASEID", "GENERAL", "BOOTSTRAP", "STOCK_WEIGHT", "DISCARD", "BIOLOGICAL", "RECRUIT",
            "HARVEST", "REBUILD", "PSTAR", "REFPOINT", "BOUNDS", "RETROADJUST", "OPTIONS",
            "SCALE", "PERC",
        ] {
            let section = Section::from_tag(tag).unwrap();
            assert_eq!(section.tag(), tag);
        }
        assert_eq!(Section::from_tag("FOO"), None);
    }

    #[test]
    fn test_only_caseid_and_general_precede_general() {
        assert!(!Section::CaseId.needs_general());
        assert!(!Section::General.needs_general());
        assert!(Section::Harvest.needs_general());
        assert!(Section::Table(TableKind::Maturity).needs_general());
    }

    #[test]
    fn test_mandatory_sections_follow_discards() {
        let plain = Section::mandatory(false);
        assert_eq!(plain.len(), 13);
        assert_eq!(plain.first(), Some(&Section::General));
        assert_eq!(plain.last(), Some(&Section::Options));
        assert!(!plain.contains(&Section::Table(TableKind::Discard)));
        assert!(!plain.contains(&Section::CaseId));

        let with_discards = Section::mandatory(true);
        assert_eq!(with_discards.len(), 15);
        assert!(with_discards.contains(&Section::Table(TableKind::DiscardWeight)));
        assert!(with_discards.contains(&Section::Table(TableKind::Discard)));
    }
}
