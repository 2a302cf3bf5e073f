//! # Title Analysis
//! The per-title analysis document and the service that composes it from
//! upstream data: structure counts, word metrics, agency attribution,
//! historical series, and corrections.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use chrono::{Months, NaiveDate};
use metrics::histogram;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dates;
use crate::ecfr::structure::{self, PartSummary};
use crate::ecfr::types::{CorrectionsResponse, TitleInfo, TitlesResponse};
use crate::ecfr::{agencies, content, RegulationSource};

/// Corrections listed verbatim in the document; the rest is only counted.
const RECENT_CORRECTIONS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisDocument {
    pub title_number: u32,
    pub name: String,
    pub structure: StructureSummary,
    pub metrics: TitleMetrics,
    pub historical_data: HistoricalData,
    pub versions: VersionSummary,
    pub corrections: CorrectionSummary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructureSummary {
    pub total_parts: u64,
    pub total_sections: u64,
    #[serde(default)]
    pub parts: Vec<PartSummary>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TitleMetrics {
    pub word_count: u64,
    pub average_words_per_section: f64,
    #[serde(default)]
    pub agency_word_counts: HashMap<String, u64>,
}

/// Parallel arrays: point `i` of each vector is one historical observation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoricalData {
    pub dates: Vec<String>,
    pub section_counts: Vec<u64>,
    pub part_counts: Vec<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionSummary {
    pub total_versions: usize,
    pub latest_update: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrectionSummary {
    pub total_corrections: usize,
    #[serde(default)]
    pub recent_corrections: Vec<CorrectionEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrectionEntry {
    pub date: Option<String>,
    pub description: String,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("title {0} not found")]
    TitleNotFound(u32),
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

/// Composes analysis documents from a [`RegulationSource`]. Immutable after
/// construction; shared via `Arc` in the HTTP state.
pub struct AnalysisService {
    source: Arc<dyn RegulationSource>,
    history_months: u32,
}

impl AnalysisService {
    pub fn new(source: Arc<dyn RegulationSource>, history_months: u32) -> Self {
        Self {
            source,
            history_months,
        }
    }

    pub async fn list_titles(&self) -> anyhow::Result<TitlesResponse> {
        self.source
            .fetch_titles()
            .await
            .context("fetching title index")
    }

    /// Build the full analysis document for one title.
    ///
    /// A missing title or a failed structure fetch is terminal for the
    /// request. Corrections, agencies, and individual historical snapshots
    /// degrade to empty data with a warning, so one flaky sub-fetch does
    /// not take down the whole document.
    pub async fn analyze_title(
        &self,
        number: u32,
        today: NaiveDate,
    ) -> Result<AnalysisDocument, AnalysisError> {
        let t0 = Instant::now();

        let index = self
            .source
            .fetch_titles()
            .await
            .context("fetching title index")?;
        let info = index
            .titles
            .iter()
            .find(|t| t.number == number)
            .cloned()
            .ok_or(AnalysisError::TitleNotFound(number))?;
        let issue_date = info
            .latest_issue_date
            .clone()
            .ok_or_else(|| anyhow::anyhow!("title {number} has no latest issue date"))?;

        let root = self
            .source
            .fetch_structure(&issue_date, number)
            .await
            .context("fetching title structure")?;
        let parsed = structure::parse_structure(&root);
        let text = content::extract_text(&root);
        let word_count = content::word_count(&text);
        let average_words_per_section =
            content::average_words_per_section(word_count, parsed.total_sections);

        let agency_word_counts = match self.source.fetch_agencies().await {
            Ok(resp) => {
                let directory = agencies::flatten_agencies(&resp);
                agencies::attribute_word_counts(&text, &directory, number)
            }
            Err(e) => {
                tracing::warn!(error = ?e, title = number, "agency fetch failed; skipping attribution");
                HashMap::new()
            }
        };

        let corrections = match self.source.fetch_corrections(number).await {
            Ok(resp) => summarize_corrections(resp),
            Err(e) => {
                tracing::warn!(error = ?e, title = number, "corrections fetch failed");
                CorrectionSummary::default()
            }
        };

        let historical_data = self.historical_changes(&info, number, today).await;
        let total_versions = historical_data.dates.len();

        histogram!("analysis_build_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        Ok(AnalysisDocument {
            title_number: number,
            name: if parsed.name.is_empty() {
                info.name.clone()
            } else {
                parsed.name.clone()
            },
            structure: StructureSummary {
                total_parts: parsed.total_parts,
                total_sections: parsed.total_sections,
                parts: parsed.parts,
            },
            metrics: TitleMetrics {
                word_count,
                average_words_per_section,
                agency_word_counts,
            },
            historical_data,
            versions: VersionSummary {
                total_versions,
                latest_update: Some(issue_date),
            },
            corrections,
        })
    }

    /// Section/part counts at every version date within the history window.
    /// Snapshots that fail to fetch are skipped.
    async fn historical_changes(
        &self,
        info: &TitleInfo,
        number: u32,
        today: NaiveDate,
    ) -> HistoricalData {
        let cutoff = today
            .checked_sub_months(Months::new(self.history_months))
            .unwrap_or(NaiveDate::MIN);

        let relevant: Vec<&String> = info
            .version_dates
            .iter()
            .filter(|d| dates::parse_date(d).is_some_and(|d| d >= cutoff))
            .collect();

        let mut points = Vec::with_capacity(relevant.len());
        for date in relevant {
            match self.source.fetch_structure(date, number).await {
                Ok(root) => points.push((
                    date.clone(),
                    structure::count_sections(&root),
                    structure::count_parts(&root),
                )),
                Err(e) => {
                    tracing::warn!(error = ?e, %date, title = number, "skipping historical snapshot");
                }
            }
        }
        points.sort_by(|a, b| a.0.cmp(&b.0));

        let mut data = HistoricalData::default();
        for (date, sections, parts) in points {
            data.dates.push(date);
            data.section_counts.push(sections);
            data.part_counts.push(parts);
        }
        data
    }
}

fn summarize_corrections(resp: CorrectionsResponse) -> CorrectionSummary {
    let mut raw = resp.ecfr_corrections;
    // Most recent correction first; undated entries sort last.
    raw.sort_by(|a, b| b.error_corrected.cmp(&a.error_corrected));

    let total_corrections = raw.len();
    let recent_corrections = raw
        .into_iter()
        .take(RECENT_CORRECTIONS)
        .map(|c| {
            let action = c.corrective_action.unwrap_or_default();
            let reference = c
                .cfr_references
                .first()
                .and_then(|r| r.cfr_reference.clone())
                .unwrap_or_default();
            CorrectionEntry {
                date: c.error_corrected,
                description: format!("{action} - {reference}"),
            }
        })
        .collect();

    CorrectionSummary {
        total_corrections,
        recent_corrections,
    }
}
