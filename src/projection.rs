//! # View Projection
//! Pure, testable logic that maps `(AnalysisDocument, SelectionState)` →
//! `ViewProjection`. No I/O; the reference date is an explicit parameter so
//! window filtering stays deterministic under test.

use std::collections::HashMap;

use chrono::{Months, NaiveDate};
use serde::Serialize;

use crate::analysis::{AnalysisDocument, HistoricalData};
use crate::dates;

/// Number of rows shown when the agency table is collapsed.
pub const TOP_AGENCIES: usize = 5;

/// Time window for the historical chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    SixMonths,
    #[default]
    OneYear,
    TwoYears,
    FiveYears,
    All,
}

impl TimeRange {
    /// Parse a UI range token. Unknown tokens degrade to the default
    /// one-year window rather than failing the request.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "6m" => Self::SixMonths,
            "1y" => Self::OneYear,
            "2y" => Self::TwoYears,
            "5y" => Self::FiveYears,
            "all" => Self::All,
            _ => Self::OneYear,
        }
    }

    /// Inclusive lower bound of the window; `None` means unbounded.
    fn cutoff(self, today: NaiveDate) -> Option<NaiveDate> {
        let months = match self {
            Self::SixMonths => 6,
            Self::OneYear => 12,
            Self::TwoYears => 24,
            Self::FiveYears => 60,
            Self::All => return None,
        };
        Some(
            today
                .checked_sub_months(Months::new(months))
                .unwrap_or(NaiveDate::MIN),
        )
    }
}

/// UI selection state the projection depends on.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionState {
    pub time_range: TimeRange,
    pub show_all: bool,
}

/// One chart observation, axis label already rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub date: String,
    pub sections: u64,
    pub parts: u64,
}

/// One row of the agency word-count table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgencyRow {
    pub agency: String,
    pub word_count: u64,
    pub percentage: String,
}

/// View-ready projection of one analysis document. Recomputed on every
/// request; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ViewProjection {
    pub chart_series: Vec<ChartPoint>,
    pub agency_table: Vec<AgencyRow>,
    pub last_updated: String,
}

/// Project a document under the given selection. `today` anchors the
/// time-range cutoff.
pub fn project(
    doc: &AnalysisDocument,
    selection: &SelectionState,
    today: NaiveDate,
) -> ViewProjection {
    ViewProjection {
        chart_series: filter_historical(&doc.historical_data, selection.time_range, today),
        agency_table: rank_agencies(
            &doc.metrics.agency_word_counts,
            doc.metrics.word_count,
            selection.show_all,
        ),
        last_updated: dates::long_format(doc.versions.latest_update.as_deref()),
    }
}

/// Select the historical points inside the window, preserving input order,
/// and render their axis labels.
///
/// A date that fails to parse is a formatting problem, not a filter
/// criterion: the point stays in the series for every window and its label
/// renders as `""`.
pub fn filter_historical(
    history: &HistoricalData,
    range: TimeRange,
    today: NaiveDate,
) -> Vec<ChartPoint> {
    let cutoff = range.cutoff(today);

    let mut out = Vec::new();
    for (i, raw) in history.dates.iter().enumerate() {
        let keep = match (cutoff, dates::parse_date(raw)) {
            (None, _) => true,
            (Some(c), Some(d)) => d >= c,
            (Some(_), None) => true,
        };
        if !keep {
            continue;
        }
        out.push(ChartPoint {
            date: dates::short_format(Some(raw)),
            sections: history.section_counts.get(i).copied().unwrap_or(0),
            parts: history.part_counts.get(i).copied().unwrap_or(0),
        });
    }
    out
}

/// Rank agencies by word count descending (ties broken by name ascending),
/// truncate to [`TOP_AGENCIES`] unless `show_all`, and attach display
/// percentages.
pub fn rank_agencies(
    counts: &HashMap<String, u64>,
    total_word_count: u64,
    show_all: bool,
) -> Vec<AgencyRow> {
    let mut entries: Vec<(&str, u64)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    if !show_all {
        entries.truncate(TOP_AGENCIES);
    }

    entries
        .into_iter()
        .map(|(agency, word_count)| AgencyRow {
            agency: agency.to_string(),
            word_count,
            percentage: percentage_of(word_count, total_word_count),
        })
        .collect()
}

/// One-decimal display percentage. A zero total yields `"0.0"` for every
/// row instead of propagating a NaN into the table.
fn percentage_of(count: u64, total: u64) -> String {
    if total == 0 {
        return "0.0".to_string();
    }
    format!("{:.1}", count as f64 / total as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{
        AnalysisDocument, CorrectionSummary, HistoricalData, StructureSummary, TitleMetrics,
        VersionSummary,
    };

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("test date")
    }

    fn sample_history() -> HistoricalData {
        HistoricalData {
            dates: vec![
                "2023-01-01".to_string(),
                "2023-06-01".to_string(),
                "2024-01-01".to_string(),
            ],
            section_counts: vec![10, 12, 15],
            part_counts: vec![3, 3, 4],
        }
    }

    #[test]
    fn one_year_window_drops_older_points() {
        let pts = filter_historical(&sample_history(), TimeRange::OneYear, day("2024-01-15"));
        assert_eq!(
            pts,
            vec![
                ChartPoint {
                    date: "6/1/23".to_string(),
                    sections: 12,
                    parts: 3,
                },
                ChartPoint {
                    date: "1/1/24".to_string(),
                    sections: 15,
                    parts: 4,
                },
            ]
        );
    }

    #[test]
    fn all_range_keeps_every_point() {
        let history = sample_history();
        let pts = filter_historical(&history, TimeRange::All, day("2024-01-15"));
        assert_eq!(pts.len(), history.dates.len());
    }

    #[test]
    fn output_is_an_ordered_subsequence() {
        let history = sample_history();
        for range in [
            TimeRange::SixMonths,
            TimeRange::OneYear,
            TimeRange::TwoYears,
            TimeRange::FiveYears,
            TimeRange::All,
        ] {
            let pts = filter_historical(&history, range, day("2024-01-15"));
            assert!(pts.len() <= history.dates.len());
            let sections: Vec<u64> = pts.iter().map(|p| p.sections).collect();
            let mut cursor = history.section_counts.iter();
            for s in &sections {
                assert!(cursor.any(|x| x == s), "{s} out of order for {range:?}");
            }
        }
    }

    #[test]
    fn cutoff_is_inclusive() {
        let history = HistoricalData {
            dates: vec!["2023-01-15".to_string()],
            section_counts: vec![7],
            part_counts: vec![2],
        };
        let pts = filter_historical(&history, TimeRange::OneYear, day("2024-01-15"));
        assert_eq!(pts.len(), 1);
    }

    #[test]
    fn empty_series_projects_to_empty() {
        let history = HistoricalData::default();
        assert!(filter_historical(&history, TimeRange::OneYear, day("2024-01-15")).is_empty());
    }

    #[test]
    fn unparseable_dates_stay_in_the_series() {
        let history = HistoricalData {
            dates: vec!["bogus".to_string(), "2024-01-01".to_string()],
            section_counts: vec![5, 6],
            part_counts: vec![1, 2],
        };
        let pts = filter_historical(&history, TimeRange::SixMonths, day("2024-01-15"));
        assert_eq!(pts.len(), 2);
        assert_eq!(pts[0].date, "");
        assert_eq!(pts[0].sections, 5);
    }

    #[test]
    fn unknown_range_token_falls_back_to_one_year() {
        assert_eq!(TimeRange::parse("decade"), TimeRange::OneYear);
        assert_eq!(TimeRange::parse(""), TimeRange::OneYear);
        assert_eq!(TimeRange::parse("6M"), TimeRange::SixMonths);
        assert_eq!(TimeRange::parse("all"), TimeRange::All);
    }

    fn abc_counts() -> HashMap<String, u64> {
        HashMap::from([
            ("A".to_string(), 100),
            ("B".to_string(), 300),
            ("C".to_string(), 200),
        ])
    }

    #[test]
    fn ranking_sorts_by_count_descending() {
        let rows = rank_agencies(&abc_counts(), 600, false);
        assert_eq!(
            rows,
            vec![
                AgencyRow {
                    agency: "B".to_string(),
                    word_count: 300,
                    percentage: "50.0".to_string(),
                },
                AgencyRow {
                    agency: "C".to_string(),
                    word_count: 200,
                    percentage: "33.3".to_string(),
                },
                AgencyRow {
                    agency: "A".to_string(),
                    word_count: 100,
                    percentage: "16.7".to_string(),
                },
            ]
        );
    }

    #[test]
    fn collapsed_table_truncates_after_sorting() {
        let counts: HashMap<String, u64> =
            (0..8).map(|i| (format!("Agency {i}"), 10 + i as u64)).collect();
        let rows = rank_agencies(&counts, 100, false);
        assert_eq!(rows.len(), TOP_AGENCIES);
        // The kept rows are the largest five, not the first five enumerated.
        assert_eq!(rows[0].word_count, 17);
        assert_eq!(rows[4].word_count, 13);

        let all = rank_agencies(&counts, 100, true);
        assert_eq!(all.len(), 8);
    }

    #[test]
    fn ties_break_alphabetically() {
        let counts = HashMap::from([
            ("Zeta".to_string(), 50),
            ("Alpha".to_string(), 50),
            ("Mid".to_string(), 80),
        ]);
        let rows = rank_agencies(&counts, 180, true);
        let names: Vec<&str> = rows.iter().map(|r| r.agency.as_str()).collect();
        assert_eq!(names, vec!["Mid", "Alpha", "Zeta"]);
    }

    #[test]
    fn full_table_percentages_sum_to_about_100() {
        let counts = HashMap::from([
            ("A".to_string(), 333),
            ("B".to_string(), 333),
            ("C".to_string(), 334),
        ]);
        let rows = rank_agencies(&counts, 1000, true);
        let sum: f64 = rows
            .iter()
            .map(|r| r.percentage.parse::<f64>().expect("numeric percentage"))
            .sum();
        assert!((sum - 100.0).abs() <= 0.5, "sum was {sum}");
    }

    #[test]
    fn zero_total_word_count_renders_sentinel() {
        let rows = rank_agencies(&abc_counts(), 0, true);
        assert!(rows.iter().all(|r| r.percentage == "0.0"));
    }

    #[test]
    fn project_composes_all_three_projections() {
        let doc = AnalysisDocument {
            title_number: 7,
            name: "Agriculture".to_string(),
            structure: StructureSummary {
                total_parts: 4,
                total_sections: 15,
                parts: Vec::new(),
            },
            metrics: TitleMetrics {
                word_count: 600,
                average_words_per_section: 40.0,
                agency_word_counts: abc_counts(),
            },
            historical_data: sample_history(),
            versions: VersionSummary {
                total_versions: 3,
                latest_update: Some("2024-01-05".to_string()),
            },
            corrections: CorrectionSummary::default(),
        };

        let view = project(&doc, &SelectionState::default(), day("2024-01-15"));
        assert_eq!(view.chart_series.len(), 2);
        assert_eq!(view.agency_table.len(), 3);
        assert_eq!(view.agency_table[0].agency, "B");
        assert_eq!(view.last_updated, "January 5, 2024");
    }

    #[test]
    fn project_without_update_date_shows_na() {
        let doc = AnalysisDocument {
            title_number: 1,
            name: String::new(),
            structure: StructureSummary::default(),
            metrics: TitleMetrics::default(),
            historical_data: HistoricalData::default(),
            versions: VersionSummary::default(),
            corrections: CorrectionSummary::default(),
        };
        let view = project(&doc, &SelectionState::default(), day("2024-01-15"));
        assert!(view.chart_series.is_empty());
        assert!(view.agency_table.is_empty());
        assert_eq!(view.last_updated, "N/A");
    }
}
