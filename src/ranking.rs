//! Ranking and normalisation over the dataset.
//!
//! Everything here is a pure pass over the in-memory records; results are
//! rebuilt from scratch on every selection change.

use std::cmp::Ordering;

use tracing::debug;

use crate::data::{Country, Dataset, EconomicRecord};
use crate::metric::{Metric, format_value, raw_value};
use crate::perspective::Perspective;

/// Score returned when every value in the domain is identical.
pub const MIDPOINT_SCORE: u8 = 50;

/// Records of the selected countries for `year`, best first.
///
/// Equal values keep dataset order. Duplicated countries in the selection do
/// not duplicate records. An empty selection or a year without data gives an
/// empty list.
pub fn rank_latest<'a>(
    countries: &[Country],
    metric: Metric,
    dataset: &'a Dataset,
    year: i32,
) -> Vec<&'a EconomicRecord> {
    let mut ranked: Vec<&EconomicRecord> = dataset
        .records()
        .iter()
        .filter(|r| r.year == year && countries.contains(&r.country))
        .collect();
    ranked.sort_by(|a, b| descending(raw_value(a, metric), raw_value(b, metric)));
    debug!(
        %metric,
        year,
        selected = countries.len(),
        matched = ranked.len(),
        "ranked records"
    );
    ranked
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

#[derive(Clone, Debug, PartialEq)]
pub struct LeaderboardEntry {
    /// 1-based.
    pub rank: usize,
    pub country: Country,
    pub value: f64,
    pub formatted: String,
}

/// Top `top_n` of all countries for `year`, regardless of the selection.
pub fn leaderboard(
    metric: Metric,
    dataset: &Dataset,
    year: i32,
    top_n: usize,
) -> Vec<LeaderboardEntry> {
    rank_latest(&Country::ALL, metric, dataset, year)
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(i, r)| {
            let value = raw_value(r, metric);
            LeaderboardEntry {
                rank: i + 1,
                country: r.country,
                value,
                formatted: format_value(metric, value),
            }
        })
        .collect()
}

/// Linear min-max score in `0..=100`; `reverse` flips it for
/// lower-is-better metrics. A flat domain scores [`MIDPOINT_SCORE`].
pub fn normalize_score(raw: f64, min: f64, max: f64, reverse: bool) -> u8 {
    if max == min {
        return MIDPOINT_SCORE;
    }
    let score = (100.0 * (raw - min) / (max - min)).clamp(0.0, 100.0).round() as u8;
    if reverse { 100 - score } else { score }
}

/// Normalisation scale for one metric.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
    pub reverse: bool,
}

impl Domain {
    /// Spread of `metric` across every record in the dataset, not only the
    /// current selection, so toggling countries never rescales the others.
    pub fn for_metric(dataset: &Dataset, metric: Metric) -> Option<Self> {
        let reverse = metric.lower_is_better();
        if let Some((min, max)) = metric.fixed_domain() {
            return Some(Self { min, max, reverse });
        }
        Self::from_values(dataset.records().iter().map(|r| raw_value(r, metric)), reverse)
    }

    pub fn from_values(values: impl IntoIterator<Item = f64>, reverse: bool) -> Option<Self> {
        let mut bounds: Option<(f64, f64)> = None;
        for v in values.into_iter().filter(|v| v.is_finite()) {
            bounds = Some(match bounds {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            });
        }
        bounds.map(|(min, max)| Self { min, max, reverse })
    }

    pub fn score(&self, raw: f64) -> u8 {
        normalize_score(raw, self.min, self.max, self.reverse)
    }

    /// Position of `raw` in the domain as `0.0..=1.0`, ignoring `reverse`.
    pub fn fraction(&self, raw: f64) -> f64 {
        if self.max == self.min {
            return 0.5;
        }
        ((raw - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct IndicatorScore {
    pub indicator: String,
    pub metric: Metric,
    pub score: u8,
    pub raw: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CountryScores {
    pub country: Country,
    /// Highest score first.
    pub scores: Vec<IndicatorScore>,
}

/// Per-country 0-100 scores for every indicator of a perspective, in
/// selection order. A country without a record for `year` gets no scores.
pub fn radial_scores(
    perspective: &Perspective,
    countries: &[Country],
    dataset: &Dataset,
    year: i32,
) -> Vec<CountryScores> {
    let domains: Vec<Option<Domain>> = perspective
        .indicators
        .iter()
        .map(|ind| Domain::for_metric(dataset, ind.metric))
        .collect();

    countries
        .iter()
        .map(|&country| {
            let Some(record) = dataset.record(country, year) else {
                return CountryScores { country, scores: Vec::new() };
            };
            let mut scores: Vec<IndicatorScore> = perspective
                .indicators
                .iter()
                .zip(&domains)
                .map(|(ind, domain)| {
                    let raw = raw_value(record, ind.metric);
                    IndicatorScore {
                        indicator: ind.name.clone(),
                        metric: ind.metric,
                        score: domain.map_or(MIDPOINT_SCORE, |d| d.score(raw)),
                        raw,
                    }
                })
                .collect();
            scores.sort_by(|a, b| b.score.cmp(&a.score));
            CountryScores { country, scores }
        })
        .collect()
}

/// Year-by-year values of one country, ascending by year.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub country: Country,
    pub points: Vec<(f64, f64)>,
}

/// Chart series for each selected country. Missing years are skipped.
pub fn history(countries: &[Country], metric: Metric, dataset: &Dataset) -> Vec<Series> {
    countries
        .iter()
        .map(|&country| {
            let mut points: Vec<(i32, f64)> = dataset
                .records()
                .iter()
                .filter(|r| r.country == country)
                .map(|r| (r.year, raw_value(r, metric)))
                .collect();
            points.sort_by_key(|(year, _)| *year);
            Series {
                country,
                points: points.into_iter().map(|(y, v)| (f64::from(y), v)).collect(),
            }
        })
        .collect()
}
