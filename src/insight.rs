//! Template-based narrative for a ranked comparison.

use tracing::debug;

use crate::data::{Country, Dataset};
use crate::metric::{Metric, formatted_value, raw_value};
use crate::ranking::rank_latest;

pub const EMPTY_SELECTION: &str = "Please select at least one country to generate an analysis.";
pub const NO_DATA: &str = "No data available for the selected parameters.";

/// The comparison year and the year the leader's trend is measured from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct YearWindow {
    pub latest: i32,
    pub baseline: i32,
}

impl Default for YearWindow {
    fn default() -> Self {
        Self {
            latest: 2025,
            baseline: 2023,
        }
    }
}

impl YearWindow {
    /// Latest year in the dataset with the baseline two years earlier.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        dataset
            .latest_year()
            .map(|latest| Self {
                latest,
                baseline: latest.saturating_sub(2),
            })
            .unwrap_or_default()
    }
}

pub fn generate_insight(countries: &[Country], metric: Metric, dataset: &Dataset) -> String {
    generate_insight_in(countries, metric, dataset, YearWindow::default())
}

pub fn generate_insight_in(
    countries: &[Country],
    metric: Metric,
    dataset: &Dataset,
    window: YearWindow,
) -> String {
    if countries.is_empty() {
        return EMPTY_SELECTION.to_string();
    }

    let ranked = rank_latest(countries, metric, dataset, window.latest);
    let (Some(&leader), Some(&trailer)) = (ranked.first(), ranked.last()) else {
        debug!(%metric, year = window.latest, "no records for insight");
        return NO_DATA.to_string();
    };

    let mut sentences = vec![format!(
        "{} leads with a {metric} of {}.",
        leader.country,
        formatted_value(leader, metric)
    )];

    if leader.country != trailer.country {
        sentences.push(format!(
            "By contrast, {} trails at {}.",
            trailer.country,
            formatted_value(trailer, metric)
        ));
    }

    if let Some(previous) = dataset.record(leader.country, window.baseline) {
        let diff = raw_value(leader, metric) - raw_value(previous, metric);
        let trend = if diff > 0.0 { "increased" } else { "decreased" };
        sentences.push(format!(
            "Notably, {} has {trend} its {metric} since {}.",
            leader.country, window.baseline
        ));
    }

    sentences.join(" ")
}
