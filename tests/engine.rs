use econ_atlas::{
    Country, Dataset, EngineError, Metric, PerspectiveCatalog, YearWindow, data::DataStore,
    formatted_value, generate_insight, generate_insight_in, insight, leaderboard,
    normalize_score, radial_scores, rank_latest, raw_value, ranking::Domain,
};
use proptest::prelude::*;
use std::sync::OnceLock;

fn bundled() -> &'static Dataset {
    static DATASET: OnceLock<Dataset> = OnceLock::new();
    DATASET.get_or_init(|| {
        DataStore::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"))
            .load_dataset("economic_data.json")
            .unwrap()
    })
}

fn country() -> impl Strategy<Value = Country> {
    prop::sample::select(Country::ALL.to_vec())
}

fn metric() -> impl Strategy<Value = Metric> {
    prop::sample::select(Metric::ALL.to_vec())
}

#[test]
fn bundled_dataset_covers_every_country_and_year() {
    let ds = bundled();
    assert_eq!(ds.len(), Country::ALL.len() * 10);
    assert_eq!(ds.years(), (2016..=2025).collect::<Vec<_>>());
    assert_eq!(YearWindow::for_dataset(ds), YearWindow { latest: 2025, baseline: 2023 });
}

#[test]
fn bundled_catalog_only_references_known_metrics() {
    let store = DataStore::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"));
    let catalog = store.load_perspectives("perspectives.json").unwrap();
    let builtin = PerspectiveCatalog::builtin().unwrap();
    assert_eq!(catalog.len(), builtin.len());
    let used: Vec<Metric> = catalog
        .all()
        .iter()
        .flat_map(|p| p.indicators.iter().map(|i| i.metric))
        .collect();
    for metric in Metric::ALL {
        assert!(used.contains(&metric), "{metric} is not offered by any perspective");
    }
}

#[test]
fn usa_gdp_formats_in_trillions() {
    let usa = bundled().record(Country::Usa, 2025).unwrap();
    assert_eq!(usa.gdp, 28.5);
    assert_eq!(formatted_value(usa, Metric::Gdp), "$28.5T");
}

#[test]
fn india_leads_china_on_growth() {
    let text = generate_insight(&[Country::India, Country::China], Metric::GrowthRate, bundled());
    assert!(text.starts_with("India leads with a Growth Rate of 7.8%."), "{text}");
    assert!(text.contains("China trails at 4.6%"), "{text}");
    assert!(text.contains("India has increased its Growth Rate since 2023."), "{text}");
}

#[test]
fn empty_selection_message() {
    assert_eq!(
        generate_insight(&[], Metric::Neer, bundled()),
        "Please select at least one country to generate an analysis."
    );
}

#[test]
fn missing_baseline_year_omits_trend() {
    let latest_only: Vec<_> = bundled()
        .records()
        .iter()
        .filter(|r| r.year == 2025)
        .cloned()
        .collect();
    let ds = Dataset::new(latest_only).unwrap();
    let text = generate_insight(&[Country::Japan, Country::Germany], Metric::Cpi, &ds);
    assert!(!text.contains("increased") && !text.contains("decreased"), "{text}");
    assert!(text.contains("leads with a CPI of"));
}

#[test]
fn unknown_year_reads_as_no_data() {
    let window = YearWindow { latest: 1990, baseline: 1988 };
    let text = generate_insight_in(&[Country::Usa], Metric::Gdp, bundled(), window);
    assert_eq!(text, insight::NO_DATA);
}

#[test]
fn unrecognized_metric_fails_fast() {
    let err = "Fiscal Deficit".parse::<Metric>().unwrap_err();
    assert!(matches!(err, EngineError::UnrecognizedMetric { .. }));
}

#[test]
fn leaderboard_lists_top_three() {
    let board = leaderboard(Metric::Gdp, bundled(), 2025, 3);
    let countries: Vec<Country> = board.iter().map(|e| e.country).collect();
    assert_eq!(countries, vec![Country::Usa, Country::China, Country::Japan]);
    assert_eq!(board[0].formatted, "$28.5T");
}

#[test]
fn scores_stay_on_the_dataset_scale_when_selection_changes() {
    let catalog = PerspectiveCatalog::builtin().unwrap();
    let perspective = catalog.get("jobs-incomes").unwrap();
    let alone = radial_scores(perspective, &[Country::India], bundled(), 2025);
    let paired = radial_scores(perspective, &[Country::Usa, Country::India], bundled(), 2025);
    assert_eq!(alone[0], paired[1]);
}

proptest! {
    #[test]
    fn ranking_is_sorted_descending(
        countries in prop::collection::vec(country(), 1..6),
        metric in metric(),
        year in 2016..=2025i32,
    ) {
        let ranked = rank_latest(&countries, metric, bundled(), year);
        prop_assert!(!ranked.is_empty());
        for pair in ranked.windows(2) {
            prop_assert!(raw_value(pair[0], metric) >= raw_value(pair[1], metric));
        }
        let again = rank_latest(&countries, metric, bundled(), year);
        prop_assert_eq!(ranked, again);
    }

    #[test]
    fn empty_selection_ranks_nothing(metric in metric(), year in 2016..=2025i32) {
        prop_assert!(rank_latest(&[], metric, bundled(), year).is_empty());
    }

    #[test]
    fn score_is_monotonic(
        min in -100.0..100.0f64,
        width in 0.001..200.0f64,
        a in -300.0..300.0f64,
        b in -300.0..300.0f64,
    ) {
        let max = min + width;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(normalize_score(lo, min, max, false) <= normalize_score(hi, min, max, false));
        prop_assert!(normalize_score(lo, min, max, true) >= normalize_score(hi, min, max, true));
        prop_assert!(normalize_score(hi, min, max, false) <= 100);
    }

    #[test]
    fn flat_domain_is_midpoint(x in -1e6..1e6f64, v in -1e6..1e6f64, reverse in any::<bool>()) {
        prop_assert_eq!(normalize_score(x, v, v, reverse), 50);
    }

    #[test]
    fn domain_scores_bundled_values_in_range(metric in metric(), country in country()) {
        let domain = Domain::for_metric(bundled(), metric).unwrap();
        let record = bundled().record(country, 2025).unwrap();
        let score = domain.score(raw_value(record, metric));
        prop_assert!(score <= 100);
    }
}
