use crossterm::event::KeyCode;
use econ_atlas::{
    Country, Dataset, Indicator, Perspective, PerspectiveCatalog, YearWindow,
    config::Config,
    data::DataStore,
    generate_insight_in,
    ranking::{CountryScores, LeaderboardEntry, Series, history, leaderboard, radial_scores},
};
use rand::{Rng, rng};
use tracing::{info, warn};

use crate::map_draw::MapView;

pub const MAX_SELECTED: usize = 5;
pub const LEADERBOARD_SIZE: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Entrance,
    Perspectives,
    Dashboard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel {
    Countries,
    Indicators,
    Details,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartKind {
    Area,
    Line,
    Bar,
}

impl ChartKind {
    pub fn next(self) -> Self {
        match self {
            ChartKind::Area => ChartKind::Line,
            ChartKind::Line => ChartKind::Bar,
            ChartKind::Bar => ChartKind::Area,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CenterView {
    Chart,
    Map,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

pub struct AppState {
    pub dataset: Dataset,
    pub catalog: PerspectiveCatalog,
    pub window: YearWindow,
    pub map: Option<MapView>,
    pub screen: Screen,
    pub theme: Theme,
    pub active_panel: Panel,
    pub chart: ChartKind,
    pub center: CenterView,
    /// Index into the catalog of the open perspective.
    pub perspective: usize,
    pub perspective_cursor: usize,
    pub selected_countries: Vec<Country>,
    pub country_cursor: usize,
    pub indicator: usize,
    pub indicator_cursor: usize,
    pub example: Option<String>,
    pub insight: String,
    pub leaders: Vec<LeaderboardEntry>,
    pub scores: Vec<CountryScores>,
    pub series: Vec<Series>,
}

impl AppState {
    pub const HELP_TEXT: &'static str = concat!(
        "Tab: panel  ↑/↓: move  Space: toggle country  Enter: select  ",
        "c: chart type  m: map  p: perspectives  t: theme  Esc: back  q: quit",
    );

    pub fn new(config: &Config) -> Result<Self, Box<dyn std::error::Error>> {
        let store = DataStore::new(&config.data_dir);
        let dataset = store.load_dataset(&config.dataset)?;
        let catalog = store.load_perspectives(&config.perspectives)?;
        let window = config.year_window(&dataset);

        let map = match store
            .load_geojson(&config.map)
            .and_then(MapView::new)
        {
            Ok(view) => {
                info!(
                    features = view.feature_count(),
                    countries = view.countries().len(),
                    "loaded map geometry"
                );
                Some(view)
            }
            Err(e) => {
                warn!(error = %e, file = %config.map, "map geometry unavailable");
                None
            }
        };

        let theme = if config.light { Theme::Light } else { Theme::Dark };
        let countries = config.initial_countries()?;
        let mut state = Self::from_parts(dataset, catalog, window, map, countries, theme);
        if let Some(id) = &config.perspective {
            match state.catalog.all().iter().position(|p| &p.id == id) {
                Some(idx) => state.open_perspective(idx),
                None => warn!(perspective = %id, "unknown perspective requested"),
            }
        }
        Ok(state)
    }

    pub fn from_parts(
        dataset: Dataset,
        catalog: PerspectiveCatalog,
        window: YearWindow,
        map: Option<MapView>,
        mut countries: Vec<Country>,
        theme: Theme,
    ) -> Self {
        countries.truncate(MAX_SELECTED);
        if countries.is_empty() {
            countries.push(Country::ALL[0]);
        }
        let mut state = Self {
            dataset,
            catalog,
            window,
            map,
            screen: Screen::Entrance,
            theme,
            active_panel: Panel::Countries,
            chart: ChartKind::Line,
            center: CenterView::Chart,
            perspective: 0,
            perspective_cursor: 0,
            selected_countries: countries,
            country_cursor: 0,
            indicator: 0,
            indicator_cursor: 0,
            example: None,
            insight: String::new(),
            leaders: Vec::new(),
            scores: Vec::new(),
            series: Vec::new(),
        };
        state.refresh();
        state
    }

    pub fn current_perspective(&self) -> &Perspective {
        &self.catalog.all()[self.perspective]
    }

    pub fn current_indicator(&self) -> &Indicator {
        &self.current_perspective().indicators[self.indicator]
    }

    /// Recomputes every derived view from the current selection.
    pub fn refresh(&mut self) {
        let metric = self.current_indicator().metric;
        self.insight =
            generate_insight_in(&self.selected_countries, metric, &self.dataset, self.window);
        self.leaders = leaderboard(metric, &self.dataset, self.window.latest, LEADERBOARD_SIZE);
        self.scores = radial_scores(
            self.current_perspective(),
            &self.selected_countries,
            &self.dataset,
            self.window.latest,
        );
        self.series = history(&self.selected_countries, metric, &self.dataset);
    }

    fn pick_example(&mut self) {
        let examples = &self.current_indicator().examples;
        let example = if examples.is_empty() {
            None
        } else {
            let idx = rng().random_range(0..examples.len());
            Some(examples[idx].clone())
        };
        self.example = example;
    }

    pub fn open_perspective(&mut self, idx: usize) {
        self.perspective = idx;
        self.perspective_cursor = idx;
        self.indicator = 0;
        self.indicator_cursor = 0;
        self.screen = Screen::Dashboard;
        info!(perspective = %self.current_perspective().id, "opened perspective");
        self.pick_example();
        self.refresh();
    }

    pub fn select_indicator(&mut self, idx: usize) {
        self.indicator = idx;
        self.pick_example();
        self.refresh();
    }

    /// Keeps between one and [`MAX_SELECTED`] countries selected.
    pub fn toggle_country(&mut self, country: Country) {
        if let Some(pos) = self.selected_countries.iter().position(|c| *c == country) {
            if self.selected_countries.len() > 1 {
                self.selected_countries.remove(pos);
            }
        } else if self.selected_countries.len() < MAX_SELECTED {
            self.selected_countries.push(country);
        }
        self.refresh();
    }

    /// Returns true when the application should exit.
    pub fn handle_input(&mut self, key: KeyCode) -> bool {
        use KeyCode::*;
        match key {
            Char('q') => return true,
            Char('t') => self.theme = self.theme.toggled(),
            _ => match self.screen {
                Screen::Entrance => {
                    if key == Enter {
                        self.screen = Screen::Perspectives;
                    }
                }
                Screen::Perspectives => self.handle_perspectives(key),
                Screen::Dashboard => self.handle_dashboard(key),
            },
        }
        false
    }

    fn handle_perspectives(&mut self, key: KeyCode) {
        use KeyCode::*;
        match key {
            Up => self.perspective_cursor = self.perspective_cursor.saturating_sub(1),
            Down => {
                if self.perspective_cursor + 1 < self.catalog.len() {
                    self.perspective_cursor += 1;
                }
            }
            Enter => self.open_perspective(self.perspective_cursor),
            Esc | Backspace => self.screen = Screen::Entrance,
            _ => {}
        }
    }

    fn handle_dashboard(&mut self, key: KeyCode) {
        use KeyCode::*;
        match key {
            Tab => {
                self.active_panel = match self.active_panel {
                    Panel::Countries => Panel::Indicators,
                    Panel::Indicators => Panel::Details,
                    Panel::Details => Panel::Countries,
                };
            }
            // From the map, `c` only brings the chart back.
            Char('c') => match self.center {
                CenterView::Map => self.center = CenterView::Chart,
                CenterView::Chart => self.chart = self.chart.next(),
            },
            Char('m') => {
                self.center = match self.center {
                    CenterView::Chart => CenterView::Map,
                    CenterView::Map => CenterView::Chart,
                };
            }
            Char('p') | Esc | Backspace => self.screen = Screen::Perspectives,
            Up => match self.active_panel {
                Panel::Countries => self.country_cursor = self.country_cursor.saturating_sub(1),
                Panel::Indicators => {
                    self.indicator_cursor = self.indicator_cursor.saturating_sub(1)
                }
                Panel::Details => {}
            },
            Down => match self.active_panel {
                Panel::Countries => {
                    if self.country_cursor + 1 < Country::ALL.len() {
                        self.country_cursor += 1;
                    }
                }
                Panel::Indicators => {
                    if self.indicator_cursor + 1 < self.current_perspective().indicators.len() {
                        self.indicator_cursor += 1;
                    }
                }
                Panel::Details => {}
            },
            Char(' ') | Enter => match self.active_panel {
                Panel::Countries => self.toggle_country(Country::ALL[self.country_cursor]),
                Panel::Indicators => self.select_indicator(self.indicator_cursor),
                Panel::Details => self.pick_example(),
            },
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use econ_atlas::Metric;

    fn state() -> AppState {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/economic_data.json");
        let dataset = Dataset::from_path(path).unwrap();
        let catalog = PerspectiveCatalog::builtin().unwrap();
        let window = YearWindow::for_dataset(&dataset);
        let countries = vec![Country::Usa, Country::India];
        AppState::from_parts(dataset, catalog, window, None, countries, Theme::Dark)
    }

    #[test]
    fn walks_from_entrance_to_dashboard() {
        let mut s = state();
        assert_eq!(s.screen, Screen::Entrance);
        s.handle_input(KeyCode::Enter);
        assert_eq!(s.screen, Screen::Perspectives);
        s.handle_input(KeyCode::Down);
        s.handle_input(KeyCode::Enter);
        assert_eq!(s.screen, Screen::Dashboard);
        assert_eq!(s.perspective, 1);
        assert_eq!(s.indicator, 0);
        s.handle_input(KeyCode::Esc);
        assert_eq!(s.screen, Screen::Perspectives);
    }

    #[test]
    fn quit_key_exits() {
        assert!(state().handle_input(KeyCode::Char('q')));
    }

    #[test]
    fn last_country_cannot_be_deselected() {
        let mut s = state();
        s.toggle_country(Country::Usa);
        assert_eq!(s.selected_countries, vec![Country::India]);
        s.toggle_country(Country::India);
        assert_eq!(s.selected_countries, vec![Country::India]);
    }

    #[test]
    fn selection_is_capped() {
        let mut s = state();
        for c in Country::ALL {
            if !s.selected_countries.contains(&c) {
                s.toggle_country(c);
            }
        }
        assert_eq!(s.selected_countries.len(), MAX_SELECTED);
        assert_eq!(s.scores.len(), MAX_SELECTED);
        assert_eq!(s.series.len(), MAX_SELECTED);
    }

    #[test]
    fn choosing_indicator_updates_insight() {
        let mut s = state();
        s.open_perspective(0);
        s.active_panel = Panel::Indicators;
        s.handle_input(KeyCode::Down);
        s.handle_input(KeyCode::Down);
        s.handle_input(KeyCode::Enter);
        assert_eq!(s.current_indicator().metric, Metric::GrowthRate);
        assert!(s.insight.starts_with("India leads with a Growth Rate of 7.8%."));
        assert_eq!(s.leaders.len(), LEADERBOARD_SIZE);
    }

    #[test]
    fn theme_and_views_toggle() {
        let mut s = state();
        s.open_perspective(0);
        s.handle_input(KeyCode::Char('t'));
        assert_eq!(s.theme, Theme::Light);
        s.handle_input(KeyCode::Char('m'));
        assert_eq!(s.center, CenterView::Map);
        s.handle_input(KeyCode::Char('m'));
        assert_eq!(s.center, CenterView::Chart);
    }

    #[test]
    fn chart_key_cycles_line_bar_area() {
        let mut s = state();
        s.open_perspective(0);
        assert_eq!(s.chart, ChartKind::Line);
        let mut seen = Vec::new();
        for _ in 0..3 {
            s.handle_input(KeyCode::Char('c'));
            seen.push(s.chart);
        }
        assert_eq!(seen, vec![ChartKind::Bar, ChartKind::Area, ChartKind::Line]);
    }

    #[test]
    fn chart_key_on_map_only_returns_to_chart() {
        let mut s = state();
        s.open_perspective(0);
        s.chart = ChartKind::Line;
        s.handle_input(KeyCode::Char('m'));
        s.handle_input(KeyCode::Char('c'));
        assert_eq!(s.center, CenterView::Chart);
        assert_eq!(s.chart, ChartKind::Line);
    }
}
