use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span, Text},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset as ChartDataset, GraphType,
        List, ListItem, ListState, Paragraph, Wrap,
    },
};
use econ_atlas::{Country, Domain, format_value, raw_value};
use std::collections::HashMap;

use crate::map_draw::shade;
use crate::state::{AppState, CenterView, ChartKind, Panel, Screen, Theme};

struct Palette {
    fg: Color,
    bg: Color,
    muted: Color,
    accent: Color,
}

impl Palette {
    fn new(theme: Theme, accent: Color) -> Self {
        match theme {
            Theme::Dark => Self {
                fg: Color::White,
                bg: Color::Rgb(0x0f, 0x17, 0x2a),
                muted: Color::Rgb(0x64, 0x74, 0x8b),
                accent,
            },
            Theme::Light => Self {
                fg: Color::Rgb(0x43, 0x34, 0x22),
                bg: Color::Rgb(0xf5, 0xf2, 0xe9),
                muted: Color::Rgb(0x8c, 0x7b, 0x60),
                accent,
            },
        }
    }

    fn block<'a>(&self, title: impl Into<Line<'a>>, focused: bool) -> Block<'a> {
        let border = if focused { self.accent } else { self.muted };
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(border))
            .style(Style::default().fg(self.fg).bg(self.bg))
    }
}

/// Named perspective colours; anything else falls back to amber.
fn accent_color(name: &str) -> Color {
    match name {
        "indigo" => Color::Rgb(0x3b, 0x82, 0xf6),
        "red" => Color::Rgb(0xef, 0x44, 0x44),
        "emerald" => Color::Rgb(0x10, 0xb9, 0x81),
        _ => Color::Rgb(0xf5, 0x9e, 0x0b),
    }
}

fn country_color(country: Country) -> Color {
    let (r, g, b) = country.color();
    Color::Rgb(r, g, b)
}

pub fn draw(f: &mut Frame, state: &AppState) {
    let accent = match state.screen {
        Screen::Perspectives => &state.catalog.all()[state.perspective_cursor].color,
        _ => &state.current_perspective().color,
    };
    let palette = Palette::new(state.theme, accent_color(accent));
    f.render_widget(Block::default().style(Style::default().bg(palette.bg)), f.area());

    match state.screen {
        Screen::Entrance => draw_entrance(f, &palette),
        Screen::Perspectives => draw_perspectives(f, state, &palette),
        Screen::Dashboard => draw_dashboard(f, state, &palette),
    }
}

fn draw_entrance(f: &mut Frame, palette: &Palette) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Length(7),
            Constraint::Min(0),
        ])
        .split(f.area());

    let text = Text::from(vec![
        Line::from(Span::styled(
            "ECON ATLAS",
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Compare economies through the lens that matters to you."),
        Line::from(""),
        Line::from(Span::styled(
            "Enter: begin   t: theme   q: quit",
            Style::default().fg(palette.muted),
        )),
    ]);
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(palette.fg).bg(palette.bg));
    f.render_widget(paragraph, rows[1]);
}

fn draw_perspectives(f: &mut Frame, state: &AppState, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(f.area());

    let items: Vec<ListItem> = state
        .catalog
        .all()
        .iter()
        .map(|p| {
            ListItem::new(Line::from(vec![
                Span::styled("● ", Style::default().fg(accent_color(&p.color))),
                Span::raw(p.title.clone()),
            ]))
        })
        .collect();
    let mut list_state = ListState::default();
    list_state.select(Some(state.perspective_cursor));
    let list = List::new(items)
        .block(palette.block("Choose a perspective", true))
        .highlight_symbol(">> ")
        .highlight_style(Style::default().fg(palette.accent).add_modifier(Modifier::BOLD));
    f.render_stateful_widget(list, chunks[0], &mut list_state);

    let p = &state.catalog.all()[state.perspective_cursor];
    let mut lines = vec![
        Line::from(Span::styled(
            p.title.clone(),
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(p.description.clone()),
        Line::from(""),
        Line::from(Span::styled(p.tags.join("  ·  "), Style::default().fg(palette.muted))),
        Line::from(""),
        Line::from(Span::styled("Indicators", Style::default().add_modifier(Modifier::BOLD))),
    ];
    for ind in &p.indicators {
        lines.push(Line::from(format!("  {} ({})", ind.name, ind.unit)));
        lines.push(Line::from(Span::styled(
            format!("    {}", ind.description),
            Style::default().fg(palette.muted),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter: open dashboard   Esc: back   q: quit",
        Style::default().fg(palette.muted),
    )));
    let detail = Paragraph::new(lines)
        .block(palette.block("About", false))
        .wrap(Wrap { trim: true });
    f.render_widget(detail, chunks[1]);
}

fn draw_dashboard(f: &mut Frame, state: &AppState, palette: &Palette) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(55),
            Constraint::Percentage(25),
        ])
        .split(outer[0]);

    draw_selectors(f, state, palette, chunks[0]);

    let center = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[1]);
    match state.center {
        CenterView::Chart => match state.chart {
            ChartKind::Area => draw_trend_chart(f, state, palette, center[0], true),
            ChartKind::Line => draw_trend_chart(f, state, palette, center[0], false),
            ChartKind::Bar => draw_bar_chart(f, state, palette, center[0]),
        },
        CenterView::Map => draw_map(f, state, palette, center[0]),
    }
    draw_scores(f, state, palette, center[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Percentage(45),
            Constraint::Min(0),
        ])
        .split(chunks[2]);
    draw_leaderboard(f, state, palette, right[0]);
    draw_insight(f, state, palette, right[1]);
    draw_details(f, state, palette, right[2]);

    let help = Paragraph::new(Span::styled(AppState::HELP_TEXT, Style::default().fg(palette.muted)))
        .style(Style::default().bg(palette.bg));
    f.render_widget(help, outer[1]);
}

fn draw_selectors(f: &mut Frame, state: &AppState, palette: &Palette, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(Country::ALL.len() as u16 + 2), Constraint::Min(0)])
        .split(area);

    let countries: Vec<ListItem> = Country::ALL
        .iter()
        .map(|&c| {
            let mark = if state.selected_countries.contains(&c) { "[x] " } else { "[ ] " };
            ListItem::new(Line::from(vec![
                Span::raw(mark),
                Span::styled(c.name(), Style::default().fg(country_color(c))),
            ]))
        })
        .collect();
    let mut country_state = ListState::default();
    if state.active_panel == Panel::Countries {
        country_state.select(Some(state.country_cursor));
    }
    let list = List::new(countries)
        .block(palette.block("Countries", state.active_panel == Panel::Countries))
        .highlight_symbol("> ")
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));
    f.render_stateful_widget(list, rows[0], &mut country_state);

    let perspective = state.current_perspective();
    let indicators: Vec<ListItem> = perspective
        .indicators
        .iter()
        .enumerate()
        .map(|(i, ind)| {
            let style = if i == state.indicator {
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Span::styled(ind.name.clone(), style))
        })
        .collect();
    let mut indicator_state = ListState::default();
    if state.active_panel == Panel::Indicators {
        indicator_state.select(Some(state.indicator_cursor));
    }
    let list = List::new(indicators)
        .block(palette.block(
            perspective.title.clone(),
            state.active_panel == Panel::Indicators,
        ))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, rows[1], &mut indicator_state);
}

/// Samples inserted between consecutive years when filling an area.
const AREA_STEPS: usize = 8;

/// Resolution of the bar chart's value axis.
const BAR_RESOLUTION: f64 = 1000.0;

/// Linear interpolation of `points` so vertical fill lines read as an area.
fn fill_points(points: &[(f64, f64)], steps: usize) -> Vec<(f64, f64)> {
    let Some(&last) = points.last() else {
        return Vec::new();
    };
    let mut filled = Vec::with_capacity(points.len() * steps.max(1));
    for pair in points.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        for i in 0..steps.max(1) {
            let t = i as f64 / steps.max(1) as f64;
            filled.push((x0 + (x1 - x0) * t, y0 + (y1 - y0) * t));
        }
    }
    filled.push(last);
    filled
}

/// Maps values onto bar heights that keep their true proportions. The
/// baseline is zero, or the minimum when values go negative.
struct BarScale {
    floor: f64,
    span: f64,
}

impl BarScale {
    fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let (mut min, mut max) = (0.0_f64, 0.0_f64);
        for v in values {
            min = min.min(v);
            max = max.max(v);
        }
        Self { floor: min, span: max - min }
    }

    fn height(&self, value: f64) -> u64 {
        if self.span <= 0.0 {
            return 0;
        }
        ((value - self.floor) / self.span * BAR_RESOLUTION).round() as u64
    }
}

/// Line or area view of the selected countries' history.
fn draw_trend_chart(
    f: &mut Frame,
    state: &AppState,
    palette: &Palette,
    area: Rect,
    filled: bool,
) {
    let indicator = state.current_indicator();
    let points = state.series.iter().flat_map(|s| s.points.iter());
    let (mut x_min, mut x_max, mut y_min, mut y_max) =
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    let title = format!("{} ({})", indicator.name, indicator.unit);
    if !x_min.is_finite() {
        let empty = Paragraph::new("No data available for the selected parameters.")
            .block(palette.block(title, false));
        f.render_widget(empty, area);
        return;
    }
    let pad = ((y_max - y_min) * 0.1).max(0.5);
    let (mut y_lo, mut y_hi) = (y_min - pad, y_max + pad);

    let mut layers: Vec<(Country, Vec<(f64, f64)>)> = state
        .series
        .iter()
        .map(|s| {
            let points = if filled {
                fill_points(&s.points, AREA_STEPS)
            } else {
                s.points.clone()
            };
            (s.country, points)
        })
        .collect();
    if filled {
        // Fills hang from zero.
        y_lo = y_lo.min(0.0);
        y_hi = y_hi.max(0.0);
        let peak = |pts: &[(f64, f64)]| pts.iter().fold(0.0_f64, |m, p| m.max(p.1.abs()));
        layers.sort_by(|a, b| peak(&b.1).total_cmp(&peak(&a.1)));
    }

    let graph = if filled { GraphType::Bar } else { GraphType::Line };
    let datasets: Vec<ChartDataset> = layers
        .iter()
        .map(|(country, points)| {
            ChartDataset::default()
                .name(country.name())
                .marker(symbols::Marker::Braille)
                .graph_type(graph)
                .style(Style::default().fg(country_color(*country)))
                .data(points)
        })
        .collect();

    let metric = indicator.metric;
    let chart = Chart::new(datasets)
        .block(palette.block(title, false))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(palette.muted))
                .bounds([x_min, x_max])
                .labels(vec![format!("{x_min}"), format!("{x_max}")]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(palette.muted))
                .bounds([y_lo, y_hi])
                .labels(vec![
                    format_value(metric, (y_lo * 10.0).round() / 10.0),
                    format_value(metric, (y_hi * 10.0).round() / 10.0),
                ]),
        );
    f.render_widget(chart, area);
}

/// One group per year, one bar per selected country.
fn draw_bar_chart(f: &mut Frame, state: &AppState, palette: &Palette, area: Rect) {
    let indicator = state.current_indicator();
    let metric = indicator.metric;
    let mut years: Vec<f64> = state
        .series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.0))
        .collect();
    years.sort_by(f64::total_cmp);
    years.dedup();

    let title = format!("{} by year ({})", indicator.name, indicator.unit);
    if years.is_empty() {
        let empty = Paragraph::new("No data available for the selected parameters.")
            .block(palette.block(title, false));
        f.render_widget(empty, area);
        return;
    }

    let scale = BarScale::new(state.series.iter().flat_map(|s| s.points.iter().map(|p| p.1)));
    let groups: Vec<BarGroup> = years
        .iter()
        .map(|&year| {
            let bars: Vec<Bar> = state
                .series
                .iter()
                .map(|s| {
                    let color = country_color(s.country);
                    let bar = Bar::default()
                        .style(Style::default().fg(color))
                        .value_style(Style::default().fg(palette.bg).bg(color));
                    match s.points.iter().find(|p| p.0 == year) {
                        Some(&(_, value)) => bar
                            .value(scale.height(value))
                            .text_value(format_value(metric, value)),
                        None => bar.value(0).text_value(String::new()),
                    }
                })
                .collect();
            BarGroup::default()
                .label(Line::from(format!("{year}")))
                .bars(&bars)
        })
        .collect();

    let per_group = state.series.len().max(1) as u16;
    let inner = area.width.saturating_sub(2);
    let bar_width = (inner / years.len() as u16).saturating_sub(1) / per_group;
    let mut chart = BarChart::default()
        .block(palette.block(title, false))
        .bar_width(bar_width.max(1))
        .bar_gap(0)
        .group_gap(1)
        .max(BAR_RESOLUTION as u64);
    for group in groups {
        chart = chart.data(group);
    }
    f.render_widget(chart, area);
}

fn draw_map(f: &mut Frame, state: &AppState, palette: &Palette, area: Rect) {
    let metric = state.current_indicator().metric;
    let year = state.window.latest;
    let title = format!("{} in {year}", state.current_indicator().name);
    let Some(map) = &state.map else {
        let txt = Paragraph::new("Map geometry unavailable")
            .block(palette.block(title, false))
            .wrap(Wrap { trim: true });
        f.render_widget(txt, area);
        return;
    };

    let records: Vec<_> = state.dataset.records().iter().filter(|r| r.year == year).collect();
    let domain = Domain::from_values(records.iter().map(|r| raw_value(r, metric)), false);
    let shades: HashMap<Country, Color> = records
        .iter()
        .map(|r| {
            let fraction = domain.map_or(0.5, |d| d.fraction(raw_value(r, metric)));
            (r.country, shade(metric, fraction))
        })
        .collect();

    map.render(
        f,
        area,
        palette.block(title, false),
        &shades,
        palette.muted,
        &state.selected_countries,
    );
}

fn draw_scores(f: &mut Frame, state: &AppState, palette: &Palette, area: Rect) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Ratio(1, state.scores.len().max(1) as u32);
            state.scores.len().max(1)
        ])
        .split(area);

    for (cell, entry) in cells.iter().zip(&state.scores) {
        let block = palette.block(
            Span::styled(entry.country.name(), Style::default().fg(country_color(entry.country))),
            false,
        );
        if entry.scores.is_empty() {
            f.render_widget(Paragraph::new("No data").block(block), *cell);
            continue;
        }
        let bars: Vec<Bar> = entry
            .scores
            .iter()
            .map(|s| {
                Bar::default()
                    .value(u64::from(s.score))
                    .label(Line::from(s.metric.label()))
                    .style(Style::default().fg(palette.accent))
            })
            .collect();
        let chart = BarChart::default()
            .block(block)
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
            .max(100)
            .data(BarGroup::default().bars(&bars));
        f.render_widget(chart, *cell);
    }
}

fn draw_leaderboard(f: &mut Frame, state: &AppState, palette: &Palette, area: Rect) {
    let indicator = state.current_indicator();
    let lines: Vec<Line> = state
        .leaders
        .iter()
        .map(|e| {
            Line::from(vec![
                Span::styled(format!("{}. ", e.rank), Style::default().fg(palette.accent)),
                Span::styled(
                    format!("{:<8}", e.country.name()),
                    Style::default().fg(country_color(e.country)),
                ),
                Span::raw(e.formatted.clone()),
            ])
        })
        .collect();
    let title = format!("Top {} {}", state.leaders.len(), indicator.metric);
    let paragraph = Paragraph::new(lines).block(palette.block(title, false));
    f.render_widget(paragraph, area);
}

fn draw_insight(f: &mut Frame, state: &AppState, palette: &Palette, area: Rect) {
    let paragraph = Paragraph::new(state.insight.clone())
        .block(palette.block("What This Comparison Tells Us", false))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_details(f: &mut Frame, state: &AppState, palette: &Palette, area: Rect) {
    let ind = state.current_indicator();
    let heading = Style::default().fg(palette.accent).add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled(ind.name.clone(), heading)),
        Line::from(ind.description.clone()),
        Line::from(""),
        Line::from(Span::styled("Definition", heading)),
        Line::from(ind.full_definition.clone()),
    ];
    if let Some(source) = &ind.data_source {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Data Source", heading)));
        lines.push(Line::from(source.clone()));
    }
    if let Some(example) = &state.example {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("For example", heading)));
        lines.push(Line::from(example.clone()));
    }
    let paragraph = Paragraph::new(lines)
        .block(palette.block("About this indicator", state.active_panel == Panel::Details))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
