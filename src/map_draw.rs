use econ_atlas::{Country, Metric, Result};
use geo::{Area, Centroid, Geometry, MultiPolygon, Polygon};
use geojson::GeoJson;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Span,
    widgets::{
        Block,
        canvas::{Canvas, Line},
    },
};
use std::collections::HashMap;
use tracing::debug;

/// Fragments smaller than this share of a feature's largest polygon are
/// dropped so small islands do not clutter the canvas.
const FRAGMENT_THRESHOLD: f64 = 0.20;

struct MapItem {
    country: Option<Country>,
    shape: MultiPolygon<f64>,
}

/// Country outlines prepared for drawing on a canvas.
pub struct MapView {
    items: Vec<MapItem>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl MapView {
    pub fn new(raw: GeoJson) -> Result<Self> {
        let mut items = Vec::new();

        if let GeoJson::FeatureCollection(fc) = raw {
            for feature in fc.features {
                let country = feature
                    .properties
                    .as_ref()
                    .and_then(|p| p.get("ADMIN").and_then(|v| v.as_str()))
                    .and_then(|name| name.parse::<Country>().ok());

                let Some(gj) = feature.geometry else { continue };
                let geom: Geometry<f64> = gj.value.try_into()?;
                let shape = match geom {
                    Geometry::Polygon(p) => p.into(),
                    Geometry::MultiPolygon(m) => drop_fragments(m),
                    _ => continue,
                };
                items.push(MapItem { country, shape });
            }
        }

        let (mut minx, mut miny, mut maxx, mut maxy) =
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for item in &items {
            for poly in &item.shape.0 {
                for coord in &poly.exterior().0 {
                    minx = minx.min(coord.x);
                    miny = miny.min(coord.y);
                    maxx = maxx.max(coord.x);
                    maxy = maxy.max(coord.y);
                }
            }
        }
        let (x_bounds, y_bounds) = if minx.is_finite() {
            ([minx, maxx], [miny, maxy])
        } else {
            ([-180.0, 180.0], [-90.0, 90.0])
        };

        debug!(features = items.len(), "prepared map view");
        Ok(Self { items, x_bounds, y_bounds })
    }

    pub fn feature_count(&self) -> usize {
        self.items.len()
    }

    pub fn countries(&self) -> Vec<Country> {
        self.items.iter().filter_map(|i| i.country).collect()
    }

    /// Draws every outline, coloured from `shades` where the feature maps to
    /// a known country, and labels the `labels` countries at their centroid.
    pub fn render(
        &self,
        f: &mut Frame,
        area: Rect,
        block: Block,
        shades: &HashMap<Country, Color>,
        outline: Color,
        labels: &[Country],
    ) {
        let canvas = Canvas::default()
            .block(block)
            .x_bounds(self.x_bounds)
            .y_bounds(self.y_bounds)
            .paint(|ctx| {
                for item in &self.items {
                    let color = item
                        .country
                        .and_then(|c| shades.get(&c).copied())
                        .unwrap_or(outline);
                    for poly in &item.shape.0 {
                        draw_ring(ctx, poly, color);
                    }
                }
                for item in &self.items {
                    let Some(country) = item.country.filter(|c| labels.contains(c)) else {
                        continue;
                    };
                    if let Some(center) = item.shape.centroid() {
                        let (r, g, b) = country.color();
                        ctx.print(
                            center.x(),
                            center.y(),
                            Span::styled(country.name(), Style::default().fg(Color::Rgb(r, g, b))),
                        );
                    }
                }
            });
        f.render_widget(canvas, area);
    }
}

fn drop_fragments(mp: MultiPolygon<f64>) -> MultiPolygon<f64> {
    if mp.0.len() <= 1 {
        return mp;
    }
    let max_area = mp.0.iter().map(|p| p.unsigned_area()).fold(0.0, f64::max);
    let kept: Vec<Polygon<f64>> = mp
        .0
        .iter()
        .filter(|p| p.unsigned_area() >= max_area * FRAGMENT_THRESHOLD)
        .cloned()
        .collect();
    if kept.is_empty() { mp } else { MultiPolygon(kept) }
}

fn draw_ring(ctx: &mut ratatui::widgets::canvas::Context, poly: &Polygon<f64>, color: Color) {
    let ring = &poly.exterior().0;
    for window in ring.windows(2) {
        let (a, b) = (window[0], window[1]);
        ctx.draw(&Line { x1: a.x, y1: a.y, x2: b.x, y2: b.y, color });
    }
    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        ctx.draw(&Line { x1: last.x, y1: last.y, x2: first.x, y2: first.y, color });
    }
}

/// Colour for a value at `fraction` (0..=1) of the map's range.
pub fn shade(metric: Metric, fraction: f64) -> Color {
    let (low, high) = match metric {
        Metric::Gdp | Metric::GdpPerCapita | Metric::GrowthRate => {
            ((0xe0, 0xe7, 0xff), (0x37, 0x30, 0xa3))
        }
        Metric::Cpi | Metric::Ppi | Metric::ImportPriceIndex => {
            ((0xff, 0xf7, 0xed), (0xc2, 0x41, 0x0c))
        }
        _ => ((0xff, 0xed, 0xea), (0xff, 0x52, 0x33)),
    };
    let t = fraction.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
    Color::Rgb(mix(low.0, high.0), mix(low.1, high.1), mix(low.2, high.2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const TWO_FEATURES: &str = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {"ADMIN": "United States of America"},
         "geometry": {"type": "Polygon", "coordinates": [[[-120, 30], [-70, 30], [-70, 48], [-120, 48], [-120, 30]]]}},
        {"type": "Feature", "properties": {"ADMIN": "Atlantis"},
         "geometry": {"type": "MultiPolygon", "coordinates": [
            [[[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]],
            [[[20, 0], [21, 0], [21, 1], [20, 1], [20, 0]]]]}}
    ]}"#;

    #[test]
    fn maps_admin_names_to_countries() {
        let view = MapView::new(GeoJson::from_str(TWO_FEATURES).unwrap()).unwrap();
        assert_eq!(view.feature_count(), 2);
        assert_eq!(view.countries(), vec![Country::Usa]);
    }

    #[test]
    fn small_fragments_are_dropped() {
        let view = MapView::new(GeoJson::from_str(TWO_FEATURES).unwrap()).unwrap();
        assert_eq!(view.items[1].shape.0.len(), 1);
        assert_eq!(view.x_bounds, [-120.0, 10.0]);
    }

    #[test]
    fn bundled_map_covers_every_country() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/world.geojson");
        let raw = GeoJson::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        let mut countries = MapView::new(raw).unwrap().countries();
        countries.sort();
        assert_eq!(countries, Country::ALL.to_vec());
    }

    #[test]
    fn shade_interpolates_between_endpoints() {
        assert_eq!(shade(Metric::Gdp, 0.0), Color::Rgb(0xe0, 0xe7, 0xff));
        assert_eq!(shade(Metric::Gdp, 1.0), Color::Rgb(0x37, 0x30, 0xa3));
        assert_eq!(shade(Metric::Neer, 2.0), Color::Rgb(0xff, 0x52, 0x33));
    }
}
