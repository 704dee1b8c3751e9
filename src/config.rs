use clap::Parser;
use std::path::PathBuf;

use crate::data::{Country, Dataset};
use crate::error::Result;
use crate::insight::YearWindow;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "econ_atlas",
    about = "Terminal dashboard comparing economic indicators across countries",
    version
)]
pub struct Config {
    /// Directory holding the dataset, perspectives and map geometry.
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    #[arg(long, default_value = "economic_data.json")]
    pub dataset: String,

    #[arg(long, default_value = "perspectives.json")]
    pub perspectives: String,

    #[arg(long, default_value = "world.geojson")]
    pub map: String,

    /// Comparison year. Defaults to the most recent year in the dataset.
    #[arg(long)]
    pub year: Option<i32>,

    /// Year the leader's trend is measured from. Defaults to two years
    /// before the comparison year.
    #[arg(long)]
    pub baseline_year: Option<i32>,

    /// Initially selected countries, comma separated.
    #[arg(long, value_delimiter = ',', default_value = "USA,India")]
    pub countries: Vec<String>,

    /// Open straight on this perspective's dashboard.
    #[arg(long)]
    pub perspective: Option<String>,

    /// Start with the light theme.
    #[arg(long)]
    pub light: bool,

    #[arg(long, default_value = "econ_atlas.log")]
    pub log_file: PathBuf,

    /// Used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn year_window(&self, dataset: &Dataset) -> YearWindow {
        let derived = YearWindow::for_dataset(dataset);
        let latest = self.year.unwrap_or(derived.latest);
        YearWindow {
            latest,
            baseline: self.baseline_year.unwrap_or(latest.saturating_sub(2)),
        }
    }

    pub fn initial_countries(&self) -> Result<Vec<Country>> {
        let mut out = Vec::new();
        for name in &self.countries {
            let country: Country = name.parse()?;
            if !out.contains(&country) {
                out.push(country);
            }
        }
        Ok(out)
    }
}
