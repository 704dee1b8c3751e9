use serde::Deserialize;
use serde_json::from_slice;
use std::{
    collections::HashSet,
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use geojson::GeoJson;
use tracing::{debug, info};

use crate::error::{EngineError, Result};
use crate::perspective::PerspectiveCatalog;

/// Countries covered by the bundled dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub enum Country {
    India,
    China,
    Japan,
    Usa,
    Germany,
}

impl Country {
    pub const ALL: [Country; 5] = [
        Country::India,
        Country::China,
        Country::Japan,
        Country::Usa,
        Country::Germany,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Country::India => "India",
            Country::China => "China",
            Country::Japan => "Japan",
            Country::Usa => "USA",
            Country::Germany => "Germany",
        }
    }

    /// Accent colour used for the country's series and markers.
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            Country::India => (0xFF, 0x99, 0x33),
            Country::China => (0xDE, 0x29, 0x10),
            Country::Japan => (0xF9, 0x73, 0x16),
            Country::Usa => (0x3C, 0x3B, 0x6E),
            Country::Germany => (0xEA, 0xB3, 0x08),
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Country {
    type Err = EngineError;

    /// Case-insensitive; also accepts the long names used by map geometry.
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase().replace([' ', '_', '.'], "");
        match key.as_str() {
            "india" => Ok(Country::India),
            "china" => Ok(Country::China),
            "japan" => Ok(Country::Japan),
            "usa" | "us" | "unitedstates" | "unitedstatesofamerica" => Ok(Country::Usa),
            "germany" => Ok(Country::Germany),
            _ => Err(EngineError::UnknownCountry {
                name: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Country {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// One country's metrics for one year.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomicRecord {
    pub country: Country,
    pub year: i32,
    /// Trillion USD.
    pub gdp: f64,
    /// USD.
    pub gdp_per_capita: f64,
    pub growth_rate: f64,
    pub pmi: f64,
    pub iip: f64,
    pub retail_sales: f64,
    pub cpi: f64,
    pub ppi: f64,
    pub import_price_index: f64,
    pub unemployment: f64,
    pub wage_growth: f64,
    pub real_disposable_income: f64,
    /// Percent of GDP.
    pub current_account: f64,
    /// Billion USD.
    pub trade_balance: f64,
    /// Local currency per USD.
    pub exchange_rate: f64,
    pub neer: f64,
}

/// Immutable table of records, at most one per (country, year).
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    records: Vec<EconomicRecord>,
}

impl Dataset {
    pub fn new(records: Vec<EconomicRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for r in &records {
            if !seen.insert((r.country, r.year)) {
                return Err(EngineError::DuplicateRecord {
                    country: r.country.to_string(),
                    year: r.year,
                });
            }
        }
        Ok(Self { records })
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let records: Vec<EconomicRecord> = from_slice(bytes)?;
        Self::new(records)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let dataset = Self::from_slice(&fs::read(path)?)?;
        info!(
            path = %path.display(),
            records = dataset.len(),
            "loaded economic dataset"
        );
        Ok(dataset)
    }

    pub fn records(&self) -> &[EconomicRecord] {
        &self.records
    }

    pub fn record(&self, country: Country, year: i32) -> Option<&EconomicRecord> {
        self.records
            .iter()
            .find(|r| r.country == country && r.year == year)
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.records.iter().map(|r| r.year).max()
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.records.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Distinct countries in first-appearance order.
    pub fn countries(&self) -> Vec<Country> {
        let mut out = Vec::new();
        for r in &self.records {
            if !out.contains(&r.country) {
                out.push(r.country);
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Loads the static assets from a base directory.
pub struct DataStore {
    base: PathBuf,
}

impl DataStore {
    pub fn new<P: AsRef<Path>>(base: P) -> Self {
        Self {
            base: base.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.base.join(file)
    }

    pub fn load_dataset(&self, file: &str) -> Result<Dataset> {
        Dataset::from_path(self.path(file))
    }

    pub fn load_perspectives(&self, file: &str) -> Result<PerspectiveCatalog> {
        PerspectiveCatalog::from_path(self.path(file))
    }

    pub fn load_geojson(&self, file: &str) -> Result<GeoJson> {
        let path = self.path(file);
        let txt = fs::read_to_string(&path)?;
        debug!(path = %path.display(), bytes = txt.len(), "read map geometry");
        Ok(GeoJson::from_str(&txt)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_RECORDS: &str = r#"[
        {"country": "USA", "year": 2025, "gdp": 28.5, "gdpPerCapita": 84000, "growthRate": 2.0,
         "pmi": 51.2, "iip": 108.4, "retailSales": 4.1, "cpi": 3.1, "ppi": 2.2,
         "importPriceIndex": 103.5, "unemployment": 3.8, "wageGrowth": 3.4,
         "realDisposableIncome": 2.1, "currentAccount": -3.2, "tradeBalance": -46.7,
         "exchangeRate": 1.0, "neer": 111.3},
        {"country": "India", "year": 2024, "gdp": 3.9, "gdpPerCapita": 2700, "growthRate": 7.1,
         "pmi": 55.0, "iip": 140.2, "retailSales": 10.4, "cpi": 5.0, "ppi": 3.9,
         "importPriceIndex": 104.1, "unemployment": 5.9, "wageGrowth": 8.1,
         "realDisposableIncome": 5.4, "currentAccount": -1.4, "tradeBalance": -16.2,
         "exchangeRate": 83.1, "neer": 86.0}
    ]"#;

    #[test]
    fn parses_camel_case_records() {
        let ds = Dataset::from_slice(TWO_RECORDS.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        let usa = ds.record(Country::Usa, 2025).unwrap();
        assert_eq!(usa.gdp, 28.5);
        assert_eq!(usa.gdp_per_capita, 84000.0);
        assert_eq!(ds.latest_year(), Some(2025));
        assert_eq!(ds.years(), vec![2024, 2025]);
        assert_eq!(ds.countries(), vec![Country::Usa, Country::India]);
    }

    #[test]
    fn rejects_duplicate_country_year() {
        let mut records: Vec<EconomicRecord> = serde_json::from_str(TWO_RECORDS).unwrap();
        records.push(records[0].clone());
        let err = Dataset::new(records).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateRecord { year: 2025, .. }));
    }

    #[test]
    fn unknown_country_in_json_is_rejected() {
        let bad = TWO_RECORDS.replace("\"India\"", "\"Atlantis\"");
        assert!(Dataset::from_slice(bad.as_bytes()).is_err());
    }

    #[test]
    fn country_parses_aliases() {
        assert_eq!("United States of America".parse::<Country>().unwrap(), Country::Usa);
        assert_eq!("usa".parse::<Country>().unwrap(), Country::Usa);
        assert_eq!(" germany ".parse::<Country>().unwrap(), Country::Germany);
        assert!("France".parse::<Country>().is_err());
    }

    #[test]
    fn empty_dataset_has_no_latest_year() {
        let ds = Dataset::default();
        assert!(ds.is_empty());
        assert_eq!(ds.latest_year(), None);
    }

    #[test]
    fn store_reads_files_relative_to_base() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("records.json"), TWO_RECORDS).unwrap();
        let store = DataStore::new(dir.path());
        let ds = store.load_dataset("records.json").unwrap();
        assert_eq!(ds.len(), 2);
        assert!(matches!(
            store.load_dataset("missing.json"),
            Err(EngineError::Io(_))
        ));
    }
}
