//! Perspectives: themed bundles of indicators, loaded once from versioned
//! JSON and validated against [`Metric`].

use serde::Deserialize;
use std::{collections::HashSet, fs, path::Path};
use tracing::info;

use crate::error::{EngineError, Result};
use crate::metric::Metric;

pub const CATALOG_VERSION: u32 = 1;
pub const MAX_INDICATORS: usize = 5;

const BUILTIN: &str = include_str!("../data/perspectives.json");

/// A selectable metric with its display metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct Indicator {
    pub id: String,
    pub name: String,
    pub description: String,
    pub full_definition: String,
    pub unit: String,
    pub metric: Metric,
    pub data_source: Option<String>,
    pub examples: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Perspective {
    pub id: String,
    pub title: String,
    pub description: String,
    pub color: String,
    pub tags: Vec<String>,
    pub indicators: Vec<Indicator>,
}

impl Perspective {
    pub fn indicator(&self, id: &str) -> Option<&Indicator> {
        self.indicators.iter().find(|i| i.id == id)
    }
}

#[derive(Clone, Debug)]
pub struct PerspectiveCatalog {
    perspectives: Vec<Perspective>,
}

#[derive(Deserialize)]
struct RawCatalog {
    version: u32,
    perspectives: Vec<RawPerspective>,
}

#[derive(Deserialize)]
struct RawPerspective {
    id: String,
    title: String,
    description: String,
    color: String,
    #[serde(default)]
    tags: Vec<String>,
    indicators: Vec<RawIndicator>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIndicator {
    id: String,
    name: String,
    description: String,
    full_definition: String,
    metric_key: String,
    unit: Option<String>,
    data_source: Option<String>,
    #[serde(default)]
    examples: Vec<String>,
}

impl RawIndicator {
    fn resolve(self) -> Result<Indicator> {
        let metric: Metric = self.metric_key.parse()?;
        Ok(Indicator {
            unit: self.unit.unwrap_or_else(|| metric.unit_label().to_string()),
            id: self.id,
            name: self.name,
            description: self.description,
            full_definition: self.full_definition,
            metric,
            data_source: self.data_source,
            examples: self.examples,
        })
    }
}

impl PerspectiveCatalog {
    /// The catalog bundled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_slice(BUILTIN.as_bytes())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let catalog = Self::from_slice(&fs::read(path)?)?;
        info!(
            path = %path.display(),
            perspectives = catalog.len(),
            "loaded perspective catalog"
        );
        Ok(catalog)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let raw: RawCatalog = serde_json::from_slice(bytes)?;
        if raw.version != CATALOG_VERSION {
            return Err(EngineError::UnsupportedCatalogVersion {
                found: raw.version,
                expected: CATALOG_VERSION,
            });
        }

        let mut ids = HashSet::new();
        let mut perspectives = Vec::with_capacity(raw.perspectives.len());
        for p in raw.perspectives {
            if !ids.insert(p.id.clone()) {
                return Err(EngineError::invalid_catalog(format!(
                    "duplicate perspective id '{}'",
                    p.id
                )));
            }
            if p.indicators.is_empty() || p.indicators.len() > MAX_INDICATORS {
                return Err(EngineError::invalid_catalog(format!(
                    "perspective '{}' has {} indicators (expected 1 to {MAX_INDICATORS})",
                    p.id,
                    p.indicators.len()
                )));
            }

            let mut indicator_ids = HashSet::new();
            let mut indicators = Vec::with_capacity(p.indicators.len());
            for raw_indicator in p.indicators {
                if !indicator_ids.insert(raw_indicator.id.clone()) {
                    return Err(EngineError::invalid_catalog(format!(
                        "duplicate indicator id '{}' in perspective '{}'",
                        raw_indicator.id, p.id
                    )));
                }
                indicators.push(raw_indicator.resolve()?);
            }

            perspectives.push(Perspective {
                id: p.id,
                title: p.title,
                description: p.description,
                color: p.color,
                tags: p.tags,
                indicators,
            });
        }

        if perspectives.is_empty() {
            return Err(EngineError::invalid_catalog("no perspectives defined"));
        }
        Ok(Self { perspectives })
    }

    pub fn all(&self) -> &[Perspective] {
        &self.perspectives
    }

    pub fn get(&self, id: &str) -> Option<&Perspective> {
        self.perspectives.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.perspectives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perspectives.is_empty()
    }
}
