use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Failures surfaced by the engine and its loaders.
///
/// Missing data for a selection is not an error: rankings come back empty and
/// insights degrade to explanatory text.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unrecognized metric: {key}")]
    UnrecognizedMetric { key: String },

    #[error("unknown country: {name}")]
    UnknownCountry { name: String },

    #[error("duplicate record for {country} in {year}")]
    DuplicateRecord { country: String, year: i32 },

    #[error("invalid perspective catalog: {message}")]
    InvalidCatalog { message: String },

    #[error("unsupported catalog version {found} (expected {expected})")]
    UnsupportedCatalogVersion { found: u32, expected: u32 },

    #[error("logging setup failed: {message}")]
    Logging { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
}

impl EngineError {
    #[must_use]
    pub fn invalid_catalog(message: impl Into<String>) -> Self {
        Self::InvalidCatalog {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unrecognized_metric(key: impl Into<String>) -> Self {
        Self::UnrecognizedMetric { key: key.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::EngineError;

    #[test]
    fn unrecognized_metric_names_the_key() {
        let error = EngineError::unrecognized_metric("Inflation");
        assert_eq!(error.to_string(), "unrecognized metric: Inflation");
    }

    #[test]
    fn duplicate_record_mentions_country_and_year() {
        let error = EngineError::DuplicateRecord {
            country: "USA".to_string(),
            year: 2025,
        };
        assert_eq!(error.to_string(), "duplicate record for USA in 2025");
    }
}
