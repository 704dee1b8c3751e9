//! Economic indicator engine: resolves metrics on per-country records, ranks
//! and normalises them, and writes a short narrative about the comparison.

pub mod config;
pub mod data;
pub mod error;
pub mod insight;
pub mod logging;
pub mod metric;
pub mod perspective;
pub mod ranking;

pub use data::{Country, Dataset, EconomicRecord};
pub use error::{EngineError, Result};
pub use insight::{YearWindow, generate_insight, generate_insight_in};
pub use metric::{Metric, format_value, formatted_value, raw_value, raw_value_by_key};
pub use perspective::{Indicator, Perspective, PerspectiveCatalog};
pub use ranking::{Domain, leaderboard, normalize_score, radial_scores, rank_latest};
