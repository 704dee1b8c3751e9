//! Indicator resolution: maps a semantic metric onto the record field it
//! reads and renders values with the metric's unit.
//!
//! This is the only place that knows how a metric label relates to a record
//! field, so display and computation cannot drift apart.

use std::fmt;
use std::str::FromStr;

use crate::data::EconomicRecord;
use crate::error::{EngineError, Result};

/// Closed set of metrics a record carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Gdp,
    GdpPerCapita,
    GrowthRate,
    Pmi,
    Iip,
    RetailSales,
    Cpi,
    Ppi,
    ImportPriceIndex,
    UnemploymentRate,
    WageGrowth,
    RealDisposableIncome,
    CurrentAccount,
    TradeBalance,
    ExchangeRate,
    Neer,
}

/// Display unit attached to a metric. Never used in computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    /// Trillions of US dollars, `$12.3T`.
    TrillionUsd,
    /// Billions of US dollars, `$45B`.
    BillionUsd,
    /// Plain US dollars, `$61000`.
    Usd,
    /// Percent, `4.2%`.
    Percent,
    /// Index points, bare number.
    Index,
    /// Local currency per US dollar, bare number.
    PerUsd,
}

impl Metric {
    pub const ALL: [Metric; 16] = [
        Metric::Gdp,
        Metric::GdpPerCapita,
        Metric::GrowthRate,
        Metric::Pmi,
        Metric::Iip,
        Metric::RetailSales,
        Metric::Cpi,
        Metric::Ppi,
        Metric::ImportPriceIndex,
        Metric::UnemploymentRate,
        Metric::WageGrowth,
        Metric::RealDisposableIncome,
        Metric::CurrentAccount,
        Metric::TradeBalance,
        Metric::ExchangeRate,
        Metric::Neer,
    ];

    /// The semantic identifier used in indicator definitions and narratives.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Gdp => "GDP",
            Metric::GdpPerCapita => "GDP per Capita",
            Metric::GrowthRate => "Growth Rate",
            Metric::Pmi => "PMI",
            Metric::Iip => "IIP",
            Metric::RetailSales => "Retail Sales",
            Metric::Cpi => "CPI",
            Metric::Ppi => "PPI",
            Metric::ImportPriceIndex => "Import Price Index",
            Metric::UnemploymentRate => "Unemployment Rate",
            Metric::WageGrowth => "Wage Growth",
            Metric::RealDisposableIncome => "Real Disposable Income",
            Metric::CurrentAccount => "Current Account",
            Metric::TradeBalance => "Trade Balance",
            Metric::ExchangeRate => "Exchange Rate",
            Metric::Neer => "NEER",
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            Metric::Gdp => Unit::TrillionUsd,
            Metric::GdpPerCapita => Unit::Usd,
            Metric::TradeBalance => Unit::BillionUsd,
            Metric::Pmi | Metric::Iip | Metric::ImportPriceIndex | Metric::Neer => Unit::Index,
            Metric::ExchangeRate => Unit::PerUsd,
            Metric::GrowthRate
            | Metric::RetailSales
            | Metric::Cpi
            | Metric::Ppi
            | Metric::UnemploymentRate
            | Metric::WageGrowth
            | Metric::RealDisposableIncome
            | Metric::CurrentAccount => Unit::Percent,
        }
    }

    /// Short suffix for chart axes and tooltips.
    pub fn unit_label(self) -> &'static str {
        match self.unit() {
            Unit::TrillionUsd => "T USD",
            Unit::BillionUsd => "B USD",
            Unit::Usd => "USD",
            Unit::Percent => "%",
            Unit::Index => "index",
            Unit::PerUsd => "per USD",
        }
    }

    /// Metrics where a smaller reading is the better outcome.
    pub fn lower_is_better(self) -> bool {
        matches!(
            self,
            Metric::Cpi | Metric::Ppi | Metric::ImportPriceIndex | Metric::UnemploymentRate
        )
    }

    /// Metrics scored on a fixed scale instead of the dataset's spread.
    /// PMI is read around its 50 expansion line.
    pub fn fixed_domain(self) -> Option<(f64, f64)> {
        match self {
            Metric::Pmi => Some((40.0, 60.0)),
            _ => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Metric {
    type Err = EngineError;

    fn from_str(key: &str) -> Result<Self> {
        Metric::ALL
            .into_iter()
            .find(|m| m.label() == key)
            .ok_or_else(|| EngineError::unrecognized_metric(key))
    }
}

/// Reads the field of `record` that `metric` refers to.
pub fn raw_value(record: &EconomicRecord, metric: Metric) -> f64 {
    match metric {
        Metric::Gdp => record.gdp,
        Metric::GdpPerCapita => record.gdp_per_capita,
        Metric::GrowthRate => record.growth_rate,
        Metric::Pmi => record.pmi,
        Metric::Iip => record.iip,
        Metric::RetailSales => record.retail_sales,
        Metric::Cpi => record.cpi,
        Metric::Ppi => record.ppi,
        Metric::ImportPriceIndex => record.import_price_index,
        Metric::UnemploymentRate => record.unemployment,
        Metric::WageGrowth => record.wage_growth,
        Metric::RealDisposableIncome => record.real_disposable_income,
        Metric::CurrentAccount => record.current_account,
        Metric::TradeBalance => record.trade_balance,
        Metric::ExchangeRate => record.exchange_rate,
        Metric::Neer => record.neer,
    }
}

/// String-keyed lookup. Unknown keys fail instead of reading as zero.
pub fn raw_value_by_key(record: &EconomicRecord, key: &str) -> Result<f64> {
    let metric: Metric = key.parse()?;
    Ok(raw_value(record, metric))
}

/// Renders the metric's value on `record` with its unit suffix.
pub fn formatted_value(record: &EconomicRecord, metric: Metric) -> String {
    format_value(metric, raw_value(record, metric))
}

pub fn format_value(metric: Metric, value: f64) -> String {
    match metric.unit() {
        Unit::TrillionUsd => dollars(value, "T"),
        Unit::BillionUsd => dollars(value, "B"),
        Unit::Usd => dollars(value, ""),
        Unit::Percent => format!("{value}%"),
        Unit::Index | Unit::PerUsd => format!("{value}"),
    }
}

fn dollars(value: f64, suffix: &str) -> String {
    if value < 0.0 {
        format!("-${}{suffix}", -value)
    } else {
        format!("${value}{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Country, EconomicRecord};

    fn record() -> EconomicRecord {
        EconomicRecord {
            country: Country::Usa,
            year: 2025,
            gdp: 28.5,
            gdp_per_capita: 84000.0,
            growth_rate: 2.0,
            pmi: 51.2,
            iip: 108.4,
            retail_sales: 4.1,
            cpi: 3.1,
            ppi: 2.2,
            import_price_index: 103.5,
            unemployment: 3.8,
            wage_growth: 3.4,
            real_disposable_income: 2.1,
            current_account: -3.2,
            trade_balance: -46.7,
            exchange_rate: 1.0,
            neer: 111.3,
        }
    }

    #[test]
    fn gdp_renders_in_trillions() {
        assert_eq!(formatted_value(&record(), Metric::Gdp), "$28.5T");
    }

    #[test]
    fn percentages_and_indices_use_their_suffix() {
        let r = record();
        assert_eq!(formatted_value(&r, Metric::UnemploymentRate), "3.8%");
        assert_eq!(formatted_value(&r, Metric::Pmi), "51.2");
        assert_eq!(formatted_value(&r, Metric::Neer), "111.3");
        assert_eq!(formatted_value(&r, Metric::ImportPriceIndex), "103.5");
    }

    #[test]
    fn negative_trade_balance_keeps_sign_before_currency() {
        assert_eq!(formatted_value(&record(), Metric::TradeBalance), "-$46.7B");
        assert_eq!(format_value(Metric::TradeBalance, 45.0), "$45B");
    }

    #[test]
    fn every_label_parses_back_to_its_metric() {
        for metric in Metric::ALL {
            assert_eq!(metric.label().parse::<Metric>().unwrap(), metric);
        }
    }

    #[test]
    fn unknown_key_fails_instead_of_reading_zero() {
        let err = raw_value_by_key(&record(), "Fiscal Deficit").unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnrecognizedMetric { ref key } if key == "Fiscal Deficit"
        ));
        assert_eq!(raw_value_by_key(&record(), "NEER").unwrap(), 111.3);
    }

    #[test]
    fn lower_is_better_covers_price_and_jobless_metrics() {
        let reversed: Vec<Metric> = Metric::ALL
            .into_iter()
            .filter(|m| m.lower_is_better())
            .collect();
        assert_eq!(
            reversed,
            vec![
                Metric::Cpi,
                Metric::Ppi,
                Metric::ImportPriceIndex,
                Metric::UnemploymentRate
            ]
        );
    }
}
