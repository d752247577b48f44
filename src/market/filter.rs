use std::fmt;
use std::str::FromStr;

use anyhow::bail;

use super::snapshot::{Market, WicsIndustry};

/// Which listings an industry heatmap is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarketFilter {
    #[default]
    All,
    Kospi,
    Kosdaq,
}

impl MarketFilter {
    pub fn matches(self, market: Market) -> bool {
        match self {
            MarketFilter::All => true,
            MarketFilter::Kospi => market == Market::Kospi,
            MarketFilter::Kosdaq => market == Market::Kosdaq,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MarketFilter::All => "전체",
            MarketFilter::Kospi => "KOSPI",
            MarketFilter::Kosdaq => "KOSDAQ",
        }
    }
}

impl fmt::Display for MarketFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MarketFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" | "전체" => Ok(MarketFilter::All),
            "kospi" => Ok(MarketFilter::Kospi),
            "kosdaq" => Ok(MarketFilter::Kosdaq),
            other => bail!("Unknown market '{other}' (expected all, kospi or kosdaq)"),
        }
    }
}

/// Restrict every industry to the stocks listed on `market`.
///
/// Industries with no remaining stocks are dropped. Totals are recomputed from
/// the kept stocks and `avg_change` becomes their cap-weighted mean, rounded to
/// two decimals.
pub fn filter_by_market(industries: &[WicsIndustry], market: MarketFilter) -> Vec<WicsIndustry> {
    if market == MarketFilter::All {
        return industries.to_vec();
    }

    let filtered: Vec<WicsIndustry> = industries
        .iter()
        .filter_map(|ind| {
            let stocks: Vec<_> = ind
                .stocks
                .iter()
                .filter(|s| market.matches(s.market))
                .cloned()
                .collect();
            if stocks.is_empty() {
                return None;
            }

            let total_cap: f64 = stocks.iter().map(|s| s.market_cap).sum();
            let avg_change = if total_cap > 0.0 {
                stocks.iter().map(|s| s.change * s.market_cap).sum::<f64>() / total_cap
            } else {
                0.0
            };

            Some(WicsIndustry {
                code: ind.code.clone(),
                name: ind.name.clone(),
                total_market_cap: total_cap,
                avg_change: (avg_change * 100.0).round() / 100.0,
                stock_count: stocks.len() as u32,
                stocks,
            })
        })
        .collect();

    tracing::debug!(
        "Market filter {}: kept {} of {} industries",
        market,
        filtered.len(),
        industries.len()
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::snapshot::WicsStock;

    fn stock(ticker: &str, cap: f64, change: f64, market: Market) -> WicsStock {
        WicsStock {
            ticker: ticker.into(),
            name: ticker.into(),
            market_cap: cap,
            change,
            market,
            weight: 0.0,
        }
    }

    fn industry(code: &str, stocks: Vec<WicsStock>) -> WicsIndustry {
        WicsIndustry {
            code: code.into(),
            name: code.into(),
            total_market_cap: stocks.iter().map(|s| s.market_cap).sum(),
            avg_change: 9.99,
            stock_count: stocks.len() as u32,
            stocks,
        }
    }

    #[test]
    fn all_keeps_everything_untouched() {
        let inds = vec![industry("G1", vec![stock("a", 10.0, 1.0, Market::Kospi)])];
        assert_eq!(filter_by_market(&inds, MarketFilter::All), inds);
    }

    #[test]
    fn recomputes_totals_from_kept_stocks() {
        let inds = vec![industry(
            "G1",
            vec![
                stock("a", 300.0, 1.0, Market::Kospi),
                stock("b", 100.0, -2.0, Market::Kospi),
                stock("c", 500.0, 7.0, Market::Kosdaq),
            ],
        )];
        let out = filter_by_market(&inds, MarketFilter::Kospi);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].total_market_cap, 400.0);
        assert_eq!(out[0].stock_count, 2);
        // (300*1 + 100*-2) / 400
        assert_eq!(out[0].avg_change, 0.25);
    }

    #[test]
    fn rounds_average_to_two_decimals() {
        let inds = vec![industry(
            "G1",
            vec![
                stock("a", 1.0, 1.0, Market::Kosdaq),
                stock("b", 2.0, 0.0, Market::Kosdaq),
            ],
        )];
        let out = filter_by_market(&inds, MarketFilter::Kosdaq);
        assert_eq!(out[0].avg_change, 0.33);
    }

    #[test]
    fn drops_industries_without_matching_stocks() {
        let inds = vec![
            industry("G1", vec![stock("a", 10.0, 1.0, Market::Kospi)]),
            industry("G2", vec![stock("b", 10.0, 1.0, Market::Kosdaq)]),
        ];
        let out = filter_by_market(&inds, MarketFilter::Kosdaq);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].code, "G2");
    }

    #[test]
    fn zero_cap_average_is_zero() {
        let inds = vec![industry("G1", vec![stock("a", 0.0, 5.0, Market::Kospi)])];
        let out = filter_by_market(&inds, MarketFilter::Kospi);
        assert_eq!(out[0].avg_change, 0.0);
    }

    #[test]
    fn parses_filter_names() {
        assert_eq!("KOSPI".parse::<MarketFilter>().unwrap(), MarketFilter::Kospi);
        assert_eq!("kosdaq".parse::<MarketFilter>().unwrap(), MarketFilter::Kosdaq);
        assert_eq!("전체".parse::<MarketFilter>().unwrap(), MarketFilter::All);
        assert!("nyse".parse::<MarketFilter>().is_err());
    }
}
