use std::path::Path;

use anyhow::{Context, Result};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::layout::WeightedNode;

/// Exchange a stock is listed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Market {
    Kospi,
    Kosdaq,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WicsStock {
    pub ticker: CompactString,
    pub name: CompactString,
    /// 억원
    pub market_cap: f64,
    /// Daily change in percent
    pub change: f64,
    pub market: Market,
    /// Share of the industry's market cap in percent
    #[serde(default)]
    pub weight: f64,
}

/// One WICS mid-level industry, stocks sorted by market cap descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WicsIndustry {
    /// e.g. "G2510"
    pub code: CompactString,
    pub name: CompactString,
    pub total_market_cap: f64,
    /// Cap-weighted average change in percent
    pub avg_change: f64,
    pub stock_count: u32,
    #[serde(default)]
    pub stocks: Vec<WicsStock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WicsHeatmapData {
    pub date: String,
    pub industries: Vec<WicsIndustry>,
}

impl WicsHeatmapData {
    pub fn industry(&self, code: &str) -> Option<&WicsIndustry> {
        self.industries.iter().find(|ind| ind.code == code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeItem {
    pub rank: u32,
    pub name: CompactString,
    pub change_percent: f64,
    pub sync_rate: f64,
    pub stock_count: u32,
    #[serde(default)]
    pub top_stocks: Vec<CompactString>,
    #[serde(default)]
    pub prev_rank: Option<u32>,
    #[serde(default)]
    pub trading_value_conc: Option<f64>,
    #[serde(default)]
    pub total_market_cap: Option<f64>,
}

/// A stock cell of the theme heatmap. `value` is the market cap in 억원.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapStock {
    pub name: CompactString,
    #[serde(default)]
    pub ticker: CompactString,
    pub value: f64,
    pub change: f64,
    #[serde(default)]
    pub sector: CompactString,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorPerf {
    pub name: CompactString,
    pub change_percent: f64,
    pub total_market_cap: f64,
    pub stock_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemesData {
    #[serde(default)]
    pub top10: Vec<ThemeItem>,
    #[serde(default)]
    pub bottom10: Vec<ThemeItem>,
    pub heatmap: Vec<HeatmapStock>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub sector_performance: Vec<SectorPerf>,
}

/// Any snapshot document the heatmap can be drawn from. The variant is picked
/// from the shape of the JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Snapshot {
    Wics(WicsHeatmapData),
    Themes(ThemesData),
    /// A bare list of `{ name, value, change, ticker?, sector? }` items
    Nodes(Vec<WeightedNode>),
}

impl Snapshot {
    pub fn kind(&self) -> &'static str {
        match self {
            Snapshot::Wics(_) => "wics",
            Snapshot::Themes(_) => "themes",
            Snapshot::Nodes(_) => "nodes",
        }
    }
}

pub fn parse_snapshot(json: &str) -> Result<Snapshot> {
    let snapshot: Snapshot = serde_json::from_str(json)
        .context("JSON is not a WICS heatmap, themes or node list snapshot")?;
    Ok(snapshot)
}

/// Read and parse a snapshot file.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let snapshot =
        parse_snapshot(&json).with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded {} snapshot from {}", snapshot.kind(), path.display());
    Ok(snapshot)
}
