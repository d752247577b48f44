pub mod filter;
pub mod snapshot;

use compact_str::CompactString;
use rayon::prelude::*;

use self::snapshot::{HeatmapStock, SectorPerf, WicsIndustry};
use crate::layout::{squarify_with, LayoutConfig, LayoutRect, WeightedNode};

fn warn_negative(kind: &str, name: &str, weight: f64) {
    if weight < 0.0 {
        tracing::warn!("Negative market cap for {} '{}' ({}), clamping", kind, name, weight);
    }
}

/// One cell per industry, sized by total market cap. The industry code rides
/// along as the ticker so a clicked cell can be drilled into.
pub fn industry_nodes(industries: &[WicsIndustry]) -> Vec<WeightedNode> {
    industries
        .iter()
        .map(|ind| {
            warn_negative("industry", &ind.name, ind.total_market_cap);
            WeightedNode::new(ind.name.clone(), ind.total_market_cap, ind.avg_change)
                .with_ticker(ind.code.clone())
                .with_sector("")
        })
        .collect()
}

/// Drill-down cells: the industry's stocks, tagged with the industry name.
pub fn stock_nodes(industry: &WicsIndustry) -> Vec<WeightedNode> {
    industry
        .stocks
        .iter()
        .map(|s| {
            warn_negative("stock", &s.name, s.market_cap);
            WeightedNode::new(s.name.clone(), s.market_cap, s.change)
                .with_ticker(s.ticker.clone())
                .with_sector(industry.name.clone())
        })
        .collect()
}

pub fn heatmap_nodes(stocks: &[HeatmapStock]) -> Vec<WeightedNode> {
    stocks
        .iter()
        .map(|s| {
            warn_negative("stock", &s.name, s.value);
            WeightedNode::new(s.name.clone(), s.value, s.change)
                .with_ticker(s.ticker.clone())
                .with_sector(s.sector.clone())
        })
        .collect()
}

pub fn sector_nodes(sectors: &[SectorPerf]) -> Vec<WeightedNode> {
    sectors
        .iter()
        .map(|s| {
            warn_negative("sector", &s.name, s.total_market_cap);
            WeightedNode::new(s.name.clone(), s.total_market_cap, s.change_percent)
        })
        .collect()
}

/// Lay out every industry's drill-down heatmap at once, keyed by industry code.
/// Each layout is independent, so they run in parallel.
pub fn layout_all_industries(
    industries: &[WicsIndustry],
    width: f64,
    height: f64,
    config: &LayoutConfig,
) -> Vec<(CompactString, Vec<LayoutRect>)> {
    let layouts: Vec<_> = industries
        .par_iter()
        .map(|ind| {
            let rects = squarify_with(&stock_nodes(ind), width, height, config);
            (ind.code.clone(), rects)
        })
        .collect();

    tracing::info!(
        "Laid out {} industry heatmaps ({} cells) in {:.0}x{:.0}",
        layouts.len(),
        layouts.iter().map(|(_, r)| r.len()).sum::<usize>(),
        width,
        height
    );
    layouts
}

#[cfg(test)]
mod tests {
    use super::snapshot::{parse_snapshot, Snapshot, WicsHeatmapData};
    use super::*;

    fn demo() -> WicsHeatmapData {
        match parse_snapshot(include_str!("../../demos/wics-heatmap.json")).unwrap() {
            Snapshot::Wics(data) => data,
            other => panic!("unexpected snapshot kind {}", other.kind()),
        }
    }

    #[test]
    fn industry_nodes_carry_code_as_ticker() {
        let data = demo();
        let nodes = industry_nodes(&data.industries);
        assert_eq!(nodes.len(), data.industries.len());
        assert_eq!(nodes[0].ticker.as_deref(), Some("G4530"));
        assert_eq!(nodes[0].weight, 6_512_000.0);
        assert_eq!(nodes[0].change, 1.84);
        assert_eq!(nodes[0].sector.as_deref(), Some(""));
    }

    #[test]
    fn stock_nodes_are_tagged_with_industry() {
        let data = demo();
        let autos = data.industry("G2520").unwrap();
        let nodes = stock_nodes(autos);
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(|n| n.sector.as_deref() == Some("자동차와부품")));
        assert_eq!(nodes[1].ticker.as_deref(), Some("000270"));
    }

    #[test]
    fn empty_industry_still_gets_a_floor_cell() {
        let data = demo();
        let rects = squarify_with(
            &industry_nodes(&data.industries),
            800.0,
            360.0,
            &LayoutConfig::default(),
        );
        assert_eq!(rects.len(), data.industries.len());
        let media = rects.iter().find(|r| r.ticker == "G5020").unwrap();
        assert!(media.area() < 1.0);
    }

    #[test]
    fn sector_and_theme_nodes() {
        let sectors = vec![SectorPerf {
            name: "반도체".into(),
            change_percent: -1.5,
            total_market_cap: 1000.0,
            stock_count: 12,
        }];
        let nodes = sector_nodes(&sectors);
        assert_eq!(nodes[0].weight, 1000.0);
        assert_eq!(nodes[0].change, -1.5);

        let stocks = vec![HeatmapStock {
            name: "에코프로".into(),
            ticker: "086520".into(),
            value: 152_000.0,
            change: 4.1,
            sector: "2차전지".into(),
        }];
        let nodes = heatmap_nodes(&stocks);
        assert_eq!(nodes[0].sector.as_deref(), Some("2차전지"));
    }

    #[test]
    fn parallel_layouts_match_sequential() {
        let data = demo();
        let config = LayoutConfig::default();
        let all = layout_all_industries(&data.industries, 400.0, 300.0, &config);
        assert_eq!(all.len(), data.industries.len());
        for (ind, (code, rects)) in data.industries.iter().zip(&all) {
            assert_eq!(&ind.code, code);
            assert_eq!(rects, &squarify_with(&stock_nodes(ind), 400.0, 300.0, &config));
        }
        // The empty media industry has nothing to lay out
        assert!(all.last().unwrap().1.is_empty());
    }
}
