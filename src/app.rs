use crate::layout::{self, squarify_with, LayoutConfig, LayoutRect, WeightedNode};
use crate::market::filter::{filter_by_market, MarketFilter};
use crate::market::snapshot::{Snapshot, WicsIndustry};
use crate::market::{heatmap_nodes, industry_nodes, stock_nodes};
use crate::render::{render_svg, HeatmapStyle};
use crate::ui::navigation::{NavigationState, View};
use crate::ui::tooltip::{build_tooltip, TooltipInfo};

/// Top-level heatmap state: the loaded snapshot, what is being looked at and
/// the cached layout for the current viewport.
pub struct Dashboard {
    pub snapshot: Snapshot,
    pub market: MarketFilter,
    pub navigation: NavigationState,
    pub layout_config: LayoutConfig,
    pub style: HeatmapStyle,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub needs_relayout: bool,

    /// Industries after the market filter (WICS snapshots only)
    industries: Vec<WicsIndustry>,
    layout: Vec<LayoutRect>,
}

impl Dashboard {
    /// Default viewport matches the dashboard's heatmap card.
    pub const DEFAULT_WIDTH: f64 = 800.0;
    pub const DEFAULT_HEIGHT: f64 = 360.0;

    pub fn new(snapshot: Snapshot) -> Self {
        let industries = match &snapshot {
            Snapshot::Wics(data) => data.industries.clone(),
            _ => Vec::new(),
        };
        Self {
            snapshot,
            market: MarketFilter::All,
            navigation: NavigationState::new(),
            layout_config: LayoutConfig::default(),
            style: HeatmapStyle::default(),
            viewport_width: Self::DEFAULT_WIDTH,
            viewport_height: Self::DEFAULT_HEIGHT,
            needs_relayout: true,
            industries,
            layout: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        if width != self.viewport_width || height != self.viewport_height {
            self.viewport_width = width;
            self.viewport_height = height;
            self.needs_relayout = true;
        }
    }

    /// Switch the market filter. Resets navigation to the overview since the
    /// drilled-into industry may no longer exist.
    pub fn set_market(&mut self, market: MarketFilter) {
        if market == self.market {
            return;
        }
        let Snapshot::Wics(data) = &self.snapshot else {
            tracing::debug!("Market filter ignored for {} snapshot", self.snapshot.kind());
            return;
        };
        self.market = market;
        self.industries = filter_by_market(&data.industries, market);
        self.navigation.navigate_home();
        self.needs_relayout = true;
    }

    pub fn industries(&self) -> &[WicsIndustry] {
        &self.industries
    }

    /// Returns true if navigation happened.
    pub fn drill_down(&mut self, code: &str) -> bool {
        let moved = self.navigation.drill_down(code, &self.industries);
        self.needs_relayout |= moved;
        moved
    }

    pub fn navigate_up(&mut self) -> bool {
        let moved = self.navigation.navigate_up();
        self.needs_relayout |= moved;
        moved
    }

    /// Items for the current view.
    pub fn current_nodes(&self) -> Vec<WeightedNode> {
        match &self.snapshot {
            Snapshot::Wics(_) => match &self.navigation.current {
                View::Overview => industry_nodes(&self.industries),
                View::Industry(code) => self
                    .industries
                    .iter()
                    .find(|ind| ind.code == *code)
                    .map(stock_nodes)
                    .unwrap_or_default(),
            },
            Snapshot::Themes(themes) => heatmap_nodes(&themes.heatmap),
            Snapshot::Nodes(nodes) => nodes.clone(),
        }
    }

    /// Heading for the current view, e.g. `WICS 산업 히트맵 · KOSPI · 반도체와반도체장비`.
    pub fn title(&self) -> String {
        match &self.snapshot {
            Snapshot::Wics(data) => {
                let mut title = format!("WICS 산업 히트맵 · {} · {}", data.date, self.market);
                if let Some(code) = self.navigation.current_industry() {
                    if let Some(ind) = self.industries.iter().find(|ind| ind.code == code) {
                        title.push_str(" · ");
                        title.push_str(&ind.name);
                    }
                }
                title
            }
            Snapshot::Themes(_) => "테마 히트맵".to_string(),
            Snapshot::Nodes(_) => "히트맵".to_string(),
        }
    }

    /// Layout for the current view, recomputed only when something changed.
    pub fn layout(&mut self) -> &[LayoutRect] {
        if self.needs_relayout {
            let nodes = self.current_nodes();
            self.layout = squarify_with(
                &nodes,
                self.viewport_width,
                self.viewport_height,
                &self.layout_config,
            );
            tracing::info!(
                "Laying out {} cells of '{}' in {:.0}x{:.0} area",
                self.layout.len(),
                self.title(),
                self.viewport_width,
                self.viewport_height
            );
            self.needs_relayout = false;
        }
        &self.layout
    }

    /// Tooltip for the cell under a viewport point.
    pub fn hover(&mut self, px: f64, py: f64) -> Option<TooltipInfo> {
        let rects = self.layout();
        layout::hit_test(rects, px, py).map(|i| build_tooltip(&rects[i]))
    }

    /// Drill into the industry cell under a viewport point.
    pub fn click(&mut self, px: f64, py: f64) -> bool {
        if self.navigation.current != View::Overview {
            return false;
        }
        let rects = self.layout();
        let Some(code) = layout::hit_test(rects, px, py).map(|i| rects[i].ticker.clone()) else {
            return false;
        };
        self.drill_down(&code)
    }

    pub fn render_svg(&mut self) -> String {
        let (w, h) = (self.viewport_width, self.viewport_height);
        self.layout();
        render_svg(&self.layout, w, h, &self.style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::snapshot::parse_snapshot;

    fn demo() -> Dashboard {
        Dashboard::new(parse_snapshot(include_str!("../demos/wics-heatmap.json")).unwrap())
    }

    #[test]
    fn overview_has_one_cell_per_industry() {
        let mut dash = demo();
        let count = dash.industries().len();
        assert_eq!(dash.layout().len(), count);
        assert!(!dash.needs_relayout);
    }

    #[test]
    fn market_filter_drops_empty_industries() {
        let mut dash = demo();
        dash.set_market(MarketFilter::Kosdaq);
        let codes: Vec<&str> = dash.industries().iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, ["G4530", "G3520"]);
        assert_eq!(dash.layout().len(), 2);
        assert!(dash.title().contains("KOSDAQ"));
    }

    #[test]
    fn drill_down_lays_out_stocks() {
        let mut dash = demo();
        assert!(dash.drill_down("G2520"));
        let rects = dash.layout();
        assert_eq!(rects.len(), 2);
        assert!(rects.iter().all(|r| r.sector == "자동차와부품"));
        assert!(dash.title().ends_with("자동차와부품"));

        assert!(dash.navigate_up());
        let cells = dash.layout().len();
        assert_eq!(cells, dash.industries().len());
    }

    #[test]
    fn changing_market_resets_navigation() {
        let mut dash = demo();
        dash.drill_down("G2010");
        dash.set_market(MarketFilter::Kospi);
        assert_eq!(dash.navigation.current, View::Overview);
    }

    #[test]
    fn click_drills_into_hovered_industry() {
        let mut dash = demo();
        // The largest industry is laid out first at the origin
        let tip = dash.hover(1.0, 1.0).unwrap();
        assert_eq!(tip.name, "반도체와반도체장비");
        assert!(dash.click(1.0, 1.0));
        assert_eq!(dash.navigation.current_industry(), Some("G4530"));
        // Stock cells are not drillable
        assert!(!dash.click(1.0, 1.0));
    }

    #[test]
    fn resize_triggers_relayout() {
        let mut dash = demo();
        dash.layout();
        dash.resize(1600.0, 720.0);
        assert!(dash.needs_relayout);
        let area: f64 = dash.layout().iter().map(LayoutRect::area).sum();
        assert!((area - 1600.0 * 720.0).abs() < 1e-6 * 1600.0 * 720.0);
    }

    #[test]
    fn svg_has_viewport_size() {
        let mut dash = demo();
        dash.resize(640.0, 320.0);
        let svg = dash.render_svg();
        assert!(svg.contains(r#"width="640" height="320""#));
    }
}
