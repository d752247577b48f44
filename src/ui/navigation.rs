use compact_str::CompactString;

use crate::market::snapshot::WicsIndustry;

/// What the heatmap is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// One cell per industry
    Overview,
    /// The stocks of one industry, by industry code
    Industry(CompactString),
}

/// Navigation state: tracks the current view and history.
#[derive(Debug)]
pub struct NavigationState {
    /// Stack of previous views (for back navigation)
    history: Vec<View>,
    pub current: View,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationState {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            current: View::Overview,
        }
    }

    /// Drill down into an industry.
    /// Returns true if navigation happened.
    pub fn drill_down(&mut self, code: &str, industries: &[WicsIndustry]) -> bool {
        if !industries.iter().any(|ind| ind.code == code) {
            tracing::warn!("Cannot drill into unknown industry '{}'", code);
            return false;
        }

        let target = View::Industry(CompactString::new(code));
        // Don't drill into the same view
        if target == self.current {
            return false;
        }

        let previous = std::mem::replace(&mut self.current, target);
        self.history.push(previous);
        true
    }

    /// Navigate back one level.
    /// Returns true if navigation happened.
    pub fn navigate_up(&mut self) -> bool {
        if let Some(prev) = self.history.pop() {
            self.current = prev;
            true
        } else {
            false
        }
    }

    /// Back to the industry overview, forgetting history.
    pub fn navigate_home(&mut self) {
        self.history.clear();
        self.current = View::Overview;
    }

    /// Current depth in navigation history.
    pub fn depth(&self) -> usize {
        self.history.len()
    }

    pub fn current_industry(&self) -> Option<&str> {
        match &self.current {
            View::Overview => None,
            View::Industry(code) => Some(code.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn industries(codes: &[&str]) -> Vec<WicsIndustry> {
        codes
            .iter()
            .map(|&code| WicsIndustry {
                code: code.into(),
                name: code.into(),
                total_market_cap: 1.0,
                avg_change: 0.0,
                stock_count: 0,
                stocks: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn drill_down_and_back() {
        let inds = industries(&["G4530", "G2010"]);
        let mut nav = NavigationState::new();
        assert!(nav.drill_down("G4530", &inds));
        assert_eq!(nav.current_industry(), Some("G4530"));
        assert_eq!(nav.depth(), 1);

        assert!(nav.drill_down("G2010", &inds));
        assert_eq!(nav.depth(), 2);

        assert!(nav.navigate_up());
        assert_eq!(nav.current, View::Industry("G4530".into()));
        assert!(nav.navigate_up());
        assert_eq!(nav.current, View::Overview);
        assert!(!nav.navigate_up());
    }

    #[test]
    fn unknown_or_same_industry_is_ignored() {
        let inds = industries(&["G4530"]);
        let mut nav = NavigationState::new();
        assert!(!nav.drill_down("G9999", &inds));
        assert_eq!(nav.current, View::Overview);

        assert!(nav.drill_down("G4530", &inds));
        assert!(!nav.drill_down("G4530", &inds));
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn home_clears_history() {
        let inds = industries(&["G1", "G2"]);
        let mut nav = NavigationState::new();
        nav.drill_down("G1", &inds);
        nav.drill_down("G2", &inds);
        nav.navigate_home();
        assert_eq!(nav.current, View::Overview);
        assert_eq!(nav.depth(), 0);
    }
}
