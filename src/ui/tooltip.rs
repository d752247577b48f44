use crate::layout::LayoutRect;

/// Information to display in the tooltip when hovering over a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipInfo {
    pub name: String,
    pub ticker: String,
    pub sector: String,
    pub change_display: String,
    pub cap_display: String,
    pub is_up: bool,
}

impl TooltipInfo {
    /// Plain-text rendering, one field per line.
    pub fn to_text(&self) -> String {
        let mut lines = vec![self.name.clone()];
        if !self.ticker.is_empty() {
            lines.push(self.ticker.clone());
        }
        if !self.sector.is_empty() {
            lines.push(self.sector.clone());
        }
        lines.push(self.change_display.clone());
        lines.push(format!("시가총액 {}", self.cap_display));
        lines.join("\n")
    }
}

pub fn build_tooltip(rect: &LayoutRect) -> TooltipInfo {
    TooltipInfo {
        name: rect.name.to_string(),
        ticker: rect.ticker.to_string(),
        sector: rect.sector.to_string(),
        change_display: fmt_pct(rect.change),
        cap_display: fmt_market_cap(rect.value),
        is_up: rect.change >= 0.0,
    }
}

/// Thousands-separated number with at most `decimals` fraction digits,
/// trailing zeros dropped.
pub fn fmt_num(n: f64, decimals: usize) -> String {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (n * factor).round() / factor;
    let text = format!("{:.*}", decimals, rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (text.as_str(), ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

/// Signed percentage with two decimals: `+1.23%`, `-0.50%`, `0.00%`.
pub fn fmt_pct(n: f64) -> String {
    let prefix = if n > 0.0 { "+" } else { "" };
    // Avoid printing "-0.00%" for negative zero
    let n = if n == 0.0 { 0.0 } else { n };
    format!("{prefix}{n:.2}%")
}

/// Change label drawn inside a heatmap cell: one decimal.
pub fn fmt_change_short(n: f64) -> String {
    let prefix = if n > 0.0 { "+" } else { "" };
    let n = if n == 0.0 { 0.0 } else { n };
    format!("{prefix}{n:.1}%")
}

/// Market cap given in 억원: `1.5조` from 10,000억 upwards, `1,234억` below.
pub fn fmt_market_cap(n: f64) -> String {
    if n >= 10_000.0 {
        format!("{:.1}조", n / 10_000.0)
    } else {
        format!("{}억", fmt_num(n, 0))
    }
}

pub fn fmt_volume(n: f64) -> String {
    if n >= 1e8 {
        format!("{:.1}억", n / 1e8)
    } else if n >= 1e4 {
        format!("{:.1}만", n / 1e4)
    } else {
        fmt_num(n, 0)
    }
}
