use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Smallest weight an item is laid out with. Tuned for market caps in 억원,
/// where real values are in the hundreds or more, so the floor only matters
/// for zero or negative caps that would otherwise vanish from the map.
pub const WEIGHT_FLOOR: f64 = 0.1;

/// An item to be laid out. Only `weight` drives the geometry; the rest is
/// carried through to the output untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedNode {
    pub name: CompactString,
    #[serde(alias = "value")]
    pub weight: f64,
    #[serde(default)]
    pub change: f64,
    #[serde(default)]
    pub ticker: Option<CompactString>,
    #[serde(default)]
    pub sector: Option<CompactString>,
}

impl WeightedNode {
    pub fn new(name: impl Into<CompactString>, weight: f64, change: f64) -> Self {
        Self {
            name: name.into(),
            weight,
            change,
            ticker: None,
            sector: None,
        }
    }

    pub fn with_ticker(mut self, ticker: impl Into<CompactString>) -> Self {
        self.ticker = Some(ticker.into());
        self
    }

    pub fn with_sector(mut self, sector: impl Into<CompactString>) -> Self {
        self.sector = Some(sector.into());
        self
    }
}

/// A positioned rectangle in the treemap layout, decorated with its item's payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub name: CompactString,
    /// Clamped weight the rectangle was sized from
    pub value: f64,
    pub change: f64,
    pub ticker: CompactString,
    pub sector: CompactString,
}

impl LayoutRect {
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// Hit test used for hover lookups. Right and bottom edges are exclusive so
    /// a point on a shared edge belongs to exactly one rectangle.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }
}

/// Configuration for treemap layout.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Weights are raised to at least this value before layout. With a floor of
    /// 0.0 non-positive items are dropped instead.
    pub weight_floor: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            weight_floor: WEIGHT_FLOOR,
        }
    }
}

/// Unallocated part of the bounding box while rows are being committed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl FreeRect {
    pub fn new(w: f64, h: f64) -> Self {
        Self { x: 0.0, y: 0.0, w, h }
    }

    pub fn short_side(&self) -> f64 {
        self.w.min(self.h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Positioned {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Lay out items with the default [`LayoutConfig`].
pub fn squarify(items: &[WeightedNode], width: f64, height: f64) -> Vec<LayoutRect> {
    squarify_with(items, width, height, &LayoutConfig::default())
}

/// Squarified treemap (Bruls, Huizing & van Wijk) of `items` inside a
/// `width` x `height` box with its origin at the top-left.
///
/// Never fails: a degenerate box, an empty item list or a zero total weight
/// all produce an empty layout.
pub fn squarify_with(
    items: &[WeightedNode],
    width: f64,
    height: f64,
    config: &LayoutConfig,
) -> Vec<LayoutRect> {
    if items.is_empty() || !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite()
    {
        return Vec::new();
    }

    let mut weighted: Vec<(&WeightedNode, f64)> = items
        .iter()
        .filter_map(|node| {
            if !node.weight.is_finite() {
                tracing::debug!("Squarify: dropping '{}' with weight {}", node.name, node.weight);
                return None;
            }
            let weight = node.weight.max(config.weight_floor);
            (weight > 0.0).then_some((node, weight))
        })
        .collect();

    // Stable, so equal weights keep their input order
    weighted.sort_by(|a, b| b.1.total_cmp(&a.1));

    let total_weight: f64 = weighted.iter().map(|&(_, w)| w).sum();
    if !(total_weight > 0.0) || !total_weight.is_finite() {
        return Vec::new();
    }

    let total_area = width * height;
    let areas: Vec<f64> = weighted
        .iter()
        .map(|&(_, w)| (w / total_weight) * total_area)
        .collect();

    let mut result = Vec::with_capacity(areas.len());
    let mut free = FreeRect::new(width, height);
    // The candidate row is always the contiguous run areas[row_start..i]
    let mut row_start = 0;

    let flush = |start: usize, end: usize, free: &mut FreeRect, result: &mut Vec<LayoutRect>| {
        let positions = layout_row(&areas[start..end], free);
        for (&(node, weight), pos) in weighted[start..end].iter().zip(positions) {
            if !(pos.w > 0.0 && pos.h > 0.0) || !pos.w.is_finite() || !pos.h.is_finite() {
                tracing::warn!(
                    "Squarify: invalid dimensions for '{}' ({}x{}), skipping",
                    node.name,
                    pos.w,
                    pos.h
                );
                continue;
            }
            result.push(LayoutRect {
                x: pos.x,
                y: pos.y,
                w: pos.w,
                h: pos.h,
                name: node.name.clone(),
                value: weight,
                change: node.change,
                ticker: node.ticker.clone().unwrap_or_default(),
                sector: node.sector.clone().unwrap_or_default(),
            });
        }
    };

    let mut end = areas.len();
    for i in 0..areas.len() {
        let short = free.short_side();
        if short <= 0.0 {
            tracing::debug!("Squarify: free space exhausted with {} items left", areas.len() - i);
            end = i;
            break;
        }
        if i == row_start {
            continue;
        }
        let current = worst_aspect_ratio(&areas[row_start..i], short);
        let grown = worst_aspect_ratio(&areas[row_start..=i], short);
        if grown > current {
            flush(row_start, i, &mut free, &mut result);
            row_start = i;
        }
    }

    if row_start < end {
        flush(row_start, end, &mut free, &mut result);
    }

    result
}

/// Commit `row` as one strip of `free` and shrink `free` by the strip.
///
/// The strip spans the shorter side of the free rectangle: a horizontal strip
/// across the full width when `w <= h`, otherwise a vertical one down the full
/// height. Positions come back in row order.
pub fn layout_row(row: &[f64], free: &mut FreeRect) -> Vec<Positioned> {
    let sum: f64 = row.iter().sum();
    let mut out = Vec::with_capacity(row.len());

    if free.w <= free.h {
        let thickness = sum / free.w;
        let mut cx = free.x;
        for &area in row {
            let cell_w = area / thickness;
            out.push(Positioned {
                x: cx,
                y: free.y,
                w: cell_w,
                h: thickness,
            });
            cx += cell_w;
        }
        free.y += thickness;
        free.h = (free.h - thickness).max(0.0);
    } else {
        let thickness = sum / free.h;
        let mut cy = free.y;
        for &area in row {
            let cell_h = area / thickness;
            out.push(Positioned {
                x: free.x,
                y: cy,
                w: thickness,
                h: cell_h,
            });
            cy += cell_h;
        }
        free.x += thickness;
        free.w = (free.w - thickness).max(0.0);
    }

    out
}

/// Worst aspect ratio a row of `row` areas would have when laid along a side of
/// length `side`. Lower is better; 1.0 is a perfect square.
pub fn worst_aspect_ratio(row: &[f64], side: f64) -> f64 {
    let sum: f64 = row.iter().sum();
    if row.is_empty() || sum <= 0.0 || side <= 0.0 {
        return f64::INFINITY;
    }
    let side_sq = side * side;
    let sum_sq = sum * sum;
    let max_r = row.iter().copied().fold(0.0, f64::max);
    let min_r = row.iter().copied().fold(f64::INFINITY, f64::min);
    let a = (side_sq * max_r) / sum_sq;
    let b = sum_sq / (side_sq * min_r);
    a.max(b)
}
