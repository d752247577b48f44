pub mod squarify;

pub use squarify::{
    layout_row, squarify, squarify_with, worst_aspect_ratio, FreeRect, LayoutConfig, LayoutRect,
    Positioned, WeightedNode, WEIGHT_FLOOR,
};

/// Index of the rectangle under a point, for hover and click handling.
pub fn hit_test(rects: &[LayoutRect], px: f64, py: f64) -> Option<usize> {
    rects.iter().position(|r| r.contains(px, py))
}
