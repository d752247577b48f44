pub mod colors;
pub mod svg;

pub use svg::{render_svg, HeatmapStyle};
