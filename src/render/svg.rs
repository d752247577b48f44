use std::fmt::Write;

use crate::layout::LayoutRect;
use crate::render::colors::{change_color, AppColor};
use crate::ui::tooltip::{build_tooltip, fmt_change_short};

/// Drawing parameters for the heatmap.
#[derive(Debug, Clone)]
pub struct HeatmapStyle {
    /// Space left between neighbouring cells (px)
    pub gap: f64,
    pub corner_radius: f64,
    /// Cells narrower or shorter than this after the gap are not drawn
    pub min_cell: f64,
    /// Minimum cell size for the name label
    pub name_min_w: f64,
    pub name_min_h: f64,
    /// Minimum cell size for the change label
    pub change_min_w: f64,
    pub change_min_h: f64,
    /// Cells wider than this get the larger font and longer names
    pub wide_cell: f64,
    pub wide_name_chars: usize,
    pub narrow_name_chars: usize,
    pub background: AppColor,
    pub font_family: String,
}

impl Default for HeatmapStyle {
    fn default() -> Self {
        Self {
            gap: 2.0,
            corner_radius: 4.0,
            min_cell: 8.0,
            name_min_w: 44.0,
            name_min_h: 26.0,
            change_min_w: 52.0,
            change_min_h: 36.0,
            wide_cell: 80.0,
            wide_name_chars: 12,
            narrow_name_chars: 7,
            background: AppColor::from_rgb8(10, 12, 16),
            font_family: "Pretendard, sans-serif".to_string(),
        }
    }
}

/// Shorten `name` to `max_chars` characters, ending in `…` when cut.
pub fn truncate_name(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    let mut out: String = name.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a laid-out heatmap as a standalone SVG document.
pub fn render_svg(rects: &[LayoutRect], width: f64, height: f64, style: &HeatmapStyle) -> String {
    let mut svg = String::with_capacity(256 + rects.len() * 320);
    // Writing into a String cannot fail
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = fmt_coord(width),
        h = fmt_coord(height)
    );
    let _ = writeln!(
        svg,
        r#"  <rect width="100%" height="100%" fill="{}"/>"#,
        style.background.to_css()
    );

    let mut drawn = 0usize;
    for rect in rects {
        if write_cell(&mut svg, rect, style) {
            drawn += 1;
        }
    }
    svg.push_str("</svg>\n");

    tracing::debug!(
        "SVG heatmap: drew {} of {} cells ({} bytes)",
        drawn,
        rects.len(),
        svg.len()
    );
    svg
}

/// Returns false when the cell is too small to draw.
fn write_cell(svg: &mut String, rect: &LayoutRect, style: &HeatmapStyle) -> bool {
    let x = rect.x + style.gap / 2.0;
    let y = rect.y + style.gap / 2.0;
    let w = rect.w - style.gap;
    let h = rect.h - style.gap;
    if w < style.min_cell || h < style.min_cell {
        return false;
    }

    let show_name = w > style.name_min_w && h > style.name_min_h;
    let show_change = w > style.change_min_w && h > style.change_min_h;
    let wide = w > style.wide_cell;
    let cx = x + w / 2.0;
    let cy = y + h / 2.0;

    let _ = writeln!(svg, "  <g>");
    let _ = writeln!(
        svg,
        "    <title>{}</title>",
        escape_xml(&build_tooltip(rect).to_text())
    );
    let _ = writeln!(
        svg,
        r#"    <rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}" stroke="{}" stroke-width="1"/>"#,
        fmt_coord(x),
        fmt_coord(y),
        fmt_coord(w),
        fmt_coord(h),
        fmt_coord(style.corner_radius),
        change_color(rect.change).to_css(),
        style.background.to_css()
    );

    if show_name {
        let max_chars = if wide {
            style.wide_name_chars
        } else {
            style.narrow_name_chars
        };
        let name_y = if show_change { cy - 5.0 } else { cy };
        let _ = writeln!(
            svg,
            r#"    <text x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" fill="rgba(255, 255, 255, 0.9)" font-size="{}" font-weight="600" font-family="{}">{}</text>"#,
            fmt_coord(cx),
            fmt_coord(name_y),
            if wide { 11 } else { 10 },
            escape_xml(&style.font_family),
            escape_xml(&truncate_name(&rect.name, max_chars))
        );
    }
    if show_change {
        let _ = writeln!(
            svg,
            r#"    <text x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" fill="rgba(255, 255, 255, 0.6)" font-size="9" font-weight="600" font-family="monospace">{}</text>"#,
            fmt_coord(cx),
            fmt_coord(cy + 9.0),
            fmt_change_short(rect.change)
        );
    }
    let _ = writeln!(svg, "  </g>");
    true
}

/// Coordinates with at most two decimals, trailing zeros dropped.
fn fmt_coord(v: f64) -> String {
    let text = format!("{:.2}", v);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "" | "-0" => "0".to_string(),
        t => t.to_string(),
    }
}
