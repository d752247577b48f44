/// Change (in percent) at which a cell reaches full color intensity.
pub const FULL_INTENSITY_CHANGE: f64 = 4.0;

/// Our color representation: straight RGB in 0..1 plus alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl AppColor {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS `rgba(...)` form for SVG fill and stroke attributes.
    pub fn to_css(self) -> String {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgba({}, {}, {}, {})",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            trim_alpha(self.a)
        )
    }
}

fn trim_alpha(a: f32) -> String {
    let text = format!("{:.3}", a.clamp(0.0, 1.0));
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() {
        "0".to_string()
    } else {
        text.to_string()
    }
}

pub fn up_color() -> AppColor {
    AppColor::from_rgb8(34, 197, 94)
}

pub fn down_color() -> AppColor {
    AppColor::from_rgb8(239, 68, 68)
}

pub fn flat_color() -> AppColor {
    AppColor::new(1.0, 1.0, 1.0).with_alpha(0.03)
}

/// Heatmap fill for a daily change: green up, red down, alpha growing with
/// the size of the move until `FULL_INTENSITY_CHANGE`.
pub fn change_color(change: f64) -> AppColor {
    if change == 0.0 || !change.is_finite() {
        return flat_color();
    }
    let intensity = (change.abs() / FULL_INTENSITY_CHANGE).min(1.0) as f32;
    let alpha = 0.45 + intensity * 0.35;
    if change > 0.0 {
        up_color().with_alpha(alpha)
    } else {
        down_color().with_alpha(alpha)
    }
}
