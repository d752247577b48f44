/// Diagnostic tool to verify snapshot → layout → render pipeline
use std::path::PathBuf;

use marketmap_rs::app::Dashboard;
use marketmap_rs::layout::{LayoutConfig, LayoutRect};
use marketmap_rs::market::layout_all_industries;
use marketmap_rs::market::snapshot::{load_snapshot, parse_snapshot, Snapshot};

const DEMO_SNAPSHOT: &str = include_str!("../../demos/wics-heatmap.json");

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("marketmap_rs=debug".parse()?),
        )
        .init();

    let snapshot = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            println!("=== DIAGNOSTIC: Snapshot → Layout Pipeline ===");
            println!("Loading: {}", path.display());
            load_snapshot(&path)?
        }
        None => {
            println!("=== DIAGNOSTIC: Snapshot → Layout Pipeline (bundled demo) ===");
            parse_snapshot(DEMO_SNAPSHOT)?
        }
    };
    println!("\n[1] Snapshot kind: {}", snapshot.kind());

    let (width, height) = (1920.0, 1080.0);
    let mut dashboard = Dashboard::new(snapshot);
    dashboard.resize(width, height);

    let nodes = dashboard.current_nodes();
    println!("\n[2] {} items in '{}'", nodes.len(), dashboard.title());
    let non_positive = nodes.iter().filter(|n| n.weight <= 0.0).count();
    if non_positive > 0 {
        println!("    {} items have non-positive weight and get the floor area", non_positive);
    }

    let rects = dashboard.layout().to_vec();
    println!("\n[3] Layout computed: {} rectangles", rects.len());

    println!("\n[4] Top 10 largest rectangles by area:");
    let mut sorted = rects.clone();
    sorted.sort_by(|a, b| b.area().total_cmp(&a.area()));
    for (i, rect) in sorted.iter().take(10).enumerate() {
        println!(
            "    [{}] '{}' - rect: {:.1}x{:.1} ({:.0}px²) at ({:.1}, {:.1}) - value: {:.0}, change: {:+.2}%, aspect: {:.2}",
            i,
            rect.name,
            rect.w,
            rect.h,
            rect.area(),
            rect.x,
            rect.y,
            rect.value,
            rect.change,
            aspect(rect)
        );
    }

    println!("\n[5] Checking for anomalies:");
    let area_sum: f64 = rects.iter().map(LayoutRect::area).sum();
    let viewport_area = width * height;
    println!("    Total rect area: {:.0}px²", area_sum);
    println!("    Viewport area:   {:.0}px²", viewport_area);
    println!("    Coverage: {:.4}%", (area_sum / viewport_area) * 100.0);

    let eps = 1e-6;
    let out_of_bounds = rects
        .iter()
        .filter(|r| r.x < -eps || r.y < -eps || r.x + r.w > width + eps || r.y + r.h > height + eps)
        .count();
    let mut overlaps = 0;
    for (i, a) in rects.iter().enumerate() {
        for b in &rects[i + 1..] {
            let ow = (a.x + a.w).min(b.x + b.w) - a.x.max(b.x);
            let oh = (a.y + a.h).min(b.y + b.h) - a.y.max(b.y);
            if ow > eps && oh > eps {
                overlaps += 1;
            }
        }
    }
    println!("    Out of bounds: {}", out_of_bounds);
    println!("    Overlapping pairs: {}", overlaps);

    let worst = rects.iter().map(aspect).fold(1.0, f64::max);
    println!("    Worst aspect ratio: {:.2}", worst);

    // Count how many cells get labels with the production style
    let style = &dashboard.style;
    let labeled = rects
        .iter()
        .filter(|r| r.w - style.gap > style.name_min_w && r.h - style.gap > style.name_min_h)
        .count();
    println!("\n[6] Text label count: {} cells (out of {})", labeled, rects.len());

    if let Snapshot::Wics(_) = &dashboard.snapshot {
        let all = layout_all_industries(dashboard.industries(), width, height, &LayoutConfig::default());
        println!("\n[7] Drill-down layouts:");
        for (code, rects) in &all {
            println!("    {} - {} cells", code, rects.len());
        }
    }

    Ok(())
}

fn aspect(rect: &LayoutRect) -> f64 {
    (rect.w / rect.h).max(rect.h / rect.w)
}
