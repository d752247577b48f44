use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use marketmap_rs::app::Dashboard;
use marketmap_rs::market::filter::MarketFilter;
use marketmap_rs::market::snapshot::load_snapshot;

const USAGE: &str = "usage: marketmap <snapshot.json> [--width N] [--height N] \
[--market all|kospi|kosdaq] [--industry CODE] [--json] [--out PATH]";

/// Parsed command line.
#[derive(Debug, PartialEq)]
struct CliArgs {
    snapshot: PathBuf,
    width: f64,
    height: f64,
    market: MarketFilter,
    industry: Option<String>,
    json: bool,
    out: Option<PathBuf>,
}

impl CliArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut snapshot = None;
        let mut width = Dashboard::DEFAULT_WIDTH;
        let mut height = Dashboard::DEFAULT_HEIGHT;
        let mut market = MarketFilter::All;
        let mut industry = None;
        let mut json = false;
        let mut out = None;

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .with_context(|| format!("{flag} needs a value\n{USAGE}"))
            };
            match arg.as_str() {
                "--width" => width = parse_dimension("--width", &value("--width")?)?,
                "--height" => height = parse_dimension("--height", &value("--height")?)?,
                "--market" => market = value("--market")?.parse()?,
                "--industry" => industry = Some(value("--industry")?),
                "--out" => out = Some(PathBuf::from(value("--out")?)),
                "--json" => json = true,
                "-h" | "--help" => bail!("{USAGE}"),
                flag if flag.starts_with("--") => bail!("Unknown option {flag}\n{USAGE}"),
                path => {
                    if snapshot.replace(PathBuf::from(path)).is_some() {
                        bail!("Only one snapshot file can be given\n{USAGE}");
                    }
                }
            }
        }

        let Some(snapshot) = snapshot else {
            bail!("Missing snapshot file\n{USAGE}");
        };
        Ok(Self {
            snapshot,
            width,
            height,
            market,
            industry,
            json,
            out,
        })
    }
}

fn parse_dimension(flag: &str, text: &str) -> Result<f64> {
    let v: f64 = text
        .parse()
        .with_context(|| format!("{flag} expects a number, got '{text}'"))?;
    if !(v > 0.0) || !v.is_finite() {
        bail!("{flag} must be a positive number, got {v}");
    }
    Ok(v)
}

fn main() -> Result<()> {
    // Logs go to stderr so the SVG/JSON on stdout stays clean
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("marketmap_rs=info".parse()?),
        )
        .init();

    let args = CliArgs::parse(std::env::args().skip(1))?;
    tracing::info!("marketmap starting: {:?}", args);

    let snapshot = load_snapshot(&args.snapshot)?;
    let mut dashboard = Dashboard::new(snapshot);
    dashboard.resize(args.width, args.height);
    dashboard.set_market(args.market);
    if let Some(code) = &args.industry {
        if !dashboard.drill_down(code) {
            bail!("Industry '{}' not found in {}", code, args.snapshot.display());
        }
    }

    let output = if args.json {
        let mut text = serde_json::to_string_pretty(dashboard.layout())
            .context("Failed to serialize layout")?;
        text.push('\n');
        text
    } else {
        dashboard.render_svg()
    };

    match &args.out {
        Some(path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} ({} bytes)", path.display(), output.len());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs> {
        CliArgs::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults() {
        let args = parse(&["wics.json"]).unwrap();
        assert_eq!(args.snapshot, PathBuf::from("wics.json"));
        assert_eq!(args.width, 800.0);
        assert_eq!(args.height, 360.0);
        assert_eq!(args.market, MarketFilter::All);
        assert!(!args.json);
        assert_eq!(args.out, None);
    }

    #[test]
    fn all_options() {
        let args = parse(&[
            "--width", "1200", "wics.json", "--height", "600", "--market", "kosdaq",
            "--industry", "G4530", "--json", "--out", "map.json",
        ])
        .unwrap();
        assert_eq!(args.width, 1200.0);
        assert_eq!(args.height, 600.0);
        assert_eq!(args.market, MarketFilter::Kosdaq);
        assert_eq!(args.industry.as_deref(), Some("G4530"));
        assert!(args.json);
        assert_eq!(args.out, Some(PathBuf::from("map.json")));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["a.json", "b.json"]).is_err());
        assert!(parse(&["a.json", "--width"]).is_err());
        assert!(parse(&["a.json", "--width", "-5"]).is_err());
        assert!(parse(&["a.json", "--height", "tall"]).is_err());
        assert!(parse(&["a.json", "--market", "nyse"]).is_err());
        assert!(parse(&["a.json", "--verbose"]).is_err());
    }
}
