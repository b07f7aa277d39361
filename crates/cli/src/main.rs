use clap::Parser;
use std::path::PathBuf;
use trendmap_core::export;
use trendmap_core::human::human_count;
use trendmap_core::mock::sample_trends;
use trendmap_core::{filter_records, layout, rank_for_layout, Platform, TrendRecord, OVERFLOW_ID};

#[derive(Parser, Debug)]
#[command(name = "trendmap-cli", about = "Trend treemap report generator")]
struct Args {
    /// JSON file with an array of trend records; omit to use --sample
    input: Option<PathBuf>,
    /// Generate deterministic sample trends instead of reading a file
    #[arg(long)]
    sample: bool,
    /// Viewport width in layout units
    #[arg(long, default_value_t = 1200.0)]
    width: f32,
    /// Viewport height in layout units
    #[arg(long, default_value_t = 800.0)]
    height: f32,
    /// Maximum tiles before the rest folds into the "+N more" tile
    #[arg(long, default_value_t = 20)]
    max_tiles: usize,
    /// Restrict to one platform: google, tiktok, x, reddit, gather
    #[arg(long)]
    platform: Option<String>,
    /// Fuzzy title filter
    #[arg(long)]
    query: Option<String>,
    /// Write the computed layout as JSON
    #[arg(long)]
    json: Option<PathBuf>,
    /// Write the filtered records as CSV
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Write a one-page PDF report of the filtered records
    #[arg(long)]
    pdf: Option<PathBuf>,
}

fn main() {
    trendmap_core::init_tracing();
    let args = Args::parse();

    let records = match load_records(&args) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let platform = match args.platform.as_deref().map(parse_platform).transpose() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let filtered = filter_records(&records, platform, args.query.as_deref().unwrap_or(""));
    let items = rank_for_layout(&filtered, args.max_tiles);
    let tiles = layout(&items, 0.0, 0.0, args.width, args.height);

    let hidden = filtered.len().saturating_sub(args.max_tiles);
    println!(
        "{} trends, {} tiles ({} folded into overflow), viewport {}x{}",
        filtered.len(),
        tiles.len(),
        hidden,
        args.width,
        args.height
    );
    for t in &tiles {
        let label = if t.id == OVERFLOW_ID {
            format!("+{hidden} more")
        } else {
            match filtered.iter().find(|r| r.id == t.id) {
                Some(r) => format!("{} [{}] {}", r.title, r.platform.label(), human_count(r.volume)),
                None => t.id.clone(),
            }
        };
        println!(
            "  {:>7.1},{:>7.1}  {:>7.1}x{:<7.1}  {}",
            t.rect.x, t.rect.y, t.rect.w, t.rect.h, label
        );
    }

    if let Some(path) = &args.json {
        let json = export::layout_to_json(&tiles);
        if let Err(e) = std::fs::write(path, serde_json::to_string_pretty(&json).unwrap_or_default())
        {
            eprintln!("error: writing {}: {e}", path.display());
            std::process::exit(1);
        }
    }
    if let Some(path) = &args.csv {
        let result = std::fs::File::create(path)
            .map_err(|e| e.to_string())
            .and_then(|f| export::trends_to_csv(&filtered, f).map_err(|e| e.to_string()));
        if let Err(e) = result {
            eprintln!("error: writing {}: {e}", path.display());
            std::process::exit(1);
        }
    }
    if let Some(path) = &args.pdf {
        if let Err(e) = export::report_to_pdf(&filtered, path) {
            eprintln!("error: writing {}: {e}", path.display());
            std::process::exit(1);
        }
    }
}

fn load_records(args: &Args) -> Result<Vec<TrendRecord>, String> {
    if args.sample {
        return Ok(sample_trends(42, 8));
    }
    let Some(path) = &args.input else {
        return Err("pass an input JSON file or --sample".into());
    };
    let text = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("{}: {e}", path.display()))
}

fn parse_platform(s: &str) -> Result<Platform, String> {
    match s.to_ascii_lowercase().as_str() {
        "google" => Ok(Platform::Google),
        "tiktok" => Ok(Platform::TikTok),
        "x" => Ok(Platform::X),
        "reddit" => Ok(Platform::Reddit),
        "gather" => Ok(Platform::Gather),
        other => Err(format!("unknown platform `{other}`")),
    }
}
