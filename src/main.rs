use std::path::PathBuf;

use clap::Parser;
use huefacet::args::SelectionArg;
use huefacet::FacetConfig;

#[derive(Parser)]
#[command(name = "huefacet", about = "Compile label / colour facet selections into a search request")]
struct Cli {
    /// Config file layered over the built-in defaults (default: ~/.config/huefacet/config.toml).
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Active selection, `LABEL` or `LABEL@H,S,L` (degrees, percent, percent). Repeatable.
    #[arg(long = "select", short = 's')]
    selections: Vec<SelectionArg>,

    /// Number of hits to request alongside the aggregation.
    #[arg(long)]
    size: Option<usize>,

    /// Pretty-print the request body.
    #[arg(long)]
    pretty: bool,

    /// Write debug logs to /tmp/huefacet-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/huefacet-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("huefacet debug log started — tail -f /tmp/huefacet-debug.log");
    }

    let config = match &cli.config {
        Some(path) => FacetConfig::load_from(path)?,
        None => FacetConfig::load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "config: falling back to built-in defaults");
            FacetConfig::defaults()
        }),
    };

    let request = huefacet::compile_request(&config.fields, &cli.selections, cli.size);
    let body = request.to_json();
    let out = if cli.pretty {
        serde_json::to_string_pretty(&body)?
    } else {
        serde_json::to_string(&body)?
    };
    println!("{out}");
    Ok(())
}
