#![forbid(unsafe_code)]

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use ebook_index::core::build_env::BuildMetadata;
use ebook_index::index_cmd;

#[derive(Parser, Debug)]
#[command(name = "ebook-index")]
#[command(about = "Static download index generator for e-book build pipelines", long_about = None)]
struct Cli {
    /// Directory containing markdown sources
    #[arg(long, default_value = "markdown")]
    markdown_dir: std::path::PathBuf,

    /// Directory containing generated e-book artifacts (also receives the page)
    #[arg(long, default_value = "dist")]
    dist_dir: std::path::PathBuf,

    /// Output path for the rendered page (default: <dist-dir>/index.html)
    #[arg(long)]
    out: Option<std::path::PathBuf>,

    /// Enable verbose logging (or set EBOOK_INDEX_LOG)
    #[arg(long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let env = std::env::var("EBOOK_INDEX_LOG").unwrap_or_else(|_| {
        if verbose { "ebook_index=debug".to_string() } else { "ebook_index=info".to_string() }
    });
    let _ = tracing_subscriber::fmt()
        .with_span_events(FmtSpan::ACTIVE)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_env_filter(EnvFilter::new(env))
        .try_init();
}

fn main() {
    color_eyre::install().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let meta = BuildMetadata::from_env();
    let result = index_cmd::run(cli.markdown_dir, cli.dist_dir, cli.out, meta);

    if let Err(e) = result {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
