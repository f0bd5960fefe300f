use clap::Parser;
use rankscrape::runner::{self, RunOptions};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "rankscrape")]
#[command(version = "0.1.0")]
#[command(about = "Scrape traffic and ranking metrics for a list of sites", long_about = None)]
struct Cli {
    /// Text file with one target URL or domain per line
    #[arg(short, long, default_value = "data/input_sites.txt")]
    input: PathBuf,

    /// Where the JSON output is written
    #[arg(short, long, default_value = "data/sample_output.json")]
    output: PathBuf,

    /// Settings file (JSON, YAML or TOML)
    #[arg(short, long, default_value = "config/settings.json")]
    config: PathBuf,

    /// Override the number of concurrent workers from the settings file
    #[arg(long)]
    max_workers: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Show a progress bar (stderr)
    #[arg(short, long)]
    progress: bool,

    /// Exit non-zero when the run fails or scrapes nothing
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let logger = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .build();
    let max_level = logger.filter();

    let multi = if cli.progress {
        let multi = Arc::new(indicatif::MultiProgress::new());
        indicatif_log_bridge::LogWrapper::new((*multi).clone(), logger).try_init()?;
        Some(multi)
    } else {
        log::set_boxed_logger(Box::new(logger))?;
        None
    };
    log::set_max_level(max_level);

    let options = RunOptions {
        input: cli.input,
        output: cli.output,
        config: cli.config,
        max_workers: cli.max_workers,
    };

    match runner::run(&options, multi).await {
        Ok(summary) => {
            println!("\n✅ Scrape Completed:");
            println!("   Targets: {}", summary.targets);
            println!("   Scraped: {}", summary.scraped);
            println!("   Failed: {}", summary.failed);
            println!("   Average Duration: {}ms", summary.metrics.avg_response_time_ms);
            println!("   Total Time: {:.1}s", summary.metrics.elapsed_seconds);
            println!("   Throughput: {:.1} targets/s", summary.metrics.targets_per_second);
            if let Some(path) = &summary.output {
                println!("   Output: {}", path.display());
            }
            if cli.strict && summary.scraped == 0 {
                anyhow::bail!("no records were scraped");
            }
        }
        Err(e) => {
            log::error!("Run failed: {}", e);
            if cli.strict {
                return Err(e.into());
            }
        }
    }

    Ok(())
}
