use anyhow::{Context, Result};
use clap::builder::NonEmptyStringValueParser;
use clap::{Args, Parser, Subcommand};
use gtfs_structure::{dangling_references, FeedReader, ParseMode, SubsetOptions, TransferPolicy};
use log::{error, info, warn};
use std::path::PathBuf;
use std::time::Instant;

const LISTED_WARNINGS: usize = 5;

/// Tools to work on GTFS feeds
#[derive(Parser, Debug)]
#[command(name = "gtfs-extract", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the routes, trips, stops and schedules of one agency into a new feed
    Extract(ExtractArgs),
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Id of the agency to keep, compared exactly
    #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
    agency: String,

    /// Feed to read, either a directory or a zip archive
    #[arg(short, long)]
    input: PathBuf,

    /// Directory where the eight files are written, created if needed
    #[arg(short, long)]
    output: PathBuf,

    /// Fail on numeric cells that cannot be parsed instead of reading them as 0
    #[arg(long)]
    strict: bool,

    /// Only keep the transfers between retained stops, routes and trips
    #[arg(long)]
    filter_transfers: bool,

    /// Also keep the parent stations of the retained stops
    #[arg(long)]
    include_parent_stations: bool,
}

impl ExtractArgs {
    fn parse_mode(&self) -> ParseMode {
        if self.strict {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        }
    }

    fn subset_options(&self) -> SubsetOptions {
        SubsetOptions {
            transfers: if self.filter_transfers {
                TransferPolicy::Resolved
            } else {
                TransferPolicy::KeepAll
            },
            parent_stations: self.include_parent_stations,
        }
    }
}

fn extract(args: &ExtractArgs) -> Result<()> {
    let now = Instant::now();
    let (feed, warnings) = FeedReader::default()
        .parse_mode(args.parse_mode())
        .read_from_path(&args.input)
        .with_context(|| format!("could not read the feed {}", args.input.display()))?;
    if !warnings.is_empty() {
        warn!(
            "{} numeric cells could not be parsed and were read as 0",
            warnings.len()
        );
        for warning in warnings.iter().take(LISTED_WARNINGS) {
            warn!("  {warning}");
        }
    }
    feed.print_stats();

    info!("[Filter] Keeping agency {}", args.agency);
    let result = feed.extract_agency(&args.agency, &args.subset_options());
    if result.agencies.is_empty() {
        warn!("No agency has the id '{}'", args.agency);
    }
    for agency in &result.agencies {
        info!("[Filter] {} ({} routes)", agency, result.routes.len());
    }
    let dangling = dangling_references(&result);
    if !dangling.is_empty() {
        warn!("{} references of the extracted feed do not resolve", dangling.len());
        for reference in dangling.iter().take(LISTED_WARNINGS) {
            warn!("  {reference}");
        }
    }

    info!("[Export] Writing to {}", args.output.display());
    result
        .dump(&args.output)
        .with_context(|| format!("could not write the feed to {}", args.output.display()))?;
    info!("Extracted in {:.2}s", now.elapsed().as_secs_f32());
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Extract(args) => extract(&args),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        error!("{e:#}");
        std::process::exit(1);
    }
}
