//! zonesync - reconcile a BIND zone file with Cloudflare DNS

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use zonesync::cloudflare::CloudflareClient;
use zonesync::config::Config;
use zonesync::dns_provider::DnsProvider;
use zonesync::reconcile::Reconciler;
use zonesync::token::ZoneTokens;
use zonesync::validation::validate_zone_name;
use zonesync::{load_zone, RecordCollection};

/// Application version
const VERSION: &str = "1.0.0";

//==============================================================================
// Main
//==============================================================================

#[derive(Debug, Parser)]
#[command(name = "zonesync")]
#[command(version = VERSION)]
struct Args {
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Origin for relative names appearing before any $ORIGIN directive
    #[arg(long)]
    origin: Option<String>,
    #[arg(short, long)]
    verbose: bool,
    /// BIND style zone file
    zonefile: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the records parsed from the zone file
    Show,
    /// Print the records currently held by Cloudflare
    Remote,
    /// Print the records that would be created and deleted
    Diff,
    /// Create and delete records until Cloudflare matches the zone file
    Sync {
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.clone()).context("Config load failed")?;

    let verbose = args.verbose || config.verbose;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let (origin, local) = read_zone(&args).context("Zone load failed")?;
    info!("Loaded {} records for zone {}", local.len(), origin);

    let mut out = io::stdout().lock();

    match args.command {
        Command::Show => local.fprint(&mut out)?,
        Command::Remote => {
            let (client, zone_id) = connect(&config, &origin).await?;
            let remote = client.list_records(&zone_id).await?;
            remote.fprint(&mut out)?;
        }
        Command::Diff => {
            let (client, zone_id) = connect(&config, &origin).await?;
            let (create, delete) = Reconciler::new(client, zone_id).plan(&local).await?;
            print_section(&mut out, "Only in zone file (create)", &create)?;
            print_section(&mut out, "Only at Cloudflare (delete)", &delete)?;
        }
        Command::Sync { dry_run } => {
            let (client, zone_id) = connect(&config, &origin).await?;
            let report = Reconciler::new(client, zone_id)
                .reconcile(&local, dry_run)
                .await?;
            info!(
                "{} {} records, {} {} records",
                if dry_run { "Would create" } else { "Created" },
                report.created.len(),
                if dry_run { "would delete" } else { "deleted" },
                report.deleted.len()
            );
        }
    }

    Ok(())
}

/// Builds the Cloudflare client and resolves the zone ID, looking it up by
/// the zone's origin when the config does not name one
async fn connect(config: &Config, origin: &str) -> Result<(Arc<CloudflareClient>, String)> {
    let api_token = config.require_api_token()?;
    let client = Arc::new(
        CloudflareClient::new(api_token, config.timeout).context("Cloudflare client failed")?,
    );
    let zone_id = match config.zone_id() {
        Some(id) => id.to_string(),
        None => {
            validate_zone_name(origin)?;
            client
                .zone_id_by_name(origin)
                .await
                .context("Zone lookup failed")?
        }
    };
    Ok((client, zone_id))
}

/// Reads and loads the zone file named on the command line
fn read_zone(args: &Args) -> Result<(String, RecordCollection)> {
    let mut file = File::open(&args.zonefile)
        .with_context(|| format!("Failed to open {}", args.zonefile.display()))?;
    let mut tokens = ZoneTokens::load(&mut file)?;
    if let Some(origin) = args.origin.as_deref() {
        validate_zone_name(origin)?;
        tokens = tokens.with_origin(origin)?;
    }

    Ok(load_zone(tokens)?)
}

fn print_section(out: &mut impl io::Write, title: &str, records: &RecordCollection) -> Result<()> {
    writeln!(out, "; {} ({})", title, records.len())?;
    records.fprint(out)?;
    writeln!(out)?;
    Ok(())
}
