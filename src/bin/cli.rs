//! spandb CLI
//!
//! Inspect and edit the span database of a slasher data directory.

use clap::{Parser, Subcommand};
use spandb::{Config, EpochSpanStore, Span, SpanEngine};
use tracing_subscriber::{fmt, EnvFilter};

/// spandb CLI
#[derive(Parser, Debug)]
#[command(name = "spandb-cli")]
#[command(about = "Inspect per-epoch validator spans")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./spandb_data")]
    data_dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the span of one validator
    Get {
        #[arg(short, long)]
        epoch: u64,

        #[arg(short, long)]
        validator: u64,
    },

    /// Write the span of one validator
    Set {
        #[arg(short, long)]
        epoch: u64,

        #[arg(short, long)]
        validator: u64,

        #[arg(long, default_value = "0")]
        min: u16,

        #[arg(long, default_value = "0")]
        max: u16,

        /// Signature bytes as 4 hex digits, e.g. 0a1f
        #[arg(long, default_value = "0000", value_parser = parse_sig_bytes)]
        sig: [u8; 2],

        #[arg(long)]
        attested: bool,
    },

    /// Print every non-zero span of an epoch
    Dump {
        #[arg(short, long)]
        epoch: u64,
    },

    /// List epochs with stored spans
    Epochs,

    /// Delete every epoch below the given one
    Prune {
        #[arg(short, long)]
        before: u64,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,spandb=info"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let config = Config::builder().data_dir(&args.data_dir).build();
    let engine = match SpanEngine::open(config) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Failed to open span database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&engine, args.command) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(engine: &SpanEngine, command: Commands) -> spandb::Result<()> {
    match command {
        Commands::Get { epoch, validator } => {
            let span = engine.validator_span(epoch, validator)?;
            println!("{}", format_span(validator, &span));
        }
        Commands::Set {
            epoch,
            validator,
            min,
            max,
            sig,
            attested,
        } => {
            let span = Span::new(min, max, sig, attested);
            engine.update_epoch(epoch, |spans| spans.set_validator_span(validator, span))?;
            println!("{}", format_span(validator, &span));
        }
        Commands::Dump { epoch } => {
            let spans = engine.load_epoch(epoch)?;
            for (validator, span) in spans.buffer().iter()? {
                if !span.is_zero() {
                    println!("{}", format_span(validator, &span));
                }
            }
        }
        Commands::Epochs => {
            for epoch in engine.store().stored_epochs()? {
                println!("{}", epoch);
            }
        }
        Commands::Prune { before } => {
            let removed = engine.prune_epochs_before(before)?;
            println!("removed {} epoch(s)", removed);
        }
    }
    Ok(())
}

fn format_span(validator: u64, span: &Span) -> String {
    format!(
        "validator={} min={} max={} sig={:02x}{:02x} attested={}",
        validator, span.min_span, span.max_span, span.sig_bytes[0], span.sig_bytes[1], span.has_attested
    )
}

fn parse_sig_bytes(s: &str) -> Result<[u8; 2], String> {
    if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("expected 4 hex digits, got {:?}", s));
    }
    u16::from_str_radix(s, 16)
        .map(u16::to_be_bytes)
        .map_err(|e| e.to_string())
}
