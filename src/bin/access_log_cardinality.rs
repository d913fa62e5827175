//! Compare exact and HyperLogLog distinct counting of a field in a JSON lines log.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use cardinality_sketch::report::compare_file;
use cardinality_sketch::source::DEFAULT_FIELD;
use cardinality_sketch::{Error, HashAlgorithm, SketchConfig};

/// Count distinct values of a log field exactly and with HyperLogLog
#[derive(Parser, Debug)]
#[command(name = "access-log-cardinality")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the log file, one JSON object per line
    #[arg(default_value = "lms-stage-access.log")]
    log: PathBuf,

    /// Record field to count distinct values of
    #[arg(short, long, default_value = DEFAULT_FIELD)]
    field: String,

    /// JSON sketch configuration file, command line options override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of register index bits, in [4..18] range
    #[arg(short, long)]
    precision: Option<u8>,

    /// Hash function
    #[arg(long, value_enum)]
    hasher: Option<HashAlgorithm>,

    /// Hash seed
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn sketch_config(&self) -> Result<SketchConfig, Error> {
        let mut config: SketchConfig = match &self.config {
            Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)
                .map_err(|e| Error::ConfigFile(format!("{}: {}", path.display(), e)))?,
            None => SketchConfig::default(),
        };
        if let Some(precision) = self.precision {
            config.precision = precision;
        }
        if let Some(hasher) = self.hasher {
            config.hasher = hasher;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        Ok(config)
    }
}

fn main() {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber");

    let config = match args.sketch_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(2);
        }
    };
    info!(
        "Counting distinct `{}` values in {:?} (precision = {}, hasher = {:?})",
        args.field, args.log, config.precision, config.hasher
    );

    match compare_file(&args.log, &args.field, &config) {
        Ok(comparison) => {
            if comparison.errors > 0 {
                info!("Skipped {} malformed records", comparison.errors);
            }
            println!("{}", comparison.to_table());
        }
        Err(e) => {
            error!("Comparison failed: {}", e);
            std::process::exit(1);
        }
    }
}
