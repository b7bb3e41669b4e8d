//! GOVM Miner CLI
//!
//! # Commands
//!
//! - `hash` - Domain hash of hex-encoded bytes
//! - `power` - Hash power of a hex-encoded digest
//! - `sign` - Sign a block into an envelope
//! - `best` - Search a nonce range for the strongest envelope
//! - `mine` - Mine a block until the configured hash power is reached
//! - `benchmark` - Measure signed envelopes per second

use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::{Parser, Subcommand};

use govm::algorithm::{self, find_best, find_best_parallel, BlockHeader, SecretKey};
use govm::config::{parse_secret_key, MinerConfig};
use govm::{logging, Miner, Secp256k1Signer};

#[derive(Parser)]
#[command(name = "govm")]
#[command(version)]
#[command(about = "GOVM proof-of-work block miner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log verbosity (0 = errors only, 4 = trace)
    #[arg(short, long, global = true, default_value = "2")]
    verbosity: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Domain hash of hex-encoded bytes
    Hash {
        /// Payload as hex
        data: String,
    },

    /// Leading zero bits of a hex-encoded digest
    Power {
        /// Digest as hex
        digest: String,
    },

    /// Sign a block into an envelope
    Sign {
        /// Block as hex (trailing 8 bytes are the nonce)
        #[arg(long)]
        block: String,

        /// Secret key as hex
        #[arg(long)]
        key: String,
    },

    /// Search consecutive nonces for the strongest envelope
    Best {
        #[arg(long)]
        block: String,

        #[arg(long)]
        key: String,

        /// Number of nonces to try
        #[arg(short, long, default_value = "256")]
        trials: u64,

        /// Split the range across all CPU cores
        #[arg(long)]
        parallel: bool,
    },

    /// Mine until a candidate reaches the configured hash power
    Mine {
        /// JSON config file
        #[arg(short, long, default_value = "conf.json")]
        config: PathBuf,

        /// Block template as hex (default: empty header stamped with now)
        #[arg(long)]
        block: Option<String>,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of envelopes to sign and hash
        #[arg(short, long, default_value = "1000")]
        count: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    // `mine` takes its verbosity from the config file
    if !matches!(cli.command, Commands::Mine { .. }) {
        logging::init(cli.verbosity);
    }

    let result = match cli.command {
        Commands::Hash { data } => cmd_hash(&data),
        Commands::Power { digest } => cmd_power(&digest),
        Commands::Sign { block, key } => cmd_sign(&block, &key),
        Commands::Best {
            block,
            key,
            trials,
            parallel,
        } => cmd_best(&block, &key, trials, parallel),
        Commands::Mine { config, block } => cmd_mine(&config, block.as_deref()),
        Commands::Benchmark { count } => cmd_benchmark(count),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn decode_hex(label: &str, value: &str) -> anyhow::Result<Vec<u8>> {
    let value = value.trim();
    hex::decode(value.strip_prefix("0x").unwrap_or(value))
        .with_context(|| format!("invalid hex for {}", label))
}

fn decode_key(value: &str) -> anyhow::Result<SecretKey> {
    Ok(parse_secret_key(value)?)
}

fn cmd_hash(data: &str) -> anyhow::Result<()> {
    let payload = decode_hex("data", data)?;
    println!("{}", hex::encode(algorithm::domain_hash(&payload)));
    Ok(())
}

fn cmd_power(digest: &str) -> anyhow::Result<()> {
    let digest = decode_hex("digest", digest)?;
    println!("{}", algorithm::hash_power(&digest));
    Ok(())
}

fn cmd_sign(block: &str, key: &str) -> anyhow::Result<()> {
    let block = decode_hex("block", block)?;
    let key = decode_key(key)?;

    let (envelope, digest) = algorithm::sign_block(&block, &key, &Secp256k1Signer::new())?;
    println!("Envelope: {}", hex::encode(envelope.as_bytes()));
    println!("Hash: {}", hex::encode(digest));
    println!("Hash power: {}", algorithm::hash_power(&digest));
    Ok(())
}

fn cmd_best(block: &str, key: &str, trials: u64, parallel: bool) -> anyhow::Result<()> {
    let block = decode_hex("block", block)?;
    let key = decode_key(key)?;
    let signer = Secp256k1Signer::with_key(&key)?;

    let start = Instant::now();
    let solution = if parallel {
        find_best_parallel(&block, &key, &signer, trials)?
    } else {
        find_best(&block, &key, &signer, trials)?
    };
    let elapsed = start.elapsed();

    println!("Nonce: {}", solution.nonce);
    println!("Hash: {}", hex::encode(solution.digest));
    println!("Hash power: {}", solution.hash_power());
    println!("Envelope: {}", hex::encode(solution.envelope.as_bytes()));
    println!("Time elapsed: {:.2}s", elapsed.as_secs_f64());
    Ok(())
}

fn cmd_mine(config_path: &Path, block: Option<&str>) -> anyhow::Result<()> {
    let config = MinerConfig::load_from_file(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    logging::init(config.verbosity);

    let key = config.secret_key_bytes()?;
    let block = match block {
        Some(hex) => decode_hex("block", hex)?,
        None => BlockHeader {
            time: SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis() as u64,
            ..Default::default()
        }
        .encode(),
    };

    let signer = Secp256k1Signer::with_key(&key)?;
    let miner = Miner::new(config, key, signer);
    let report = miner.mine(&block)?;

    match &report.solution {
        Some(solution) => {
            println!("\nFound candidate!");
            println!("Nonce: {}", solution.nonce);
            println!("Hash: {}", hex::encode(solution.digest));
            println!("Hash power: {}", solution.hash_power());
            println!("Envelope: {}", hex::encode(solution.envelope.as_bytes()));
        }
        None => println!("\nNo candidate reached the hash power limit."),
    }
    println!("Hashes computed: {}", report.hashes);
    println!("Hashrate: {:.2} H/s", report.hash_rate());
    Ok(())
}

fn cmd_benchmark(count: u64) -> anyhow::Result<()> {
    println!("Running benchmark with {} envelopes...", count);

    let key = [0x42u8; 32];
    let signer = Secp256k1Signer::with_key(&key)?;
    let block = BlockHeader::default().encode();

    let start = Instant::now();
    let solution = find_best(&block, &key, &signer, count)?;
    let elapsed = start.elapsed();
    let hashrate = count as f64 / elapsed.as_secs_f64();

    println!("\nResults:");
    println!("  Total envelopes: {}", count);
    println!("  Time elapsed: {:.2}s", elapsed.as_secs_f64());
    println!("  Hashrate: {:.2} H/s", hashrate);
    println!("  Best hash power: {}", solution.hash_power());

    println!("\nParameters:");
    println!("  Digest: {} bytes", algorithm::DIGEST_SIZE);
    println!("  Sponge rate: {} bytes", algorithm::RATE);
    println!("  Block size: {} bytes", algorithm::BLOCK_HEADER_SIZE);

    Ok(())
}
