//! CLI for generating inventory fixtures.
//!
//! Usage:
//!   gen-fixtures --kind vpcs --scale small --seed 42 > vpcs.json
//!   gen-fixtures --kind subnets --scale large -o subnets.json

use clap::Parser;
use fixture_gen::{Generator, Scale};
use std::fs::File;
use std::io::{self, Write};

#[derive(Parser, Debug)]
#[command(name = "gen-fixtures")]
#[command(about = "Generate cloud inventory fixtures for cloudscope", long_about = None)]
struct Args {
    /// Record set: vpcs, subnets, attachments
    #[arg(short, long, default_value = "vpcs")]
    kind: String,

    /// Scale preset: small, medium, large
    #[arg(short, long, default_value = "small")]
    scale: String,

    /// Random seed for reproducibility
    #[arg(long, default_value = "12345")]
    seed: u64,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let scale: Scale = args.scale.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let inventory = Generator::new(args.seed, scale).generate();
    let records = inventory.get(&args.kind).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown kind: {}. Use vpcs, subnets, or attachments",
            args.kind
        )
    })?;

    let json = serde_json::to_string_pretty(records)?;
    if let Some(ref path) = args.output {
        let mut file = File::create(path)?;
        writeln!(file, "{}", json)?;
        eprintln!("Generated {} {} to {}", records.len(), args.kind, path);
    } else {
        writeln!(io::stdout().lock(), "{}", json)?;
    }

    Ok(())
}
