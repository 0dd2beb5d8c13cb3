use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use log::info;
use tsngen_core::GraphKind;
use tsngen_driver::Config;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the generator configuration (JSON).
    config: PathBuf,

    /// Overrides the configured graph strategy.
    #[arg(short, long)]
    graph: Option<GraphKind>,

    /// Overrides the configured random seed.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Overrides the configured output directory.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = Config::from_file(&args.config)?;
    if let Some(graph) = args.graph {
        config.spec.graph = graph;
    }
    if let Some(seed) = args.seed {
        config.spec.seed = seed;
    }
    if let Some(output) = args.output {
        config.output_dir = output;
    }

    let kind = config.spec.graph;
    let output_dir = config.output_dir.clone();
    let omnet_files = config.omnet_files;
    let test_case = tsngen_driver::run(config)?;

    info!(
        "generated a {} topology: {} devices, {} links, {} streams",
        kind.as_str(),
        test_case.devices.len(),
        test_case.links.len(),
        test_case.streams.len()
    );
    info!(
        "wrote topology.csv, streams.csv, topology.dot to {}",
        output_dir.display()
    );
    if omnet_files {
        info!("wrote Network.ned and omnetpp.ini to {}", output_dir.display());
    }
    Ok(())
}
