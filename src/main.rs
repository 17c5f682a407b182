use anyhow::{bail, Context, Result};
use cgraph_ml::{AdapterConfig, CircuitGraphAdapter, CommandOptions, GraphVersion};
use cgraph_synth::AigSession;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// cgraph - circuit graphs for graph-learning pipelines
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Adapter config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a circuit and export its graph as JSON
    Graph {
        /// Circuit file (.aag, .aig, .blif)
        file: PathBuf,

        /// Graph version code t.i (defaults to the config value)
        #[arg(long)]
        ver: Option<String>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Load a circuit and run engine commands on it
    Run {
        /// Circuit file
        file: PathBuf,

        /// Command to execute, may be repeated
        #[arg(short, long = "cmd", required = true)]
        cmd: Vec<String>,
    },

    /// Load a circuit and print its statistics
    Stats {
        /// Circuit file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Logs go to stderr so graph JSON on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => AdapterConfig::from_path(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => AdapterConfig::default(),
    };

    match cli.command {
        Commands::Graph { file, ver, output } => {
            export_graph(config, &file, ver.as_deref(), output.as_deref())?;
        }

        Commands::Run { file, cmd } => {
            run_commands(config, &file, &cmd)?;
        }

        Commands::Stats { file } => {
            print_stats(config, &file)?;
        }
    }

    Ok(())
}

/// Open an adapter over a fresh session with `file` loaded
fn open_loaded(config: AdapterConfig, file: &Path) -> Result<CircuitGraphAdapter<AigSession>> {
    let path = file
        .to_str()
        .with_context(|| format!("Non UTF-8 path {:?}", file))?;
    let mut adapter = CircuitGraphAdapter::open(AigSession::new(), config);
    let status = adapter.load_file(path);
    if !status.success {
        bail!("Failed to load {:?}", file);
    }
    info!("Loaded {:?} ({})", file, status);
    Ok(adapter)
}

fn export_graph(
    config: AdapterConfig,
    file: &Path,
    ver: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let version = match ver {
        Some(v) => v.parse::<GraphVersion>()?,
        None => config.version()?,
    };
    let mut adapter = open_loaded(config, file)?;
    let graph = match ver {
        Some(_) => adapter.build_graph_with(version),
        None => adapter.build_default_graph(),
    }
    .with_context(|| format!("Failed to build graph v{}", version))?;
    let json = graph.to_json()?;

    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
            println!(
                "Wrote graph v{} ({} nodes, {} edges) to {:?}",
                version,
                graph.num_nodes,
                graph.num_edges(),
                path
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn run_commands(config: AdapterConfig, file: &Path, commands: &[String]) -> Result<()> {
    let mut adapter = open_loaded(config, file)?;
    for cmd in commands {
        let status = adapter.run_command(cmd, &CommandOptions::new());
        println!("{}: {}", cmd, status);
        if !status.success {
            bail!("Command failed: {}", cmd);
        }
    }
    Ok(())
}

fn print_stats(config: AdapterConfig, file: &Path) -> Result<()> {
    let adapter = open_loaded(config, file)?;
    let name = adapter
        .engine()
        .network()
        .map(|n| n.name.clone())
        .unwrap_or_default();
    println!("{:<12} : {}", name, adapter.ntk_stats()?);
    println!("{:<12} : {}", "gates", adapter.yosys_stats()?);
    Ok(())
}
