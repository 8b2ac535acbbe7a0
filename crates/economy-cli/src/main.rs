mod config;
mod driver;
mod logging;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::Overrides;
use driver::DriverConfig;
use economy_core::engine::ProductionEngine;
use economy_core::export::write_dot;
use economy_core::graph::ItemGraph;
use economy_core::reference::reference_graph;
use economy_data::load_economy;
use logging::LogFormat;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(
    name = "economy",
    version,
    about = "Resolve item dependencies and run production chains in order."
)]
struct Cli {
    /// Config file (default: ./economy.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Economy data file (.ron, .json or .toml). Uses the built-in reference
    /// economy when omitted.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Default log filter; `RUST_LOG` takes precedence.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format.
    #[arg(long, global = true, value_parser = ["pretty", "compact", "json"])]
    log_format: Option<String>,

    /// Append logs to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Only report events with this operation tag (repeatable).
    #[arg(long = "only", global = true)]
    only: Vec<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Produce every prerequisite of an item.
    Make(MakeArgs),
    /// Repeatedly make randomly chosen items.
    Run(RunArgs),
    /// Write the item graph as Graphviz DOT.
    ExportDot(ExportDotArgs),
    /// List items with their producers and direct prerequisites.
    List,
}

#[derive(Debug, Parser)]
struct MakeArgs {
    /// Item to make.
    item: String,
}

#[derive(Debug, Parser)]
struct RunArgs {
    /// Number of makes; runs until interrupted when omitted.
    #[arg(long)]
    iterations: Option<u64>,

    /// Seed for reproducible item choices.
    #[arg(long)]
    seed: Option<u64>,

    /// Pause between makes, in milliseconds.
    #[arg(long)]
    delay_ms: Option<u64>,
}

#[derive(Debug, Parser)]
struct ExportDotArgs {
    /// Destination file, or `-` for stdout.
    #[arg(default_value = "-")]
    output: PathBuf,
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("error: {e:?}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("resolve working directory")?;
    let loaded = config::load_or_default(cli.config.as_deref(), &cwd)?;
    let settings = config::merge(
        &loaded.config,
        Overrides {
            data: cli.data,
            level: cli.log_level,
            format: cli.log_format,
            log_file: cli.log_file,
            only: cli.only,
        },
    );

    let format: LogFormat = settings.format.parse()?;
    logging::init(&settings.level, format, settings.log_file.as_deref())?;
    debug!(config = ?loaded.path, ?settings, "settings resolved");

    let graph = load_graph(settings.data.as_deref())?;

    match cli.cmd {
        Command::Make(args) => cmd_make(graph, &settings.only, args),
        Command::Run(args) => cmd_run(graph, &settings.only, &loaded.config.driver, args),
        Command::ExportDot(args) => cmd_export_dot(&graph, args),
        Command::List => cmd_list(&graph),
    }
}

fn load_graph(data: Option<&Path>) -> anyhow::Result<ItemGraph> {
    match data {
        Some(path) => {
            info!("loading economy from {}", path.display());
            load_economy(path).with_context(|| format!("load economy {}", path.display()))
        }
        None => reference_graph().context("build reference economy"),
    }
}

fn cmd_make(graph: ItemGraph, only: &[String], args: MakeArgs) -> anyhow::Result<()> {
    let engine = ProductionEngine::new(graph, logging::observer(only));
    let report = engine
        .make(&args.item)
        .with_context(|| format!("make {}", args.item))?;

    info!(item = %report.target, steps = report.len(), "production complete");
    println!("made prerequisites of {} ({} steps)", report.target, report.len());
    Ok(())
}

fn cmd_run(
    graph: ItemGraph,
    only: &[String],
    defaults: &config::DriverSection,
    args: RunArgs,
) -> anyhow::Result<()> {
    let engine = ProductionEngine::new(graph, logging::observer(only));
    let driver_config = DriverConfig {
        iterations: args.iterations.or(defaults.iterations),
        seed: args.seed.or(defaults.seed),
        delay: Duration::from_millis(args.delay_ms.unwrap_or(defaults.delay_ms)),
    };

    let summary = driver::run(&engine, &driver_config).context("driver loop")?;
    info!(makes = summary.makes, steps = summary.steps, "driver finished");
    Ok(())
}

fn cmd_export_dot(graph: &ItemGraph, args: ExportDotArgs) -> anyhow::Result<()> {
    if args.output.as_os_str() == "-" {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        write_dot(graph, &mut out).context("write DOT to stdout")?;
        return Ok(());
    }

    let file = std::fs::File::create(&args.output)
        .with_context(|| format!("create {}", args.output.display()))?;
    let mut out = BufWriter::new(file);
    write_dot(graph, &mut out).with_context(|| format!("write {}", args.output.display()))?;
    out.flush()?;
    info!("wrote graph to {}", args.output.display());
    Ok(())
}

fn cmd_list(graph: &ItemGraph) -> anyhow::Result<()> {
    for (id, node) in graph.items() {
        let prereqs = graph.names_of(graph.predecessors(id).iter().copied());
        println!(
            "{:<12} {:<14} <- [{}]",
            node.name(),
            node.producer().operation(),
            prereqs.join(", ")
        );
    }
    Ok(())
}
