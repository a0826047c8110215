use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::PathBuf;

use transaction_network::{
    render_event_text, InteractionKind, NetworkConfig, NetworkPipeline, ScenePayload, YearRange,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Transaction network around one account")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render the scene as JSON
    Scene {
        #[command(flatten)]
        query: QueryArgs,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        #[arg(long)]
        pretty: bool,
    },

    /// Print trace and annotation counts for a scene
    Summary {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Echo a hover/click payload (file or stdin) as indented JSON
    Event {
        #[arg(long, value_enum, default_value_t = EventKind::Hover)]
        kind: EventKind,

        file: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EventKind {
    Hover,
    Click,
}

impl From<EventKind> for InteractionKind {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Hover => InteractionKind::Hover,
            EventKind::Click => InteractionKind::Click,
        }
    }
}

#[derive(Debug, Args)]
struct QueryArgs {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    edges: Option<PathBuf>,

    #[arg(long)]
    nodes: Option<PathBuf>,

    /// First year (inclusive)
    #[arg(long)]
    start: Option<i32>,

    /// Last year (inclusive)
    #[arg(long)]
    end: Option<i32>,

    /// Account to center on
    #[arg(long)]
    account: Option<String>,
}

impl QueryArgs {
    fn resolve(&self) -> Result<(NetworkConfig, YearRange, String)> {
        let mut config = match &self.config {
            Some(path) => NetworkConfig::from_file(path)?,
            None => NetworkConfig::default(),
        };
        if let Some(edges) = &self.edges {
            config.edges_path = edges.clone();
        }
        if let Some(nodes) = &self.nodes {
            config.nodes_path = nodes.clone();
        }

        let years = YearRange::new(
            self.start.unwrap_or(config.default_years.start),
            self.end.unwrap_or(config.default_years.end),
        )?;
        let account = self
            .account
            .clone()
            .unwrap_or_else(|| config.default_account.clone());

        Ok((config, years, account))
    }

    fn compute(&self) -> Result<ScenePayload> {
        let (config, years, account) = self.resolve()?;
        NetworkPipeline::from_config(&config).compute_scene(years, &account)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Scene {
            query,
            output,
            pretty,
        } => run_scene(&query, output, pretty),
        Command::Summary { query } => run_summary(&query),
        Command::Event { kind, file } => run_event(kind.into(), file),
    }
}

fn run_scene(query: &QueryArgs, output: Option<PathBuf>, pretty: bool) -> Result<()> {
    let json = query.compute()?.to_json(pretty)?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write scene to {}", path.display()))?;
            eprintln!("✓ Scene written to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn run_summary(query: &QueryArgs) -> Result<()> {
    let (_, years, account) = query.resolve()?;
    let summary = query.compute()?.summary();

    println!("📊 Transaction network for {} ({})", account, years);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Layout:          {}", summary.layout);
    println!("Edge lines:      {}", summary.line_traces);
    println!("Marker traces:   {}", summary.marker_traces);
    println!("Node points:     {}", summary.node_points);
    println!("Hover points:    {}", summary.hover_points);
    println!("Annotations:     {}", summary.annotations);

    Ok(())
}

fn run_event(kind: InteractionKind, file: Option<PathBuf>) -> Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read event file {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read event from stdin")?;
            buffer
        }
    };

    println!("{}", kind.label());
    println!("{}", render_event_text(&text)?);

    Ok(())
}
