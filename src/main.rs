use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fluxroute::server;
use fluxroute::{Engine, GraphDescription, Router};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "fluxroute")]
#[command(about = "Shortest-path routing with live congestion updates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a route on a graph description
    Route {
        /// Graph description JSON file
        graph: PathBuf,
        /// Source node id
        #[arg(long)]
        from: u32,
        /// Target node id
        #[arg(long)]
        to: u32,
        /// Congestion update applied before the query (repeatable)
        #[arg(long = "congestion", value_name = "START,END,FACTOR")]
        congestion: Vec<String>,
    },
    /// Start the HTTP API server
    Serve {
        /// Graph description JSON file
        graph: PathBuf,
        /// Host to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
        /// Log format: text or json
        #[arg(long, default_value = "text")]
        log_format: String,
    },
}

fn parse_congestion(arg: &str) -> Result<(usize, usize, f32)> {
    let parts: Vec<&str> = arg.split(',').collect();
    if parts.len() != 3 {
        anyhow::bail!("congestion update must be in format 'start,end,factor'");
    }
    let start = parts[0].trim().parse::<usize>()?;
    let end = parts[1].trim().parse::<usize>()?;
    let factor = parts[2].trim().parse::<f32>()?;
    Ok((start, end, factor))
}

fn load_description(path: &Path) -> Result<GraphDescription> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read graph file {}", path.display()))?;
    Ok(GraphDescription::from_json_str(&raw)?)
}

fn format_path(nodes: &[u32]) -> String {
    nodes
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Route {
            graph,
            from,
            to,
            congestion,
        } => {
            println!("Loading graph from {}...", graph.display());
            let description = load_description(&graph)?;
            let router = Router::from_description(&description)?;
            println!(
                "Loaded {} nodes, {} edges",
                router.graph().node_count(),
                router.graph().edge_count()
            );

            for arg in &congestion {
                let (start, end, factor) = parse_congestion(arg)?;
                router.apply_congestion_update(start, end, factor)?;
                println!("Applied congestion factor {factor} to edges [{start}, {end}]");
            }

            println!("Finding route from {from} to {to}...");
            let started = Instant::now();
            let computation = router.compute_route(from, to)?;
            println!(
                "Route computed in {:.3}ms",
                started.elapsed().as_secs_f64() * 1000.0
            );

            if !computation.result.reachable {
                println!("Route unreachable");
            } else {
                println!(
                    "Total travel time: {} seconds",
                    computation.result.total_travel_time
                );
                println!("Path: {}", format_path(&computation.result.nodes));
            }
            println!(
                "Expanded {} nodes, relaxed {} edges, visited {} nodes",
                computation.stats.expanded_nodes,
                computation.stats.relaxed_edges,
                computation.stats.visited_nodes
            );
        }
        Commands::Serve {
            graph,
            host,
            port,
            log_format,
        } => {
            server::init_tracing(&log_format);

            tracing::info!("loading graph from {}", graph.display());
            let started = Instant::now();
            let description = load_description(&graph)?;
            let engine = Engine::from_description(&description)?;
            tracing::info!(
                nodes = engine.router().graph().node_count(),
                edges = engine.router().graph().edge_count(),
                "graph loaded in {:.2}s",
                started.elapsed().as_secs_f64()
            );

            server::serve(engine, &host, port).await?;
        }
    }

    Ok(())
}
