//! navcore demo driver.
//!
//! Loads a route file, replays a scripted session against an in-memory
//! history, and prints every settled navigation state as JSON.
//!
//! # Architecture Overview
//!
//! ```text
//!   script step ──▶ Router::go_to / HistoryAdapter::back|forward
//!                        │
//!                        ▼
//!                 HistoryAdapter ──(NavigationEvent)──▶ Router::run
//!                                                         │
//!                          ┌──────────────────────────────┤
//!                          ▼                              ▼
//!                       Matcher                       ViewLoader
//!                     (RouteTable)              (cache + in-flight fetch)
//!                                                         │
//!                                                         ▼
//!   stdout ◀── JSON ◀── watch::Receiver<NavigationState> ◀┘
//! ```
//!
//! Script steps are paths (`/config`), `replace:<path>`, `back`, `forward`,
//! or `name:<route>[?key=value&...]` for named navigation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use navcore::config::load_config;
use navcore::lifecycle::{build_router, Shutdown};
use navcore::observability::logging;
use navcore::view::SimulatedSource;
use navcore::{MemoryHistory, NavigationMode, NavigationState, NavigationTarget, Router};

#[derive(Parser)]
#[command(name = "navcore")]
#[command(about = "Replay a navigation session against a route table", long_about = None)]
struct Cli {
    /// Route configuration file (TOML).
    #[arg(short, long, default_value = "demos/routes.toml")]
    config: PathBuf,

    /// Simulated latency for lazy component fetches, in milliseconds.
    #[arg(long, default_value_t = 50)]
    latency_ms: u64,

    /// Components whose fetch always fails.
    #[arg(long = "fail")]
    failing: Vec<String>,

    /// Navigation steps to replay.
    steps: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    logging::init(&config.observability.log_level);
    tracing::info!(config = %cli.config.display(), routes = config.routes.len(), "navcore starting");

    let mut source = SimulatedSource::new(Duration::from_millis(cli.latency_ms));
    for route in &config.routes {
        source = source.with_component(route.component.clone());
    }
    for component in &cli.failing {
        source = source.with_failure(component.clone());
    }

    let history = MemoryHistory::new(config.history.initial_path.clone());
    let router = build_router(&config, Arc::new(source), history)?;
    let mut states = router.watch();

    let shutdown = Shutdown::new();
    let task = tokio::spawn(Arc::clone(&router).run(shutdown.subscribe()));

    let mut seen = wait_settled(&mut states, 0).await?;
    print_state(&seen)?;

    for step in &cli.steps {
        if !apply_step(&router, step)? {
            tracing::info!(step = %step, "Step did not change the path");
            continue;
        }
        seen = wait_settled(&mut states, seen.attempt).await?;
        print_state(&seen)?;
    }

    shutdown.trigger();
    task.await?;
    tracing::info!(cached_views = router.loader().cached_count(), "Session complete");
    Ok(())
}

fn apply_step(router: &Router, step: &str) -> Result<bool, Box<dyn std::error::Error>> {
    let moved = match step {
        "back" => router.history().back(),
        "forward" => router.history().forward(),
        _ => {
            let (mode, target) = match step.strip_prefix("replace:") {
                Some(rest) => (NavigationMode::Replace, rest),
                None => (NavigationMode::Push, step),
            };
            router.go_to(parse_target(target), mode)?
        }
    };
    Ok(moved)
}

fn parse_target(target: &str) -> NavigationTarget {
    let Some(named) = target.strip_prefix("name:") else {
        return NavigationTarget::path(target);
    };
    let (name, query) = named.split_once('?').unwrap_or((named, ""));
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .fold(NavigationTarget::named(name), |target, (key, value)| {
            target.with_param(key, value)
        })
}

/// Wait for a settled state newer than `after`.
async fn wait_settled(
    states: &mut tokio::sync::watch::Receiver<NavigationState>,
    after: u64,
) -> Result<NavigationState, Box<dyn std::error::Error>> {
    let state = tokio::time::timeout(
        Duration::from_secs(30),
        states.wait_for(|s| s.attempt > after && s.is_settled()),
    )
    .await??;
    Ok(state.clone())
}

fn print_state(state: &NavigationState) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(state)?);
    Ok(())
}
