//! goap-sim - headless GOAP village simulation.
//!
//! - `goap-sim run` - drive the agent for a number of ticks
//! - `goap-sim plan` - show the goal order and plan picked from the initial state
//! - `goap-sim` (no args) - same as `run` with the scenario's settings

mod scenario;
mod village;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use goap_core::TickContext;
use goap_tools::{TraceEvent, TraceSink, Tracer};
use tracing_subscriber::{fmt, EnvFilter};

use scenario::Scenario;
use village::{build_agent, Village};

#[derive(Parser)]
#[command(name = "goap-sim")]
#[command(about = "Headless GOAP village simulation", version)]
struct Cli {
    /// Scenario file (YAML); the built-in village when omitted
    #[arg(short, long, global = true)]
    scenario: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation
    Run {
        /// Override the scenario's tick count
        #[arg(long)]
        ticks: Option<u64>,

        /// Override seconds per tick
        #[arg(long)]
        dt: Option<f32>,

        /// Override the RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Print agent trace events to stdout as JSON lines
        #[arg(long)]
        trace: bool,
    },

    /// Show the goal order and the plan for the initial state
    Plan,
}

/// Writes each trace event as one JSON line on stdout.
struct JsonLinesSink;

impl TraceSink for JsonLinesSink {
    fn emit(&mut self, event: TraceEvent) {
        match serde_json::to_string(&event) {
            Ok(line) => {
                let mut out = std::io::stdout().lock();
                if let Err(err) = writeln!(out, "{line}") {
                    tracing::warn!(error = %err, "failed to write trace event");
                }
            }
            Err(err) => tracing::warn!(error = %err, "failed to encode trace event"),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    if cli.json {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let mut scenario = Scenario::load_or_default(cli.scenario.as_deref())?;

    match cli.command {
        Some(Commands::Run {
            ticks,
            dt,
            seed,
            trace,
        }) => {
            if let Some(ticks) = ticks {
                scenario.ticks = ticks;
            }
            if let Some(dt) = dt {
                anyhow::ensure!(dt.is_finite() && dt > 0.0, "--dt must be positive, got {dt}");
                scenario.dt_seconds = dt;
            }
            if let Some(seed) = seed {
                scenario.seed = seed;
            }
            run_simulation(&scenario, trace)
        }
        Some(Commands::Plan) => show_plan(&scenario),
        None => run_simulation(&scenario, false),
    }
}

fn run_simulation(scenario: &Scenario, trace: bool) -> Result<()> {
    let mut village = Village::new(scenario);
    let mut agent = build_agent(scenario, &village)?;
    if trace {
        agent = agent.with_tracer(Tracer::new().with_sink(Box::new(JsonLinesSink)));
    }

    tracing::info!(
        ticks = scenario.ticks,
        dt = scenario.dt_seconds,
        seed = scenario.seed,
        resources = scenario.resources.len(),
        "Starting simulation"
    );

    let mut ctx = TickContext::new(0, scenario.dt_seconds).with_seed(scenario.seed);
    for _ in 0..scenario.ticks {
        for restock in scenario.restocks.iter().filter(|r| r.tick == ctx.tick) {
            if village.restock(&restock.resource, restock.amount) {
                tracing::info!(
                    tick = ctx.tick,
                    resource = restock.resource.as_str(),
                    amount = restock.amount,
                    "Restocked"
                );
                agent.interrupt();
            }
        }

        agent.tick(&ctx, &mut village);
        village.advance(ctx.dt_seconds);
        ctx = ctx.next();
    }

    println!("Simulation finished");
    println!("===================");
    println!();
    println!("Ticks: {}", scenario.ticks);
    println!("Planner calls: {}", agent.plan_calls());
    println!("Plans completed: {}", agent.plans_completed());
    if let Some(goal) = agent.last_goal() {
        println!("Last completed goal: {}", goal.name());
    }
    if let Some(goal) = agent.current_goal() {
        println!("Current goal: {}", goal.name());
    }
    println!();
    println!("Inventory:");
    for (resource, count) in village.inventory() {
        println!("  - {resource}: {count}");
    }
    println!("Sites:");
    for site in village.sites() {
        println!("  - {} ({} left)", site.name, site.stock);
    }

    Ok(())
}

fn show_plan(scenario: &Scenario) -> Result<()> {
    let village = Village::new(scenario);
    let agent = build_agent(scenario, &village)?;
    let planner = agent.planner();

    println!("Goal order:");
    for goal in planner.order_goals(agent.goals(), None, &village) {
        println!("  - {} (priority {})", goal.name(), goal.priority());
    }
    println!();

    let Some(plan) = planner.plan(agent.goals(), None, &village) else {
        println!("No achievable goal");
        return Ok(());
    };

    println!("Plan for {}:", plan.goal().name());
    for (step, id) in plan.execution_order().enumerate() {
        if let Some(action) = planner.action(id) {
            println!("  {}. {} (cost {})", step + 1, action.name(), action.cost());
        }
    }
    println!("Total cost: {}", plan.total_cost());

    Ok(())
}
