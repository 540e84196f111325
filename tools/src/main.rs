//! qviz-runner: gateway server and headless concept runner.
//!
//! Usage:
//!   qviz-runner --serve [--addr 127.0.0.1:3000] [--config qviz.json]
//!   qviz-runner --concept tunneling --frames 600 [--svg out.svg]
//!               [--db qviz.db] [--seed 42] [--set energy=90] [--realtime]
//!               [--action measure]

use anyhow::Result;
use qviz_core::{
    concept::ConceptId,
    config::AppConfig,
    progress::ProgressTotals,
    registry::ConceptRegistry,
    scene::SceneCounters,
    scheduler::{ManualScheduler, PacedScheduler},
    store::KvStore,
};
use qviz_tools::{
    api::{self, AppState},
    headless::{parse_override, run_headless, HeadlessOptions, HeadlessSummary},
    upstream::OpenAiCompatClient,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = match flag_value(&args, "--config") {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(addr) = flag_value(&args, "--addr") {
        config.gateway.addr = addr.to_string();
    }
    if let Some(db) = flag_value(&args, "--db") {
        config.storage.db_path = db.to_string();
    }
    config.runner.seed = parse_arg(&args, "--seed", config.runner.seed);

    if args.iter().any(|a| a == "--serve") {
        return serve(config);
    }

    let concept: ConceptId = flag_value(&args, "--concept").unwrap_or("wave-particle").parse()?;
    let overrides = args
        .windows(2)
        .filter(|w| w[0] == "--set")
        .map(|w| parse_override(&w[1]))
        .collect::<Result<Vec<_>>>()?;
    let actions = args
        .windows(2)
        .filter(|w| w[0] == "--action")
        .map(|w| w[1].clone())
        .collect();
    let options = HeadlessOptions {
        concept,
        frames: parse_arg(&args, "--frames", 600u64),
        overrides,
        actions,
        svg_path: flag_value(&args, "--svg").map(str::to_string),
    };
    let realtime = args.iter().any(|a| a == "--realtime");

    println!("qviz-runner");
    println!("  concept:   {concept}");
    println!("  frames:    {}", options.frames);
    println!("  seed:      {}", config.runner.seed);
    println!("  db:        {}", config.storage.db_path);
    println!();

    let store = KvStore::open_migrated(&config.storage.db_path)?;
    let registry = ConceptRegistry::standard();
    let summary = if realtime {
        let scheduler = PacedScheduler::new(config.runner.nominal_fps);
        run_headless(&registry, scheduler, &config.runner, &options, Some(&store))?
    } else {
        let scheduler = ManualScheduler::new(config.runner.nominal_fps);
        run_headless(&registry, scheduler, &config.runner, &options, Some(&store))?
    };

    print_summary(&summary);
    Ok(())
}

fn serve(config: AppConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let generator = OpenAiCompatClient::from_config(&config.gateway)?;
        let state = AppState::new(generator, config.gateway.max_tokens, &ConceptRegistry::standard());
        api::serve(&config.gateway.addr, state).await
    })
}

fn print_summary(summary: &HeadlessSummary) {
    let snap = &summary.snapshot;
    println!("=== RUN SUMMARY ===");
    println!("  runner:       {}", snap.runner_id);
    println!("  frames:       {}", snap.clock.frames);
    println!("  rendered:     {}", summary.rendered);
    println!("  logical time: {:.1}", snap.clock.frames as f64 * snap.clock.step);
    println!("  completed:    {}", snap.completed);
    println!("  events:       {}", summary.events);
    for (name, value) in snap.parameters.iter() {
        match value.as_f64() {
            Some(v) => println!("  {name:<20} {v}"),
            None => println!("  {name:<20} {}", value.as_bool().unwrap_or(false)),
        }
    }

    let c = &snap.counters;
    if *c != SceneCounters::default() {
        println!();
        println!("=== SCENE ===");
        println!("  emitted:      {}", c.emitted);
        println!("  tunneled:     {}", c.tunneled);
        println!("  reflected:    {}", c.reflected);
        println!("  detected:     {}", c.detected);
        println!("  measurements: {}", c.measurements);
        println!("  correlations: {}", c.correlations);
    }

    if let Some(progress) = &summary.progress {
        let totals = ProgressTotals::default();
        println!();
        println!("=== PROGRESS ===");
        println!("  overall:      {}%", progress.overall_progress(totals));
        println!("  simulations:  {}/{}", progress.simulations_completed.len(), totals.simulations);
        for achievement in progress.achievements(totals) {
            println!("  * {}", achievement.label());
        }
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    flag_value(args, flag).and_then(|v| v.parse().ok()).unwrap_or(default)
}
