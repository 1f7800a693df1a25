//! EcoSort terminal runner (default binary).
//!
//! A synchronous crossterm loop: keys become actions sent to the game
//! driver, events feed the message log, and each frame renders the latest
//! snapshot through the framebuffer renderer.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ecosort::core::{GameEvent, GameSummary, StatsStore};
use ecosort::input::{handle_key_event, should_quit};
use ecosort::runtime::{JsonFileStore, RuntimeConfig, SyncRuntime};
use ecosort::term::{FrameBuffer, GameView, MessageLog, TerminalRenderer, Viewport};
use ecosort::types::GameMode;

const FRAME: Duration = Duration::from_millis(33);

/// Command-line arguments for ecosort
#[derive(Parser, Debug)]
#[command(name = "ecosort")]
#[command(about = "Sort waste into the right bin against the clock")]
#[command(version)]
struct Args {
    /// Game mode: time_trial, blitz, marathon, survival or zen
    #[arg(short, long, env = "ECOSORT_MODE", default_value = "time_trial")]
    mode: String,

    /// Spawn seed (defaults to one derived from the clock)
    #[arg(long, env = "ECOSORT_SEED")]
    seed: Option<u32>,

    /// Stats file
    #[arg(long, env = "ECOSORT_STATS_PATH")]
    stats_path: Option<PathBuf>,

    /// Write tracing output to this file
    #[arg(long, env = "ECOSORT_LOG_PATH")]
    log_path: Option<PathBuf>,

    /// Keep stats in memory only
    #[arg(long, env = "ECOSORT_PERSIST_DISABLED")]
    no_persist: bool,

    /// Print lifetime stats and recent sessions, then exit
    #[arg(long)]
    history: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = args.log_path.as_deref() {
        init_logging(path)?;
    }

    let mut config = RuntimeConfig::from_env();
    config.mode = GameMode::from_str(&args.mode);
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(path) = args.stats_path {
        config.stats_path = path;
    }
    config.persist = !args.no_persist;

    if args.history {
        print_history(&config.stats_path);
        return Ok(());
    }

    info!(mode = config.mode.as_str(), seed = config.seed, "starting ecosort");

    let mut runtime = SyncRuntime::start(config.clone()).context("failed to start game runtime")?;
    runtime
        .start_session(config.mode)
        .context("game driver stopped before the first session")?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut runtime);

    // Always try to restore terminal state.
    let _ = term.exit();
    runtime.shutdown();
    result
}

/// Tracing goes to a file so it never draws over the game.
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ecosort=info,ecosort_runtime=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        )
        .init();
    Ok(())
}

fn print_history(stats_path: &Path) {
    let store = JsonFileStore::open(stats_path);
    let stats = store.load_stats();
    let impact = stats.impact();

    println!("Games played   {}", stats.games_played);
    println!("Best score     {}", stats.best_score);
    println!("Total score    {}", stats.total_score);
    println!("Items sorted   {}", stats.items_sorted);
    println!("Accuracy       {:.0}%", stats.accuracy() * 100.0);
    println!("Best streak    {}", stats.streak_record);
    println!("Play time      {}s", stats.total_play_time);
    println!("Power-ups used {}", stats.power_ups_used);
    println!(
        "Impact         {:.1} kg CO2, {:.0} L water, {:.1} kWh, {:.2} trees",
        impact.co2_kg, impact.water_litres, impact.energy_kwh, impact.trees
    );

    let recent = store.recent_sessions(10);
    if !recent.is_empty() {
        println!();
        println!("Recent sessions");
        for r in recent {
            println!(
                "  {:<10} score {:>5}  level {:>2}  combo {:>3}  accuracy {:>3.0}%",
                r.mode.display_name(),
                r.score,
                r.level,
                r.max_combo,
                r.accuracy * 100.0
            );
        }
    }
}

fn run(term: &mut TerminalRenderer, runtime: &mut SyncRuntime) -> Result<()> {
    let view = GameView::new();
    let mut fb = FrameBuffer::new(1, 1);
    let mut messages = MessageLog::default();
    let mut summary: Option<GameSummary> = None;

    loop {
        let frame_start = Instant::now();

        while let Some(event) = runtime.try_recv() {
            match &event {
                GameEvent::SessionStart { .. } => summary = None,
                GameEvent::GameOver(s) => summary = Some(s.clone()),
                _ => {}
            }
            messages.push_event(&event, frame_start);
        }
        messages.prune(frame_start);

        let snap = runtime
            .snapshot()
            .context("game driver stopped unexpectedly")?;
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&snap, &messages, summary.as_ref(), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        let timeout = FRAME.saturating_sub(frame_start.elapsed());
        if !event::poll(timeout)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if should_quit(key) {
                    return Ok(());
                }
                if let Some(action) = handle_key_event(key) {
                    if let Err(e) = runtime.try_send(action) {
                        warn!(?action, error = %e, "action dropped");
                    }
                }
            }
            Event::Resize(_, _) => term.invalidate(),
            _ => {}
        }
    }
}
