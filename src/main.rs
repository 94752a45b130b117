use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use space_shooter::assets::Assets;
use space_shooter::audio::Audio;
use space_shooter::config::GameConfig;
use space_shooter::display;
use space_shooter::input::{GameEvent, KeyTracker};
use space_shooter::surface::Surface;
use space_shooter::timer::{FrameClock, IntervalTimer};
use space_shooter::world::{Flow, GameWorld};

#[derive(Parser, Debug)]
#[command(name = "space_shooter")]
#[command(about = "Terminal space shooter: survive the meteor shower")]
struct Cli {
    /// TOML file overriding gameplay settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding `images/*.txt` sprites
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
    /// Where to write logs (the terminal is busy drawing the game)
    #[arg(long, default_value = "space_shooter.log")]
    log_file: PathBuf,
    /// Seed for a reproducible meteor shower
    #[arg(long)]
    seed: Option<u64>,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file '{}'", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits. Each iteration: wait for the frame budget,
/// drain terminal and timer events, advance the world, draw.
fn game_loop<W: Write>(
    out: &mut W,
    world: &mut GameWorld,
    surface: &mut Surface,
    rx: &mpsc::Receiver<Event>,
    clock: &mut FrameClock,
    rng: &mut StdRng,
) -> Result<()> {
    let audio = Audio::new(world.config().sound, world.config().bell_threshold);
    let mut keys = KeyTracker::new();
    let mut meteor_timer =
        IntervalTimer::new(clock.ticks_ms(), world.config().meteor_spawn_interval_ms);
    let mut frame: u64 = 0;

    loop {
        let dt = clock.tick();
        let now = clock.ticks_ms();
        frame += 1;

        // ── Drain all pending events (non-blocking) ───────────────────────────
        let mut events = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            if let Event::Resize(cols, rows) = ev {
                tracing::debug!(cols, rows, "terminal resized; play field stays fixed");
            }
            events.extend(keys.record(&ev, frame));
        }
        for _ in 0..meteor_timer.poll(now) {
            events.push(GameEvent::SpawnMeteor);
        }
        for event in events {
            if world.handle_event(event, now, rng) == Flow::Quit {
                tracing::info!("quit requested");
                return Ok(());
            }
        }

        world.tick(now, dt, &keys.held(frame));
        audio.play(out, &world.drain_sounds())?;
        display::render(out, surface, world, now)?;
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config '{}'", path.display()))?,
        None => {
            tracing::info!("no config file given; using built-in defaults");
            GameConfig::default()
        }
    };
    // Fail fast on missing art before the terminal is taken over.
    let assets = Assets::load(&cli.assets)
        .with_context(|| format!("loading assets from '{}'", cli.assets.display()))?;

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (cols, rows) = terminal::size().context("querying terminal size")?;
    let mut surface = Surface::for_terminal(cols, rows);
    let mut clock = FrameClock::new(config.frame_duration());
    let mut world = GameWorld::new(
        config,
        assets,
        surface.width(),
        surface.height(),
        clock.ticks_ms(),
        &mut rng,
    )?;
    tracing::info!(
        width = surface.width(),
        height = surface.height(),
        seed = ?cli.seed,
        "starting"
    );

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(terminal::SetTitle("Space Shooter"))?;
    out.execute(cursor::Hide)?;

    // Release events let KeyTracker drop a key as soon as it is let go.
    // Without them it falls back to HOLD_WINDOW expiry.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // game_loop drains `rx` each frame; only this thread blocks on stdin.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = game_loop(&mut out, &mut world, &mut surface, &rx, &mut clock, &mut rng);

    // Restore even when the loop failed.
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        tracing::error!(error = %e, "game loop failed");
    }
    result
}
