mod audio;
mod audio_api;
mod error;
mod loader;
mod middle;
mod pipeline;
mod shared;
mod tui;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::terminal;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use audio::{AudioClock, MasterGain, WallClock};
use loader::FsSampleStore;
use middle::Middle;
use pipeline::kit::Renderer;
use pipeline::persistence;
use pipeline::transport::UI_TICK;
use shared::{InputEvent, KitId, clamp_bpm};

/// Terminal drum machine: eight synthesized pads, three kits, live record,
/// replay and loop.
#[derive(Parser, Debug)]
#[command(name = "drumtty", version)]
struct Args {
    /// Project directory; state lives in <dir>/.drumtty
    project_dir: Option<PathBuf>,

    /// Sample rate used when no audio device is available
    #[arg(long, default_value_t = 44_100)]
    sample_rate: u32,

    /// Start on this kit (acoustic, electronic, hiphop)
    #[arg(long, value_parser = parse_kit)]
    kit: Option<KitId>,

    /// Start at this tempo (clamped to 60..=180)
    #[arg(long)]
    tempo: Option<i64>,

    /// Seed for the noise generator, for reproducible sounds
    #[arg(long)]
    seed: Option<u64>,

    /// Kit file used by save/load (default: <dir>/drumkit.json)
    #[arg(long)]
    kit_file: Option<PathBuf>,
}

fn parse_kit(s: &str) -> Result<KitId, String> {
    KitId::ALL
        .into_iter()
        .find(|k| k.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| format!("unknown kit '{s}'"))
}

fn main() {
    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

// logs go to a file; stdout belongs to the terminal UI
fn init_logging(project_dir: &std::path::Path) -> anyhow::Result<()> {
    let dir = persistence::state_dir(project_dir);
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let file = std::fs::File::create(dir.join("drumtty.log")).context("opening log file")?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("DRUMTTY_LOG").unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run(args: Args) -> anyhow::Result<()> {
    let project_dir = match args.project_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("no project directory given and no cwd")?,
    };
    init_logging(&project_dir)?;
    info!(project = %project_dir.display(), "starting drumtty");

    let mut state = persistence::load_project(&project_dir);
    if let Some(kit) = args.kit {
        state.kit = kit;
    }
    if let Some(tempo) = args.tempo {
        state.tempo = clamp_bpm(tempo);
    }

    // no device is not fatal: keep the UI running on a wall clock, silently
    let gain = Arc::new(MasterGain::default());
    let (audio, audio_err) = match audio::start_audio(gain.clone()) {
        Ok(handle) => (Some(handle), None),
        Err(e) => {
            warn!("{e}; continuing without sound");
            (None, Some(e))
        }
    };
    let (clock, sample_rate): (Box<dyn AudioClock>, u32) = match &audio {
        Some(handle) => {
            let clock = handle.clock();
            let sr = clock.sample_rate();
            (Box::new(clock), sr)
        }
        None => (Box::new(WallClock::new(args.sample_rate)), args.sample_rate),
    };
    let tx = audio.as_ref().map(|a| a.sender());
    let retired = audio.as_ref().map(|a| a.retired());

    let store = FsSampleStore::new(persistence::state_dir(&project_dir).join("samples"));
    let kit_file = args.kit_file.unwrap_or_else(|| project_dir.join("drumkit.json"));
    let mut middle = Middle::new(
        state,
        clock,
        Renderer::new(sample_rate, args.seed),
        gain,
        Box::new(store),
        project_dir.clone(),
        kit_file,
    );
    middle.load_custom_samples();
    if let Some(e) = &audio_err {
        middle.set_audio_unavailable(&e.to_string());
    }

    let send_all = |cmds: Vec<audio_api::AudioCommand>| {
        if let Some(tx) = &tx {
            for cmd in cmds {
                audio::send(tx, cmd);
            }
        }
    };

    terminal::enable_raw_mode()?;
    // Enable keyboard enhancement for real press/release detection.
    // Falls back gracefully if the terminal doesn't support it.
    let _ = crossterm::execute!(
        std::io::stdout(),
        crossterm::event::PushKeyboardEnhancementFlags(
            crossterm::event::KeyboardEnhancementFlags::REPORT_EVENT_TYPES
        )
    );
    let _guard = RawModeGuard; // auto drops when out of scope

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let frame_rate = Duration::from_millis(16); // ~60fps
    let ui_tick = Duration::from_secs_f64(UI_TICK);
    let mut last_tick = Instant::now();
    let blink_start = Instant::now();

    loop {
        let blink_on = (blink_start.elapsed().as_millis() / 250) % 2 == 0;
        term.draw(|frame| {
            tui::view::render(frame, frame.area(), middle.display_state(), blink_on);
        })?;

        for event in tui::input::poll_input(frame_rate)? {
            if event == InputEvent::Quit {
                if let Err(e) = middle.save() {
                    warn!("could not save project: {e}");
                }
                info!("quit");
                return Ok(());
            }
            send_all(middle.handle_input(event));
        }

        if last_tick.elapsed() >= ui_tick {
            last_tick = Instant::now();
            send_all(middle.tick());
            // finished voices come back here to be freed off the audio thread
            if let Some(retired) = &retired {
                retired.try_iter().for_each(drop);
            }
        }
    }
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::event::PopKeyboardEnhancementFlags
        );
        let _ = terminal::disable_raw_mode();
    }
}
