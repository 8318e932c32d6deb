mod display;
mod keyboard;

use std::io::{stdout, BufWriter, Stdout, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    style::Print,
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use car_dodge::app;
use car_dodge::controller::Session;
use car_dodge::logging::init_log;
use car_dodge::persistence::JsonScoreStore;
use car_dodge::platform::{AudioPlayer, Cue, Silent};
use car_dodge::rules::Ruleset;
use car_dodge::settings::Settings;

use display::TerminalRenderer;
use keyboard::TerminalInput;

#[derive(Parser, Debug)]
#[command(name = "car_dodge")]
#[command(about = "Dodge falling traffic in your terminal")]
struct Args {
    /// Ruleset preselected on the start screen (classic, lanes, shield)
    #[arg(short, long)]
    ruleset: Option<Ruleset>,

    /// Ticks per second
    #[arg(long)]
    fps: Option<u32>,

    /// Disable the terminal bell
    #[arg(long)]
    mute: bool,

    /// Settings file (defaults to <config dir>/car_dodge/settings.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// High score record location
    #[arg(long)]
    high_score_file: Option<PathBuf>,

    /// Write a log to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// Command-line flags win over the settings file.
    fn apply(self, mut settings: Settings) -> Settings {
        if let Some(ruleset) = self.ruleset {
            settings.ruleset = ruleset;
        }
        if let Some(fps) = self.fps {
            settings.fps = fps;
        }
        if self.mute {
            settings.sound = false;
        }
        if self.high_score_file.is_some() {
            settings.high_score_file = self.high_score_file;
        }
        if self.log_file.is_some() {
            settings.log_file = self.log_file;
        }
        if let Some(level) = self.log_level {
            settings.log_level = level;
        }
        settings
    }
}

// ── Audio ─────────────────────────────────────────────────────────────────────

/// Rings the terminal bell for crashes and shield events.  Points stay quiet,
/// a bell every passing car would be unbearable.
struct Bell {
    out: Stdout,
}

impl AudioPlayer for Bell {
    fn play(&mut self, cue: Cue) {
        if matches!(cue, Cue::Crash | Cue::Shield) {
            let _ = self.out.execute(Print('\x07'));
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(Settings::default_path);
    let settings = match &config_path {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let settings = args.apply(settings);

    if let Some(log_file) = &settings.log_file {
        if let Err(e) = init_log(settings.log_level_filter(), log_file) {
            eprintln!("warning: logging disabled: {e:#}");
        }
    }
    log::info!("Starting with {settings:?}");

    let store = settings
        .high_score_file
        .clone()
        .map(JsonScoreStore::new)
        .unwrap_or_default();
    log::info!("High score record: {}", store.path().display());
    let mut session = Session::new(store, StdRng::from_entropy(), settings.ruleset);

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Ask for key-release (and key-repeat) events.  Kitty-protocol terminals
    // support this; others fall back to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    let mut input = TerminalInput::spawn();
    let mut renderer = TerminalRenderer::new(&mut out);
    let frame = settings.frame_duration();
    let result = if settings.sound {
        app::run(&mut session, &mut input, &mut renderer, &mut Bell { out: stdout() }, frame)
    } else {
        app::run(&mut session, &mut input, &mut renderer, &mut Silent, frame)
    };

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();

    result.context("terminal I/O failed")
}
