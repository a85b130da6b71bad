//! Tom and Jerry entry point
//!
//! Parses the command line, sets up logging and runs the frame loop.

use std::fs::File;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;

use tom_and_jerry::platform::{
    Confirmation, KeyAction, LogLink, OverflowCounter, SerialLink, SystemClock, Throttle,
    TimerClock, TimerInterrupt, WriterLink, forward_reports, poll_actions, wait_for_confirmation,
};
use tom_and_jerry::renderer::{
    Canvas, LcdFrame, TerminalPresenter, compose_game_over, compose_lcd, compose_terminal,
    screen_size,
};
use tom_and_jerry::sim::{
    Clock, Command, GameEvent, GamePhase, GameState, TickInput, load_levels, tick,
};
use tom_and_jerry::{Settings, Variant};

#[derive(Parser, Debug)]
#[command(name = "tom-and-jerry", version, about = "Chase-and-collect arcade game")]
struct Args {
    /// Level descriptor files, played in order
    levels: Vec<PathBuf>,

    /// Target to emulate: terminal or embedded
    #[arg(long, value_parser = parse_variant)]
    variant: Option<Variant>,

    /// RNG seed (defaults to the wall clock)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write log output here instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Append serial status reports to this file
    #[arg(long)]
    serial_log: Option<PathBuf>,
}

fn parse_variant(s: &str) -> Result<Variant, String> {
    Variant::from_str(s).ok_or_else(|| format!("unknown variant '{s}' (expected terminal or embedded)"))
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;
    log::info!("Tom and Jerry starting...");

    let mut settings = Settings::load_or_default(args.settings.as_deref());
    if let Some(variant) = args.variant {
        settings.variant = variant;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    if !args.levels.is_empty() {
        settings.level_files = args.levels.clone();
    }

    let mut link: Box<dyn SerialLink> = match &args.serial_log {
        Some(path) => Box::new(WriterLink::open(path)?),
        None => Box::new(LogLink),
    };

    run(&settings, link.as_mut())
}

/// Set up the clock and the terminal, then play until the operator quits
fn run(settings: &Settings, link: &mut dyn SerialLink) -> Result<()> {
    let profile = settings.profile(screen_size());
    let levels = load_levels(&settings.level_files, &profile);
    let seed = settings.seed.unwrap_or_else(wall_clock_seed);
    log::info!(
        "{} game, {} level(s), seed {seed}",
        settings.variant.as_str(),
        levels.len()
    );

    // The timer thread must outlive the loop
    let (clock, _timer): (Box<dyn Clock>, Option<TimerInterrupt>) = match settings.variant {
        Variant::Terminal => (Box::new(SystemClock::new()), None),
        Variant::Embedded => {
            let counter = OverflowCounter::new();
            let timer = TimerInterrupt::start(counter.clone())?;
            (Box::new(TimerClock::new(counter)), Some(timer))
        }
    };

    let mut state = GameState::new(profile, levels, seed, clock.now());
    let mut presenter = TerminalPresenter::new().context("taking over the terminal")?;
    game_loop(&mut state, settings, clock.as_ref(), &mut presenter, link)
}

fn game_loop(
    state: &mut GameState,
    settings: &Settings,
    clock: &dyn Clock,
    presenter: &mut TerminalPresenter,
    link: &mut dyn SerialLink,
) -> Result<()> {
    let variant = settings.variant;
    let tick_delay = Duration::from_millis(settings.tick_delay_ms);
    let mut throttle = Throttle::new(settings.throttle);
    let mut canvas = Canvas::new(state.profile.width, state.profile.height);
    let mut lcd = LcdFrame::new(state.profile.width, state.profile.height);

    loop {
        let mut input = TickInput::default();
        for action in poll_actions(variant)? {
            match action {
                KeyAction::Command(Command::Quit) => {
                    log::info!("Quit requested");
                    return Ok(());
                }
                KeyAction::Command(command) => input.apply(command),
                KeyAction::ThrottleUp => throttle.up(),
                KeyAction::ThrottleDown => throttle.down(),
            }
        }
        if variant == Variant::Embedded {
            input.throttle = Some(throttle.value());
        }

        tick(state, &input, clock);

        let events = state.drain_events();
        for event in &events {
            match event {
                GameEvent::Status(_) => {}
                GameEvent::GameOver => log::info!("Game over, final score {}", state.session.score),
                other => log::debug!("{other:?}"),
            }
        }
        forward_reports(link, &events)?;

        if state.session.phase == GamePhase::GameOver {
            compose_game_over(&mut canvas);
            presenter.clear()?;
            presenter.present(&canvas.lines())?;
            match wait_for_confirmation()? {
                Confirmation::Restart => {
                    state.restart(clock.now());
                    presenter.clear()?;
                }
                Confirmation::Quit => return Ok(()),
            }
            continue;
        }

        let lines = match variant {
            Variant::Terminal => {
                compose_terminal(state, &mut canvas);
                canvas.lines()
            }
            Variant::Embedded => {
                compose_lcd(state, &mut lcd);
                lcd.lines()
            }
        };
        presenter.present(&lines)?;

        thread::sleep(tick_delay);
    }
}
