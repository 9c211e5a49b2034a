#[macro_use]
extern crate tracing;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    fs::File,
    io::{self, stdout, Stdout},
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;

use blockfall::input::{map_key, HeldKeys, Key, PointerState, RELEASE_TIMEOUT};
use blockfall::session::Session;
use blockfall::ui::{self, FrameContext, SceneId};

const FRAME_TIME: Duration = Duration::from_millis(16);
/// Overrides the held-key timeout, in milliseconds, on terminals without
/// key-release events.
const RELEASE_TIMEOUT_VAR: &str = "BLOCKFALL_RELEASE_MS";

// ============================================================================
// Setup
// ============================================================================

fn init_tracing() -> Result<()> {
    let path = std::env::temp_dir().join("blockfall.log");
    let file = File::create(&path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("blockfall=info")))
        .with_ansi(false)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

/// Enters raw mode and the alternate screen. Returns whether key releases
/// will be reported.
fn setup_terminal() -> io::Result<bool> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;

    let reports_release = matches!(supports_keyboard_enhancement(), Ok(true));
    if reports_release {
        stdout().execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))?;
    }
    Ok(reports_release)
}

fn release_timeout() -> Result<Duration> {
    match std::env::var(RELEASE_TIMEOUT_VAR) {
        Ok(value) => {
            let millis: u64 = value
                .trim()
                .parse()
                .with_context(|| format!("parsing {RELEASE_TIMEOUT_VAR}={value:?}"))?;
            Ok(Duration::from_millis(millis))
        }
        Err(_) => Ok(RELEASE_TIMEOUT),
    }
}

fn restore_terminal(reports_release: bool) -> io::Result<()> {
    if reports_release {
        stdout().execute(PopKeyboardEnhancementFlags)?;
    }
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

// ============================================================================
// Main Loop
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    reports_release: bool,
    release_timeout: Duration,
) -> Result<()> {
    let mut session = Session::new();
    let mut keys = HeldKeys::with_release_timeout(reports_release, release_timeout);
    let mut pointer = PointerState::default();
    let mut scene = ui::build_scene(SceneId::Title, &session);
    let mut last_frame = Instant::now();

    loop {
        // Handle input until the next frame is due
        let deadline = last_frame + FRAME_TIME;
        while let Some(timeout) = deadline.checked_duration_since(Instant::now()) {
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) => {
                    let ctrl_c = key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
                    if key.kind == KeyEventKind::Press && (ctrl_c || map_key(key.code) == Some(Key::Quit)) {
                        info!("quit requested");
                        return Ok(());
                    }
                    keys.apply(&key, Instant::now());
                }
                Event::Mouse(mouse) => pointer.apply(&mouse),
                _ => {}
            }
        }

        let now = Instant::now();
        keys.expire(now);
        let dt = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        let mut next = None;
        terminal.draw(|frame| {
            let mut ctx = FrameContext {
                keys: &keys,
                pointer,
                dt,
                session: &mut session,
            };
            next = scene.tick(&mut ctx, frame);
        })?;

        if let Some(id) = next {
            info!(?id, "switching scene");
            scene = ui::build_scene(id, &session);
        }
    }
}

fn main() -> Result<()> {
    init_tracing()?;
    let release_timeout = release_timeout()?;

    let reports_release = setup_terminal().context("setting up terminal")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    if !reports_release {
        info!(?release_timeout, "terminal does not report key releases");
    }
    let result = run(&mut terminal, reports_release, release_timeout);

    // Restore terminal
    restore_terminal(reports_release).context("restoring terminal")?;
    result
}
