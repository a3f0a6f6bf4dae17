#![warn(clippy::all, clippy::pedantic)]

use std::io;
use std::os::fd::AsRawFd;
use std::time::{Duration, Instant};

use blockfall::app::{App, AppResult};
use blockfall::config::{Config, loader};
use blockfall::menu_types::{AudioControl, GameKey, Mode, SessionEvent};
use blockfall::records::RecordStore;
use blockfall::sound::AudioState;
use blockfall::ui;
use crossterm::event::{KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{debug, error, info};
use ratatui::{Terminal, prelude::*};

// Set to a number to replay the same piece sequence
const SEED_ENV_VAR: &str = "BLOCKFALL_SEED";

fn main() -> AppResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    info!("Starting blockfall");

    let config = match loader::load_config_from_file() {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {e}");
            Config::default()
        }
    };

    // Startup errors still reach the terminal; the game needs its record list
    let records = RecordStore::load(&config.records_path).inspect_err(|e| {
        error!(
            "Cannot start without records at {}: {e}",
            config.records_path.display()
        );
    })?;

    redirect_stderr("blockfall.log");

    let mut app = App::new(&config, records, AudioState::from_config(&config.audio));
    if let Some(seed) = std::env::var(SEED_ENV_VAR)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
    {
        info!("Using piece seed {seed}");
        app.seed(seed);
    }

    // Terminal initialization
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let frame_rate = Duration::from_millis(33); // ~30 FPS
    let res = run_app(&mut terminal, &mut app, frame_rate);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("Game error: {err:?}");
    }

    Ok(())
}

// The alternate screen owns the terminal, so log output goes to a file from here on
fn redirect_stderr(log_path: &str) {
    let log_file = match std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)
    {
        Ok(file) => file,
        Err(e) => {
            error!("Failed to create log file {log_path}: {e}");
            return;
        }
    };

    let stderr_fd = std::io::stderr().as_raw_fd();
    let log_file_fd = log_file.as_raw_fd();

    // Safety: both descriptors are open for the duration of the call
    unsafe {
        libc::dup2(log_file_fd, stderr_fd);
    }
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    frame_rate: Duration,
) -> AppResult<()> {
    let mut last_render: Option<Instant> = None;
    let mut last_gravity = Instant::now();
    let mut audio_error_logged = false;

    // Flush anything typed before the game started
    while event::poll(Duration::from_millis(0))? {
        let _ = event::read()?;
    }

    loop {
        if app.should_quit {
            return Ok(());
        }

        if last_render.is_none_or(|at| at.elapsed() >= frame_rate) {
            terminal.draw(|f| ui::render(f, app))?;
            last_render = Some(Instant::now());
        }

        if app.mode == Mode::Playing {
            if last_gravity.elapsed() >= app.gravity_interval() {
                last_gravity = Instant::now();
                app.dispatch(SessionEvent::Tick);
            }
        } else {
            last_gravity = Instant::now();
        }

        if !audio_error_logged && !app.world.resource::<AudioState>().is_audio_available() {
            error!("Audio device is unavailable. Continuing without sound.");
            audio_error_logged = true;
        }

        if event::poll(Duration::from_millis(5))? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    debug!("Key event: {key:?}");
                    app.dispatch(session_event_for_key(key.code));
                }
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    let size = terminal.size()?;
                    let area = Rect::new(0, 0, size.width, size.height);
                    if let Some(button) = ui::button_at(area, app.mode, mouse.column, mouse.row) {
                        app.dispatch(SessionEvent::Click(button));
                    }
                }
                _ => {}
            }
        }
    }
}

fn session_event_for_key(code: KeyCode) -> SessionEvent {
    let key = match code {
        KeyCode::Char('q') => return SessionEvent::Quit,
        KeyCode::Char('m') => return SessionEvent::Audio(AudioControl::ToggleMusic),
        KeyCode::Char('n') => return SessionEvent::Audio(AudioControl::ToggleSound),
        KeyCode::Char('+' | '=') => return SessionEvent::Audio(AudioControl::VolumeUp),
        KeyCode::Char('-') => return SessionEvent::Audio(AudioControl::VolumeDown),
        KeyCode::Left | KeyCode::Char('a') => GameKey::Left,
        KeyCode::Right | KeyCode::Char('d') => GameKey::Right,
        KeyCode::Up | KeyCode::Char('w') => GameKey::Up,
        KeyCode::Down | KeyCode::Char('s') => GameKey::Down,
        KeyCode::Enter | KeyCode::Char(' ') => GameKey::Confirm,
        KeyCode::Esc => GameKey::Back,
        _ => GameKey::Other,
    };
    SessionEvent::Key(key)
}
