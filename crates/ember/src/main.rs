use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
};
use ember_config::{Config, ConfigError};
use ember_core::Rgb;
use ember_field::{FieldOptions, FieldState, time_seed, to_color};
use ember_text::Typewriter;
use log::{error, info, warn};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::Paragraph,
};

mod cli;
mod logging;
mod pointer;

use cli::Cli;
use pointer::{Glow, Magnet};

/// Poll timeout between frames (~60 fps).
const FRAME_POLL: Duration = Duration::from_millis(16);

/// How long a status message stays on screen.
const STATUS_TTL_MS: u64 = 3000;

/// Reach of the pointer glow, in columns.
const GLOW_RADIUS: f32 = 12.0;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        logging::init(path)?;
    }

    let config_path = resolve_config_path(cli.config.clone(), Config::default_path);
    let mut config = match &config_path {
        Some(path) => Config::load(Some(path))?,
        None => Config::default(),
    };
    cli.apply(&mut config);
    config.validate()?;

    let terminal = ratatui::init();
    let result = run(terminal, config, config_path);
    let _ = execute!(io::stdout(), DisableMouseCapture, DisableFocusChange);
    ratatui::restore();
    result
}

fn run(
    terminal: DefaultTerminal,
    config: Config,
    config_path: Option<PathBuf>,
) -> color_eyre::Result<()> {
    execute!(io::stdout(), EnableMouseCapture, EnableFocusChange)?;
    App::new(config, config_path).run(terminal)
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Loaded configuration, updated by `w`.
    config: Config,
    /// Where `w` writes the configuration.
    config_path: Option<PathBuf>,
    /// Particle field behind everything else.
    field: FieldState,
    /// Headline text effect.
    typewriter: Typewriter,
    /// Pull of the pointer on the headline.
    magnet: Magnet,
    /// Light following the pointer over the field.
    glow: Glow,
    /// Headline position before the magnetic offset.
    headline_area: Rect,
    /// Area of the last frame.
    area: Rect,
    /// Whether the last frame used the compact layout.
    compact: bool,
    /// Transient message and the time it was set.
    status: Option<(String, u64)>,
    started: Instant,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config, config_path: Option<PathBuf>) -> Self {
        let options = FieldOptions {
            seed: config.seed,
            speed: config.speed,
            reduced_motion: config.reduced_motion,
            cell_width: config.cell_width,
            cell_height: config.cell_height,
            background: config.background,
            contrast: config.contrast,
        };
        let field = FieldState::new(config.field.clone(), options);

        let mut typewriter =
            Typewriter::new(config.headline.phrases.clone(), config.headline.timing);
        if config.reduced_motion {
            typewriter.freeze();
        }

        Self {
            running: false,
            field,
            typewriter,
            magnet: Magnet::default(),
            glow: Glow::new(GLOW_RADIUS, config.glow, Rgb::AMBER, config.background),
            area: Rect::default(),
            headline_area: Rect::default(),
            compact: false,
            status: None,
            started: Instant::now(),
            config,
            config_path,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        info!("ember started, seed {}", self.field.seed());
        while self.running {
            let elapsed_ms = self.elapsed_ms();
            terminal.draw(|frame| self.render(frame, elapsed_ms))?;
            self.handle_crossterm_events()?;
        }
        self.field.stop();
        Ok(())
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame, elapsed_ms: u64) {
        let area = frame.area();
        let background = to_color(self.config.background);
        frame.render_widget(Paragraph::new("").style(Style::new().bg(background)), area);

        self.field.render(frame, elapsed_ms);
        self.area = area;
        self.compact = self.field.is_compact(area);
        if self.compact {
            self.glow.clear();
        }
        frame.render_widget(&self.glow, area);

        let chunks = Layout::vertical([
            Constraint::Fill(1),   // Top padding
            Constraint::Length(1), // Headline
            Constraint::Fill(1),   // Bottom padding
            Constraint::Length(1), // Status
            Constraint::Length(1), // Help text
        ])
        .split(area);

        if self.config.headline.enabled {
            self.render_headline(frame, chunks[1], elapsed_ms);
        }
        self.render_status(frame, chunks[3], elapsed_ms);
        self.render_help(frame, chunks[4]);
    }

    fn render_headline(&mut self, frame: &mut Frame, row: Rect, elapsed_ms: u64) {
        self.typewriter.tick(elapsed_ms);

        let color = to_color(Rgb::AMBER);
        // Blinking caret, solid under reduced motion.
        let caret = if self.config.reduced_motion || (elapsed_ms / 530) % 2 == 0 {
            "▌"
        } else {
            " "
        };
        let line = Line::from(vec![
            self.typewriter.text().to_string().bold().fg(color),
            caret.fg(color),
        ]);

        let width = (line.width() as u16).min(row.width);
        self.headline_area = Rect {
            x: row.x + (row.width - width) / 2,
            width,
            ..row
        };
        let placed = self.magnet.apply(self.headline_area, frame.area());
        frame.render_widget(Paragraph::new(line), placed);
    }

    fn render_status(&mut self, frame: &mut Frame, area: Rect, elapsed_ms: u64) {
        let expired = self
            .status
            .as_ref()
            .is_some_and(|(_, since)| elapsed_ms.saturating_sub(*since) > STATUS_TTL_MS);
        if expired {
            self.status = None;
        }

        let text = match &self.status {
            Some((message, _)) => message.clone(),
            None => {
                let mut text = format!(
                    "{} · {} particles · {}",
                    self.field.variant().name(),
                    self.field.particle_count(),
                    self.field.speed().name(),
                );
                if self.field.is_paused() {
                    text.push_str(" · paused");
                }
                text
            }
        };
        let status = Paragraph::new(text)
            .style(Style::new().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(status, area);
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let color = to_color(Rgb::AMBER);
        let help = Line::from(vec![
            "q".bold().fg(color),
            " quit  ".dark_gray(),
            "v".bold().fg(color),
            " variant  ".dark_gray(),
            "s".bold().fg(color),
            " speed  ".dark_gray(),
            "p".bold().fg(color),
            " pause  ".dark_gray(),
            "r".bold().fg(color),
            " reseed  ".dark_gray(),
            "w".bold().fg(color),
            " save".dark_gray(),
        ])
        .centered();
        frame.render_widget(help, area);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Polls with a short timeout so the field keeps animating.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(FRAME_POLL)? {
            self.handle_event(event::read()?);
        }
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
            Event::Mouse(mouse) => self.on_mouse_event(mouse),
            // the pointer left the terminal window
            Event::FocusLost => {
                self.glow.clear();
                self.magnet.release();
            }
            // the field picks up the new size on the next draw
            Event::Resize(_, _) => {}
            _ => {}
        }
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('v')) => self.field.toggle_variant(),
            (_, KeyCode::Char('s')) => self.field.cycle_speed(),
            (_, KeyCode::Char('p')) => self.field.toggle_pause(),
            (_, KeyCode::Char('r')) => self.field.reseed(time_seed()),
            (_, KeyCode::Char('w')) => self.save_config(),
            _ => {}
        }
    }

    /// Moves the glow and pulls the headline toward the pointer on wide
    /// layouts.
    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        if !matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
            return;
        }
        let pointer = Position::new(mouse.column, mouse.row);
        if self.compact || self.config.reduced_motion {
            self.glow.clear();
            self.magnet.release();
            return;
        }
        self.glow.follow(pointer, self.area);

        let strength = self.config.headline.magnetic_strength;
        if strength <= 0.0 {
            self.magnet.release();
            return;
        }
        self.magnet.track(pointer, hover_zone(self.headline_area), strength);
    }

    /// Write the current variant and speed back to the config file.
    fn save_config(&mut self) {
        let Some(path) = self.config_path.clone() else {
            self.set_status("no config location available".to_string());
            return;
        };
        self.config.field.variant = self.field.variant();
        self.config.speed = self.field.speed();

        let message = match self.config.save(&path) {
            Ok(()) => format!("saved {}", path.display()),
            Err(err) => {
                error!("saving config failed: {err}");
                format!("save failed: {err}")
            }
        };
        self.set_status(message);
    }

    fn set_status(&mut self, message: String) {
        self.status = Some((message, self.elapsed_ms()));
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

/// The config file to use: the `--config` path, else the platform default.
/// Without either the app runs on defaults and `w` has nowhere to save.
fn resolve_config_path(
    explicit: Option<PathBuf>,
    default_path: impl FnOnce() -> Result<PathBuf, ConfigError>,
) -> Option<PathBuf> {
    if explicit.is_some() {
        return explicit;
    }
    match default_path() {
        Ok(path) => Some(path),
        Err(err) => {
            warn!("{err}; running with default settings");
            None
        }
    }
}

/// The area around the headline that attracts it: one row above and below.
fn hover_zone(headline: Rect) -> Rect {
    Rect {
        y: headline.y.saturating_sub(1),
        height: headline.height + 2,
        ..headline
    }
}
