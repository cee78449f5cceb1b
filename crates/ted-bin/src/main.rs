//! ted entrypoint.
use anyhow::{Context, Result};
use clap::Parser;
use core_config::{Settings, load_from};
use core_events::{Gesture, InputEvent, Key, KeyInput};
use core_render::{EditorView, TextHost};
use core_terminal::input::{cell_at, translate};
use core_terminal::{
    CellSurface, CrosstermBackend, FrictionScroller, TerminalBackend, TerminalCapabilities,
    TerminalHost,
};
use core_text::{Buffer, normalize_line_endings};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event, queue,
    style::{Attribute, Print, ResetColor, SetAttribute},
};
use std::io::{Write, stdout};
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

const STATUS_ROWS: u16 = 1;
/// Poll interval while a fling is animating.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const IDLE_INTERVAL: Duration = Duration::from_millis(250);
/// Fling velocity per wheel row, in pixels per second.
const WHEEL_FLING_VELOCITY: f32 = 200.0;
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "ted", version, about = "Terminal text editor with a line number gutter")]
struct Args {
    /// Optional path to open at startup (UTF-8 text). Missing files are created on save.
    pub path: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of `ted.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::new(),
            log_guard: None,
        }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join("ted.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, "ted.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

/// Buffer and settings resolved before the terminal is entered.
struct Bootstrap {
    buffer: Buffer,
    path: Option<PathBuf>,
    settings: Settings,
    message: Option<String>,
}

fn load_bootstrap(args: &Args) -> Result<Bootstrap> {
    let config = load_from(args.config.clone())?;
    let settings = config.settings();
    let mut message = None;

    let (buffer, path) = match args.path.as_ref() {
        Some(path) => {
            let name = path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("file")
                .to_string();
            match std::fs::read_to_string(path) {
                Ok(content) => {
                    let text = normalize_line_endings(&content);
                    tracing::debug!(
                        target: "io",
                        file = %path.display(),
                        size_bytes = content.len(),
                        "file_read_ok"
                    );
                    (Buffer::from_str(name, &text), Some(path.clone()))
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    info!(target: "io", file = %path.display(), "new_file");
                    message = Some(format!("New file: {name}"));
                    (Buffer::from_str(name, ""), Some(path.clone()))
                }
                Err(e) => {
                    error!(target: "io", ?e, "file_open_error");
                    message = Some("Open failed".to_string());
                    (Buffer::from_str("untitled", ""), None)
                }
            }
        }
        None => (Buffer::from_str("untitled", ""), None),
    };

    info!(
        target: "runtime.startup",
        buffer = buffer.name.as_str(),
        config_override = args.config.is_some(),
        theme = %settings.color_theme,
        "bootstrap_complete"
    );
    Ok(Bootstrap {
        buffer,
        path,
        settings,
        message,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct EditorRuntime {
    host: TerminalHost,
    view: EditorView<FrictionScroller>,
    surface: CellSurface,
    caps: TerminalCapabilities,
    cols: u16,
    rows: u16,
    message: Option<(String, Instant)>,
}

impl EditorRuntime {
    fn new(bootstrap: Bootstrap, cols: u16, rows: u16, caps: TerminalCapabilities) -> Self {
        let text_rows = rows.saturating_sub(STATUS_ROWS);
        let mut host = TerminalHost::new(bootstrap.buffer, bootstrap.path, cols, text_rows);
        let view = EditorView::new(&mut host, 1.0, bootstrap.settings);
        // a terminal always has its keyboard attached
        host.show_soft_input();
        Self {
            host,
            view,
            surface: CellSurface::new(cols, text_rows),
            caps,
            cols,
            rows,
            message: bootstrap.message.map(|m| (m, Instant::now())),
        }
    }

    fn set_message(&mut self, text: impl Into<String>) {
        self.message = Some((text.into(), Instant::now()));
        self.host.request_redraw();
    }

    fn update_settings(&mut self, f: impl FnOnce(&mut Settings)) {
        let mut settings = *self.view.settings();
        f(&mut settings);
        self.view.apply_settings(&mut self.host, settings);
    }

    fn handle_key(&mut self, key: KeyInput) -> Flow {
        if self.view.on_key(&key) {
            return Flow::Continue;
        }
        match (key.key, key.has_ctrl()) {
            (Key::Char('q'), true) => return Flow::Quit,
            (Key::Char('s'), true) => match self.host.save() {
                Ok(()) => {
                    let name = self.host.buffer().name.clone();
                    self.set_message(format!("Saved {name}"));
                }
                Err(e) => {
                    error!(target: "io", error = %e, "save_failed");
                    self.set_message(format!("Save failed: {e:#}"));
                }
            },
            (Key::F(2), _) => {
                self.update_settings(|s| s.color_theme = s.color_theme.next());
                let theme = self.view.settings().color_theme;
                self.set_message(format!("Theme: {theme}"));
            }
            (Key::F(3), _) => self.update_settings(|s| s.show_line_numbers = !s.show_line_numbers),
            (Key::F(4), _) => self.update_settings(|s| s.word_wrap = !s.word_wrap),
            (Key::F(5), _) => {
                self.update_settings(|s| s.fling_to_scroll = !s.fling_to_scroll);
                let on = self.view.settings().fling_to_scroll;
                self.set_message(if on { "Fling on" } else { "Fling off" });
            }
            _ => {
                self.host.handle_key(&key);
            }
        }
        Flow::Continue
    }

    fn handle(&mut self, input: InputEvent) -> Flow {
        match input {
            InputEvent::Key(key) => return self.handle_key(key),
            InputEvent::Gesture(gesture) => {
                if let Gesture::Down { x, y } = gesture {
                    let (col, row) = cell_at(x, y);
                    if self.host.is_enabled() && row < self.rows.saturating_sub(STATUS_ROWS) {
                        self.host.place_caret_at_screen(col, row);
                    }
                }
                self.view.on_gesture(&mut self.host, gesture);
            }
            InputEvent::Wheel { rows } => {
                if self.view.settings().fling_to_scroll {
                    let fling = Gesture::Fling {
                        velocity_x: 0.0,
                        velocity_y: -(rows as f32) * WHEEL_FLING_VELOCITY,
                    };
                    self.view.on_gesture(&mut self.host, fling);
                } else {
                    self.host.scroll_by_rows(rows);
                }
            }
            InputEvent::Resize { cols, rows } => {
                self.cols = cols;
                self.rows = rows;
                let text_rows = rows.saturating_sub(STATUS_ROWS);
                self.host.resize(cols, text_rows);
                self.surface.resize(cols, text_rows);
            }
        }
        Flow::Continue
    }

    fn status_text(&self) -> String {
        let (line, col) = self.host.caret_line_col();
        let settings = self.view.settings();
        let mut left = format!(
            " {}{}  Ln {}, Col {}  {}",
            self.host.buffer().name,
            if self.host.is_modified() { " [+]" } else { "" },
            line + 1,
            col + 1,
            settings.color_theme,
        );
        match &self.message {
            Some((text, _)) => {
                left.push_str("  | ");
                left.push_str(text);
            }
            None => left.push_str("  | F2 theme F3 numbers F4 wrap F5 fling ^S save ^Q quit"),
        }
        let mut status: String = left.chars().take(self.cols as usize).collect();
        let used = status.chars().count();
        status.extend(std::iter::repeat_n(' ', self.cols as usize - used));
        status
    }

    fn render<W: Write>(&mut self, out: &mut W) -> Result<()> {
        if self
            .message
            .as_ref()
            .is_some_and(|(_, at)| at.elapsed() > STATUS_MESSAGE_TTL)
        {
            self.message = None;
        }
        self.surface.begin_frame(
            self.host.scroll_position(),
            self.host.text_color(),
            self.host.background().fill(),
        );
        self.view.draw(&mut self.host, &mut self.surface);
        queue!(out, Hide)?;
        self.surface.flush(out, &self.caps)?;
        queue!(
            out,
            MoveTo(0, self.rows.saturating_sub(STATUS_ROWS)),
            SetAttribute(Attribute::Reverse),
            Print(self.status_text()),
            SetAttribute(Attribute::Reset),
            ResetColor
        )?;
        if let Some((col, row)) = self
            .host
            .caret_screen_position()
            .filter(|_| self.host.cursor_visible())
        {
            queue!(out, MoveTo(col, row), Show)?;
        }
        out.flush()?;
        Ok(())
    }

    fn run<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let mut expires_at: Option<Instant> = None;
        loop {
            let animating = self.view.compute_scroll(&mut self.host);
            let message_expired = expires_at.is_some_and(|t| Instant::now() >= t);
            if self.host.take_redraw() || animating || message_expired {
                self.render(out)?;
            }
            expires_at = self.message.as_ref().map(|(_, at)| *at + STATUS_MESSAGE_TTL);

            let timeout = if animating { FRAME_INTERVAL } else { IDLE_INTERVAL };
            if event::poll(timeout).context("polling terminal events")? {
                let ev = event::read().context("reading terminal event")?;
                for input in translate(&ev) {
                    if self.handle(input) == Flow::Quit {
                        info!(target: "runtime", "quit_requested");
                        if self.host.is_modified() {
                            warn!(target: "runtime", "quit_with_unsaved_changes");
                        }
                        return Ok(());
                    }
                }
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let bootstrap = load_bootstrap(&args)?;
    let caps = TerminalCapabilities::detect();
    let (cols, rows) = crossterm::terminal::size().context("querying terminal size")?;

    startup.backend.set_title("ted")?;
    let _guard = startup.backend.enter_guard()?;
    let mut runtime = EditorRuntime::new(bootstrap, cols, rows, caps);
    let result = runtime.run(&mut stdout());
    info!(target: "runtime", ok = result.is_ok(), "shutdown");
    result
}
