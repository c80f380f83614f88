//! Crossterm event loop wiring the tab host to the HTTP backend.
//!
//! The loop thread owns the [`TabHost`] and with it every panel slot.
//! Requests run on a tokio runtime and report back over an unbounded channel
//! that is drained between input polls.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, Event as TerminalEvent, KeyCode as TerminalKeyCode, KeyEventKind, KeyModifiers,
};
use crossterm::style::{
    Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{info, warn};

use caseops_client::backend::OperationsBackend;
use caseops_client::controller::{Completion, DownloadCompletion};
use caseops_client::http::HttpBackend;
use caseops_core::config::Config;
use caseops_tui_adapter::input::{InputEvent, Key, KeyEvent, Modifiers, ResizeEvent};
use caseops_tui_adapter::render::{CellStyle, RenderFrame, TermColor};
use caseops_tui_adapter::style::{ThemeKind, ThemeSpec};

use crate::app::{Command, Controller, TabHost};

const POLL_INTERVAL: Duration = Duration::from_millis(120);

/// Messages sent from request tasks back to the loop.
#[derive(Debug)]
pub enum RuntimeEvent {
    Completion(Completion),
    Download(DownloadCompletion),
    Health(Result<String, String>),
}

/// Theme named in config, falling back to the default.
#[must_use]
pub fn theme_from_config(config: &Config) -> ThemeSpec {
    match ThemeKind::parse(&config.tui.theme) {
        Some(kind) => ThemeSpec::for_kind(kind),
        None => {
            warn!(theme = %config.tui.theme, "unknown theme, using default");
            ThemeSpec::default()
        }
    }
}

/// Build the controller for the configured backend.
pub fn build_controller(config: &Config) -> Result<Controller, String> {
    let backend = HttpBackend::from_config(&config.api)
        .map_err(|err| format!("build http client: {err}"))?;
    info!(base_url = backend.base_url(), "backend configured");
    let backend: Arc<dyn OperationsBackend> = Arc::new(backend);
    Ok(Controller::new(backend, config.downloads.dir.clone()))
}

pub fn run(config: &Config) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("start async runtime: {err}"))?;
    let controller = build_controller(config)?;
    let mut host = TabHost::new(controller.clone(), theme_from_config(config));
    let (tx, mut rx) = mpsc::unbounded_channel();

    spawn_health_probe(&runtime, &controller, &tx);

    let mut terminal_session =
        TerminalSession::enter().map_err(|err| format!("enter tui terminal mode: {err}"))?;
    let (width, height) = terminal_size().map_err(|err| format!("read terminal size: {err}"))?;
    let _ = host.update(InputEvent::Resize(ResizeEvent { width, height }));

    let mut dirty = true;
    loop {
        while let Ok(event) = rx.try_recv() {
            match event {
                RuntimeEvent::Completion(completion) => host.apply_completion(completion),
                RuntimeEvent::Download(completion) => host.apply_download_completion(completion),
                RuntimeEvent::Health(health) => host.set_health(health),
            }
            dirty = true;
        }

        if dirty {
            let frame = host.render();
            render_frame(&mut terminal_session.stdout, &frame)
                .map_err(|err| format!("render frame: {err}"))?;
            dirty = false;
        }

        if host.quitting() {
            break;
        }

        let ready = event::poll(POLL_INTERVAL).map_err(|err| format!("poll terminal: {err}"))?;
        if !ready {
            if host.any_loading() {
                let _ = host.update(InputEvent::Tick);
                dirty = true;
            }
            continue;
        }

        let terminal_event = event::read().map_err(|err| format!("read terminal: {err}"))?;
        if is_interrupt(&terminal_event) {
            break;
        }
        if let Some(input) = map_terminal_event(terminal_event) {
            let command = host.update(input);
            dispatch_command(command, &runtime, &controller, &tx);
            dirty = true;
        }
    }

    info!("dashboard closed");
    Ok(())
}

fn dispatch_command(
    command: Command,
    runtime: &Runtime,
    controller: &Controller,
    tx: &UnboundedSender<RuntimeEvent>,
) {
    match command {
        Command::None | Command::Quit => {}
        Command::Dispatch(request) => {
            let controller = controller.clone();
            let tx = tx.clone();
            runtime.spawn(async move {
                let completion = controller.execute(&request).await;
                let _ = tx.send(RuntimeEvent::Completion(completion));
            });
        }
        Command::Download(pending) => {
            let controller = controller.clone();
            let tx = tx.clone();
            runtime.spawn(async move {
                let completion = controller.execute_download(&pending).await;
                let _ = tx.send(RuntimeEvent::Download(completion));
            });
        }
    }
}

fn spawn_health_probe(runtime: &Runtime, controller: &Controller, tx: &UnboundedSender<RuntimeEvent>) {
    let controller = controller.clone();
    let tx = tx.clone();
    runtime.spawn(async move {
        let health = controller.health().await;
        if let Err(err) = &health {
            warn!(error = %err, "backend health probe failed");
        }
        let _ = tx.send(RuntimeEvent::Health(health));
    });
}

fn terminal_size() -> io::Result<(usize, usize)> {
    let (width, height) = terminal::size()?;
    Ok((usize::from(width), usize::from(height)))
}

fn map_terminal_event(event: TerminalEvent) -> Option<InputEvent> {
    match event {
        TerminalEvent::Resize(width, height) => Some(InputEvent::Resize(ResizeEvent {
            width: usize::from(width),
            height: usize::from(height),
        })),
        TerminalEvent::Key(key_event) => {
            if !matches!(key_event.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                return None;
            }

            let key = match key_event.code {
                TerminalKeyCode::Char(ch) => Key::Char(ch),
                TerminalKeyCode::Enter => Key::Enter,
                TerminalKeyCode::Esc => Key::Escape,
                TerminalKeyCode::Tab => Key::Tab,
                TerminalKeyCode::BackTab => Key::BackTab,
                TerminalKeyCode::Backspace => Key::Backspace,
                TerminalKeyCode::Up => Key::Up,
                TerminalKeyCode::Down => Key::Down,
                TerminalKeyCode::Left => Key::Left,
                TerminalKeyCode::Right => Key::Right,
                _ => return None,
            };

            let modifiers = Modifiers {
                shift: key_event.modifiers.contains(KeyModifiers::SHIFT),
                ctrl: key_event.modifiers.contains(KeyModifiers::CONTROL),
                alt: key_event.modifiers.contains(KeyModifiers::ALT),
            };
            Some(InputEvent::Key(KeyEvent { key, modifiers }))
        }
        _ => None,
    }
}

fn is_interrupt(event: &TerminalEvent) -> bool {
    let TerminalEvent::Key(key_event) = event else {
        return false;
    };

    if !matches!(key_event.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return false;
    }

    matches!(key_event.code, TerminalKeyCode::Char('c'))
        && key_event.modifiers.contains(KeyModifiers::CONTROL)
}

fn render_frame<W: Write>(out: &mut W, frame: &RenderFrame) -> io::Result<()> {
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    let size = frame.size();

    for y in 0..size.height {
        queue!(out, MoveTo(0, to_u16(y)))?;
        let mut style = None;
        for x in 0..size.width {
            if let Some(cell) = frame.cell(x, y) {
                if style != Some(cell.style) {
                    queue_style(out, cell.style)?;
                    style = Some(cell.style);
                }
                queue!(out, Print(cell.glyph))?;
            }
        }
    }

    queue!(
        out,
        SetAttribute(Attribute::Reset),
        MoveTo(0, to_u16(size.height))
    )?;
    out.flush()
}

fn term_color_to_crossterm(color: TermColor) -> Color {
    match color {
        TermColor::Ansi256(idx) => Color::AnsiValue(idx),
    }
}

fn queue_style<W: Write>(out: &mut W, style: CellStyle) -> io::Result<()> {
    queue!(
        out,
        SetAttribute(Attribute::Reset),
        SetForegroundColor(term_color_to_crossterm(style.fg)),
        SetBackgroundColor(term_color_to_crossterm(style.bg)),
    )?;
    if style.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        queue!(out, SetAttribute(Attribute::Dim))?;
    }
    if style.underline {
        queue!(out, SetAttribute(Attribute::Underlined))?;
    }
    Ok(())
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

struct TerminalSession {
    stdout: io::Stdout,
}

impl TerminalSession {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            Hide,
            Clear(ClearType::All),
            MoveTo(0, 0)
        )?;
        Ok(Self { stdout })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(
            self.stdout,
            SetAttribute(Attribute::Reset),
            LeaveAlternateScreen,
            Show,
            MoveTo(0, 0)
        );
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::{is_interrupt, map_terminal_event};
    use caseops_tui_adapter::input::{InputEvent, Key, KeyEvent, Modifiers};
    use crossterm::event::{
        Event as TerminalEvent, KeyCode, KeyEvent as TerminalKey, KeyEventKind, KeyModifiers,
    };

    #[test]
    fn back_tab_maps_to_its_own_key() {
        let event = TerminalEvent::Key(TerminalKey::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        assert_eq!(
            map_terminal_event(event),
            Some(InputEvent::Key(KeyEvent {
                key: Key::BackTab,
                modifiers: Modifiers {
                    shift: true,
                    ..Modifiers::none()
                },
            }))
        );
    }

    #[test]
    fn releases_are_ignored() {
        let mut key = TerminalKey::new(KeyCode::Char('q'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(map_terminal_event(TerminalEvent::Key(key)), None);
    }

    #[test]
    fn ctrl_c_is_interrupt() {
        let event = TerminalEvent::Key(TerminalKey::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(is_interrupt(&event));
        let plain = TerminalEvent::Key(TerminalKey::new(KeyCode::Char('c'), KeyModifiers::NONE));
        assert!(!is_interrupt(&plain));
    }
}
