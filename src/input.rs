use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::time::Duration;

/// Where terminal events come from. Blocks for at most `timeout`; `None` means
/// nothing arrived in time.
pub trait EventSource {
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<Event>>;
}

/// Reads the real terminal through crossterm.
#[derive(Debug, Default)]
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

// ── Volume picker ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    Up,
    Down,
    Enter,
    Cancel,
    Unknown,
}

pub fn menu_event(key: KeyEvent) -> MenuEvent {
    if key.kind != KeyEventKind::Press { return MenuEvent::Unknown; }
    if is_interrupt(&key) { return MenuEvent::Cancel; }
    match key.code {
        KeyCode::Up   | KeyCode::Char('k') => MenuEvent::Up,
        KeyCode::Down | KeyCode::Char('j') => MenuEvent::Down,
        KeyCode::Enter                     => MenuEvent::Enter,
        KeyCode::Esc  | KeyCode::Char('q') => MenuEvent::Cancel,
        _                                  => MenuEvent::Unknown,
    }
}

// ── Dashboard ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    CycleTheme,
    None,
}

pub fn handle_key(key: KeyEvent) -> Action {
    if key.kind != KeyEventKind::Press { return Action::None; }
    if is_interrupt(&key) { return Action::Quit; }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('t')                => Action::CycleTheme,
        _                                 => Action::None,
    }
}
