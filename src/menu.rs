use crate::error::CacheError;
use crate::input::{menu_event, EventSource, MenuEvent};
use crate::models::volume::VolumeDescriptor;
use crate::terminal::{RawModeGuard, TerminalMode};
use crate::ui::picker;
use crate::ui::theme::Theme;
use crossterm::event::Event;
use log::info;
use ratatui::{backend::Backend, Terminal};
use std::time::Duration;

const POLL_TIMEOUT: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// List shown, first entry highlighted, no key seen yet.
    Idle,
    Navigating,
    Selected,
    Cancelled,
}

/// What the picker hands back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Selected(VolumeDescriptor),
    Cancelled,
}

/// Picker state, independent of any terminal.
#[derive(Debug, Clone)]
pub struct MenuState {
    candidates:  Vec<VolumeDescriptor>,
    highlighted: usize,
    phase:       Phase,
}

impl MenuState {
    /// An empty list can only be cancelled.
    pub fn new(candidates: Vec<VolumeDescriptor>) -> Self {
        let phase = if candidates.is_empty() { Phase::Cancelled } else { Phase::Idle };
        Self { candidates, highlighted: 0, phase }
    }

    pub fn candidates(&self) -> &[VolumeDescriptor] { &self.candidates }
    pub fn highlighted(&self) -> usize { self.highlighted }
    pub fn phase(&self) -> Phase { self.phase }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Selected | Phase::Cancelled)
    }

    /// Advance on one input event. Up/Down wrap around; events after a
    /// terminal phase are ignored.
    pub fn apply(&mut self, ev: MenuEvent) -> Phase {
        if self.is_finished() { return self.phase; }
        let n = self.candidates.len();
        self.phase = match ev {
            MenuEvent::Up => {
                self.highlighted = (self.highlighted + n - 1) % n;
                Phase::Navigating
            }
            MenuEvent::Down => {
                self.highlighted = (self.highlighted + 1) % n;
                Phase::Navigating
            }
            MenuEvent::Enter   => Phase::Selected,
            MenuEvent::Cancel  => Phase::Cancelled,
            MenuEvent::Unknown => Phase::Navigating,
        };
        self.phase
    }

    /// `None` while the menu is still open.
    pub fn selection(&self) -> Option<Selection> {
        match self.phase {
            Phase::Selected  => Some(Selection::Selected(self.candidates[self.highlighted].clone())),
            Phase::Cancelled => Some(Selection::Cancelled),
            Phase::Idle | Phase::Navigating => None,
        }
    }
}

/// Run the interactive picker until the operator selects or cancels.
///
/// Raw mode is held only for the duration of the call and restored to its
/// previous value on every return path.
pub fn run_menu<M, E, B>(
    candidates: Vec<VolumeDescriptor>,
    mode: M,
    events: &mut E,
    terminal: &mut Terminal<B>,
    theme: &Theme,
) -> Result<Selection, CacheError>
where
    M: TerminalMode,
    E: EventSource,
    B: Backend,
{
    let mut state = MenuState::new(candidates);
    let guard = RawModeGuard::acquire(mode)?;

    let selection = loop {
        terminal.draw(|f| picker::render(f, &state, theme))?;
        if let Some(sel) = state.selection() {
            break sel;
        }
        if let Some(Event::Key(key)) = events.next_event(POLL_TIMEOUT)? {
            state.apply(menu_event(key));
        }
    };

    guard.release()?;
    match &selection {
        Selection::Selected(v) => info!("selected {}", v),
        Selection::Cancelled   => info!("volume selection cancelled"),
    }
    Ok(selection)
}
