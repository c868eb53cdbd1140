use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, is_raw_mode_enabled, LeaveAlternateScreen},
};
use std::io;

/// Raw (unbuffered, no echo) input mode of the controlling terminal.
pub trait TerminalMode {
    fn is_raw(&self) -> io::Result<bool>;
    fn set_raw(&mut self, raw: bool) -> io::Result<()>;
}

/// The real terminal, through crossterm.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermMode;

impl TerminalMode for CrosstermMode {
    fn is_raw(&self) -> io::Result<bool> { is_raw_mode_enabled() }

    fn set_raw(&mut self, raw: bool) -> io::Result<()> {
        if raw { enable_raw_mode() } else { disable_raw_mode() }
    }
}

/// Raw mode for as long as the guard lives. Whatever mode was active before
/// `acquire` is put back on drop, including during unwinding.
pub struct RawModeGuard<M: TerminalMode> {
    mode:     M,
    saved:    bool,
    restored: bool,
}

impl<M: TerminalMode> RawModeGuard<M> {
    pub fn acquire(mut mode: M) -> io::Result<Self> {
        let saved = mode.is_raw()?;
        mode.set_raw(true)?;
        Ok(Self { mode, saved, restored: false })
    }

    /// Restore now and report failure instead of swallowing it in `drop`.
    pub fn release(mut self) -> io::Result<()> {
        self.restored = true;
        self.mode.set_raw(self.saved)
    }
}

impl<M: TerminalMode> Drop for RawModeGuard<M> {
    fn drop(&mut self) {
        if !self.restored {
            let _ = self.mode.set_raw(self.saved);
        }
    }
}

/// Put the terminal back the way a shell expects it. Safe to call repeatedly
/// and when nothing was changed.
pub fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)?;
    Ok(())
}
