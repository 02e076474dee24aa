use std::io::{self, Stdout};
use std::panic;

use crossterm::{
    ExecutableCommand, cursor,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

pub type QuizTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Owns the terminal while the quiz runs and puts it back on drop.
pub struct TerminalGuard {
    terminal: QuizTerminal,
    restored: bool,
}

impl TerminalGuard {
    pub fn terminal(&mut self) -> &mut QuizTerminal {
        &mut self.terminal
    }

    /// Restore explicitly so errors can be reported.
    pub fn restore(mut self) -> io::Result<()> {
        self.restored = true;
        restore_terminal()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if !self.restored {
            let _ = restore_terminal();
        }
    }
}

pub fn init() -> io::Result<TerminalGuard> {
    setup_panic_hook();
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    Ok(TerminalGuard {
        terminal,
        restored: false,
    })
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout()
        .execute(LeaveAlternateScreen)?
        .execute(cursor::Show)?;
    Ok(())
}

fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}
