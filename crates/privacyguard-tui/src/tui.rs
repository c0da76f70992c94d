//! Terminal session guard.
//!
//! Holding a [`Tui`] means the terminal is in raw mode on the alternate
//! screen; dropping it, or panicking anywhere, puts it back.

use std::fmt::Write as _;
use std::io::{Stdout, stdout};
use std::path::Path;

use color_eyre::eyre::Result;
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};

pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    /// Take over the terminal and name the window after the appliance.
    pub fn enter(title: &str) -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, cursor::Hide, SetTitle(title))?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        terminal.clear()?;
        Ok(Self { terminal })
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        restore();
    }
}

/// Best effort; errors are ignored.
fn restore() {
    let _ = execute!(stdout(), cursor::Show, LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// Window title: the service name plus the host being watched.
pub fn window_title(host: Option<&str>) -> String {
    let mut title = String::from("PrivacyGuard");
    if let Some(host) = host {
        let _ = write!(title, " ({host})");
    }
    title
}

/// Install error and panic hooks that restore the terminal before
/// printing, and point at the log file for details.
///
/// Call before [`Tui::enter`] so a panic during setup is reported cleanly.
pub fn install_hooks(log_file: &Path) -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .panic_section(format!("Log file: {}", log_file.display()))
        .into_hooks();

    eyre_hook.install()?;

    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        panic_hook(info);
    }));

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn title_names_the_host() {
        assert_eq!(window_title(Some("10.0.0.1")), "PrivacyGuard (10.0.0.1)");
        assert_eq!(window_title(None), "PrivacyGuard");
    }
}
