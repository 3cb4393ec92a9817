//! Debugger application state and logic.
//!
//! The debugger is the clock driver: one keypress is one clock pulse, and
//! the machine is inspected between any two cycles.

use crate::cpu::{CycleResult, Machine, RAM_SIZE};

/// Debugger application state.
pub struct DebuggerApp {
    /// The machine being stepped.
    pub machine: Machine,
    /// The original image, kept for reset.
    pub image: [u8; RAM_SIZE],
    /// Is the clock free-running?
    pub running: bool,
    /// Should we quit?
    pub should_quit: bool,
    /// Status message to display.
    pub status: String,
}

impl DebuggerApp {
    /// Create a debugger around a loaded RAM image.
    pub fn new(image: [u8; RAM_SIZE]) -> Self {
        Self {
            machine: Machine::new(image),
            image,
            running: false,
            should_quit: false,
            status: "Ready. Press 's' to pulse the clock, 'r' to run, 'q' to quit.".into(),
        }
    }

    /// Apply one clock pulse.
    pub fn pulse(&mut self) {
        match self.machine.pulse() {
            CycleResult::Applied { word, .. } => {
                if self.machine.is_halted() {
                    self.running = false;
                    self.status =
                        format!("{} applied. Halted after {} cycles.", word, self.machine.cycles);
                } else {
                    self.status = format!("cycle {}: {}", self.machine.cycles, word);
                }
            }
            CycleResult::Halted => {
                self.running = false;
                self.status = format!("Already halted ({} cycles).", self.machine.cycles);
            }
        }
    }

    /// Let the clock free-run at the UI poll rate.
    pub fn run(&mut self) {
        self.running = true;
        self.status = "Running...".into();
    }

    /// One iteration of continuous execution.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        if self.machine.is_halted() {
            self.running = false;
            return;
        }
        self.pulse();
    }

    /// Rebuild the machine from the original image.
    pub fn reset(&mut self) {
        self.machine = Machine::new(self.image);
        self.running = false;
        self.status = "Reset. Ready.".into();
    }
}

/// Run the debugger over a RAM image.
pub fn run_debugger(image: [u8; RAM_SIZE]) -> std::io::Result<()> {
    use crossterm::{
        event::{self, Event, KeyCode, KeyEventKind},
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        ExecutableCommand,
    };
    use ratatui::prelude::*;
    use std::io::stdout;
    use std::time::Duration;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = DebuggerApp::new(image);

    loop {
        terminal.draw(|frame| {
            super::ui::draw(frame, &app);
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => app.should_quit = true,
                        KeyCode::Char('s') | KeyCode::Char(' ') => {
                            app.running = false;
                            app.pulse();
                        }
                        KeyCode::Char('r') => app.run(),
                        KeyCode::Char('p') => {
                            app.running = false;
                            app.status = "Paused.".into();
                        }
                        KeyCode::Char('x') => app.reset(),
                        _ => {}
                    }
                }
            }
        }

        if app.running {
            app.tick();
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
}
