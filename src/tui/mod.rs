//! TUI debugger for the breadboard machine.
//!
//! Provides a single-stepped front panel:
//! - LED register rows, updated after every clock pulse
//! - the control lines lit by the last applied word
//! - a full RAM listing with disassembly
//! - pulse/run/reset controls

mod app;
mod ui;

pub use app::{run_debugger, DebuggerApp};
