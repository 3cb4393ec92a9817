//! # SAP-1 Emulator
//!
//! A software rendition of the classic 8-bit breadboard computer: 16 bytes
//! of RAM, a handful of registers around a shared one-byte bus, and a
//! hard-wired control unit emulated faithfully at the control-line level.
//!
//! Every clock pulse applies exactly one control word, produced by the
//! fetch-decode-execute sequencer and expanded from a static microcode
//! table. The clock is driven from outside, one [`Machine::pulse`] at a
//! time, so register state can be observed between any two cycles.

pub mod asm;
pub mod cpu;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export commonly used types
pub use asm::{disassemble_cell, load_image, mnemonic, pack, parse_image, ImageError};
pub use cpu::{ControlWord, CycleResult, Machine, Memory, Registers, State, RAM_SIZE};

#[cfg(feature = "tui")]
pub use tui::run_debugger;
