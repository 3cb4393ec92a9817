//! The execution core of the breadboard machine.
//!
//! - 16 cells of RAM addressed through a 4-bit nibble
//! - a register file sharing a single 8-bit bus
//! - a control-line vocabulary with an ordered handler table
//! - a microcode table expanding each opcode into clock cycles
//! - a fetch-decode-execute sequencer stepped one clock pulse at a time

pub mod control;
pub mod machine;
pub mod memory;
pub mod microcode;
pub mod registers;

pub use control::ControlWord;
pub use machine::{CycleResult, Machine, State};
pub use memory::{Memory, RAM_SIZE};
pub use registers::Registers;
