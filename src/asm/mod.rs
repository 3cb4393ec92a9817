//! Loading and rendering of RAM images.
//!
//! This module provides:
//! - the text RAM-image loader (mnemonics or literal bytes, one cell per
//!   line)
//! - cell disassembly back into that format

pub mod disasm;
pub mod image;

pub use disasm::{disassemble_cell, mnemonic};
pub use image::{load_image, pack, parse_image, ImageError};
