//! The machine's register file.
//!
//! Every register is one physical byte. The program counter and the memory
//! address register only drive their low nibble, matching the 4-bit address
//! space. The bus is not a register proper: it is the transient value the
//! other registers exchange during a cycle, meaningful only after an output
//! line has driven it.

use serde::{Deserialize, Serialize};

/// The register file.
///
/// Plain data and `Copy`, so it doubles as the per-cycle snapshot handed
/// back to the clock driver. Zeroed at machine start; mutated only by the
/// control-line handlers while a cycle is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Registers {
    /// Program counter. Counts in the low nibble and wraps at 16.
    pub pc: u8,

    /// Memory address register. Selects the RAM cell the bus reads or
    /// writes; latches only the low nibble of the bus.
    pub addr: u8,

    /// Instruction register: opcode nibble in the high bits, operand
    /// nibble in the low bits.
    pub ir: u8,

    /// A register (accumulator).
    pub a: u8,

    /// B register (second ALU operand).
    pub b: u8,

    /// The shared bus.
    pub bus: u8,

    /// Output register.
    pub out: u8,
}

impl Registers {
    /// A zeroed register file.
    pub fn new() -> Self {
        Self::default()
    }

    /// The opcode nibble of the fetched instruction.
    pub fn opcode(&self) -> u8 {
        self.ir >> 4
    }

    /// The operand nibble of the fetched instruction.
    pub fn operand(&self) -> u8 {
        self.ir & 0x0F
    }
}
