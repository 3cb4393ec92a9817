//! Readable rendering of RAM cells.
//!
//! Used by the trace output, the `disasm` subcommand, and the debugger to
//! label cells the way an image file would spell them.

use crate::cpu::microcode::opcode;

/// The mnemonic for an opcode nibble, if the control unit knows it.
pub fn mnemonic(op: u8) -> Option<&'static str> {
    match op & 0x0F {
        opcode::NOP => Some("NOP"),
        opcode::LDA => Some("LDA"),
        opcode::ADD => Some("ADD"),
        opcode::JMP => Some("JMP"),
        opcode::OUT => Some("OUT"),
        opcode::HLT => Some("HALT"),
        _ => None,
    }
}

/// Render one RAM cell as it would appear in an image file.
///
/// Cells whose opcode nibble has no mnemonic render as bare literals. A
/// data cell that happens to share bits with an instruction renders as
/// that instruction; on a von Neumann machine the two are the same byte.
pub fn disassemble_cell(cell: u8) -> String {
    let op = cell >> 4;
    let operand = cell & 0x0F;

    match op {
        opcode::NOP => "NOP".to_string(),
        opcode::LDA => format!("LDA {operand}"),
        opcode::ADD => format!("ADD {operand}"),
        opcode::JMP => format!("JMP {operand}"),
        opcode::OUT => "OUT".to_string(),
        opcode::HLT => "HALT".to_string(),
        _ => format!("{cell}"),
    }
}
