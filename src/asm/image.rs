//! RAM image files.
//!
//! A RAM image is a small text file naming the initial contents of the 16
//! cells, one cell per line:
//!
//! ```text
//! 0: LDA 14
//! 1: ADD 15
//! 2: OUT
//! 3: HALT
//! 14: 28
//! 15: 14
//! ```
//!
//! Each line carries a decimal cell address and either a mnemonic with an
//! optional decimal operand, or a bare literal byte. Unnamed cells stay
//! zero. Blank lines are skipped.

use crate::cpu::memory::RAM_SIZE;
use crate::cpu::microcode::opcode;
use std::path::Path;
use thiserror::Error;

/// Pack an opcode nibble and an operand nibble into one RAM cell.
pub fn pack(op: u8, operand: u8) -> u8 {
    (op << 4) | (operand & 0x0F)
}

/// Load a RAM image file into a 16-cell memory image.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<[u8; RAM_SIZE], ImageError> {
    let source = std::fs::read_to_string(path.as_ref())
        .map_err(|e| ImageError::Io(e.to_string()))?;
    parse_image(&source)
}

/// Parse RAM image source into a 16-cell memory image.
///
/// Later lines overwrite earlier ones naming the same cell.
pub fn parse_image(source: &str) -> Result<[u8; RAM_SIZE], ImageError> {
    let mut image = [0u8; RAM_SIZE];

    for (idx, line) in source.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (addr, value) = parse_line(line, idx + 1)?;
        image[addr as usize] = value;
    }

    Ok(image)
}

/// Parse one `<address>: <op>` line.
fn parse_line(line: &str, line_num: usize) -> Result<(u8, u8), ImageError> {
    let (addr_part, op_part) = line.split_once(':').ok_or_else(|| ImageError::Malformed {
        line: line_num,
        text: line.to_string(),
    })?;

    let addr = parse_nibble(addr_part.trim()).ok_or_else(|| ImageError::BadAddress {
        line: line_num,
        text: addr_part.trim().to_string(),
    })?;

    let value = parse_op(op_part.trim(), line_num)?;
    Ok((addr, value))
}

/// Parse the cell contents: a mnemonic, possibly with an operand, or a
/// bare literal byte.
fn parse_op(op: &str, line_num: usize) -> Result<u8, ImageError> {
    let parts: Vec<&str> = op.split_whitespace().collect();
    if parts.is_empty() {
        return Err(ImageError::Malformed {
            line: line_num,
            text: op.to_string(),
        });
    }

    match parts[0] {
        "NOP" => Ok(pack(opcode::NOP, 0)),
        "LDA" => parse_op_with_operand(opcode::LDA, &parts, line_num),
        "ADD" => parse_op_with_operand(opcode::ADD, &parts, line_num),
        "JMP" => parse_op_with_operand(opcode::JMP, &parts, line_num),
        "OUT" => Ok(pack(opcode::OUT, 0)),
        "HALT" => Ok(pack(opcode::HLT, 0)),
        literal => literal.parse::<u8>().map_err(|_| ImageError::UnknownOp {
            line: line_num,
            text: op.to_string(),
        }),
    }
}

/// Parse `<MNEMONIC> <operand>` for the instructions that address a cell.
fn parse_op_with_operand(op: u8, parts: &[&str], line_num: usize) -> Result<u8, ImageError> {
    let mnemonic = parts[0];
    if parts.len() != 2 {
        return Err(ImageError::MissingOperand {
            line: line_num,
            mnemonic: mnemonic.to_string(),
        });
    }

    let operand = parse_nibble(parts[1]).ok_or_else(|| ImageError::BadOperand {
        line: line_num,
        text: parts[1].to_string(),
    })?;

    Ok(pack(op, operand))
}

/// A decimal value that fits the 4-bit address space.
fn parse_nibble(text: &str) -> Option<u8> {
    text.parse::<u8>().ok().filter(|n| *n < RAM_SIZE as u8)
}

/// Errors that can occur while reading a RAM image.
#[derive(Debug, Clone, Error)]
pub enum ImageError {
    #[error("line {line}: expected `<address>: <instruction>` [{text}]")]
    Malformed { line: usize, text: String },

    #[error("line {line}: cell address must be 0-15 [{text}]")]
    BadAddress { line: usize, text: String },

    #[error("line {line}: not a mnemonic or literal byte [{text}]")]
    UnknownOp { line: usize, text: String },

    #[error("line {line}: {mnemonic} takes exactly one cell address")]
    MissingOperand { line: usize, mnemonic: String },

    #[error("line {line}: operand must be 0-15 [{text}]")]
    BadOperand { line: usize, text: String },

    #[error("failed to read image: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_program() {
        let source = "
            0: LDA 14
            1: ADD 15
            2: OUT
            3: HALT
            14: 28
            15: 14
        ";

        let image = parse_image(source).unwrap();

        assert_eq!(image[0], 0x1E);
        assert_eq!(image[1], 0x2F);
        assert_eq!(image[2], 0xE0);
        assert_eq!(image[3], 0xF0);
        assert_eq!(image[14], 28);
        assert_eq!(image[15], 14);
        assert_eq!(image[4], 0);
    }

    #[test]
    fn test_unnamed_cells_stay_zero() {
        let image = parse_image("5: HALT").unwrap();
        assert_eq!(image[5], 0xF0);
        assert!(image.iter().enumerate().all(|(i, v)| i == 5 || *v == 0));
    }

    #[test]
    fn test_literal_cells() {
        let image = parse_image("7: 255\n8: 0").unwrap();
        assert_eq!(image[7], 255);
        assert_eq!(image[8], 0);
    }

    #[test]
    fn test_later_lines_overwrite() {
        let image = parse_image("0: NOP\n0: HALT").unwrap();
        assert_eq!(image[0], 0xF0);
    }

    #[test]
    fn test_missing_colon() {
        let err = parse_image("LDA 14").unwrap_err();
        assert!(matches!(err, ImageError::Malformed { line: 1, .. }));
    }

    #[test]
    fn test_address_out_of_range() {
        let err = parse_image("16: NOP").unwrap_err();
        assert!(matches!(err, ImageError::BadAddress { line: 1, .. }));
    }

    #[test]
    fn test_unknown_mnemonic() {
        let err = parse_image("\n0: SUB 3").unwrap_err();
        assert!(matches!(err, ImageError::UnknownOp { line: 2, .. }));
    }

    #[test]
    fn test_lda_requires_operand() {
        let err = parse_image("0: LDA").unwrap_err();
        assert!(matches!(err, ImageError::MissingOperand { line: 1, .. }));
    }

    #[test]
    fn test_operand_out_of_range() {
        let err = parse_image("0: JMP 16").unwrap_err();
        assert!(matches!(err, ImageError::BadOperand { line: 1, .. }));
    }

    #[test]
    fn test_pack_masks_operand() {
        assert_eq!(pack(0x1, 14), 0x1E);
        assert_eq!(pack(0xF, 0), 0xF0);
    }
}
