//! Control lines and the line handler table.
//!
//! Each clock cycle the control unit asserts some set of control lines,
//! packed into a [`ControlWord`] bitfield. An ordered table maps every line
//! to the register transfer it causes. The order is load-bearing: bus
//! outputs come first so the bus carries a value before any input latches
//! from it, and the misc lines (halt, count, jump) run last.

use crate::cpu::machine::Machine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;

/// The set of control lines asserted for one clock cycle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ControlWord(u16);

impl ControlWord {
    /// Halt.
    pub const HLT: ControlWord = ControlWord(1 << 0);
    /// Memory address register in.
    pub const MI: ControlWord = ControlWord(1 << 1);
    /// RAM in.
    pub const RI: ControlWord = ControlWord(1 << 2);
    /// RAM out.
    pub const RO: ControlWord = ControlWord(1 << 3);
    /// Instruction register out.
    pub const IO: ControlWord = ControlWord(1 << 4);
    /// Instruction register in.
    pub const II: ControlWord = ControlWord(1 << 5);
    /// A register in.
    pub const AI: ControlWord = ControlWord(1 << 6);
    /// A register out.
    pub const AO: ControlWord = ControlWord(1 << 7);
    /// Sum out (difference when SU is also asserted).
    pub const ZO: ControlWord = ControlWord(1 << 8);
    /// Subtract. Modifies ZO; has no effect of its own.
    pub const SU: ControlWord = ControlWord(1 << 9);
    /// B register in.
    pub const BI: ControlWord = ControlWord(1 << 10);
    /// Output register in.
    pub const OI: ControlWord = ControlWord(1 << 11);
    /// Counter enable.
    pub const CE: ControlWord = ControlWord(1 << 12);
    /// Counter out.
    pub const CO: ControlWord = ControlWord(1 << 13);
    /// Jump (counter in from the bus).
    pub const J: ControlWord = ControlWord(1 << 14);

    /// The word with no lines asserted.
    pub const fn empty() -> Self {
        ControlWord(0)
    }

    /// Combine two words. Const equivalent of `|`.
    pub const fn union(self, other: Self) -> Self {
        ControlWord(self.0 | other.0)
    }

    /// Whether every line of `lines` is asserted in this word.
    pub const fn contains(self, lines: Self) -> bool {
        self.0 & lines.0 == lines.0
    }

    /// Whether no line is asserted.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The raw bitfield.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Names of the asserted lines, in handler table order.
    pub fn names(self) -> Vec<&'static str> {
        LINE_NAMES
            .iter()
            .filter(|(line, _)| self.contains(*line))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl BitOr for ControlWord {
    type Output = ControlWord;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl fmt::Display for ControlWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        write!(f, "{}", self.names().join("|"))
    }
}

impl fmt::Debug for ControlWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ControlWord({})", self)
    }
}

/// Every control line with its display name, in handler table order.
pub const LINE_NAMES: [(ControlWord, &str); 15] = [
    (ControlWord::RO, "RO"),
    (ControlWord::IO, "IO"),
    (ControlWord::AO, "AO"),
    (ControlWord::CO, "CO"),
    (ControlWord::ZO, "ZO"),
    (ControlWord::SU, "SU"),
    (ControlWord::BI, "BI"),
    (ControlWord::OI, "OI"),
    (ControlWord::MI, "MI"),
    (ControlWord::RI, "RI"),
    (ControlWord::II, "II"),
    (ControlWord::AI, "AI"),
    (ControlWord::HLT, "HLT"),
    (ControlWord::CE, "CE"),
    (ControlWord::J, "J"),
];

/// One entry of the handler table: a control line and the state transition
/// it causes when asserted.
pub(crate) struct LineHandler {
    pub line: ControlWord,
    pub apply: fn(&mut Machine),
}

/// What happens in a cycle, line by line. The table is walked in full for
/// every applied word; a handler fires iff its line is asserted.
///
/// Bus outputs must come first so that they write the bus before the
/// inputs read from it. Future lines must respect this partition.
pub(crate) static LINE_HANDLERS: [LineHandler; 14] = [
    // Bus outputs
    LineHandler {
        line: ControlWord::RO,
        apply: |m| m.regs.bus = m.mem.read(m.regs.addr),
    },
    LineHandler {
        line: ControlWord::IO,
        // Only the operand nibble ever reaches the bus.
        apply: |m| m.regs.bus = m.regs.ir & 0x0F,
    },
    LineHandler {
        line: ControlWord::AO,
        apply: |m| m.regs.bus = m.regs.a,
    },
    LineHandler {
        line: ControlWord::CO,
        apply: |m| m.regs.bus = m.regs.pc,
    },
    LineHandler {
        line: ControlWord::ZO,
        apply: |m| {
            m.regs.bus = if m.lines.contains(ControlWord::SU) {
                m.regs.a.wrapping_sub(m.regs.b)
            } else {
                m.regs.a.wrapping_add(m.regs.b)
            };
        },
    },
    // Bus inputs
    LineHandler {
        line: ControlWord::BI,
        apply: |m| m.regs.b = m.regs.bus,
    },
    LineHandler {
        line: ControlWord::OI,
        apply: |m| m.regs.out = m.regs.bus,
    },
    LineHandler {
        line: ControlWord::MI,
        apply: |m| m.regs.addr = m.regs.bus & 0x0F,
    },
    LineHandler {
        line: ControlWord::RI,
        apply: |m| m.mem.write(m.regs.addr, m.regs.bus),
    },
    LineHandler {
        line: ControlWord::II,
        apply: |m| m.regs.ir = m.regs.bus,
    },
    LineHandler {
        line: ControlWord::AI,
        apply: |m| m.regs.a = m.regs.bus,
    },
    // Misc control
    LineHandler {
        line: ControlWord::HLT,
        apply: |m| m.halt(),
    },
    LineHandler {
        line: ControlWord::CE,
        apply: |m| m.regs.pc = m.regs.pc.wrapping_add(1) & 0x0F,
    },
    LineHandler {
        line: ControlWord::J,
        apply: |m| m.regs.pc = m.regs.bus & 0x0F,
    },
];
