//! The machine proper: the fetch-decode-execute control unit driven by a
//! single-stepped clock.
//!
//! The machine never free-runs. Each call to [`Machine::pulse`] plays the
//! role of one clock pulse: the control unit produces exactly one control
//! word, the handler table applies it, and the caller gets the applied word
//! plus a register snapshot back. The return of `pulse` is the
//! cycle-complete half of the handshake, so the caller can inspect state
//! between any two cycles. Once a word carrying `HLT` has been applied the
//! machine is permanently halted; further pulses report
//! [`CycleResult::Halted`] without touching any state.

use crate::cpu::control::{ControlWord, LINE_HANDLERS};
use crate::cpu::memory::{Memory, RAM_SIZE};
use crate::cpu::microcode::{microcode, FETCH};
use crate::cpu::registers::Registers;
use serde::{Deserialize, Serialize};

/// Execution state of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    /// The clock is live; pulses advance the machine.
    Running,
    /// A word carrying HLT was applied. Terminal: only a new machine
    /// runs again.
    Halted,
}

/// Where the control unit is within the current instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum Phase {
    /// The next fetch cycle to emit.
    Fetch(usize),
    /// The opcode being executed and its next microcode step.
    Execute { op: u8, step: usize },
}

/// The outcome of one clock pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleResult {
    /// One control word was applied. The snapshot shows the registers
    /// after the cycle.
    Applied { word: ControlWord, regs: Registers },
    /// The machine had already halted; nothing changed.
    Halted,
}

/// An assembled machine: register file, RAM, and control unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    /// The register file.
    pub regs: Registers,
    /// The RAM.
    pub mem: Memory,
    state: State,
    phase: Phase,
    /// The word currently being applied. The ZO handler reads SU from
    /// here to pick add or subtract.
    pub(crate) lines: ControlWord,
    /// Clock pulses applied so far.
    pub cycles: u64,
}

impl Machine {
    /// Build a machine around a preloaded 16-cell RAM image. Never fails;
    /// every image is a valid machine.
    pub fn new(image: [u8; RAM_SIZE]) -> Self {
        Self {
            regs: Registers::new(),
            mem: Memory::from_image(image),
            state: State::Running,
            phase: Phase::Fetch(0),
            lines: ControlWord::empty(),
            cycles: 0,
        }
    }

    /// Advance the machine by exactly one clock cycle.
    ///
    /// Produces the next control word lazily, applies it, and returns it
    /// with a register snapshot. After halt this is a pure no-op that
    /// reports [`CycleResult::Halted`].
    pub fn pulse(&mut self) -> CycleResult {
        if self.state == State::Halted {
            return CycleResult::Halted;
        }

        let word = self.next_word();
        self.apply(word);
        self.cycles += 1;

        CycleResult::Applied {
            word,
            regs: self.regs,
        }
    }

    /// Pulse the clock until the machine halts, up to `max_pulses` cycles.
    ///
    /// Returns the number of cycles that ran. The bound matters: a
    /// program that never asserts HLT (a bare JMP loop, say) would
    /// otherwise spin forever.
    pub fn run(&mut self, max_pulses: u64) -> u64 {
        let start = self.cycles;
        while self.state == State::Running && self.cycles - start < max_pulses {
            let _ = self.pulse();
        }
        self.cycles - start
    }

    /// Whether the halt line has been applied. Pure query.
    pub fn is_halted(&self) -> bool {
        self.state == State::Halted
    }

    /// Current execution state.
    pub fn state(&self) -> State {
        self.state
    }

    /// The control word most recently applied.
    pub fn last_word(&self) -> ControlWord {
        self.lines
    }

    /// Produce the next control word and move the sequencer along.
    ///
    /// Decode happens while the last fetch cycle is emitted: the
    /// instruction register was loaded one cycle earlier, so its opcode
    /// nibble picks the microcode to run next. An opcode with no
    /// microcode falls straight through to the next fetch.
    fn next_word(&mut self) -> ControlWord {
        match self.phase {
            Phase::Fetch(step) => {
                let word = FETCH[step];
                self.phase = if step + 1 < FETCH.len() {
                    Phase::Fetch(step + 1)
                } else {
                    let op = self.regs.opcode();
                    if microcode(op).is_empty() {
                        Phase::Fetch(0)
                    } else {
                        Phase::Execute { op, step: 0 }
                    }
                };
                word
            }
            Phase::Execute { op, step } => {
                let ucode = microcode(op);
                let word = ucode[step];
                self.phase = if step + 1 < ucode.len() {
                    Phase::Execute { op, step: step + 1 }
                } else {
                    Phase::Fetch(0)
                };
                word
            }
        }
    }

    /// Apply one control word: every handler whose line is asserted
    /// fires, in table order.
    pub(crate) fn apply(&mut self, word: ControlWord) {
        self.lines = word;
        for handler in &LINE_HANDLERS {
            if word.contains(handler.line) {
                (handler.apply)(self);
            }
        }
    }

    /// Enter the terminal halted state. Called by the HLT handler.
    pub(crate) fn halt(&mut self) {
        self.state = State::Halted;
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new([0; RAM_SIZE])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asm::image::pack;
    use crate::cpu::microcode::opcode;

    fn machine_with(cells: &[(u8, u8)]) -> Machine {
        let mut image = [0u8; RAM_SIZE];
        for (addr, value) in cells {
            image[*addr as usize] = *value;
        }
        Machine::new(image)
    }

    #[test]
    fn test_lda_then_halt_takes_nine_pulses() {
        let mut m = machine_with(&[
            (0, pack(opcode::LDA, 14)),
            (1, pack(opcode::HLT, 0)),
            (14, 77),
        ]);

        for _ in 0..9 {
            assert!(matches!(m.pulse(), CycleResult::Applied { .. }));
        }

        assert!(m.is_halted());
        assert_eq!(m.regs.a, 77);
        assert_eq!(m.cycles, 9);
    }

    #[test]
    fn test_add_program_outputs_42_in_nineteen_pulses() {
        let mut m = machine_with(&[
            (0, pack(opcode::LDA, 14)),
            (1, pack(opcode::ADD, 15)),
            (2, pack(opcode::OUT, 0)),
            (3, pack(opcode::HLT, 0)),
            (14, 28),
            (15, 14),
        ]);

        let ran = m.run(100);

        assert!(m.is_halted());
        assert_eq!(ran, 19);
        assert_eq!(m.regs.out, 42);
        assert_eq!(m.regs.a, 42);
    }

    #[test]
    fn test_jmp_overrides_fetch_increment() {
        let mut m = machine_with(&[
            (0, pack(opcode::JMP, 8)),
            (8, pack(opcode::HLT, 0)),
        ]);

        // 3 fetch cycles plus the single JMP cycle.
        for _ in 0..4 {
            let _ = m.pulse();
        }
        assert_eq!(m.regs.pc, 8);

        let ran = m.run(100);
        assert!(m.is_halted());
        assert_eq!(ran, 4);
    }

    #[test]
    fn test_unknown_opcode_runs_as_nop() {
        // 0x7 has no microcode entry.
        let mut m = machine_with(&[(0, 0x70), (1, pack(opcode::HLT, 0))]);

        for _ in 0..3 {
            let _ = m.pulse();
        }

        // Only the fetch ran: pc advanced, the instruction register holds
        // the raw cell, nothing else moved.
        assert_eq!(m.regs.pc, 1);
        assert_eq!(m.regs.ir, 0x70);
        assert_eq!(m.regs.a, 0);
        assert_eq!(m.regs.b, 0);
        assert_eq!(m.regs.out, 0);
        assert!(!m.is_halted());

        // The fourth pulse is already the next instruction's fetch.
        let next = m.pulse();
        assert!(matches!(
            next,
            CycleResult::Applied { word, .. } if word == FETCH[0]
        ));

        let _ = m.run(100);
        assert!(m.is_halted());
        assert_eq!(m.cycles, 7);
    }

    #[test]
    fn test_nop_matches_unknown_opcode() {
        let mut nop = machine_with(&[(0, pack(opcode::NOP, 0)), (1, pack(opcode::HLT, 0))]);
        let mut unknown = machine_with(&[(0, 0x90), (1, pack(opcode::HLT, 0))]);

        let _ = nop.run(100);
        let _ = unknown.run(100);

        assert_eq!(nop.cycles, unknown.cycles);
        assert_eq!(nop.regs.pc, unknown.regs.pc);
        assert_eq!(nop.regs.a, unknown.regs.a);
        assert_eq!(nop.regs.out, unknown.regs.out);
    }

    #[test]
    fn test_pulse_after_halt_is_a_distinguished_noop() {
        let mut m = machine_with(&[(0, pack(opcode::HLT, 0))]);

        let _ = m.run(100);
        assert!(m.is_halted());

        let regs = m.regs;
        let cycles = m.cycles;

        for _ in 0..3 {
            assert_eq!(m.pulse(), CycleResult::Halted);
        }
        assert_eq!(m.regs, regs);
        assert_eq!(m.cycles, cycles);
    }

    #[test]
    fn test_is_halted_never_mutates() {
        let mut m = machine_with(&[(0, pack(opcode::LDA, 14)), (14, 5)]);

        let _ = m.pulse();
        let before = m.regs;
        for _ in 0..4 {
            let _ = m.is_halted();
        }
        assert_eq!(m.regs, before);
        assert_eq!(m.cycles, 1);
    }

    #[test]
    fn test_pulse_reports_each_applied_word() {
        let mut m = machine_with(&[(0, pack(opcode::OUT, 0))]);

        let expected = [
            FETCH[0],
            FETCH[1],
            FETCH[2],
            ControlWord::AO | ControlWord::OI,
        ];
        for want in expected {
            match m.pulse() {
                CycleResult::Applied { word, .. } => assert_eq!(word, want),
                CycleResult::Halted => panic!("machine halted early"),
            }
        }
    }

    #[test]
    fn test_snapshot_reflects_state_after_the_cycle() {
        let mut m = machine_with(&[(0, pack(opcode::LDA, 14)), (14, 9)]);

        // First fetch cycle: CO|MI moves pc into addr.
        match m.pulse() {
            CycleResult::Applied { regs, .. } => {
                assert_eq!(regs.addr, 0);
                assert_eq!(regs.pc, 0);
            }
            CycleResult::Halted => panic!("machine halted early"),
        }

        // Second: RO|II loads the instruction register.
        match m.pulse() {
            CycleResult::Applied { regs, .. } => assert_eq!(regs.ir, pack(opcode::LDA, 14)),
            CycleResult::Halted => panic!("machine halted early"),
        }
    }

    #[test]
    fn test_default_machine_spins_on_nops() {
        // All-zero RAM is an endless NOP program; it must respect the
        // pulse bound and keep wrapping the counter.
        let mut m = Machine::default();

        let ran = m.run(50);

        assert_eq!(ran, 50);
        assert!(!m.is_halted());
    }
}
