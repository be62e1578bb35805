/*!
branches.rs - the eight conditional branch opcodes (`spec.md` §4.4).

Overview
========
Each branch tests one status flag against an expected polarity and, if it
matches, sets `PC` to the relative target computed by `cpu::cycles`. The
timing consequences (extra cycle taken, further cycle on page crossing)
are already folded in by the Prefetch/Timing Unit; this module only needs
to decide whether the branch is taken and move `PC` accordingly.
*/

use crate::bus::SystemBus;
use crate::cpu::cycles;
use crate::cpu::regs::{Registers, CARRY, NEGATIVE, OVERFLOW, ZERO};
use crate::cpu::table::Mnemonic;

/// Evaluate whether `mnemonic` (one of the eight branch ops) is taken
/// given the current flags. Pure; used by both the prefetch probe (to
/// decide timing) and actual execution (to decide whether to jump).
#[inline]
pub fn is_taken(mnemonic: Mnemonic, regs: &Registers) -> bool {
    match mnemonic {
        Mnemonic::Bcc => !regs.flag(CARRY),
        Mnemonic::Bcs => regs.flag(CARRY),
        Mnemonic::Bne => !regs.flag(ZERO),
        Mnemonic::Beq => regs.flag(ZERO),
        Mnemonic::Bpl => !regs.flag(NEGATIVE),
        Mnemonic::Bmi => regs.flag(NEGATIVE),
        Mnemonic::Bvc => !regs.flag(OVERFLOW),
        Mnemonic::Bvs => regs.flag(OVERFLOW),
        _ => false,
    }
}

/// Execute a branch instruction whose opcode lives at `opcode_pc`. Advances
/// `regs.pc` past the two-byte instruction and, if taken, on to the
/// relative target.
pub fn execute(mnemonic: Mnemonic, opcode_pc: u16, regs: &mut Registers, bus: &mut dyn SystemBus) {
    let taken = is_taken(mnemonic, regs);
    if taken {
        regs.pc = cycles::branch_target(opcode_pc, bus);
    } else {
        regs.pc = opcode_pc.wrapping_add(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RamBus;

    #[test]
    fn beq_taken_when_zero_set() {
        let mut bus = RamBus::new();
        bus.load(0x1000, &[0xF0, 0x05]);
        let mut r = Registers::new();
        r.set_flag(ZERO, true);
        execute(Mnemonic::Beq, 0x1000, &mut r, &mut bus);
        assert_eq!(r.pc, 0x1007);
    }

    #[test]
    fn bne_not_taken_falls_through() {
        let mut bus = RamBus::new();
        bus.load(0x1000, &[0xD0, 0x05]);
        let mut r = Registers::new();
        r.set_flag(ZERO, true);
        execute(Mnemonic::Bne, 0x1000, &mut r, &mut bus);
        assert_eq!(r.pc, 0x1002);
    }
}
