/*!
compare.rs - CMP/CPX/CPY (`spec.md` §4.4).

Grounding
=========
`original_source/src/cpu.c`'s compare cases: all three are a subtraction
that only updates flags (CARRY = no-borrow, ZERO/NEGATIVE from the 8-bit
difference), never writing the result back to the register.
*/

use crate::bus::SystemBus;
use crate::cpu::addressing::{self, Operand};
use crate::cpu::regs::{Registers, CARRY};

#[inline]
fn compare(regs: &mut Registers, reg_value: u8, operand: u8) {
    regs.set_flag(CARRY, reg_value >= operand);
    let diff = reg_value.wrapping_sub(operand);
    regs.update_nz(diff);
}

pub fn cmp(regs: &mut Registers, bus: &mut dyn SystemBus, op: Operand) {
    let m = addressing::read_operand(op, regs.a, bus);
    compare(regs, regs.a, m);
}

pub fn cpx(regs: &mut Registers, bus: &mut dyn SystemBus, op: Operand) {
    let m = addressing::read_operand(op, regs.a, bus);
    compare(regs, regs.x, m);
}

pub fn cpy(regs: &mut Registers, bus: &mut dyn SystemBus, op: Operand) {
    let m = addressing::read_operand(op, regs.a, bus);
    compare(regs, regs.y, m);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RamBus;

    #[test]
    fn cmp_equal_sets_zero_and_carry() {
        let mut bus = RamBus::new();
        let mut r = Registers::new();
        r.a = 0x42;
        cmp(&mut r, &mut bus, Operand::Immediate(0x42));
        assert!(r.flag(crate::cpu::regs::ZERO));
        assert!(r.flag(CARRY));
    }

    #[test]
    fn cpx_less_than_clears_carry() {
        let mut bus = RamBus::new();
        let mut r = Registers::new();
        r.x = 0x01;
        cpx(&mut r, &mut bus, Operand::Immediate(0x02));
        assert!(!r.flag(CARRY));
    }
}
