/*!
arithmetic.rs - ADC/SBC and SBX (`spec.md` §4.4).

Non-goals
=========
BCD (decimal-mode) arithmetic semantics are a non-goal of this core (see
`cpu::regs` module doc); `DECIMAL` is still tracked faithfully by CLD/SED
but ADC/SBC here always compute in pure binary, matching every SID tune's
actual use of the CPU (none run the decimal mode; it is a speaker/printer
BASIC-ROM feature the SID engine never touches).

Grounding
=========
`original_source/src/cpu.c`'s binary-mode `ADC`/`SBC` cases: carry-in is
added straight into the 9-bit (or 9-bit borrow) sum, overflow is the
classic `(~(A^M) & (A^result) & 0x80)` sign-change test.
*/

use crate::bus::SystemBus;
use crate::cpu::addressing::{self, Operand};
use crate::cpu::regs::{Registers, CARRY, OVERFLOW};

pub fn adc(regs: &mut Registers, bus: &mut dyn SystemBus, op: Operand) {
    let m = addressing::read_operand(op, regs.a, bus);
    let a = regs.a;
    let carry_in = regs.flag(CARRY) as u16;
    let sum = a as u16 + m as u16 + carry_in;
    let result = sum as u8;
    regs.set_flag(CARRY, sum > 0xFF);
    regs.set_flag(OVERFLOW, (!(a ^ m) & (a ^ result) & 0x80) != 0);
    regs.a = result;
    regs.update_nz(regs.a);
}

pub fn sbc(regs: &mut Registers, bus: &mut dyn SystemBus, op: Operand) {
    let m = addressing::read_operand(op, regs.a, bus);
    // SBC is ADC with the operand's bitwise complement.
    adc(regs, bus, Operand::Immediate(!m));
}

/// SBX (AXS): `X = (A & X) - imm`, without involving CARRY on input, but
/// setting CARRY on output as "no borrow" (i.e. `(A & X) >= imm`).
pub fn sbx(regs: &mut Registers, bus: &mut dyn SystemBus, op: Operand) {
    let m = addressing::read_operand(op, regs.a, bus);
    let base = regs.a & regs.x;
    regs.set_flag(CARRY, base >= m);
    regs.x = base.wrapping_sub(m);
    regs.update_nz(regs.x);
}
