/*!
rmw.rs - read-modify-write opcodes: ASL/LSR/ROL/ROR/INC/DEC, and the six
illegal combos that fuse a shift/rotate/increment with a second ALU op in
the same instruction (`spec.md` §4.4).

Every function here computes the new value and updates flags; it does not
perform the bus double-write itself (`original_source/src/cpu.c`'s
`operationASL`-style helpers write the unchanged value back before the
modified one - `cpu::execute` sequences that, since it alone knows the
resolved address and the accumulator-mode special case where no bus write
happens at all).

Grounding
=========
`original_source/src/cpu.c`'s RMW and illegal-RMW cases. The fused ops
(SLO/SRE/RLA/RRA/ISB/DCP) run the shift/rotate/inc/dec first and then feed
its result into the paired logical/arithmetic/compare op against `A`,
exactly as the original engine's case bodies do back-to-back.
*/

use crate::bus::SystemBus;
use crate::cpu::dispatch::{arithmetic, compare, logical};
use crate::cpu::addressing::Operand;
use crate::cpu::regs::{Registers, CARRY};

pub fn asl(regs: &mut Registers, value: u8) -> u8 {
    regs.set_flag(CARRY, value & 0x80 != 0);
    let result = value << 1;
    regs.update_nz(result);
    result
}

pub fn lsr(regs: &mut Registers, value: u8) -> u8 {
    regs.set_flag(CARRY, value & 0x01 != 0);
    let result = value >> 1;
    regs.update_nz(result);
    result
}

pub fn rol(regs: &mut Registers, value: u8) -> u8 {
    let carry_in = regs.flag(CARRY) as u8;
    regs.set_flag(CARRY, value & 0x80 != 0);
    let result = (value << 1) | carry_in;
    regs.update_nz(result);
    result
}

pub fn ror(regs: &mut Registers, value: u8) -> u8 {
    let carry_in = regs.flag(CARRY);
    regs.set_flag(CARRY, value & 0x01 != 0);
    let result = (value >> 1) | if carry_in { 0x80 } else { 0 };
    regs.update_nz(result);
    result
}

pub fn inc(regs: &mut Registers, value: u8) -> u8 {
    let result = value.wrapping_add(1);
    regs.update_nz(result);
    result
}

pub fn dec(regs: &mut Registers, value: u8) -> u8 {
    let result = value.wrapping_sub(1);
    regs.update_nz(result);
    result
}

/// SLO: `M = ASL(M)`, then `A |= M`.
pub fn slo(regs: &mut Registers, bus: &mut dyn SystemBus, value: u8) -> u8 {
    let result = asl(regs, value);
    regs.a |= result;
    regs.update_nz(regs.a);
    let _ = bus;
    result
}

/// SRE: `M = LSR(M)`, then `A ^= M`.
pub fn sre(regs: &mut Registers, bus: &mut dyn SystemBus, value: u8) -> u8 {
    let result = lsr(regs, value);
    regs.a ^= result;
    regs.update_nz(regs.a);
    let _ = bus;
    result
}

/// RLA: `M = ROL(M)`, then `A &= M`.
pub fn rla(regs: &mut Registers, bus: &mut dyn SystemBus, value: u8) -> u8 {
    let result = rol(regs, value);
    regs.a &= result;
    regs.update_nz(regs.a);
    let _ = bus;
    result
}

/// RRA: `M = ROR(M)`, then `A = ADC(A, M)` (the rotated value feeds an
/// actual add-with-carry, not a plain OR/AND/XOR).
pub fn rra(regs: &mut Registers, bus: &mut dyn SystemBus, value: u8) -> u8 {
    let result = ror(regs, value);
    arithmetic::adc(regs, bus, Operand::Immediate(result));
    result
}

/// ISB (ISC): `M = INC(M)`, then `A = SBC(A, M)`.
pub fn isb(regs: &mut Registers, bus: &mut dyn SystemBus, value: u8) -> u8 {
    let result = inc(regs, value);
    arithmetic::sbc(regs, bus, Operand::Immediate(result));
    result
}

/// DCP: `M = DEC(M)`, then `CMP(A, M)`.
pub fn dcp(regs: &mut Registers, bus: &mut dyn SystemBus, value: u8) -> u8 {
    let result = dec(regs, value);
    compare::cmp(regs, bus, Operand::Immediate(result));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RamBus;

    #[test]
    fn asl_sets_carry_from_old_bit7() {
        let mut r = Registers::new();
        let result = asl(&mut r, 0x80);
        assert_eq!(result, 0x00);
        assert!(r.flag(CARRY));
        assert!(r.flag(crate::cpu::regs::ZERO));
    }

    #[test]
    fn ror_rotates_carry_into_bit7() {
        let mut r = Registers::new();
        r.set_flag(CARRY, true);
        let result = ror(&mut r, 0x00);
        assert_eq!(result, 0x80);
        assert!(!r.flag(CARRY));
    }

    #[test]
    fn slo_ors_shifted_value_into_a() {
        let mut bus = RamBus::new();
        let mut r = Registers::new();
        r.a = 0x01;
        let result = slo(&mut r, &mut bus, 0x40);
        assert_eq!(result, 0x80);
        assert_eq!(r.a, 0x81);
    }

    #[test]
    fn dcp_decrements_then_compares() {
        let mut bus = RamBus::new();
        let mut r = Registers::new();
        r.a = 0x05;
        let result = dcp(&mut r, &mut bus, 0x06);
        assert_eq!(result, 0x05);
        assert!(r.flag(crate::cpu::regs::ZERO));
        assert!(r.flag(CARRY));
    }
}
