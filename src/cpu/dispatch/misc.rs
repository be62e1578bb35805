/*!
misc.rs - flag ops, register transfers, stack push/pull, INX/INY/DEX/DEY,
NOP, and JAM (`spec.md` §4.4).

Grounding
=========
`original_source/src/cpu.c`'s corresponding one-line cases. JAM (an
un-patched halt opcode slot) is modeled as a documented dead end, per
`spec.md` §7: real silicon locks the bus and never fetches again until
reset, which this core surfaces by zeroing `PC` so the driving host can
notice the invalid state rather than looping forever unexplained.
*/

use crate::bus::SystemBus;
use crate::cpu::regs::{Registers, CARRY, DECIMAL, IRQ_DISABLE, OVERFLOW};

pub fn clc(regs: &mut Registers) {
    regs.set_flag(CARRY, false);
}
pub fn sec(regs: &mut Registers) {
    regs.set_flag(CARRY, true);
}
pub fn cld(regs: &mut Registers) {
    regs.set_flag(DECIMAL, false);
}
pub fn sed(regs: &mut Registers) {
    regs.set_flag(DECIMAL, true);
}
pub fn cli(regs: &mut Registers) {
    regs.set_flag(IRQ_DISABLE, false);
}
pub fn sei(regs: &mut Registers) {
    regs.set_flag(IRQ_DISABLE, true);
}
pub fn clv(regs: &mut Registers) {
    regs.set_flag(OVERFLOW, false);
}

pub fn tax(regs: &mut Registers) {
    regs.x = regs.a;
    regs.update_nz(regs.x);
}
pub fn tay(regs: &mut Registers) {
    regs.y = regs.a;
    regs.update_nz(regs.y);
}
pub fn txa(regs: &mut Registers) {
    regs.a = regs.x;
    regs.update_nz(regs.a);
}
pub fn tya(regs: &mut Registers) {
    regs.a = regs.y;
    regs.update_nz(regs.a);
}
pub fn tsx(regs: &mut Registers) {
    regs.x = regs.s;
    regs.update_nz(regs.x);
}
/// TXS does not touch ZERO/NEGATIVE - it's the one transfer that feeds the
/// stack pointer rather than a flag-observing register.
pub fn txs(regs: &mut Registers) {
    regs.s = regs.x;
}

pub fn inx(regs: &mut Registers) {
    regs.x = regs.x.wrapping_add(1);
    regs.update_nz(regs.x);
}
pub fn iny(regs: &mut Registers) {
    regs.y = regs.y.wrapping_add(1);
    regs.update_nz(regs.y);
}
pub fn dex(regs: &mut Registers) {
    regs.x = regs.x.wrapping_sub(1);
    regs.update_nz(regs.x);
}
pub fn dey(regs: &mut Registers) {
    regs.y = regs.y.wrapping_sub(1);
    regs.update_nz(regs.y);
}

pub fn pha(regs: &mut Registers, bus: &mut dyn SystemBus) {
    regs.push(bus, regs.a);
}
pub fn pla(regs: &mut Registers, bus: &mut dyn SystemBus) {
    regs.a = regs.pop(bus);
    regs.update_nz(regs.a);
}
pub fn php(regs: &mut Registers, bus: &mut dyn SystemBus) {
    let status = regs.status_for_push(true);
    regs.push(bus, status);
}
pub fn plp(regs: &mut Registers, bus: &mut dyn SystemBus) {
    let status = regs.pop(bus);
    regs.restore_status(status);
}

/// NOP: every addressing-mode variant (including the illegal multi-byte
/// NOPs) just discards whatever operand was already fetched by
/// `cpu::addressing`; no register or flag changes.
pub fn nop() {}

/// JAM: no register-file effect of its own; `cpu::execute` is responsible
/// for zeroing `PC` to surface the halt (`spec.md` §7).
pub fn jam() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn txs_does_not_touch_flags() {
        let mut r = Registers::new();
        r.p = 0;
        r.x = 0x80;
        txs(&mut r);
        assert_eq!(r.s, 0x80);
        assert_eq!(r.p, 0);
    }

    #[test]
    fn tax_updates_nz() {
        let mut r = Registers::new();
        r.a = 0x00;
        tax(&mut r);
        assert!(r.flag(crate::cpu::regs::ZERO));
    }

    #[test]
    fn inx_wraps_at_256() {
        let mut r = Registers::new();
        r.x = 0xFF;
        inx(&mut r);
        assert_eq!(r.x, 0x00);
        assert!(r.flag(crate::cpu::regs::ZERO));
    }
}
