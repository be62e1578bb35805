/*!
control_flow.rs - JMP/JSR/RTS/RTI/BRK, plus the three interrupt-dispatch
pseudo-ops `StartIrq`/`StartNmi`/`NullBurn` (`spec.md` §4.4, §4.5).

Grounding
=========
`original_source/src/cpu.c`'s JMP/JSR/RTS/RTI/BRK cases and the IRQ/NMI
dispatch sequence folded into `runPrefetchedOp` for the patched jam-opcode
slots. Two hardware quirks are preserved exactly:

- JMP (indirect)'s page-wrap bug: if the pointer's low byte is `0xFF`, the
  high byte is fetched from the *start* of the same page rather than the
  next page, because the 6502's internal address-increment only touches
  the low byte during this fetch.
- BRK and real interrupt dispatch both push a status byte through `S`, but
  BRK's pushed status has `BREAK0` set while IRQ/NMI's does not - this is
  the only way software inspecting the stack after an interrupt can tell a
  software `BRK` from a real hardware interrupt.
*/

use crate::bus::SystemBus;
use crate::cpu::regs::{Registers, IRQ_DISABLE};

pub const IRQ_NMI_BRK_VECTOR: u16 = 0xFFFE;
pub const NMI_VECTOR: u16 = 0xFFFA;

#[inline]
fn read_vector(bus: &mut dyn SystemBus, addr: u16) -> u16 {
    let lo = bus.mem_read(addr) as u16;
    let hi = bus.mem_read(addr.wrapping_add(1)) as u16;
    (hi << 8) | lo
}

/// JMP absolute: `opcode_pc` is the address of the opcode byte itself.
pub fn jmp_absolute(opcode_pc: u16, regs: &mut Registers, bus: &mut dyn SystemBus) {
    regs.pc = read_vector(bus, opcode_pc.wrapping_add(1));
}

/// JMP (indirect): reproduces the page-wrap bug on the pointer fetch.
pub fn jmp_indirect(opcode_pc: u16, regs: &mut Registers, bus: &mut dyn SystemBus) {
    let ptr_lo_addr = opcode_pc.wrapping_add(1);
    let ptr = read_vector(bus, ptr_lo_addr);
    let lo = bus.mem_read(ptr) as u16;
    let hi_addr = if ptr & 0x00FF == 0x00FF {
        ptr & 0xFF00
    } else {
        ptr.wrapping_add(1)
    };
    let hi = bus.mem_read(hi_addr) as u16;
    regs.pc = (hi << 8) | lo;
}

/// JSR: pushes the address of the *last byte of the JSR instruction*
/// (opcode_pc + 2), not the address of the next instruction.
pub fn jsr(opcode_pc: u16, regs: &mut Registers, bus: &mut dyn SystemBus) {
    let target = read_vector(bus, opcode_pc.wrapping_add(1));
    regs.push_u16(bus, opcode_pc.wrapping_add(2));
    regs.pc = target;
}

/// RTS: pops a return address and resumes at `addr + 1`.
pub fn rts(regs: &mut Registers, bus: &mut dyn SystemBus) {
    let addr = regs.pop_u16(bus);
    regs.pc = addr.wrapping_add(1);
}

/// CIA#1/CIA#2 interrupt-control-register addresses. Some optimized players
/// place an `RTI` directly at one of these so that the opcode *fetch itself*
/// implicitly reads (and thereby acknowledges) the pending interrupt bits,
/// without a separate explicit load - e.g. "LMan - Vortex.sid".
const CIA1_ICR: u16 = 0xDC0D;
const CIA2_ICR: u16 = 0xDD0D;

/// RTI: pops status (discarding B0/B1), then pops `PC` directly - unlike
/// RTS, no `+1` adjustment, since interrupt dispatch pushed the address of
/// the instruction that was about to execute, not one already consumed.
/// Clears the NMI marker set at dispatch time - some optimized players rely
/// on this falling edge to know a digi-sample NMI handler has returned.
///
/// `opcode_pc` is the address the `RTI` opcode itself was fetched from;
/// when it lands on a CIA interrupt-control register, an extra implicit
/// `mem_read` reproduces the ack-on-fetch timing hack above.
pub fn rti(opcode_pc: u16, regs: &mut Registers, bus: &mut dyn SystemBus) {
    if opcode_pc == CIA1_ICR || opcode_pc == CIA2_ICR {
        bus.mem_read(opcode_pc);
    }
    let status = regs.pop(bus);
    regs.restore_status(status);
    regs.pc = regs.pop_u16(bus);
    bus.set_nmi_marker(false);
}

/// BRK: a software interrupt. Treated as a 2-byte instruction (the byte
/// after the opcode is a padding byte skipped over), pushes `opcode_pc+2`,
/// pushes status with `BREAK0` set, sets `IRQ_DISABLE`, and vectors through
/// the same `$FFFE` vector as a real hardware IRQ.
pub fn brk(opcode_pc: u16, regs: &mut Registers, bus: &mut dyn SystemBus) {
    regs.push_u16(bus, opcode_pc.wrapping_add(2));
    let status = regs.status_for_push(true);
    regs.push(bus, status);
    regs.set_flag(IRQ_DISABLE, true);
    regs.pc = read_vector(bus, IRQ_NMI_BRK_VECTOR);
}

/// StartIrq pseudo-op: dispatch a hardware IRQ. `opcode_pc` is the address
/// the CPU was about to fetch its next real opcode from - that address
/// (not `opcode_pc+1`) is what gets pushed, since no opcode byte was
/// actually consumed.
///
/// `suppress_i_in_push` is set only when this dispatch was reached via the
/// "last op was SEI" escape clause while `IRQ_DISABLE` is already set
/// (`spec.md` §4.5's open corner case, §8 scenario 5): the commitment
/// predates SEI's completion, so the status byte written to the stack
/// reports `I` clear even though the live `P` already has it set. The live
/// register is unaffected - IRQ dispatch always sets `IRQ_DISABLE` on entry
/// regardless.
pub fn start_irq(opcode_pc: u16, regs: &mut Registers, bus: &mut dyn SystemBus, suppress_i_in_push: bool) {
    regs.push_u16(bus, opcode_pc);
    let mut status = regs.status_for_push(false);
    if suppress_i_in_push {
        status &= !IRQ_DISABLE;
    }
    regs.push(bus, status);
    regs.set_flag(IRQ_DISABLE, true);
    regs.pc = read_vector(bus, IRQ_NMI_BRK_VECTOR);
}

/// StartNmi pseudo-op: dispatch a non-maskable interrupt. Same push
/// sequence as `start_irq` but vectors through `$FFFA` and does not require
/// `IRQ_DISABLE` to have been clear (NMI is unmaskable), though it still
/// sets the flag on entry like any other interrupt dispatch. The NMI marker
/// itself is raised at dispatch *decision* time by `cpu::unit` (some old
/// PSID digi-sample recordings rely on the marker going high before the
/// handler's first instruction, not merely before its completion).
pub fn start_nmi(opcode_pc: u16, regs: &mut Registers, bus: &mut dyn SystemBus) {
    regs.push_u16(bus, opcode_pc);
    let status = regs.status_for_push(false);
    regs.push(bus, status);
    regs.set_flag(IRQ_DISABLE, true);
    regs.pc = read_vector(bus, NMI_VECTOR);
}

/// NullBurn pseudo-op: burns the instruction's allotted cycles doing
/// nothing - no register or memory side effects at all. Used when neither
/// interrupt controller has a commitment to dispatch but the jam-opcode
/// slot still needs filling with *something* schedulable.
pub fn null_burn(_regs: &mut Registers, _bus: &mut dyn SystemBus) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RamBus;

    #[test]
    fn jsr_then_rts_round_trips() {
        let mut bus = RamBus::new();
        bus.load(0x1000, &[0x20, 0x00, 0x20]); // JSR $2000
        let mut r = Registers::new();
        r.s = 0xFF;
        r.pc = 0x1003;
        jsr(0x1000, &mut r, &mut bus);
        assert_eq!(r.pc, 0x2000);
        rts(&mut r, &mut bus);
        assert_eq!(r.pc, 0x1003);
    }

    #[test]
    fn jmp_indirect_page_wrap_bug() {
        let mut bus = RamBus::new();
        // JMP ($30FF): operand bytes at $2001-$2002 encode pointer $30FF.
        bus.load(0x2001, &[0xFF, 0x30]);
        bus.ram[0x30FF] = 0x34; // target low byte, at the pointer address
        bus.ram[0x3100] = 0xAB; // "correct" high-byte location - must be ignored
        bus.ram[0x3000] = 0x12; // buggy wrap: high byte actually read from $3000
        let mut r = Registers::new();
        jmp_indirect(0x2000, &mut r, &mut bus);
        assert_eq!(r.pc, 0x1234);
    }

    #[test]
    fn brk_sets_break0_and_irq_disable() {
        let mut bus = RamBus::new();
        bus.ram[0xFFFE] = 0x00;
        bus.ram[0xFFFF] = 0x90;
        let mut r = Registers::new();
        r.s = 0xFF;
        r.pc = 0x1000;
        brk(0x1000, &mut r, &mut bus);
        assert_eq!(r.pc, 0x9000);
        assert!(r.flag(IRQ_DISABLE));
    }

    #[test]
    fn start_irq_pushes_break0_clear() {
        let mut bus = RamBus::new();
        bus.ram[0xFFFE] = 0x00;
        bus.ram[0xFFFF] = 0x90;
        let mut r = Registers::new();
        r.s = 0xFF;
        start_irq(0x1000, &mut r, &mut bus, false);
        // Top of stack after push is the status byte.
        let pushed_status = bus.ram[0x01FF];
        assert_eq!(pushed_status & 0x10, 0);
        assert_eq!(r.pc, 0x9000);
    }

    #[test]
    fn start_irq_suppresses_i_in_pushed_status_when_escaping_sei() {
        let mut bus = RamBus::new();
        bus.ram[0xFFFE] = 0x00;
        bus.ram[0xFFFF] = 0x90;
        let mut r = Registers::new();
        r.s = 0xFF;
        r.set_flag(IRQ_DISABLE, true);
        start_irq(0x1000, &mut r, &mut bus, true);
        let pushed_status = bus.ram[0x01FD];
        assert_eq!(pushed_status & IRQ_DISABLE, 0);
        // The live register still ends up with I set, as any IRQ dispatch does.
        assert!(r.flag(IRQ_DISABLE));
    }

    #[test]
    fn start_nmi_vectors_through_fffa() {
        let mut bus = RamBus::new();
        bus.ram[0xFFFA] = 0x00;
        bus.ram[0xFFFB] = 0xA0;
        let mut r = Registers::new();
        r.s = 0xFF;
        start_nmi(0x1000, &mut r, &mut bus);
        assert_eq!(r.pc, 0xA000);
    }

    #[test]
    fn rti_clears_nmi_marker() {
        let mut bus = RamBus::new();
        bus.nmi_marker = true;
        let mut r = Registers::new();
        r.s = 0xFF;
        r.push_u16(&mut bus, 0x1234);
        r.push(&mut bus, 0x00);
        rti(0x4000, &mut r, &mut bus);
        assert_eq!(r.pc, 0x1234);
        assert!(!bus.nmi_marker);
    }

    #[test]
    fn rti_at_cia_icr_address_implicitly_reads_it() {
        let mut bus = RamBus::new();
        let mut r = Registers::new();
        r.s = 0xFF;
        r.push_u16(&mut bus, 0x1234);
        r.push(&mut bus, 0x00);
        rti(CIA1_ICR, &mut r, &mut bus);
        assert!(bus.read_log.contains(&CIA1_ICR));
    }
}
