/*!
execute.rs - Execution Unit (`spec.md` §4.4).

Overview
========
The counterpart to `cpu::cycles`'s pure timing probe: this module actually
performs an instruction's side effects. It owns operand resolution (via
`cpu::addressing`) and read-modify-write's double bus write, then delegates
the register/flag arithmetic for each mnemonic to the matching
`cpu::dispatch` submodule.

Entry convention: `regs.pc` must point at the opcode byte on entry; on
return it points at the next instruction to fetch (or, for jumps/branches/
interrupt dispatch, wherever control transferred to).

Grounding
=========
`original_source/src/cpu.c`'s `runPrefetchedOp`: a single giant switch over
every opcode. This module keeps the same shape one level up (switch over
`Mnemonic` instead of raw opcode byte, since the table has already folded
the opcode -> mnemonic/mode mapping), which also lets the illegal-opcode
families share code with their legal namesakes instead of repeating cases
256 times.
*/

use crate::bus::SystemBus;
use crate::cpu::addressing::{self, Operand};
use crate::cpu::dispatch::{arithmetic, branches, compare, control_flow, load_store, logical, misc, rmw};
use crate::cpu::regs::Registers;
use crate::cpu::table::{is_rmw, AddressingMode, Mnemonic};

/// Run one instruction to completion. `opcode` is only needed to special-
/// case JMP's two addressing-mode variants; the mnemonic/mode pair already
/// fully determines every other opcode's behaviour.
pub fn execute(mnemonic: Mnemonic, mode: AddressingMode, regs: &mut Registers, bus: &mut dyn SystemBus) {
    let opcode_pc = regs.pc;

    match mnemonic {
        Mnemonic::Jmp => {
            match mode {
                AddressingMode::Absolute => control_flow::jmp_absolute(opcode_pc, regs, bus),
                AddressingMode::Indirect => control_flow::jmp_indirect(opcode_pc, regs, bus),
                _ => unreachable!("JMP only uses absolute/indirect addressing"),
            }
            return;
        }
        Mnemonic::Jsr => {
            control_flow::jsr(opcode_pc, regs, bus);
            return;
        }
        Mnemonic::Rts => {
            control_flow::rts(regs, bus);
            return;
        }
        Mnemonic::Rti => {
            control_flow::rti(opcode_pc, regs, bus);
            return;
        }
        Mnemonic::Brk => {
            control_flow::brk(opcode_pc, regs, bus);
            return;
        }
        Mnemonic::StartIrq => {
            control_flow::start_irq(opcode_pc, regs, bus, false);
            return;
        }
        Mnemonic::StartNmi => {
            control_flow::start_nmi(opcode_pc, regs, bus);
            return;
        }
        Mnemonic::NullBurn => {
            control_flow::null_burn(regs, bus);
            regs.pc = opcode_pc.wrapping_add(1);
            return;
        }
        Mnemonic::Jam => {
            misc::jam();
            // Real silicon locks the bus; the model surfaces this as a
            // zeroed PC so the driving host notices an invalid state
            // (`spec.md` §7).
            regs.pc = 0;
            return;
        }
        _ if crate::cpu::table::is_branch(mnemonic) => {
            branches::execute(mnemonic, opcode_pc, regs, bus);
            return;
        }
        _ => {}
    }

    // Every remaining mnemonic consumes its operand through the shared
    // addressing resolver; `regs.pc` is advanced past opcode + operand
    // bytes as a side effect.
    regs.pc = opcode_pc.wrapping_add(1);
    let op = addressing::resolve_operand(mode, &mut regs.pc, regs.x, regs.y, bus);

    if is_rmw(mnemonic) {
        execute_rmw(mnemonic, regs, bus, op);
        return;
    }

    match mnemonic {
        Mnemonic::Lda => load_store::lda(regs, bus, op),
        Mnemonic::Ldx => load_store::ldx(regs, bus, op),
        Mnemonic::Ldy => load_store::ldy(regs, bus, op),
        Mnemonic::Lax => load_store::lax(regs, bus, op),
        Mnemonic::Sta => load_store::sta(regs, bus, op),
        Mnemonic::Stx => load_store::stx(regs, bus, op),
        Mnemonic::Sty => load_store::sty(regs, bus, op),
        Mnemonic::Sax => load_store::sax(regs, bus, op),
        Mnemonic::Ane => load_store::ane(regs, bus, op),
        Mnemonic::Lxa => load_store::lxa(regs, bus, op),
        Mnemonic::Lae => load_store::lae(regs, bus, op),
        Mnemonic::Sha => store_unstable(load_store::sha, mode, opcode_pc, regs, bus, op),
        Mnemonic::Shx => store_unstable(load_store::shx, mode, opcode_pc, regs, bus, op),
        Mnemonic::Shy => store_unstable(load_store::shy, mode, opcode_pc, regs, bus, op),
        Mnemonic::Shs => store_unstable(load_store::shs, mode, opcode_pc, regs, bus, op),

        Mnemonic::And => logical::and(regs, bus, op),
        Mnemonic::Ora => logical::ora(regs, bus, op),
        Mnemonic::Eor => logical::eor(regs, bus, op),
        Mnemonic::Bit => logical::bit(regs, bus, op),
        Mnemonic::Anc => logical::anc(regs, bus, op),
        Mnemonic::Alr => logical::alr(regs, bus, op),
        Mnemonic::Arr => logical::arr(regs, bus, op),

        Mnemonic::Adc => arithmetic::adc(regs, bus, op),
        Mnemonic::Sbc => arithmetic::sbc(regs, bus, op),
        Mnemonic::Sbx => arithmetic::sbx(regs, bus, op),

        Mnemonic::Cmp => compare::cmp(regs, bus, op),
        Mnemonic::Cpx => compare::cpx(regs, bus, op),
        Mnemonic::Cpy => compare::cpy(regs, bus, op),

        Mnemonic::Clc => misc::clc(regs),
        Mnemonic::Sec => misc::sec(regs),
        Mnemonic::Cld => misc::cld(regs),
        Mnemonic::Sed => misc::sed(regs),
        Mnemonic::Cli => misc::cli(regs),
        Mnemonic::Sei => misc::sei(regs),
        Mnemonic::Clv => misc::clv(regs),

        Mnemonic::Tax => misc::tax(regs),
        Mnemonic::Tay => misc::tay(regs),
        Mnemonic::Txa => misc::txa(regs),
        Mnemonic::Tya => misc::tya(regs),
        Mnemonic::Tsx => misc::tsx(regs),
        Mnemonic::Txs => misc::txs(regs),

        Mnemonic::Inx => misc::inx(regs),
        Mnemonic::Iny => misc::iny(regs),
        Mnemonic::Dex => misc::dex(regs),
        Mnemonic::Dey => misc::dey(regs),

        Mnemonic::Pha => misc::pha(regs, bus),
        Mnemonic::Pla => misc::pla(regs, bus),
        Mnemonic::Php => misc::php(regs, bus),
        Mnemonic::Plp => misc::plp(regs, bus),

        Mnemonic::Nop => misc::nop(),

        Mnemonic::Jmp
        | Mnemonic::Jsr
        | Mnemonic::Rts
        | Mnemonic::Rti
        | Mnemonic::Brk
        | Mnemonic::Jam
        | Mnemonic::StartIrq
        | Mnemonic::StartNmi
        | Mnemonic::NullBurn
        | Mnemonic::Bcc
        | Mnemonic::Bcs
        | Mnemonic::Beq
        | Mnemonic::Bne
        | Mnemonic::Bpl
        | Mnemonic::Bmi
        | Mnemonic::Bvc
        | Mnemonic::Bvs
        | Mnemonic::Asl
        | Mnemonic::Lsr
        | Mnemonic::Rol
        | Mnemonic::Ror
        | Mnemonic::Inc
        | Mnemonic::Dec
        | Mnemonic::Slo
        | Mnemonic::Sre
        | Mnemonic::Rla
        | Mnemonic::Rra
        | Mnemonic::Isb
        | Mnemonic::Dcp => unreachable!("handled above"),
    }
}

/// Dispatch one of the four "unstable high-byte" stores, which need the
/// resolved address, the addressing mode, and the opcode's own location
/// (to recompute the high-byte-plus-one term) rather than a plain
/// `Operand`.
fn store_unstable(
    f: fn(&mut Registers, &mut dyn SystemBus, AddressingMode, u16, u16),
    mode: AddressingMode,
    opcode_pc: u16,
    regs: &mut Registers,
    bus: &mut dyn SystemBus,
    op: Operand,
) {
    if let Operand::Address(addr) = op {
        f(regs, bus, mode, opcode_pc.wrapping_add(1), addr);
    }
}

/// Sequence a read-modify-write instruction's two bus writes (original
/// value, then modified value) for the memory-operand case, or just update
/// the accumulator directly for the `Accumulator` addressing mode, which
/// never touches the bus at all.
fn execute_rmw(mnemonic: Mnemonic, regs: &mut Registers, bus: &mut dyn SystemBus, op: Operand) {
    match op {
        Operand::Accumulator => {
            let old = regs.a;
            let new = apply_rmw(mnemonic, regs, bus, old);
            regs.a = new;
        }
        Operand::Address(addr) => {
            let old = bus.mem_read(addr);
            bus.mem_write(addr, old);
            let new = apply_rmw(mnemonic, regs, bus, old);
            bus.mem_write(addr, new);
        }
        Operand::None | Operand::Immediate(_) => {
            unreachable!("RMW mnemonics never resolve to None/Immediate operands")
        }
    }
}

fn apply_rmw(mnemonic: Mnemonic, regs: &mut Registers, bus: &mut dyn SystemBus, old: u8) -> u8 {
    match mnemonic {
        Mnemonic::Asl => rmw::asl(regs, old),
        Mnemonic::Lsr => rmw::lsr(regs, old),
        Mnemonic::Rol => rmw::rol(regs, old),
        Mnemonic::Ror => rmw::ror(regs, old),
        Mnemonic::Inc => rmw::inc(regs, old),
        Mnemonic::Dec => rmw::dec(regs, old),
        Mnemonic::Slo => rmw::slo(regs, bus, old),
        Mnemonic::Sre => rmw::sre(regs, bus, old),
        Mnemonic::Rla => rmw::rla(regs, bus, old),
        Mnemonic::Rra => rmw::rra(regs, bus, old),
        Mnemonic::Isb => rmw::isb(regs, bus, old),
        Mnemonic::Dcp => rmw::dcp(regs, bus, old),
        _ => unreachable!("apply_rmw only called for RMW mnemonics"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RamBus;

    #[test]
    fn lda_immediate_advances_pc_by_two() {
        let mut bus = RamBus::new();
        bus.load(0x1000, &[0xA9, 0x42]);
        let mut r = Registers::new();
        r.pc = 0x1000;
        execute(Mnemonic::Lda, AddressingMode::Immediate, &mut r, &mut bus);
        assert_eq!(r.a, 0x42);
        assert_eq!(r.pc, 0x1002);
    }

    #[test]
    fn inc_zeropage_double_writes_before_and_after() {
        let mut bus = RamBus::new();
        bus.load(0x1000, &[0xE6, 0x10]);
        bus.ram[0x10] = 0x41;
        let mut r = Registers::new();
        r.pc = 0x1000;
        execute(Mnemonic::Inc, AddressingMode::ZeroPage, &mut r, &mut bus);
        assert_eq!(bus.ram[0x10], 0x42);
        assert_eq!(bus.write_log, vec![(0x10, 0x41), (0x10, 0x42)]);
    }

    #[test]
    fn asl_accumulator_never_touches_bus() {
        let mut bus = RamBus::new();
        bus.load(0x1000, &[0x0A]);
        let mut r = Registers::new();
        r.pc = 0x1000;
        r.a = 0x81;
        execute(Mnemonic::Asl, AddressingMode::Accumulator, &mut r, &mut bus);
        assert_eq!(r.a, 0x02);
        assert!(bus.write_log.is_empty());
    }

    #[test]
    fn jam_zeroes_pc() {
        let mut bus = RamBus::new();
        bus.load(0x1000, &[0x32]);
        let mut r = Registers::new();
        r.pc = 0x1000;
        execute(Mnemonic::Jam, AddressingMode::Implied, &mut r, &mut bus);
        assert_eq!(r.pc, 0);
    }
}
