/*!
addressing.rs - operand and effective-address resolution shared by the
Prefetch/Timing Unit (`cpu::cycles`) and the Execution Unit (`cpu::dispatch`).

Overview
========
Both passes over an instruction (the pure prefetch probe that computes
timing, and the real execution pass that performs side effects) must agree
byte-for-byte on how an addressing mode consumes operand bytes and computes
an effective address - otherwise the prefetch's page-crossing probe could
disagree with what execution actually reads. This module is the single
source of truth for that arithmetic; `cpu::cycles` calls it with a local,
disposable PC cursor, and `cpu::dispatch`/`cpu::execute` call it with the
real (mutating) `Registers::pc`.

Grounding
=========
Transcribed from `original_source/src/cpu.c`'s `getInput`/`setOutput`/
`operationSTx`/`adjustPageBoundaryCrossing`/`getH1`. The indexed-indirect
and indirect-indexed zero-page wraparound (`(ad + 1) & 0xff`) and the
absolute-indexed "add index to the 16-bit base, no special-case" arithmetic
are both preserved exactly.

Non-goals
=========
This module does not read or write the operand value itself for every mode
(that is `cpu::dispatch`'s job via `read_operand`/`EffectiveAddress::store`);
it only computes *where* the operand lives and advances the given cursor the
way the real hardware does.
*/

use crate::bus::SystemBus;
use crate::cpu::table::AddressingMode;

/// Where an addressing mode's operand lives, abstracted over whether the
/// caller is a disposable prefetch cursor or the real PC.
#[derive(Debug, Clone, Copy)]
pub enum Operand {
    /// No memory operand (implied); used for flag ops, transfers, etc.
    None,
    /// The accumulator itself.
    Accumulator,
    /// An immediate value already fetched from the instruction stream.
    Immediate(u8),
    /// A resolved effective address to read/write through the bus.
    Address(u16),
}

/// Advance `pc` past the opcode's operand bytes and resolve its operand,
/// mirroring `getInput`'s addressing-mode switch. Does not perform the
/// memory read for `Address` operands - callers read/write separately so
/// that RMW's double-write sequencing stays explicit at the call site.
///
/// `pc` is a plain `u16` cursor: pass `&mut registers.pc` during real
/// execution, or a disposable local during prefetch probing.
pub fn resolve_operand(
    mode: AddressingMode,
    pc: &mut u16,
    x: u8,
    y: u8,
    bus: &mut dyn SystemBus,
) -> Operand {
    use AddressingMode::*;
    match mode {
        Implied => Operand::None,
        Accumulator => Operand::Accumulator,
        Immediate => {
            let v = fetch_u8(pc, bus);
            Operand::Immediate(v)
        }
        ZeroPage => {
            let a = fetch_u8(pc, bus) as u16;
            Operand::Address(a)
        }
        ZeroPageX => {
            let a = (fetch_u8(pc, bus).wrapping_add(x)) as u16;
            Operand::Address(a)
        }
        ZeroPageY => {
            let a = (fetch_u8(pc, bus).wrapping_add(y)) as u16;
            Operand::Address(a)
        }
        Absolute => {
            let a = fetch_u16(pc, bus);
            Operand::Address(a)
        }
        AbsoluteX => {
            let base = fetch_u16(pc, bus);
            Operand::Address(base.wrapping_add(x as u16))
        }
        AbsoluteY => {
            let base = fetch_u16(pc, bus);
            Operand::Address(base.wrapping_add(y as u16))
        }
        Indirect => {
            // Only used by JMP (ind); resolved specially in control_flow.rs
            // because of the page-wrap bug. Still advance past the operand.
            let _ = fetch_u16(pc, bus);
            Operand::None
        }
        IndexedIndirectX => {
            let zp = fetch_u8(pc, bus).wrapping_add(x);
            let a = read_zp_ptr(bus, zp);
            Operand::Address(a)
        }
        IndirectIndexedY => {
            let zp = fetch_u8(pc, bus);
            let base = read_zp_ptr(bus, zp);
            Operand::Address(base.wrapping_add(y as u16))
        }
        Relative => {
            // Branch displacement; handled by cpu::dispatch::branches, which
            // needs the signed byte directly rather than an effective
            // address.
            let _ = fetch_u8(pc, bus);
            Operand::None
        }
    }
}

/// Read a little-endian 16-bit pointer from zero page, wrapping within the
/// zero page on the high-byte fetch (`(ad + 1) & 0xff`), as real 6510
/// indexed-indirect/indirect-indexed addressing does.
#[inline]
fn read_zp_ptr(bus: &mut dyn SystemBus, zp: u8) -> u16 {
    let lo = bus.mem_read(zp as u16) as u16;
    let hi = bus.mem_read(zp.wrapping_add(1) as u16) as u16;
    (hi << 8) | lo
}

#[inline]
pub fn fetch_u8(pc: &mut u16, bus: &mut dyn SystemBus) -> u8 {
    let v = bus.mem_read(*pc);
    *pc = pc.wrapping_add(1);
    v
}

#[inline]
pub fn fetch_u16(pc: &mut u16, bus: &mut dyn SystemBus) -> u16 {
    let lo = fetch_u8(pc, bus) as u16;
    let hi = fetch_u8(pc, bus) as u16;
    (hi << 8) | lo
}

/// Read the final operand byte for any `Operand`, given the accumulator's
/// current value (needed for `Operand::Accumulator`).
#[inline]
pub fn read_operand(op: Operand, acc: u8, bus: &mut dyn SystemBus) -> u8 {
    match op {
        Operand::None => 0,
        Operand::Accumulator => acc,
        Operand::Immediate(v) => v,
        Operand::Address(addr) => bus.mem_read(addr),
    }
}

/// Probe whether resolving `mode` at `pc` (without mutating caller state
/// beyond the local cursor) crosses a 256-byte page boundary, per `spec.md`
/// §4.3 step 3. Only meaningful for `AbsoluteX`/`AbsoluteY`/
/// `IndirectIndexedY`; other modes never incur this penalty and return
/// `false`.
pub fn crosses_page_boundary(
    mode: AddressingMode,
    pc: u16,
    x: u8,
    y: u8,
    bus: &mut dyn SystemBus,
) -> bool {
    use AddressingMode::*;
    let mut cursor = pc;
    match mode {
        AbsoluteX => {
            let base = fetch_u16(&mut cursor, bus);
            let eff = base.wrapping_add(x as u16);
            (base & 0xFF00) != (eff & 0xFF00)
        }
        AbsoluteY => {
            let base = fetch_u16(&mut cursor, bus);
            let eff = base.wrapping_add(y as u16);
            (base & 0xFF00) != (eff & 0xFF00)
        }
        IndirectIndexedY => {
            let zp = fetch_u8(&mut cursor, bus);
            let base = read_zp_ptr(bus, zp);
            let eff = base.wrapping_add(y as u16);
            (base & 0xFF00) != (eff & 0xFF00)
        }
        _ => false,
    }
}

/// Compute the high-byte-plus-one value some illegal store opcodes
/// (SHA/SHX/SHY/SHS) AND against the stored register, without mutating
/// `pc` (the instruction's own operand consumption already advanced it).
/// Grounded in `cpu.c`'s `getH1`.
pub fn high_byte_plus_one(mode: AddressingMode, pc: u16, x: u8, y: u8, bus: &mut dyn SystemBus) -> u8 {
    use AddressingMode::*;
    let mut cursor = pc;
    match mode {
        Absolute => {
            let _lo = fetch_u8(&mut cursor, bus);
            let hi = fetch_u8(&mut cursor, bus);
            hi.wrapping_add(1)
        }
        AbsoluteX => {
            let base = fetch_u16(&mut cursor, bus);
            let eff = base.wrapping_add(x as u16);
            ((eff >> 8) as u8).wrapping_add(1)
        }
        AbsoluteY => {
            let base = fetch_u16(&mut cursor, bus);
            let eff = base.wrapping_add(y as u16);
            ((eff >> 8) as u8).wrapping_add(1)
        }
        ZeroPage => {
            let zp = fetch_u8(&mut cursor, bus) as u16;
            ((zp >> 8) as u8).wrapping_add(1)
        }
        IndexedIndirectX => {
            let zp = fetch_u8(&mut cursor, bus).wrapping_add(x);
            let a = read_zp_ptr(bus, zp);
            ((a >> 8) as u8).wrapping_add(1)
        }
        IndirectIndexedY => {
            let zp = fetch_u8(&mut cursor, bus);
            let base = read_zp_ptr(bus, zp);
            ((base.wrapping_add(y as u16) >> 8) as u8).wrapping_add(1)
        }
        _ => 0,
    }
}

/// Write `value` to the address an already-resolved `Operand` points at
/// (or to the accumulator). No-op for `Operand::None`/`Operand::Immediate`.
#[inline]
pub fn store_operand(op: Operand, value: u8, acc: &mut u8, bus: &mut dyn SystemBus) {
    match op {
        Operand::Accumulator => *acc = value,
        Operand::Address(addr) => bus.mem_write(addr, value),
        Operand::None | Operand::Immediate(_) => {}
    }
}
