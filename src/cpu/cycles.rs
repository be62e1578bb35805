/*!
cycles.rs - Prefetch/Timing Unit (`spec.md` §4.3).

Overview
========
Computes, once per instruction and before any execution side effects, how
many bus cycles the instruction will occupy and at which cycle (if any) it
starts writing to the bus. This is a pure function over the opcode, the
addressing mode's page-crossing behaviour, and (for branches) whether the
branch is taken - it never mutates `Registers` or the bus beyond the reads
needed to inspect the operand bytes that determine page-crossing.

Grounding
=========
`original_source/src/cpu.c`'s `prefetchOperation()`: fetches the opcode,
looks up `_opbase_frame_cycles[op]` as the baseline, then folds in
`adjustPageBoundaryCrossing` (for the indexed-addressing mnemonics in
`pays_page_penalty`) and the branch-taken extra cycle (with a further +1 if
the branch also crosses a page). The interrupt lead-time arithmetic that
`prefetchOperation` also performs is not duplicated here - it belongs to
`cpu::interrupts` which owns the commitment decision, and is applied by
`cpu::unit` when scheduling a pseudo-op.
*/

use crate::bus::SystemBus;
use crate::cpu::addressing;
use crate::cpu::table::{self, AddressingMode, Mnemonic};

/// Outcome of prefetching one instruction: how long it takes and when (if
/// ever) it starts writing to the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefetchResult {
    pub opcode: u8,
    pub mnemonic: Mnemonic,
    pub mode: AddressingMode,
    /// Total bus cycles this instruction will occupy, including any
    /// page-crossing or branch-taken penalty.
    pub total_cycles: u8,
    /// 1-based cycle number at which the instruction first writes to the
    /// bus, or `None` if it never writes.
    pub bus_write_start: Option<u8>,
    /// Interrupt lead time that applies while this instruction is in
    /// flight: 2 by default, bumped to 3 for a taken branch that stays on
    /// the same page (`spec.md` §4.3 step 4 - such a branch's 3rd cycle
    /// leaves one less cycle of interrupt-polling window than other 3-cycle
    /// instructions).
    pub lead_time: u8,
}

/// Prefetch the instruction at `pc` (without advancing the real PC): read
/// the opcode, look up its table entries, and fold in the page-crossing and
/// branch-taken penalties that `spec.md` §4.3 describes. `branch_taken`
/// must be supplied by the caller for branch mnemonics (the 6510 doesn't
/// know whether a branch is taken until the flag test happens in
/// execution, but by hardware convention the *timing* decision is made
/// against the condition at prefetch time since both passes read the same
/// committed flags).
pub fn prefetch(pc: u16, x: u8, y: u8, branch_taken: bool, bus: &mut dyn SystemBus) -> PrefetchResult {
    let opcode = bus.mem_read(pc);
    let mnemonic = table::MNEMONICS[opcode as usize];
    let mode = table::MODES[opcode as usize];
    let base = table::BASE_CYCLES[opcode as usize];
    let write_start = table::BUS_WRITE_START[opcode as usize];

    let mut total = base;
    let mut lead_time = 2u8;

    if table::pays_page_penalty(mnemonic) {
        // Operand bytes start right after the opcode byte.
        if addressing::crosses_page_boundary(mode, pc.wrapping_add(1), x, y, bus) {
            total = total.saturating_add(1);
        }
    }

    if table::is_branch(mnemonic) && branch_taken {
        total = total.saturating_add(1);
        let target = branch_target(pc, bus);
        // The "next instruction" page, for a branch's own page-crossing
        // purposes, is the address right after the 2-byte branch
        // instruction.
        let next = pc.wrapping_add(2);
        if (next & 0xFF00) != (target & 0xFF00) {
            total = total.saturating_add(1);
        } else {
            lead_time += 1;
        }
    }

    PrefetchResult {
        opcode,
        mnemonic,
        mode,
        total_cycles: total,
        bus_write_start: if write_start == 0 { None } else { Some(write_start) },
        lead_time,
    }
}

/// Resolve a relative branch's target address from the opcode's own
/// location, without mutating any real register.
pub fn branch_target(pc: u16, bus: &mut dyn SystemBus) -> u16 {
    let displacement = bus.mem_read(pc.wrapping_add(1)) as i8;
    let after = pc.wrapping_add(2);
    after.wrapping_add(displacement as i16 as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RamBus;

    #[test]
    fn lda_immediate_is_two_cycles_no_write() {
        let mut bus = RamBus::new();
        bus.load(0x1000, &[0xA9, 0x42]); // LDA #$42
        let r = prefetch(0x1000, 0, 0, false, &mut bus);
        assert_eq!(r.total_cycles, 2);
        assert_eq!(r.bus_write_start, None);
    }

    #[test]
    fn lda_absolute_x_page_cross_adds_one_cycle() {
        let mut bus = RamBus::new();
        bus.load(0x1000, &[0xBD, 0xFF, 0x20]); // LDA $20FF,X
        let no_cross = prefetch(0x1000, 0x00, 0, false, &mut bus);
        assert_eq!(no_cross.total_cycles, 4);
        let cross = prefetch(0x1000, 0x01, 0, false, &mut bus);
        assert_eq!(cross.total_cycles, 5);
    }

    #[test]
    fn branch_not_taken_costs_base_cycles_only() {
        let mut bus = RamBus::new();
        bus.load(0x1000, &[0xD0, 0x10]); // BNE +16
        let r = prefetch(0x1000, 0, 0, false, &mut bus);
        assert_eq!(r.total_cycles, 2);
    }

    #[test]
    fn branch_taken_same_page_costs_one_extra() {
        let mut bus = RamBus::new();
        bus.load(0x1000, &[0xD0, 0x10]); // BNE +16, target 0x1012, same page
        let r = prefetch(0x1000, 0, 0, true, &mut bus);
        assert_eq!(r.total_cycles, 3);
    }

    #[test]
    fn branch_taken_crossing_page_costs_two_extra() {
        let mut bus = RamBus::new();
        bus.load(0x10F0, &[0xD0, 0x20]); // BNE +32, target = 0x1112, crosses page
        let r = prefetch(0x10F0, 0, 0, true, &mut bus);
        assert_eq!(r.total_cycles, 4);
    }

    #[test]
    fn inc_zeropage_reports_bus_write_start() {
        let mut bus = RamBus::new();
        bus.load(0x1000, &[0xE6, 0x10]); // INC $10
        let r = prefetch(0x1000, 0, 0, false, &mut bus);
        assert_eq!(r.bus_write_start, Some(3));
    }
}
