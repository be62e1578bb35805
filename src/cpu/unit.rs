/*!
unit.rs - the owning `Cpu` type: in-flight instruction record, `step()`
orchestration, and the crate's public API (`spec.md` §4.4, §4.6, §5, §6).

Overview
========
`Cpu::step` is the single entry point that advances the whole model by one
system clock cycle, honoring the ordering contract from `spec.md` §5:
  (a) sample interrupt lines (always, regardless of stun);
  (b) check stun mode, suppressing the tick's advance if stunned;
  (c) advance the in-flight instruction, or dispatch a new one.

Grounding
=========
`original_source/src/cpu.c`'s `cpuClockRSID`/`cpuClockPSID` (the two step
variants selected by `reset`'s `is_rsid` flag - PSID skips NMI handling
entirely for a ~5% speedup on the simpler song format) and
`CHECK_FOR_VIC_STUN`. `cpuInit`/`cpuSetProgramCounter`/
`cpuSetProgramCounterPSID`/`cpuIrqFlagPSID`/`cpuIsValidPcPSID` ground the
public API below.
*/

use crate::bus::{StunMode, SystemBus};
use crate::cpu::cycles;
use crate::cpu::dispatch::{branches, control_flow};
use crate::cpu::execute;
use crate::cpu::interrupts::{self, IrqController, NmiController};
use crate::cpu::regs::{Registers, IRQ_DISABLE};
use crate::cpu::table::{self, AddressingMode, Mnemonic};

/// The instruction currently in flight: fully decoded, counting down to
/// its atomic-completion tick (`spec.md` §3's "Instruction-in-flight
/// record", modeled here as `Option<InFlight>` rather than the original's
/// `opcode == -1` sentinel).
#[derive(Debug, Clone, Copy)]
struct InFlight {
    opcode: u8,
    mnemonic: Mnemonic,
    mode: AddressingMode,
    cycles_total: u8,
    cycles_remaining: u8,
    /// Only meaningful for `StartIrq`: true when this dispatch was only
    /// reached via the "last op was SEI" escape clause (`spec.md` §4.5)
    /// while `IRQ_DISABLE` is already set - i.e. the commitment predates
    /// SEI's completion. The pushed status byte then reports `I` clear,
    /// matching `spec.md` §8 scenario 5 ("I clear at the time of the
    /// push"): the interrupt was recognized before SEI's effect applied,
    /// so the value written to the stack reflects that, even though the
    /// live `P` register has already had `I` set by SEI's own completion.
    force_i_clear_on_push: bool,
}

/// A cycle-accurate MOS 6510 CPU core, driving arbitrary 6510 machine code
/// in lock-step with an external video chip's interrupt lines and stun
/// signal. See the crate root for the full overview.
pub struct Cpu {
    regs: Registers,
    in_flight: Option<InFlight>,
    irq_ctrl: IrqController,
    nmi_ctrl: NmiController,
    last_opcode: u8,
    interrupt_lead_time: u8,
    /// Selects the full (RSID, NMI-aware) or reduced (PSID, IRQ-only) step
    /// variant; see `reset`.
    is_rsid: bool,
}

impl Default for Cpu {
    fn default() -> Self {
        Self {
            regs: Registers::new(),
            in_flight: None,
            irq_ctrl: IrqController::new(),
            nmi_ctrl: NmiController::new(),
            last_opcode: 0,
            interrupt_lead_time: 2,
            is_rsid: true,
        }
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct read access to the register file, e.g. for host-side
    /// inspection or save states.
    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    /// Direct mutable access to the register file, for host-side setup
    /// (e.g. seeding `PC`/`X`/`Y` directly in tests) beyond what the
    /// public `set_program_counter*` entry points cover.
    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.regs
    }

    /// `reset(is_rsid)` (`spec.md` §6): zero registers, clear the in-flight
    /// record, clear interrupt state, and select the full step function
    /// (`is_rsid = true`, includes NMI handling) or the reduced one
    /// (`is_rsid = false`, IRQ only, ~5% faster - used for the simpler PSID
    /// song format).
    pub fn reset(&mut self, is_rsid: bool) {
        self.regs = Registers::new();
        // `cpuRegReset` zeroes everything; real power-on/reset sequences
        // then seed the stack pointer to 0xFF before any push happens.
        self.regs.s = 0xFF;
        self.in_flight = None;
        self.irq_ctrl = IrqController::new();
        self.nmi_ctrl = NmiController::new();
        self.last_opcode = 0;
        self.interrupt_lead_time = 2;
        self.is_rsid = is_rsid;
    }

    /// `set_program_counter(pc, a)` (`spec.md` §6): initialize `A` and
    /// `PC`, and push two sentinel zero bytes so that an eventual `RTS`
    /// returns to address 1 - the conventional "init complete" sentinel
    /// used by players that call into a tune's init routine and expect it
    /// to `RTS` back out.
    pub fn set_program_counter(&mut self, pc: u16, a: u8, bus: &mut dyn SystemBus) {
        self.regs.push_u16(bus, 0);
        self.regs.a = a;
        self.regs.pc = pc;
    }

    /// `set_program_counter_simple(pc)` (`spec.md` §6): the PSID-format
    /// variant of `set_program_counter` that does not set `A` but does
    /// clear `IRQ_DISABLE`, so a simple player's init routine always runs
    /// with interrupts unmasked.
    pub fn set_program_counter_simple(&mut self, pc: u16, bus: &mut dyn SystemBus) {
        self.regs.push_u16(bus, 0);
        self.regs.pc = pc;
        self.regs.set_flag(IRQ_DISABLE, false);
    }

    /// `irq_flag_simple(on)` (`spec.md` §6): force `IRQ_DISABLE` for
    /// simple-format (PSID) playback, which drives the CPU without ever
    /// asserting a real interrupt line.
    pub fn irq_flag_simple(&mut self, on: bool) {
        self.regs.set_flag(IRQ_DISABLE, on);
    }

    /// `is_valid_pc_simple()` (`spec.md` §6): the sentinel detector - `PC`
    /// is only `0` or `1` immediately after the `set_program_counter`
    /// sentinel's `RTS` has unwound, so `PC > 1` means a tune is still
    /// legitimately executing.
    pub fn is_valid_pc_simple(&self) -> bool {
        self.regs.pc > 1
    }

    /// Advance the model by exactly one system clock cycle (`spec.md` §5,
    /// §6's `step()`).
    pub fn step(&mut self, bus: &mut dyn SystemBus) {
        let now = bus.cycles_now();

        // (a) Sample interrupt lines, always, regardless of stun.
        let in_last_cycle_of_sei = self
            .in_flight
            .map(|f| f.mnemonic == Mnemonic::Sei && f.cycles_remaining == 1)
            .unwrap_or(false);
        self.irq_ctrl.sample(
            bus.irq_line(),
            self.regs.flag(IRQ_DISABLE),
            in_last_cycle_of_sei,
            now,
        );
        if self.is_rsid {
            self.nmi_ctrl.sample(bus.nmi_line(), now);
        }

        // (b) Check stun.
        if !self.tick_may_proceed(bus.stun_mode()) {
            return;
        }

        // (c) Advance the in-flight instruction, or dispatch a new one.
        match self.in_flight.take() {
            None => self.dispatch_next(now, bus),
            Some(mut f) => {
                f.cycles_remaining -= 1;
                if f.cycles_remaining == 0 {
                    if f.mnemonic == Mnemonic::StartIrq && f.force_i_clear_on_push {
                        control_flow::start_irq(self.regs.pc, &mut self.regs, bus, true);
                    } else {
                        execute::execute(f.mnemonic, f.mode, &mut self.regs, bus);
                    }
                    self.last_opcode = f.opcode;
                } else {
                    self.in_flight = Some(f);
                }
            }
        }
    }

    /// `spec.md` §4.6: with no in-flight op, a stunned CPU is fully
    /// suppressed; with one in flight, `WRITE_ALLOWED` only lets the tick
    /// proceed once the op has reached its own bus-write phase.
    fn tick_may_proceed(&self, stun: StunMode) -> bool {
        match stun {
            StunMode::NotStunned => true,
            StunMode::FullyStunned => false,
            StunMode::WriteAllowed => match self.in_flight {
                None => false,
                Some(f) => match write_start(f.opcode) {
                    None => false,
                    Some(start) => {
                        let position = f.cycles_total - f.cycles_remaining + 1;
                        position >= start
                    }
                },
            },
        }
    }

    /// Idle-tick handling (`spec.md` §4.4): dispatch a committed interrupt
    /// if one is ready (NMI takes strict priority), otherwise prefetch and
    /// load the next real instruction.
    fn dispatch_next(&mut self, now: u32, bus: &mut dyn SystemBus) {
        let nmi_ready = self.is_rsid && self.nmi_ctrl.is_ready(now, self.interrupt_lead_time);
        let irq_ready = self.irq_ctrl.is_ready(
            self.regs.flag(IRQ_DISABLE),
            interrupts::last_opcode_was_sei(self.last_opcode),
            now,
            self.interrupt_lead_time,
        );

        if nmi_ready {
            self.nmi_ctrl.take_commitment();
            // Raised here, at the dispatch decision, not on the handler's
            // completion - some PSID-era digi-sample recordings rely on
            // seeing the marker go high before the NMI handler's first
            // instruction (`original_source/src/cpu.c`'s `sysSetNMIMarker(1)`
            // call site, inside the idle-tick dispatch branch itself).
            bus.set_nmi_marker(true);
            self.load_pseudo_op(table::START_NMI_OPCODE, Mnemonic::StartNmi, false);
        } else if irq_ready {
            self.irq_ctrl.take_commitment();
            // This dispatch only needed the SEI-escape clause if IRQ_DISABLE
            // is already set - otherwise it was ready via the ordinary
            // "I clear" path and the live P already reflects that.
            let via_sei_escape = self.regs.flag(IRQ_DISABLE)
                && interrupts::last_opcode_was_sei(self.last_opcode);
            self.load_pseudo_op(table::START_IRQ_OPCODE, Mnemonic::StartIrq, via_sei_escape);
        } else {
            let opcode_peek = bus.mem_read(self.regs.pc);
            let mnemonic_peek = table::MNEMONICS[opcode_peek as usize];
            let taken = table::is_branch(mnemonic_peek) && branches::is_taken(mnemonic_peek, &self.regs);
            let result = cycles::prefetch(self.regs.pc, self.regs.x, self.regs.y, taken, bus);
            self.interrupt_lead_time = result.lead_time;
            self.in_flight = Some(InFlight {
                opcode: result.opcode,
                mnemonic: result.mnemonic,
                mode: result.mode,
                cycles_total: result.total_cycles,
                cycles_remaining: result.total_cycles - 1,
                force_i_clear_on_push: false,
            });
        }
    }

    fn load_pseudo_op(&mut self, opcode: u8, mnemonic: Mnemonic, force_i_clear_on_push: bool) {
        self.in_flight = Some(InFlight {
            opcode,
            mnemonic,
            mode: AddressingMode::Implied,
            cycles_total: table::PSEUDO_OP_CYCLES,
            cycles_remaining: table::PSEUDO_OP_CYCLES - 1,
            force_i_clear_on_push,
        });
    }
}

#[inline]
fn write_start(opcode: u8) -> Option<u8> {
    let v = table::BUS_WRITE_START[opcode as usize];
    if v == 0 {
        None
    } else {
        Some(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RamBus;

    fn run_to_completion(cpu: &mut Cpu, bus: &mut RamBus) {
        loop {
            bus.tick();
            cpu.step(bus);
            if cpu.in_flight.is_none() {
                break;
            }
        }
    }

    #[test]
    fn lda_absolute_x_page_cross_scenario() {
        // spec.md §8 scenario 1.
        let mut bus = RamBus::new();
        bus.load(0x1000, &[0xBD, 0xFF, 0x20]);
        bus.ram[0x2100] = 0x77;
        let mut cpu = Cpu::new();
        cpu.reset(true);
        cpu.registers_mut().pc = 0x1000;
        cpu.registers_mut().x = 1;
        let mut elapsed = 0u32;
        loop {
            bus.tick();
            cpu.step(&mut bus);
            elapsed += 1;
            if cpu.in_flight.is_none() {
                break;
            }
        }
        assert_eq!(cpu.registers().a, 0x77);
        assert_eq!(elapsed, 5);
    }

    #[test]
    fn indirect_jmp_page_bug_scenario() {
        // spec.md §8 scenario 2.
        let mut bus = RamBus::new();
        bus.load(0x2000, &[0x6C, 0xFF, 0x30]);
        bus.ram[0x30FF] = 0x34;
        bus.ram[0x3000] = 0x12;
        let mut cpu = Cpu::new();
        cpu.reset(true);
        cpu.registers_mut().pc = 0x2000;
        run_to_completion(&mut cpu, &mut bus);
        assert_eq!(cpu.registers().pc, 0x1234);
    }

    #[test]
    fn rmw_double_write_scenario() {
        // spec.md §8 scenario 3.
        let mut bus = RamBus::new();
        bus.load(0x3000, &[0xEE, 0x19, 0xD0]);
        bus.ram[0xD019] = 0x81;
        let mut cpu = Cpu::new();
        cpu.reset(true);
        cpu.registers_mut().pc = 0x3000;
        run_to_completion(&mut cpu, &mut bus);
        assert_eq!(bus.write_log, vec![(0xD019, 0x81), (0xD019, 0x82)]);
    }

    #[test]
    fn is_valid_pc_simple_detects_sentinel() {
        let mut cpu = Cpu::new();
        cpu.reset(false);
        assert!(!cpu.is_valid_pc_simple());
        cpu.registers_mut().pc = 2;
        assert!(cpu.is_valid_pc_simple());
    }

    #[test]
    fn sei_then_irq_pushes_i_clear_scenario() {
        // spec.md §8 scenario 5.
        let mut bus = RamBus::new();
        bus.load(0x7000, &[0x78]); // SEI
        bus.ram[0xFFFE] = 0x00;
        bus.ram[0xFFFF] = 0x90;
        bus.irq = true;
        let mut cpu = Cpu::new();
        cpu.reset(true);
        cpu.registers_mut().pc = 0x7000;

        run_to_completion(&mut cpu, &mut bus); // SEI completes, I becomes set
        assert!(cpu.registers().flag(IRQ_DISABLE));

        run_to_completion(&mut cpu, &mut bus); // the committed IRQ dispatches next
        assert_eq!(cpu.registers().pc, 0x9000);
        let pushed_status = bus.ram[0x01FD];
        assert_eq!(pushed_status & 0x20, 0x20, "B1 must read as set");
        assert_eq!(pushed_status & 0x10, 0, "B0 must read as clear");
        assert_eq!(pushed_status & IRQ_DISABLE, 0, "I must read as clear at the time of the push");
        // Live P still ends up with I set, as any IRQ dispatch does.
        assert!(cpu.registers().flag(IRQ_DISABLE));
    }

    #[test]
    fn irq_deferred_by_same_page_branch_lead_time_scenario() {
        // spec.md §8 scenario 4.
        let mut bus = RamBus::new();
        bus.load(0x4000, &[0xD0, 0x02]); // BNE +2, taken (Z clear), same page
        bus.load(0x4004, &[0xEA]);
        bus.irq = true;
        let mut cpu = Cpu::new();
        cpu.reset(true);
        cpu.registers_mut().pc = 0x4000;

        let mut elapsed = 0u32;
        loop {
            bus.tick();
            cpu.step(&mut bus);
            elapsed += 1;
            assert_ne!(
                cpu.in_flight.map(|f| f.mnemonic),
                Some(Mnemonic::StartIrq),
                "the committed IRQ must not preempt the branch already in flight"
            );
            if cpu.in_flight.is_none() {
                break;
            }
        }
        assert_eq!(elapsed, 3, "a taken same-page branch costs exactly 3 cycles");
        assert_eq!(cpu.registers().pc, 0x4004);

        // The branch's bumped lead time (3, vs. the usual 2) means the IRQ
        // committed during its first cycle is not yet ready when the branch
        // completes; it dispatches on the very next tick instead.
        bus.tick();
        cpu.step(&mut bus);
        assert_eq!(cpu.in_flight.map(|f| f.mnemonic), Some(Mnemonic::StartIrq));
    }

    #[test]
    fn nmi_priority_over_irq_scenario() {
        // spec.md §8 scenario 6.
        let mut bus = RamBus::new();
        bus.load(0x5000, &[0xEA]); // idle instruction before both lines are noticed
        bus.load(0x6000, &[0x40]); // RTI, the NMI handler
        bus.ram[0xFFFA] = 0x00;
        bus.ram[0xFFFB] = 0x60; // NMI vector -> $6000
        bus.irq = true;
        bus.nmi = true;
        let mut cpu = Cpu::new();
        cpu.reset(true);
        cpu.registers_mut().pc = 0x5000;

        let mut saw_start_nmi = false;
        let mut saw_start_irq_after_nmi = false;
        for _ in 0..40 {
            bus.tick();
            cpu.step(&mut bus);
            match cpu.in_flight.map(|f| f.mnemonic) {
                Some(Mnemonic::StartNmi) => saw_start_nmi = true,
                Some(Mnemonic::StartIrq) if saw_start_nmi => {
                    saw_start_irq_after_nmi = true;
                    break;
                }
                _ => {}
            }
        }
        assert!(saw_start_nmi, "NMI must dispatch ahead of the committed IRQ");
        assert!(
            saw_start_irq_after_nmi,
            "the IRQ stays committed through the NMI handler and dispatches once its RTI restores I clear"
        );
    }

    #[test]
    fn fully_stunned_suppresses_all_progress() {
        let mut bus = RamBus::new();
        bus.load(0x1000, &[0xA9, 0x42]);
        bus.stun = crate::bus::StunMode::FullyStunned;
        let mut cpu = Cpu::new();
        cpu.reset(true);
        cpu.registers_mut().pc = 0x1000;
        bus.tick();
        cpu.step(&mut bus);
        assert!(cpu.in_flight.is_none(), "stunned tick must not even dispatch");
    }
}
