/*!
interrupts.rs - Interrupt Controller (`spec.md` §4.5).

Overview
========
Owns the two independent commitment state machines that decide, once per
tick, whether the instruction dispatched next by `cpu::unit::Cpu::step` is
a real opcode or one of the synthesized `StartIrq`/`StartNmi` pseudo-ops.

IRQ is level-sensitive: as long as `irq_line()` is asserted and the
`IRQ_DISABLE` flag is clear, a commitment is recorded (or renewed) every
tick. NMI is edge-triggered: a commitment is recorded once on the
unasserted-to-asserted transition and is not renewed again until the line
has been observed low at least once in between (`line_held` below guards
exactly that). Both controllers additionally require the line to have been
continuously asserted for at least `interrupt_lead_time` cycles
(`cpu::cycles::PrefetchResult::lead_time`) before a commitment becomes
ready to dispatch - this lead time models the real chip's internal
opcode-fetch-vs-interrupt-latch race.

SEI / RTI timing
================
Two details are carried over faithfully rather than "fixed", because real
playback code has been observed to depend on the imprecise original
behaviour (`spec.md` §5, §9):

- A pending IRQ that becomes ready immediately after SEI completes is
  still dispatched once the *next* tick, because this core collapses an
  instruction's flag-setting side effect to its completion tick rather
  than mid-instruction; `last_opcode_was_sei` grants IRQ readiness after
  only 1 elapsed cycle instead of the usual `interrupt_lead_time`, and
  `in_last_cycle_of_sei` suppresses a fresh IRQ *commitment* on SEI's own
  final tick so the flag's imminent effect isn't bypassed.
- RTI's post-completion interrupt poll runs at the same instruction
  boundary as every other instruction, with no further special-casing; an
  attempt in the original engine to special-case it further was reverted
  as making things worse, so this core leaves the same imprecision in
  place (see `SPEC_FULL.md` §9).
*/

#[derive(Debug, Clone, Copy, Default)]
pub struct IrqController {
    committed: bool,
    line_ts: Option<u32>,
}

impl IrqController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-tick sample (`spec.md` §4.5, "IRQ sample"). Call once per tick,
    /// before the in-flight op advances. `in_last_cycle_of_sei` suppresses
    /// a fresh commitment on SEI's own completing tick.
    pub fn sample(&mut self, irq_line: bool, irq_disable_flag: bool, in_last_cycle_of_sei: bool, now: u32) {
        let condition = irq_line && !irq_disable_flag && !in_last_cycle_of_sei;
        if condition {
            if self.line_ts.is_none() {
                self.line_ts = Some(now);
            }
            self.committed = true;
        } else if !self.committed {
            self.line_ts = None;
        }
    }

    /// Dispatch readiness (`spec.md` §4.5, "Dispatch readiness" (a)/(b)).
    pub fn is_ready(&self, irq_disable_flag: bool, last_opcode_was_sei: bool, now: u32, lead_time: u8) -> bool {
        if !self.committed {
            return false;
        }
        let ts = match self.line_ts {
            Some(t) => t,
            None => return false,
        };
        let elapsed = now.wrapping_sub(ts);
        (last_opcode_was_sei && elapsed >= 1) || (!irq_disable_flag && elapsed >= lead_time as u32)
    }

    /// Consume the commitment at dispatch.
    pub fn take_commitment(&mut self) -> bool {
        let was = self.committed;
        self.committed = false;
        self.line_ts = None;
        was
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NmiController {
    committed: bool,
    line_held: bool,
    line_ts: Option<u32>,
}

impl NmiController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-tick sample (`spec.md` §4.5, "NMI sample"). Edge-triggered: a
    /// commitment is recorded only on the unasserted-to-asserted
    /// transition. A committed NMI stays pending across the line dropping;
    /// only `take_commitment` clears it.
    pub fn sample(&mut self, nmi_line: bool, now: u32) {
        if nmi_line {
            if !self.line_held {
                self.line_held = true;
                self.line_ts = Some(now);
                self.committed = true;
            }
        } else {
            self.line_held = false;
        }
    }

    /// Dispatch readiness (`spec.md` §4.5, "Dispatch readiness").
    pub fn is_ready(&self, now: u32, lead_time: u8) -> bool {
        if !self.committed {
            return false;
        }
        match self.line_ts {
            Some(t) => now.wrapping_sub(t) >= lead_time as u32,
            None => false,
        }
    }

    pub fn take_commitment(&mut self) -> bool {
        let was = self.committed;
        self.committed = false;
        self.line_ts = None;
        was
    }
}

/// Decide, given the last-dispatched opcode, whether the CPU is inside the
/// one-instruction IRQ-masking delay that real hardware exhibits right
/// after SEI executes.
#[inline]
pub fn last_opcode_was_sei(opcode: u8) -> bool {
    opcode == crate::cpu::table::SEI_OPCODE
}
