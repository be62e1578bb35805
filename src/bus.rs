/*!
bus.rs - External-collaborator interface consumed by the CPU core.

Overview
========
The CPU core never touches memory banking, I/O mapping, the video chip's
pixel pipeline, or the sound chip directly. It only ever calls through a
small set of primitives, gathered here into a single `SystemBus` trait so
the core can be constructed against anything that implements it (production
C64 bus, a stub for unit tests, a trace-recording wrapper, ...).

Scope
=====
This module intentionally contains no memory map, no mapper logic, and no
peripheral emulation. It is the seam `spec.md` §6 describes: "the core
CONSUMES, from external collaborators". Implementing the other side of this
trait (real RAM/ROM/I/O mapping, a real VIC-II badline signal, real CIA
timers) is out of scope for this crate.

Stun Semantics
==============
See `spec.md` §4.6 / §9. `StunMode::WriteAllowed` lets an in-flight
instruction's *remaining bus writes* complete (BRK/JSR pushing their return
address, a plain store finishing its write) while blocking anything that
would still need to read memory; `cpu::unit` is the only place that
interprets this mode.
*/

/// What the video chip is telling the CPU about bus arbitration this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StunMode {
    /// The CPU may proceed normally.
    NotStunned,
    /// The CPU may not touch the bus at all this cycle.
    FullyStunned,
    /// The in-flight instruction may continue only if it is within the
    /// portion of its execution that performs bus *writes* (see the
    /// opcode's bus-write-start table entry in `cpu::table`).
    WriteAllowed,
}

/// Everything the CPU core needs from the rest of the system.
///
/// Implementors own the actual memory map, I/O register behavior, VIC-II
/// badline detection, and CIA/VIA timer state; the CPU only ever calls
/// through this trait. Passed as `&mut dyn SystemBus` at every call site
/// that needs bus access, so the CPU type itself stays free of a generic
/// parameter.
pub trait SystemBus {
    /// Read through the full (possibly I/O-mapped) memory map.
    fn mem_read(&mut self, addr: u16) -> u8;
    /// Write through the full (possibly I/O-mapped) memory map.
    fn mem_write(&mut self, addr: u16, val: u8);

    /// Read RAM directly, bypassing any I/O overlay. Used for stack access:
    /// the 6510 stack page is never remapped to I/O, and the bus collaborator
    /// must guarantee that even if `mem_read`/`mem_write` at `$0100-$01FF`
    /// would otherwise be intercepted.
    fn raw_ram_read(&mut self, addr: u16) -> u8;
    /// Write RAM directly, bypassing any I/O overlay. See `raw_ram_read`.
    fn raw_ram_write(&mut self, addr: u16, val: u8);

    /// Maskable interrupt line, sampled once per cycle.
    fn irq_line(&self) -> bool;
    /// Non-maskable interrupt line, sampled once per cycle. Edge-triggered
    /// by the interrupt controller, not by this method.
    fn nmi_line(&self) -> bool;
    /// Current CPU-stun arbitration mode for this cycle.
    fn stun_mode(&self) -> StunMode;

    /// Monotonic system clock cycle counter, used for interrupt lead-time
    /// arithmetic. Must increase by exactly 1 per `Cpu::step` call.
    fn cycles_now(&self) -> u32;

    /// Hook used by downstream sample-playback detection (`spec.md` §6, the
    /// "digi sample" use case): raised when an NMI is dispatched, cleared
    /// when the handler's `RTI` completes. No further meaning is imposed by
    /// the CPU core itself.
    fn set_nmi_marker(&mut self, on: bool);
}
