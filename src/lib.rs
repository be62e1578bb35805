#![doc = r#"
sid6510 - a cycle-accurate MOS 6510 CPU core.

This crate emulates the CPU half of a 1980s home-computer sound subsystem:
instruction decode/addressing/execution for all 256 opcodes (including the
undocumented ones some music players rely on), per-cycle scheduling
(page-crossing and taken-branch penalties, read-modify-write double writes),
maskable/non-maskable interrupt commitment and dispatch, and CPU-stun
arbitration with an external video chip.

Modules:
- bus: the `SystemBus` trait the core consumes (memory, interrupt lines,
  stun mode) plus `StunMode`
- cpu: the CPU core itself (registers, instruction tables, prefetch/timing,
  execution, interrupt controller, and the owning `Cpu` type)

In tests, an in-memory `SystemBus` fixture is available under
`crate::test_support`.
"#]

pub mod bus;
pub mod cpu;

pub use bus::{StunMode, SystemBus};
pub use cpu::Cpu;

#[cfg(test)]
pub mod test_support;
