/*!
cpu::mod - Public façade for the 6510 CPU core.

Submodules
==========
    regs.rs         - Register file, flag bits, stack push/pop helpers.
    table.rs        - Per-opcode mnemonic/addressing-mode/cycle-count/
                      bus-write-start metadata, verbatim from the
                      reference decode tables, plus the three pseudo-ops
                      patched into unused jam-opcode slots.
    addressing.rs   - Operand/effective-address resolution shared by the
                      prefetch pass and the execution pass.
    cycles.rs       - Prefetch/timing unit: decides cycle count, bus-write
                      start, and interrupt lead-time for the opcode about
                      to be dispatched, without touching real registers.
    interrupts.rs   - IRQ/NMI commitment tracking and dispatch readiness.
    dispatch/       - One file per instruction family; the actual register
                      and bus side effects of each mnemonic.
    execute.rs      - Execution unit: resolves an operand via `addressing`
                      and routes to the right `dispatch` function.
    unit.rs         - `Cpu`, the owning struct, and `step()`, which ties
                      prefetch/interrupts/execute together one cycle at a
                      time per `spec.md` §5's ordering contract.

Only `Cpu` is re-exported here; everything else is an internal seam that
downstream code should not depend on directly.
*/

pub mod addressing;
pub mod cycles;
pub mod dispatch;
pub mod execute;
pub mod interrupts;
pub mod regs;
pub mod table;
pub mod unit;

pub use unit::Cpu;
