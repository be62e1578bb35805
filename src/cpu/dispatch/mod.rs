/*!
dispatch - per-mnemonic instruction semantics (`spec.md` §4.4), grouped the
way `original_source/src/cpu.c`'s `runPrefetchedOp` groups its `case`
labels: loads/stores, logical ops, arithmetic, compares, read-modify-write,
branches, control flow, and the small remainder (flags, transfers, stack,
NOP/JAM).

`cpu::execute` is the only caller of these modules; it owns resolving each
mnemonic's operand via `cpu::addressing` and sequencing RMW's double bus
write, then delegates the actual register/flag arithmetic here.
*/

pub mod arithmetic;
pub mod branches;
pub mod compare;
pub mod control_flow;
pub mod load_store;
pub mod logical;
pub mod misc;
pub mod rmw;
