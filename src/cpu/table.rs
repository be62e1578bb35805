/*!
table.rs - Instruction Tables (`spec.md` §4.2): four immutable 256-entry
constant tables keyed by opcode, plus the pseudo-opcode patch.

Overview
========
- `MNEMONICS`  : opcode -> `Mnemonic` (one of 77 real mnemonics + 3
  synthesized pseudo-ops: `StartIrq`, `StartNmi`, `NullBurn`)
- `MODES`      : opcode -> `AddressingMode` (13 modes)
- `BASE_CYCLES`: opcode -> base cycle count (2..=8; pseudo-ops get 7, the
  interrupt-dispatch cost)
- `BUS_WRITE_START`: opcode -> 1-based cycle at which the opcode first
  writes to the bus, or 0 if it performs no such write (used by stun
  arbitration, `cpu::unit`)

Three genuinely "jammed" (halt) opcode slots are patched to pseudo-ops that
reuse the same in-flight machinery used for real instructions (`spec.md`
§4.2, §9): `0x02` -> `StartIrq`, `0x12` -> `StartNmi`, `0x22` -> `NullBurn`.

Grounding
=========
Values transcribed from `original_source/src/cpu.c`'s `_mnemonics`,
`_modes`, `_opbase_frame_cycles`, and `_opbase_write_cycle` tables (the
WebSid/TinyRSID 6510 core this spec is distilled from), with the `jam`
mnemonic variant kept (for the genuinely unused opcode slots that are not
patched to a pseudo-op) so the table stays a faithful 256-entry map of the
real chip.
*/

/// Mnemonic identity for an opcode, including the 3 synthesized pseudo-ops
/// used to schedule interrupt dispatch through the normal in-flight timing
/// machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum Mnemonic {
    Adc,
    Alr,
    Anc,
    And,
    Ane,
    Arr,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dcp,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Isb,
    Jam,
    Jmp,
    Jsr,
    Lae,
    Lax,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Lxa,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rla,
    Rol,
    Ror,
    Rra,
    Rti,
    Rts,
    Sax,
    Sbc,
    Sbx,
    Sec,
    Sed,
    Sei,
    Sha,
    Shs,
    Shx,
    Shy,
    Slo,
    Sre,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    /// Pseudo-op: begin IRQ dispatch (patched into opcode slot 0x02).
    StartIrq,
    /// Pseudo-op: begin NMI dispatch (patched into opcode slot 0x12).
    StartNmi,
    /// Pseudo-op: burn the current instruction's cycles doing nothing
    /// (patched into opcode slot 0x22).
    NullBurn,
}

/// One of the 13 addressing modes used by the 6510 instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Implied,
    Immediate,
    Accumulator,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndexedIndirectX,
    IndirectIndexedY,
    Relative,
}

/// Opcode slot patched with the IRQ-dispatch pseudo-op.
pub const START_IRQ_OPCODE: u8 = 0x02;
/// Opcode slot patched with the NMI-dispatch pseudo-op.
pub const START_NMI_OPCODE: u8 = 0x12;
/// Opcode slot patched with the null-burn pseudo-op.
pub const NULL_BURN_OPCODE: u8 = 0x22;
/// The real SEI opcode, used by the interrupt controller's "last op was
/// SEI" special case (`spec.md` §4.5).
pub const SEI_OPCODE: u8 = 0x78;
/// Cycle cost of every pseudo-op (interrupt dispatch / null-burn).
pub const PSEUDO_OP_CYCLES: u8 = 7;

use AddressingMode::*;
use Mnemonic::*;

macro_rules! row {
    ($($m:expr),* $(,)?) => { [$($m),*] };
}

pub static MNEMONICS: [Mnemonic; 256] = row![
    Brk, Ora, StartIrq, Slo, Nop, Ora, Asl, Slo, Php, Ora, Asl, Anc, Nop, Ora, Asl, Slo,
    Bpl, Ora, StartNmi, Slo, Nop, Ora, Asl, Slo, Clc, Ora, Nop, Slo, Nop, Ora, Asl, Slo,
    Jsr, And, NullBurn, Rla, Bit, And, Rol, Rla, Plp, And, Rol, Anc, Bit, And, Rol, Rla,
    Bmi, And, Jam, Rla, Nop, And, Rol, Rla, Sec, And, Nop, Rla, Nop, And, Rol, Rla,
    Rti, Eor, Jam, Sre, Nop, Eor, Lsr, Sre, Pha, Eor, Lsr, Alr, Jmp, Eor, Lsr, Sre,
    Bvc, Eor, Jam, Sre, Nop, Eor, Lsr, Sre, Cli, Eor, Nop, Sre, Nop, Eor, Lsr, Sre,
    Rts, Adc, Jam, Rra, Nop, Adc, Ror, Rra, Pla, Adc, Ror, Arr, Jmp, Adc, Ror, Rra,
    Bvs, Adc, Jam, Rra, Nop, Adc, Ror, Rra, Sei, Adc, Nop, Rra, Nop, Adc, Ror, Rra,
    Nop, Sta, Nop, Sax, Sty, Sta, Stx, Sax, Dey, Nop, Txa, Ane, Sty, Sta, Stx, Sax,
    Bcc, Sta, Jam, Sha, Sty, Sta, Stx, Sax, Tya, Sta, Txs, Shs, Shy, Sta, Shx, Sha,
    Ldy, Lda, Ldx, Lax, Ldy, Lda, Ldx, Lax, Tay, Lda, Tax, Lxa, Ldy, Lda, Ldx, Lax,
    Bcs, Lda, Jam, Lax, Ldy, Lda, Ldx, Lax, Clv, Lda, Tsx, Lae, Ldy, Lda, Ldx, Lax,
    Cpy, Cmp, Nop, Dcp, Cpy, Cmp, Dec, Dcp, Iny, Cmp, Dex, Sbx, Cpy, Cmp, Dec, Dcp,
    Bne, Cmp, Jam, Dcp, Nop, Cmp, Dec, Dcp, Cld, Cmp, Nop, Dcp, Nop, Cmp, Dec, Dcp,
    Cpx, Sbc, Nop, Isb, Cpx, Sbc, Inc, Isb, Inx, Sbc, Nop, Sbc, Cpx, Sbc, Inc, Isb,
    Beq, Sbc, Jam, Isb, Nop, Sbc, Inc, Isb, Sed, Sbc, Nop, Isb, Nop, Sbc, Inc, Isb,
];

pub static MODES: [AddressingMode; 256] = row![
    Implied, IndexedIndirectX, Implied, IndexedIndirectX, ZeroPage, ZeroPage, ZeroPage, ZeroPage, Implied, Immediate, Accumulator, Immediate, Absolute, Absolute, Absolute, Absolute,
    Relative, IndirectIndexedY, Implied, IndirectIndexedY, ZeroPageX, ZeroPageX, ZeroPageX, ZeroPageX, Implied, AbsoluteY, Implied, AbsoluteY, AbsoluteX, AbsoluteX, AbsoluteX, AbsoluteX,
    Absolute, IndexedIndirectX, Implied, IndexedIndirectX, ZeroPage, ZeroPage, ZeroPage, ZeroPage, Implied, Immediate, Accumulator, Immediate, Absolute, Absolute, Absolute, Absolute,
    Relative, IndirectIndexedY, Implied, IndirectIndexedY, ZeroPageX, ZeroPageX, ZeroPageX, ZeroPageX, Implied, AbsoluteY, Implied, AbsoluteY, AbsoluteX, AbsoluteX, AbsoluteX, AbsoluteX,
    Implied, IndexedIndirectX, Implied, IndexedIndirectX, ZeroPage, ZeroPage, ZeroPage, ZeroPage, Implied, Immediate, Accumulator, Immediate, Absolute, Absolute, Absolute, Absolute,
    Relative, IndirectIndexedY, Implied, IndirectIndexedY, ZeroPageX, ZeroPageX, ZeroPageX, ZeroPageX, Implied, AbsoluteY, Implied, AbsoluteY, AbsoluteX, AbsoluteX, AbsoluteX, AbsoluteX,
    Implied, IndexedIndirectX, Implied, IndexedIndirectX, ZeroPage, ZeroPage, ZeroPage, ZeroPage, Implied, Immediate, Accumulator, Immediate, Indirect, Absolute, Absolute, Absolute,
    Relative, IndirectIndexedY, Implied, IndirectIndexedY, ZeroPageX, ZeroPageX, ZeroPageX, ZeroPageX, Implied, AbsoluteY, Implied, AbsoluteY, AbsoluteX, AbsoluteX, AbsoluteX, AbsoluteX,
    Immediate, IndexedIndirectX, Immediate, IndexedIndirectX, ZeroPage, ZeroPage, ZeroPage, ZeroPage, Implied, Immediate, Implied, Immediate, Absolute, Absolute, Absolute, Absolute,
    Relative, IndirectIndexedY, Implied, IndirectIndexedY, ZeroPageX, ZeroPageX, ZeroPageY, ZeroPageY, Implied, AbsoluteY, Implied, AbsoluteY, AbsoluteX, AbsoluteX, AbsoluteY, AbsoluteY,
    Immediate, IndexedIndirectX, Immediate, IndexedIndirectX, ZeroPage, ZeroPage, ZeroPage, ZeroPage, Implied, Immediate, Implied, Immediate, Absolute, Absolute, Absolute, Absolute,
    Relative, IndirectIndexedY, Implied, IndirectIndexedY, ZeroPageX, ZeroPageX, ZeroPageY, ZeroPageY, Implied, AbsoluteY, Implied, AbsoluteY, AbsoluteX, AbsoluteX, AbsoluteY, AbsoluteY,
    Immediate, IndexedIndirectX, Immediate, IndexedIndirectX, ZeroPage, ZeroPage, ZeroPage, ZeroPage, Implied, Immediate, Implied, Immediate, Absolute, Absolute, Absolute, Absolute,
    Relative, IndirectIndexedY, Implied, IndirectIndexedY, ZeroPageX, ZeroPageX, ZeroPageX, ZeroPageX, Implied, AbsoluteY, Implied, AbsoluteY, AbsoluteX, AbsoluteX, AbsoluteX, AbsoluteX,
    Immediate, IndexedIndirectX, Immediate, IndexedIndirectX, ZeroPage, ZeroPage, ZeroPage, ZeroPage, Implied, Immediate, Implied, Immediate, Absolute, Absolute, Absolute, Absolute,
    Relative, IndirectIndexedY, Implied, IndirectIndexedY, ZeroPageX, ZeroPageX, ZeroPageX, ZeroPageX, Implied, AbsoluteY, Implied, AbsoluteY, AbsoluteX, AbsoluteX, AbsoluteX, AbsoluteX,
];

pub static BASE_CYCLES: [u8; 256] = row![
    7, 6, 7, 8, 3, 3, 5, 5, 3, 2, 2, 2, 4, 4, 6, 6,
    2, 5, 7, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7,
    6, 6, 2, 8, 3, 3, 5, 5, 4, 2, 2, 2, 4, 4, 6, 6,
    2, 5, 0, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7,
    6, 6, 0, 8, 3, 3, 5, 5, 3, 2, 2, 2, 3, 4, 6, 6,
    2, 5, 0, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7,
    6, 6, 0, 8, 3, 3, 5, 5, 4, 2, 2, 2, 5, 4, 6, 6,
    2, 5, 0, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7,
    2, 6, 2, 6, 3, 3, 3, 3, 2, 2, 2, 2, 4, 4, 4, 4,
    2, 6, 0, 6, 4, 4, 4, 4, 2, 5, 2, 5, 5, 5, 5, 5,
    2, 6, 2, 6, 3, 3, 3, 3, 2, 2, 2, 2, 4, 4, 4, 4,
    2, 5, 0, 5, 4, 4, 4, 4, 2, 4, 2, 4, 4, 4, 4, 4,
    2, 6, 2, 8, 3, 3, 5, 5, 2, 2, 2, 2, 4, 4, 6, 6,
    2, 5, 0, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7,
    2, 6, 2, 8, 3, 3, 5, 5, 2, 2, 2, 2, 4, 4, 6, 6,
    2, 5, 0, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7,
];

pub static BUS_WRITE_START: [u8; 256] = row![
    3, 0, 3, 7, 0, 0, 4, 4, 3, 0, 0, 0, 0, 0, 5, 5,
    0, 0, 3, 7, 0, 0, 5, 5, 0, 0, 0, 6, 0, 0, 6, 6,
    4, 0, 0, 7, 0, 0, 4, 4, 0, 0, 0, 0, 0, 0, 5, 5,
    0, 0, 0, 7, 0, 0, 5, 5, 0, 0, 0, 6, 0, 0, 6, 6,
    0, 0, 0, 7, 0, 0, 4, 4, 3, 0, 0, 0, 0, 0, 5, 5,
    0, 0, 0, 7, 0, 0, 5, 5, 0, 0, 0, 6, 0, 0, 6, 6,
    0, 0, 0, 7, 0, 0, 4, 4, 0, 0, 0, 0, 0, 0, 5, 5,
    0, 0, 0, 7, 0, 0, 5, 5, 0, 0, 0, 6, 0, 0, 6, 6,
    0, 6, 0, 6, 3, 3, 3, 3, 0, 0, 0, 0, 4, 4, 4, 4,
    0, 6, 0, 0, 4, 4, 4, 4, 0, 5, 0, 0, 0, 5, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 7, 0, 0, 4, 4, 0, 0, 0, 0, 0, 0, 5, 5,
    0, 0, 0, 7, 0, 0, 5, 5, 0, 0, 0, 6, 0, 0, 6, 6,
    0, 0, 0, 7, 0, 0, 4, 4, 0, 0, 0, 0, 0, 0, 5, 5,
    0, 0, 0, 7, 0, 0, 5, 5, 0, 0, 0, 6, 0, 0, 6, 6,
];

/// The page-penalty set of `spec.md` §4.3 step 3: mnemonics that pay +1
/// cycle when an indexed (absolute-X/Y or indirect-indexed) effective
/// address crosses a 256-byte page boundary.
#[inline]
pub fn pays_page_penalty(m: Mnemonic) -> bool {
    matches!(
        m,
        Adc | And | Cmp | Eor | Lae | Lax | Lda | Ldx | Ldy | Nop | Ora | Sbc
    )
}

/// True if `m` is one of the eight conditional branches.
#[inline]
pub fn is_branch(m: Mnemonic) -> bool {
    matches!(m, Bcc | Bcs | Bne | Beq | Bpl | Bmi | Bvc | Bvs)
}

/// True if `m` performs the read-modify-write double write (`spec.md`
/// §4.4): the original value is written back unchanged before the updated
/// value is written.
#[inline]
pub fn is_rmw(m: Mnemonic) -> bool {
    matches!(m, Asl | Lsr | Rol | Ror | Inc | Dec | Slo | Sre | Rla | Rra | Isb | Dcp)
}
