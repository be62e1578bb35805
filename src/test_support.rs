/*!
test_support - an in-memory `SystemBus` fixture used only by the test suite.

Overview
========
Mirrors the teacher's `test_utils` module (hand-built ROM-image fixtures for
NES tests): a small, dependency-free piece of scaffolding that lets unit
tests exercise the CPU core without needing a real C64 memory map, VIC-II, or
CIA chips. `RamBus` is a flat 64KiB RAM with settable interrupt lines and
stun mode, which is all `SystemBus` requires.

Not part of the public API surface of the crate (the module is `#[cfg(test)]`
only); production hosts provide their own `SystemBus` implementation backed
by real memory banking and peripheral chips.
*/

use crate::bus::{StunMode, SystemBus};

pub struct RamBus {
    pub ram: [u8; 0x10000],
    pub irq: bool,
    pub nmi: bool,
    pub stun: StunMode,
    pub cycles: u32,
    pub nmi_marker: bool,
    pub write_log: Vec<(u16, u8)>,
    pub read_log: Vec<u16>,
}

impl RamBus {
    pub fn new() -> Self {
        Self {
            ram: [0u8; 0x10000],
            irq: false,
            nmi: false,
            stun: StunMode::NotStunned,
            cycles: 0,
            nmi_marker: false,
            write_log: Vec::new(),
            read_log: Vec::new(),
        }
    }

    /// Copy `bytes` into RAM starting at `addr`. Convenience for test setup.
    pub fn load(&mut self, addr: u16, bytes: &[u8]) {
        for (i, b) in bytes.iter().enumerate() {
            self.ram[addr.wrapping_add(i as u16) as usize] = *b;
        }
    }

    /// Advance the monotonic cycle counter by one; call once per `Cpu::step`.
    pub fn tick(&mut self) {
        self.cycles = self.cycles.wrapping_add(1);
    }
}

impl Default for RamBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemBus for RamBus {
    fn mem_read(&mut self, addr: u16) -> u8 {
        self.read_log.push(addr);
        self.ram[addr as usize]
    }

    fn mem_write(&mut self, addr: u16, val: u8) {
        self.ram[addr as usize] = val;
        self.write_log.push((addr, val));
    }

    fn raw_ram_read(&mut self, addr: u16) -> u8 {
        self.ram[addr as usize]
    }

    fn raw_ram_write(&mut self, addr: u16, val: u8) {
        self.ram[addr as usize] = val;
        self.write_log.push((addr, val));
    }

    fn irq_line(&self) -> bool {
        self.irq
    }

    fn nmi_line(&self) -> bool {
        self.nmi
    }

    fn stun_mode(&self) -> StunMode {
        self.stun
    }

    fn cycles_now(&self) -> u32 {
        self.cycles
    }

    fn set_nmi_marker(&mut self, on: bool) {
        self.nmi_marker = on;
    }
}
