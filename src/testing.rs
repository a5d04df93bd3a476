//! Simulated hardware for unit tests
//!
//! [`SimRegisters`] is a plain register file. [`SimBus`] wires a controller model onto it:
//! RS, RW and E live in one port, DB0 ~ DB7 in another (bit n carries DBn). Every falling edge
//! of E is recorded as a [`Pulse`]; every rising edge with RW high loads the input register with
//! the next scripted response (split into nibbles when the bus is 4 pin).

extern crate std;

use core::cell::{Cell, RefCell};
use std::{collections::VecDeque, vec::Vec};

use embedded_hal::delay::DelayNs;

use crate::{
    registers::{GpioDirectionPin, GpioPin, Registers},
    sender::{ParallelSender, PinSet},
    utils::{BitOps, BitState},
};

pub(crate) const CONTROL_PORT: usize = 0x25;
pub(crate) const DATA_PIN: usize = 0x29;
pub(crate) const DATA_DDR: usize = 0x2A;
pub(crate) const DATA_PORT: usize = 0x2B;

pub(crate) const RS_BIT: u8 = 0;
pub(crate) const RW_BIT: u8 = 1;
pub(crate) const EN_BIT: u8 = 2;

pub(crate) struct SimRegisters {
    cells: RefCell<[u8; 0x100]>,
}

impl SimRegisters {
    pub(crate) fn new() -> Self {
        Self {
            cells: RefCell::new([0; 0x100]),
        }
    }
}

impl Registers for SimRegisters {
    fn read_register(&self, address: usize) -> u8 {
        self.cells.borrow()[address]
    }

    fn write_register(&self, address: usize, value: u8) {
        self.cells.borrow_mut()[address] = value;
    }
}

/// One enable pulse as the controller saw it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Pulse {
    pub rs: bool,
    pub rw: bool,
    /// DB0 ~ DB7 at the falling edge of E
    pub data: u8,
}

pub(crate) type SimSender<'a> = ParallelSender<GpioPin<&'a SimBus>, GpioDirectionPin<&'a SimBus>>;

pub(crate) struct SimBus {
    registers: SimRegisters,
    four_line: Cell<bool>,
    responses: RefCell<VecDeque<u8>>,
    current_response: Cell<u8>,
    low_nibble_next: Cell<bool>,
    pulses: RefCell<Vec<Pulse>>,
    direction_writes: Cell<usize>,
}

impl SimBus {
    pub(crate) fn new() -> Self {
        Self {
            registers: SimRegisters::new(),
            four_line: Cell::new(false),
            responses: RefCell::new(VecDeque::new()),
            current_response: Cell::new(0),
            low_nibble_next: Cell::new(false),
            pulses: RefCell::new(Vec::new()),
            direction_writes: Cell::new(0),
        }
    }

    fn control_pins(&self) -> [GpioPin<&Self>; 3] {
        [
            GpioPin::new(self, CONTROL_PORT, RS_BIT),
            GpioPin::new(self, CONTROL_PORT, RW_BIT),
            GpioPin::new(self, CONTROL_PORT, EN_BIT),
        ]
    }

    fn data_pin(&self, bit: u8) -> GpioDirectionPin<&Self> {
        GpioDirectionPin::new(self, DATA_DDR, DATA_PORT, DATA_PIN, bit)
    }

    pub(crate) fn sender_8pin(&self) -> SimSender<'_> {
        self.four_line.set(false);
        let [rs, rw, en] = self.control_pins();
        ParallelSender::new(PinSet::eight_line(
            rs,
            rw,
            en,
            self.data_pin(0),
            self.data_pin(1),
            self.data_pin(2),
            self.data_pin(3),
            self.data_pin(4),
            self.data_pin(5),
            self.data_pin(6),
            self.data_pin(7),
        ))
    }

    pub(crate) fn sender_4pin(&self) -> SimSender<'_> {
        self.four_line.set(true);
        let [rs, rw, en] = self.control_pins();
        ParallelSender::new(PinSet::four_line(
            rs,
            rw,
            en,
            self.data_pin(4),
            self.data_pin(5),
            self.data_pin(6),
            self.data_pin(7),
        ))
    }

    /// Queue bytes the controller answers read transfers with, `0x00` (idle) once exhausted
    pub(crate) fn respond_with(&self, bytes: &[u8]) {
        self.responses.borrow_mut().extend(bytes.iter().copied());
    }

    pub(crate) fn preset_data_port(&self, value: u8) {
        self.registers.write_register(DATA_PORT, value);
    }

    pub(crate) fn preset_data_direction(&self, value: u8) {
        self.registers.write_register(DATA_DDR, value);
    }

    pub(crate) fn data_direction(&self) -> u8 {
        self.registers.read_register(DATA_DDR)
    }

    pub(crate) fn data_port(&self) -> u8 {
        self.registers.read_register(DATA_PORT)
    }

    /// How many times the data direction register was written through the pins
    pub(crate) fn direction_writes(&self) -> usize {
        self.direction_writes.get()
    }

    pub(crate) fn rs_high(&self) -> bool {
        self.registers.read_bit(CONTROL_PORT, RS_BIT) == BitState::Set
    }

    pub(crate) fn rw_high(&self) -> bool {
        self.registers.read_bit(CONTROL_PORT, RW_BIT) == BitState::Set
    }

    pub(crate) fn pulses(&self) -> Vec<Pulse> {
        self.pulses.borrow().clone()
    }

    pub(crate) fn clear_pulses(&self) {
        self.pulses.borrow_mut().clear();
    }

    pub(crate) fn read_count(&self) -> usize {
        self.pulses.borrow().iter().filter(|pulse| pulse.rw).count()
    }

    /// Raw DB0 ~ DB7 of every write pulse
    pub(crate) fn written_data(&self) -> Vec<u8> {
        self.pulses
            .borrow()
            .iter()
            .filter(|pulse| !pulse.rw)
            .map(|pulse| pulse.data)
            .collect()
    }

    /// Write transfers, with nibble pulses merged back into bytes on a 4 pin bus
    pub(crate) fn writes(&self) -> Vec<Pulse> {
        let writes = self
            .pulses
            .borrow()
            .iter()
            .filter(|pulse| !pulse.rw)
            .copied()
            .collect::<Vec<_>>();

        if !self.four_line.get() {
            return writes;
        }

        writes
            .chunks(2)
            .map(|pair| Pulse {
                rs: pair[0].rs,
                rw: false,
                data: (pair[0].data & 0xF0) | (pair.get(1).map_or(0, |low| low.data) >> 4),
            })
            .collect()
    }

    fn enable_rising(&self, control: u8) {
        if control.check_bit(RW_BIT) == BitState::Clear {
            return;
        }

        let input = if !self.four_line.get() {
            self.responses.borrow_mut().pop_front().unwrap_or(0)
        } else if !self.low_nibble_next.get() {
            let response = self.responses.borrow_mut().pop_front().unwrap_or(0);
            self.current_response.set(response);
            self.low_nibble_next.set(true);
            response & 0xF0
        } else {
            self.low_nibble_next.set(false);
            self.current_response.get() << 4
        };

        self.registers.write_register(DATA_PIN, input);
    }

    fn enable_falling(&self, control: u8) {
        let rw = control.check_bit(RW_BIT) == BitState::Set;
        let data = match rw {
            true => self.registers.read_register(DATA_PIN),
            false => self.registers.read_register(DATA_PORT),
        };

        self.pulses.borrow_mut().push(Pulse {
            rs: control.check_bit(RS_BIT) == BitState::Set,
            rw,
            data,
        });
    }
}

impl Registers for SimBus {
    fn read_register(&self, address: usize) -> u8 {
        self.registers.read_register(address)
    }

    fn write_register(&self, address: usize, value: u8) {
        let before = self.registers.read_register(address);
        self.registers.write_register(address, value);

        if address == DATA_DDR {
            self.direction_writes.set(self.direction_writes.get() + 1);
        }

        if address != CONTROL_PORT {
            return;
        }

        match (before.check_bit(EN_BIT), value.check_bit(EN_BIT)) {
            (BitState::Clear, BitState::Set) => self.enable_rising(value),
            (BitState::Set, BitState::Clear) => self.enable_falling(value),
            _ => {}
        }
    }
}

/// A delay provider that only remembers what it was asked for, in nanoseconds
#[derive(Default)]
pub(crate) struct RecordingDelay {
    calls: Vec<u64>,
}

impl RecordingDelay {
    /// Every recorded delay of at least `us` microseconds, in microseconds
    pub(crate) fn waits_of_at_least_us(&self, us: u64) -> Vec<u64> {
        self.calls
            .iter()
            .map(|ns| ns / 1_000)
            .filter(|&wait_us| wait_us >= us)
            .collect()
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls.push(ns as u64);
    }

    fn delay_us(&mut self, us: u32) {
        self.calls.push(us as u64 * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.calls.push(ms as u64 * 1_000_000);
    }
}
