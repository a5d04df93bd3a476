//! Register-addressed GPIO lines
//!
//! On small MCUs (AVR being the classic host of an HD44780) a GPIO line is nothing more than
//! one bit in an output register, one bit in an input register and, for lines that change
//! direction, one bit in a direction register. [`GpioPin`] and [`GpioDirectionPin`] describe
//! exactly that, on top of any [`Registers`] bank, and expose it through the `embedded-hal`
//! digital traits so the rest of the driver never cares where a line comes from.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::{
    pins::{DataPin, Direction},
    utils::{BitOps, BitState},
};

/// A bank of byte-wide registers, addressed by number
///
/// Access goes through `&self`, the same way a memory mapped peripheral can be touched from
/// anywhere that knows its address. Implementations are not expected to be reentrant.
pub trait Registers {
    /// Read the current value of the register at `address`
    fn read_register(&self, address: usize) -> u8;

    /// Overwrite the register at `address` with `value`
    fn write_register(&self, address: usize, value: u8);

    /// Read-modify-write a single bit of a register
    fn write_bit(&self, address: usize, bit: u8, state: BitState) {
        let mut value = self.read_register(address);
        value.put_bit(bit, state);
        self.write_register(address, value);
    }

    /// Read a single bit of a register
    fn read_bit(&self, address: usize, bit: u8) -> BitState {
        self.read_register(address).check_bit(bit)
    }
}

impl<R: Registers + ?Sized> Registers for &R {
    fn read_register(&self, address: usize) -> u8 {
        (**self).read_register(address)
    }

    fn write_register(&self, address: usize, value: u8) {
        (**self).write_register(address, value)
    }
}

/// Memory mapped registers, the address is the absolute data-space address of the register
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// # Safety
    ///
    /// Every address later handed to this bank (through a [`GpioPin`] or a
    /// [`GpioDirectionPin`]) must be a valid, byte-wide, memory mapped I/O register, and nothing
    /// else may access those registers concurrently.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl Registers for Mmio {
    fn read_register(&self, address: usize) -> u8 {
        // SAFETY: guaranteed by the contract of `Mmio::new`
        unsafe { core::ptr::read_volatile(address as *const u8) }
    }

    fn write_register(&self, address: usize, value: u8) {
        // SAFETY: guaranteed by the contract of `Mmio::new`
        unsafe { core::ptr::write_volatile(address as *mut u8, value) }
    }
}

/// A control line: a fixed-direction output bit
///
/// The direction register of the line must already be configured as output by the caller.
pub struct GpioPin<R: Registers> {
    registers: R,
    port: usize,
    bit: u8,
}

impl<R: Registers> GpioPin<R> {
    /// `port` is the address of the output register, `bit` the line's position in it
    pub fn new(registers: R, port: usize, bit: u8) -> Self {
        Self {
            registers,
            port,
            bit,
        }
    }
}

impl<R: Registers> ErrorType for GpioPin<R> {
    type Error = Infallible;
}

impl<R: Registers> OutputPin for GpioPin<R> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.registers
            .write_bit(self.port, self.bit, BitState::Clear);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.registers.write_bit(self.port, self.bit, BitState::Set);
        Ok(())
    }
}

/// A data line: an output bit that can be turned around to read the controller
pub struct GpioDirectionPin<R: Registers> {
    registers: R,
    ddr: usize,
    port: usize,
    pin: usize,
    bit: u8,
}

impl<R: Registers> GpioDirectionPin<R> {
    /// * `ddr` - address of the direction register (bit set = output)
    /// * `port` - address of the output register
    /// * `pin` - address of the input register
    /// * `bit` - the line's position in all three registers
    pub fn new(registers: R, ddr: usize, port: usize, pin: usize, bit: u8) -> Self {
        Self {
            registers,
            ddr,
            port,
            pin,
            bit,
        }
    }
}

impl<R: Registers> ErrorType for GpioDirectionPin<R> {
    type Error = Infallible;
}

impl<R: Registers> OutputPin for GpioDirectionPin<R> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.registers
            .write_bit(self.port, self.bit, BitState::Clear);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.registers.write_bit(self.port, self.bit, BitState::Set);
        Ok(())
    }
}

impl<R: Registers> InputPin for GpioDirectionPin<R> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.registers.read_bit(self.pin, self.bit) == BitState::Set)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.registers.read_bit(self.pin, self.bit) == BitState::Clear)
    }
}

impl<R: Registers> DataPin for GpioDirectionPin<R> {
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        match direction {
            Direction::Output => {
                self.registers.write_bit(self.ddr, self.bit, BitState::Set);
            }
            Direction::Input => {
                self.registers
                    .write_bit(self.ddr, self.bit, BitState::Clear);
                // with the line as input, a high output bit turns on the internal pull-up
                self.registers.write_bit(self.port, self.bit, BitState::Set);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SimRegisters;

    const DDRB: usize = 0x24;
    const PORTB: usize = 0x25;
    const PINB: usize = 0x23;

    #[test]
    fn output_pin_touches_only_its_own_bit() {
        let regs = SimRegisters::new();
        regs.write_register(PORTB, 0b1000_0001);

        let mut pin = GpioPin::new(&regs, PORTB, 3);
        pin.set_high().unwrap();
        assert_eq!(regs.read_register(PORTB), 0b1000_1001);
        pin.set_low().unwrap();
        assert_eq!(regs.read_register(PORTB), 0b1000_0001);
    }

    #[test]
    fn direction_pin_switches_ddr_and_enables_pull_up() {
        let regs = SimRegisters::new();
        let mut pin = GpioDirectionPin::new(&regs, DDRB, PORTB, PINB, 5);

        pin.set_direction(Direction::Output).unwrap();
        assert_eq!(regs.read_register(DDRB), 0b0010_0000);
        pin.set_low().unwrap();
        assert_eq!(regs.read_register(PORTB), 0);

        pin.set_direction(Direction::Input).unwrap();
        assert_eq!(regs.read_register(DDRB), 0);
        assert_eq!(regs.read_register(PORTB), 0b0010_0000);
    }

    #[test]
    fn direction_pin_reads_from_input_register() {
        let regs = SimRegisters::new();
        let mut pin = GpioDirectionPin::new(&regs, DDRB, PORTB, PINB, 7);

        regs.write_register(PINB, 0b0111_1111);
        assert!(pin.is_low().unwrap());

        regs.write_register(PINB, 0b1000_0000);
        assert!(pin.is_high().unwrap());
    }
}
