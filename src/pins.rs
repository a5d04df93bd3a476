//! Data line abstraction
//!
//! Control lines (RS, RW, E) are plain [`OutputPin`]s. Data lines (DB0 ~ DB7) must also be read
//! back from the controller, so they implement [`DataPin`] on top of [`OutputPin`] and [`InputPin`].

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

/// Electrical direction of a data line, seen from the MCU side
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// MCU drives the line, controller listens
    Output,
    /// Controller drives the line, MCU listens
    Input,
}

/// A bidirectional data line
pub trait DataPin: OutputPin + InputPin {
    /// Turn the line around before a write or a read transfer
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error>;
}

/// Adapter for `embedded-hal` pins configured as open drain output with a pull up
///
/// Such a pin never needs its direction changed: to read the controller, the line is released
/// by driving it high, and the pull up lets the controller pull it down.
pub struct OpenDrain<P> {
    pin: P,
}

impl<P> OpenDrain<P>
where
    P: OutputPin + InputPin,
{
    #[allow(missing_docs)]
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Give back the wrapped pin
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: ErrorType> ErrorType for OpenDrain<P> {
    type Error = P::Error;
}

impl<P: OutputPin> OutputPin for OpenDrain<P> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high()
    }
}

impl<P: InputPin> InputPin for OpenDrain<P> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_high()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_low()
    }
}

impl<P> DataPin for OpenDrain<P>
where
    P: OutputPin + InputPin,
{
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        match direction {
            Direction::Output => Ok(()),
            // in open drain mode, set pin high to release control
            Direction::Input => self.pin.set_high(),
        }
    }
}
