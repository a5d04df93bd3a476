use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, OutputPin},
};

use crate::{
    command::{Bits, DataWidth, RegisterSelection},
    error::Error,
    pins::{DataPin, Direction},
    utils::{BitOps, BitState},
};

use super::SendCommand;

/// Minimum time E stays high during a pulse
pub const ENABLE_PULSE_US: u32 = 1;

/// The lines wired between the MCU and the controller
///
/// In 4 pin mode only DB4 ~ DB7 are connected, DB0 ~ DB3 are simply absent.
pub struct PinSet<ControlPin, DBPin> {
    rs: ControlPin,
    rw: ControlPin,
    en: ControlPin,
    db_low: Option<[DBPin; 4]>,
    db_high: [DBPin; 4],
}

impl<ControlPin, DBPin> PinSet<ControlPin, DBPin>
where
    ControlPin: OutputPin,
    DBPin: DataPin + ErrorType<Error = ControlPin::Error>,
{
    #[allow(missing_docs)]
    pub fn four_line(
        rs: ControlPin,
        rw: ControlPin,
        en: ControlPin,
        db4: DBPin,
        db5: DBPin,
        db6: DBPin,
        db7: DBPin,
    ) -> Self {
        Self {
            rs,
            rw,
            en,
            db_low: None,
            db_high: [db4, db5, db6, db7],
        }
    }

    #[allow(missing_docs)]
    #[allow(clippy::too_many_arguments)]
    pub fn eight_line(
        rs: ControlPin,
        rw: ControlPin,
        en: ControlPin,
        db0: DBPin,
        db1: DBPin,
        db2: DBPin,
        db3: DBPin,
        db4: DBPin,
        db5: DBPin,
        db6: DBPin,
        db7: DBPin,
    ) -> Self {
        Self {
            rs,
            rw,
            en,
            db_low: Some([db0, db1, db2, db3]),
            db_high: [db4, db5, db6, db7],
        }
    }

    /// The bus width this wiring implies
    pub fn data_width(&self) -> DataWidth {
        match self.db_low {
            Some(_) => DataWidth::Bit8,
            None => DataWidth::Bit4,
        }
    }

    /// Split the set back into RS, RW, E, DB0 ~ DB3 (if wired) and DB4 ~ DB7
    #[allow(clippy::type_complexity)]
    pub fn release(
        self,
    ) -> (
        ControlPin,
        ControlPin,
        ControlPin,
        Option<[DBPin; 4]>,
        [DBPin; 4],
    ) {
        (self.rs, self.rw, self.en, self.db_low, self.db_high)
    }
}

/// Drive the controller through its parallel bus, with 4 or 8 data lines
pub struct ParallelSender<ControlPin, DBPin> {
    pins: PinSet<ControlPin, DBPin>,
    data_width: DataWidth,
}

impl<ControlPin, DBPin> ParallelSender<ControlPin, DBPin>
where
    ControlPin: OutputPin,
    DBPin: DataPin + ErrorType<Error = ControlPin::Error>,
{
    #[allow(missing_docs)]
    pub fn new(pins: PinSet<ControlPin, DBPin>) -> Self {
        let data_width = pins.data_width();
        Self { pins, data_width }
    }

    /// Give back the pins
    pub fn release(self) -> PinSet<ControlPin, DBPin> {
        self.pins
    }

    /// In-use data lines, paired with the bit of a byte each of them carries
    fn data_lines(&mut self) -> impl Iterator<Item = (u8, &mut DBPin)> {
        let first_bit = match self.data_width {
            DataWidth::Bit4 => 4,
            DataWidth::Bit8 => 0,
        };

        self.pins
            .db_low
            .iter_mut()
            .flat_map(|pins| pins.iter_mut())
            .chain(self.pins.db_high.iter_mut())
            .enumerate()
            .map(move |(index, pin)| (first_bit + index as u8, pin))
    }

    fn push_bits(&mut self, raw_bits: u8) -> Result<(), ControlPin::Error> {
        self.data_lines()
            .try_for_each(|(bit, pin)| match raw_bits.check_bit(bit) {
                BitState::Set => pin.set_high(),
                BitState::Clear => pin.set_low(),
            })
    }

    fn fetch_bits(&mut self) -> Result<u8, ControlPin::Error> {
        self.data_lines()
            // use .try_fold() to change same value in different iteration
            .try_fold(0u8, |mut acc, (bit, pin)| {
                match pin.is_high()? {
                    true => acc.set_bit(bit),
                    false => acc.clear_bit(bit),
                };
                Ok(acc)
            })
    }

    fn pulse(&mut self, delayer: &mut impl DelayNs) -> Result<(), ControlPin::Error> {
        self.pins.en.set_high()?;
        delayer.delay_us(ENABLE_PULSE_US);
        self.pins.en.set_low()
    }

    fn sample(&mut self, delayer: &mut impl DelayNs) -> Result<u8, ControlPin::Error> {
        self.pins.en.set_high()?;
        delayer.delay_us(ENABLE_PULSE_US);
        let bits = self.fetch_bits()?;
        self.pins.en.set_low()?;
        Ok(bits)
    }

    /// Put a byte on the bus, in one pulse (8 pin) or two nibble pulses, high nibble first (4 pin)
    pub fn transmit(
        &mut self,
        byte: u8,
        delayer: &mut impl DelayNs,
    ) -> Result<(), ControlPin::Error> {
        match self.data_width {
            DataWidth::Bit8 => {
                self.push_bits(byte)?;
                self.pulse(delayer)
            }
            DataWidth::Bit4 => {
                // DB4 ~ DB7 carry bit 4 ~ 7, so the low nibble is moved up for the second pulse
                self.push_bits(byte)?;
                self.pulse(delayer)?;
                self.push_bits(byte << 4)?;
                self.pulse(delayer)
            }
        }
    }

    /// Put a lone nibble on DB4 ~ DB7 with a single pulse, DB0 ~ DB3 (if wired) stay low
    pub fn transmit_upper_nibble(
        &mut self,
        nibble: u8,
        delayer: &mut impl DelayNs,
    ) -> Result<(), ControlPin::Error> {
        self.push_bits(nibble << 4)?;
        self.pulse(delayer)
    }

    /// Read a byte from the bus, in one pulse (8 pin) or two nibble pulses, high nibble first (4 pin)
    pub fn receive(&mut self, delayer: &mut impl DelayNs) -> Result<u8, ControlPin::Error> {
        match self.data_width {
            DataWidth::Bit8 => self.sample(delayer),
            DataWidth::Bit4 => {
                let high_4_bits = self.sample(delayer)?;
                let low_4_bits = self.sample(delayer)? >> 4;
                Ok(high_4_bits | low_4_bits)
            }
        }
    }

    /// Data lines drive the bus (idle low), RW low
    ///
    /// RW drops before any data line turns to output, so MCU and controller never drive the bus together.
    pub fn enter_write_mode(&mut self) -> Result<(), ControlPin::Error> {
        self.pins.rw.set_low()?;
        self.data_lines().try_for_each(|(_, pin)| {
            pin.set_direction(Direction::Output)?;
            pin.set_low()
        })
    }

    /// Data lines release the bus, RW high
    pub fn enter_read_mode(&mut self) -> Result<(), ControlPin::Error> {
        self.data_lines()
            .try_for_each(|(_, pin)| pin.set_direction(Direction::Input))?;
        self.pins.rw.set_high()
    }

    /// RS low, address the instruction register
    pub fn enter_command_mode(&mut self) -> Result<(), ControlPin::Error> {
        self.pins.rs.set_low()
    }

    /// RS high, address the data register
    pub fn enter_data_mode(&mut self) -> Result<(), ControlPin::Error> {
        self.pins.rs.set_high()
    }

    fn select_register(&mut self, rs: RegisterSelection) -> Result<(), ControlPin::Error> {
        // E must be idle before RS moves
        self.pins.en.set_low()?;

        match rs {
            RegisterSelection::Command => self.enter_command_mode(),
            RegisterSelection::Data => self.enter_data_mode(),
        }
    }
}

impl<ControlPin, DBPin, Delayer> SendCommand<Delayer> for ParallelSender<ControlPin, DBPin>
where
    ControlPin: OutputPin,
    DBPin: DataPin + ErrorType<Error = ControlPin::Error>,
    Delayer: DelayNs,
{
    type Error = ControlPin::Error;

    fn data_width(&self) -> DataWidth {
        self.data_width
    }

    fn write(
        &mut self,
        rs: RegisterSelection,
        bits: Bits,
        delayer: &mut Delayer,
    ) -> Result<(), Error<Self::Error>> {
        trace!("write {:?} to {:?} register", bits, rs);

        self.select_register(rs)?;
        self.enter_write_mode()?;

        match bits {
            Bits::Bit4(nibble) => self.transmit_upper_nibble(nibble, delayer)?,
            Bits::Bit8(byte) => self.transmit(byte, delayer)?,
        }

        Ok(())
    }

    fn enter_read(&mut self, rs: RegisterSelection) -> Result<(), Error<Self::Error>> {
        self.select_register(rs)?;
        self.enter_read_mode()?;
        Ok(())
    }

    fn read_transfer(&mut self, delayer: &mut Delayer) -> Result<u8, Error<Self::Error>> {
        let byte = self.receive(delayer)?;
        trace!("read {}", byte);

        Ok(byte)
    }
}
