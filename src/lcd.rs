//! The driver instance, and every instruction it can issue

use embedded_hal::delay::DelayNs;

use crate::{
    command::{
        AddressDirection, CommandSet, DataWidth, Font, LineMode, MoveDirection, ShiftType, State,
    },
    error::Error,
    sender::{PollPolicy, SendCommand},
};

mod init;

pub use init::{Config, POWER_ON_DELAY_MS, RESET_PULSE_GAP_MS};

/// An initialized HD44780
///
/// Every instruction first waits for the busy flag to clear, following the [`PollPolicy`] the driver
/// holds, then goes out as a single transfer.
pub struct Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    sender: &'a mut Sender,
    delayer: &'b mut Delayer,
    poll_policy: PollPolicy,
}

impl<'a, 'b, Sender, Delayer> Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    fn wait_and_send(
        &mut self,
        command: CommandSet,
    ) -> Result<Option<u8>, Error<Sender::Error>> {
        self.sender
            .wait_and_send(command.into(), self.delayer, self.poll_policy)
    }

    /// Set font and number of display lines, the interface width is the one of the sender
    pub fn function_set(
        &mut self,
        font: Font,
        line: LineMode,
    ) -> Result<(), Error<Sender::Error>> {
        let width = self.sender.data_width();
        self.wait_and_send(CommandSet::FunctionSet(width, line, font))?;
        Ok(())
    }

    /// Fill DDRAM with spaces, then put the address counter back to DDRAM address 0
    ///
    /// The controller also resets the entry mode direction to [`AddressDirection::Increment`].
    pub fn clear_screen(&mut self) -> Result<(), Error<Sender::Error>> {
        self.wait_and_send(CommandSet::ClearDisplay)?;
        self.set_ddram_address(0)
    }

    /// Set DDRAM address 0 and undo any display shift, DDRAM content is untouched
    pub fn return_home(&mut self) -> Result<(), Error<Sender::Error>> {
        self.wait_and_send(CommandSet::ReturnHome)?;
        Ok(())
    }

    /// Choose how the address counter moves after each data access,
    /// and whether the whole display shifts along on writes
    pub fn entry_mode_set(
        &mut self,
        shift_display: State,
        direction: AddressDirection,
    ) -> Result<(), Error<Sender::Error>> {
        self.wait_and_send(CommandSet::EntryModeSet(direction, shift_display))?;
        Ok(())
    }

    /// Turn display, cursor and cursor blinking on or off
    ///
    /// A display turned off keeps its DDRAM content.
    pub fn display_on_off(
        &mut self,
        display: State,
        cursor: State,
        cursor_blink: State,
    ) -> Result<(), Error<Sender::Error>> {
        self.wait_and_send(CommandSet::DisplayOnOff {
            display,
            cursor,
            cursor_blink,
        })?;
        Ok(())
    }

    /// Move the cursor, or the whole display window, by one position without touching DDRAM
    pub fn cursor_or_display_shift(
        &mut self,
        dir: MoveDirection,
        shift_type: ShiftType,
    ) -> Result<(), Error<Sender::Error>> {
        self.wait_and_send(CommandSet::CursorOrDisplayShift(shift_type, dir))?;
        Ok(())
    }

    /// Point the address counter into DDRAM
    ///
    /// One line mode uses `0x00..=0x4F`, two line mode `0x00..=0x27` and `0x40..=0x67`.
    /// The address is not checked: bit 7 belongs to the opcode, so larger values alias.
    pub fn set_ddram_address(&mut self, addr: u8) -> Result<(), Error<Sender::Error>> {
        self.wait_and_send(CommandSet::SetDDRAM(addr))?;
        Ok(())
    }

    /// Point the address counter into CGRAM
    ///
    /// The address is 6 bits wide and not checked, larger values alias.
    pub fn set_cgram_address(&mut self, addr: u8) -> Result<(), Error<Sender::Error>> {
        self.wait_and_send(CommandSet::SetCGRAM(addr))?;
        Ok(())
    }

    /// Write one byte to DDRAM or CGRAM, whichever the address counter points to
    pub fn send_data(&mut self, byte: u8) -> Result<(), Error<Sender::Error>> {
        self.wait_and_send(CommandSet::WriteDataToRAM(byte))?;
        Ok(())
    }

    /// Write bytes one by one, stopping at the first `0` (which is not sent)
    ///
    /// Nothing checks the end of a line, the address counter just keeps moving.
    pub fn send_string(&mut self, str: impl AsRef<[u8]>) -> Result<(), Error<Sender::Error>> {
        str.as_ref()
            .iter()
            .take_while(|&&byte| byte != 0)
            .try_for_each(|&byte| self.send_data(byte))
    }

    /// Read the busy flag (bit 7) and the address counter (bit 0 ~ 6)
    ///
    /// This is the busy poll itself, so it doesn't wait for anything.
    pub fn read_busy_flag_and_address(&mut self) -> Result<u8, Error<Sender::Error>> {
        let status = self
            .sender
            .send(CommandSet::ReadBusyFlagAndAddress.into(), self.delayer)?;
        Ok(status.unwrap_or_default())
    }

    /// Current value of the address counter
    pub fn get_address_counter(&mut self) -> Result<u8, Error<Sender::Error>> {
        Ok(self.read_busy_flag_and_address()? & 0b0111_1111)
    }

    /// Read one byte from DDRAM or CGRAM, whichever the address counter points to
    pub fn read_data(&mut self) -> Result<u8, Error<Sender::Error>> {
        let data = self.wait_and_send(CommandSet::ReadDataFromRAM)?;
        Ok(data.unwrap_or_default())
    }

    /// Width of the data bus the sender was built with
    pub fn get_data_width(&self) -> DataWidth {
        self.sender.data_width()
    }

    #[allow(missing_docs)]
    pub fn set_poll_policy(&mut self, poll_policy: PollPolicy) {
        self.poll_policy = poll_policy;
    }

    #[allow(missing_docs)]
    pub fn get_poll_policy(&self) -> PollPolicy {
        self.poll_policy
    }

    /// Wait for specified milliseconds
    pub fn delay_ms(&mut self, ms: u32) {
        self.delayer.delay_ms(ms);
    }

    /// Wait for specified microseconds
    pub fn delay_us(&mut self, us: u32) {
        self.delayer.delay_us(us)
    }
}
