use embedded_hal::delay::DelayNs;

use crate::{
    command::{AddressDirection, CommandSet, DataWidth, Font, LineMode, State},
    error::Error,
    lcd::Lcd,
    sender::{PollPolicy, SendCommand},
};

/// Wait after power on, before the controller accepts anything
pub const POWER_ON_DELAY_MS: u32 = 40;

/// Gap between the pulses of the reset sequence, the busy flag can't be checked yet
pub const RESET_PULSE_GAP_MS: u32 = 5;

/// [`Config`] is the set of instructions [`Lcd::new_with_config`] issues after the reset sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    line: LineMode,
    font: Font,
    display: State,
    cursor: State,
    cursor_blink: State,
    direction: AddressDirection,
    shift_display: State,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            line: LineMode::TwoLine,
            font: Font::Font5x8,
            display: State::On,
            cursor: State::Off,
            cursor_blink: State::Off,
            direction: AddressDirection::Increment,
            shift_display: State::Off,
        }
    }
}

#[allow(missing_docs)]
impl Config {
    pub fn get_line_mode(&self) -> LineMode {
        self.line
    }

    pub fn set_line_mode(mut self, line: LineMode) -> Self {
        self.line = line;
        self
    }

    pub fn get_font(&self) -> Font {
        self.font
    }

    pub fn set_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    pub fn get_display_state(&self) -> State {
        self.display
    }

    pub fn set_display_state(mut self, display: State) -> Self {
        self.display = display;
        self
    }

    pub fn get_cursor_state(&self) -> State {
        self.cursor
    }

    pub fn set_cursor_state(mut self, cursor: State) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn get_cursor_blink(&self) -> State {
        self.cursor_blink
    }

    pub fn set_cursor_blink(mut self, blink: State) -> Self {
        self.cursor_blink = blink;
        self
    }

    pub fn get_direction(&self) -> AddressDirection {
        self.direction
    }

    pub fn set_direction(mut self, dir: AddressDirection) -> Self {
        self.direction = dir;
        self
    }

    pub fn get_shift_display(&self) -> State {
        self.shift_display
    }

    pub fn set_shift_display(mut self, shift: State) -> Self {
        self.shift_display = shift;
        self
    }
}

impl<'a, 'b, Sender, Delayer> Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    /// Create a [`Lcd`] driver, and run the reset sequence of the LCD hardware
    ///
    /// The controller is left with the interface width of the sender, everything else is still
    /// to be configured (see [`Lcd::new_with_config`]).
    pub fn new(
        sender: &'a mut Sender,
        delayer: &'b mut Delayer,
        poll_policy: PollPolicy,
    ) -> Result<Self, Error<Sender::Error>> {
        let width = sender.data_width();
        debug!("reset sequence for {:?} data width", width);

        // in initialization process, the busy flag is not valid yet, so only fixed delays are used
        sender.delay_and_send(
            CommandSet::HalfFunctionSet(DataWidth::Bit8).into(),
            delayer,
            POWER_ON_DELAY_MS * 1_000,
        )?;

        sender.delay_and_send(
            CommandSet::HalfFunctionSet(DataWidth::Bit8).into(),
            delayer,
            RESET_PULSE_GAP_MS * 1_000,
        )?;

        sender.delay_and_send(
            CommandSet::HalfFunctionSet(DataWidth::Bit8).into(),
            delayer,
            RESET_PULSE_GAP_MS * 1_000,
        )?;

        // only 4 pin mode need one more pulse to leave 8 bit interface
        if width == DataWidth::Bit4 {
            sender.delay_and_send(
                CommandSet::HalfFunctionSet(DataWidth::Bit4).into(),
                delayer,
                RESET_PULSE_GAP_MS * 1_000,
            )?;
        }

        Ok(Lcd {
            sender,
            delayer,
            poll_policy,
        })
    }

    /// Create a [`Lcd`] driver, reset the LCD hardware, then apply `config`
    pub fn new_with_config(
        sender: &'a mut Sender,
        delayer: &'b mut Delayer,
        config: Config,
        poll_policy: PollPolicy,
    ) -> Result<Self, Error<Sender::Error>> {
        let mut lcd = Self::new(sender, delayer, poll_policy)?;

        lcd.function_set(config.get_font(), config.get_line_mode())?;
        lcd.display_on_off(
            config.get_display_state(),
            config.get_cursor_state(),
            config.get_cursor_blink(),
        )?;
        lcd.clear_screen()?;
        lcd.entry_mode_set(config.get_shift_display(), config.get_direction())?;

        debug!("configured with {:?}", config);

        Ok(lcd)
    }
}
