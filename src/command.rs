//! Instruction set of the HD44780, and its encoding into bus transfers

use crate::utils::{BitOps, BitState};

/// Every instruction the driver can issue
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandSet {
    ClearDisplay,
    ReturnHome,
    EntryModeSet(AddressDirection, State),
    DisplayOnOff {
        display: State,
        cursor: State,
        cursor_blink: State,
    },
    CursorOrDisplayShift(ShiftType, MoveDirection),
    // this is not a command from datasheet,
    // it's the upper half of a function set, sent as a single pulse during reset
    // 0b0011 re-asserts 8 bit interface, 0b0010 switch the controller to 4 bit interface
    HalfFunctionSet(DataWidth),
    FunctionSet(DataWidth, LineMode, Font),
    SetCGRAM(u8),
    SetDDRAM(u8),
    ReadBusyFlagAndAddress,
    WriteDataToRAM(u8),
    ReadDataFromRAM,
}

/// How the address counter moves after a data read or write
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressDirection {
    /// Cursor moves to the left
    Decrement,
    /// Cursor moves to the right
    #[default]
    Increment,
}

/// Direction of a cursor or display shift
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveDirection {
    #[allow(missing_docs)]
    RightToLeft,
    #[allow(missing_docs)]
    #[default]
    LeftToRight,
}

/// What a shift instruction moves
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShiftType {
    /// Only the cursor (the address counter) moves
    #[default]
    CursorOnly,
    /// The whole display window moves, the address counter stays
    CursorAndDisplay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum State {
    Off,
    #[default]
    On,
}

impl From<bool> for State {
    fn from(value: bool) -> Self {
        match value {
            true => State::On,
            false => State::Off,
        }
    }
}

/// Width of the data bus between the MCU and the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataWidth {
    /// Only DB4 ~ DB7 are wired, a byte travels as two nibbles
    #[default]
    Bit4,
    /// DB0 ~ DB7 are wired, a byte travels in one pulse
    Bit8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum LineMode {
    OneLine,
    #[default]
    TwoLine,
}

/// Character font
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Font {
    /// 5 x 8 dots, the small font
    #[default]
    Font5x8,
    /// 5 x 10 dots, the large font (only available in one line mode)
    Font5x10,
}

/// One bus transfer: the register it targets, and whether data goes in or out
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    rs: RegisterSelection,
    rw: ReadWriteOp,
}

/// Level of the RS line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterSelection {
    /// Instruction register (RS low)
    Command,
    /// Data register (RS high)
    Data,
}

/// Level of the RW line, a write carries the bits to put on the bus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadWriteOp {
    /// RW low
    Write(Bits),
    /// RW high
    Read,
}

/// Payload of a write transfer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bits {
    /// A lone nibble in the lower 4 bits, sent with one pulse on DB4 ~ DB7
    Bit4(u8),
    /// A full byte
    Bit8(u8),
}

impl Command {
    pub(crate) fn new(rs: RegisterSelection, rw: ReadWriteOp) -> Self {
        Self { rs, rw }
    }

    #[allow(missing_docs)]
    pub fn get_register_selection(&self) -> RegisterSelection {
        self.rs
    }

    #[allow(missing_docs)]
    pub fn get_read_write_op(&self) -> ReadWriteOp {
        self.rw
    }

    /// The bits a write transfer puts on the bus, [`None`] for a read
    pub fn get_data(&self) -> Option<Bits> {
        match self.rw {
            ReadWriteOp::Write(bits) => Some(bits),
            ReadWriteOp::Read => None,
        }
    }

    fn write_command(raw_bits: u8) -> Self {
        Self::new(
            RegisterSelection::Command,
            ReadWriteOp::Write(Bits::Bit8(raw_bits)),
        )
    }
}

impl From<CommandSet> for Command {
    fn from(command: CommandSet) -> Self {
        match command {
            CommandSet::ClearDisplay => Self::write_command(0b0000_0001),

            CommandSet::ReturnHome => Self::write_command(0b0000_0010),

            CommandSet::EntryModeSet(dir, shift_display) => {
                let mut raw_bits: u8 = 0b0000_0100;

                raw_bits.put_bit(1, BitState::from(dir == AddressDirection::Increment));
                raw_bits.put_bit(0, BitState::from(shift_display == State::On));

                Self::write_command(raw_bits)
            }

            CommandSet::DisplayOnOff {
                display,
                cursor,
                cursor_blink,
            } => {
                let mut raw_bits: u8 = 0b0000_1000;

                raw_bits.put_bit(2, BitState::from(display == State::On));
                raw_bits.put_bit(1, BitState::from(cursor == State::On));
                raw_bits.put_bit(0, BitState::from(cursor_blink == State::On));

                Self::write_command(raw_bits)
            }

            CommandSet::CursorOrDisplayShift(st, dir) => {
                let mut raw_bits: u8 = 0b0001_0000;

                match st {
                    ShiftType::CursorOnly => raw_bits.clear_bit(3),
                    ShiftType::CursorAndDisplay => raw_bits.set_bit(3),
                };

                match dir {
                    MoveDirection::RightToLeft => raw_bits.clear_bit(2),
                    MoveDirection::LeftToRight => raw_bits.set_bit(2),
                };

                Self::write_command(raw_bits)
            }

            CommandSet::HalfFunctionSet(width) => {
                let raw_bits = match width {
                    DataWidth::Bit4 => 0b0010,
                    DataWidth::Bit8 => 0b0011,
                };

                Self::new(
                    RegisterSelection::Command,
                    ReadWriteOp::Write(Bits::Bit4(raw_bits)),
                )
            }

            CommandSet::FunctionSet(width, line, font) => {
                let mut raw_bits: u8 = 0b0010_0000;

                match width {
                    DataWidth::Bit4 => raw_bits.clear_bit(4),
                    DataWidth::Bit8 => raw_bits.set_bit(4),
                };

                match line {
                    LineMode::OneLine => raw_bits.clear_bit(3),
                    LineMode::TwoLine => raw_bits.set_bit(3),
                };

                match font {
                    Font::Font5x8 => raw_bits.clear_bit(2),
                    Font::Font5x10 => raw_bits.set_bit(2),
                };

                Self::write_command(raw_bits)
            }

            // address is not range checked, bit 6 and 7 are forced to form the opcode
            CommandSet::SetCGRAM(mut addr) => {
                addr.set_bit(6);
                addr.clear_bit(7);

                Self::write_command(addr)
            }

            // address is not range checked, bit 7 is forced to form the opcode
            CommandSet::SetDDRAM(mut addr) => {
                addr.set_bit(7);

                Self::write_command(addr)
            }

            CommandSet::ReadBusyFlagAndAddress => {
                Self::new(RegisterSelection::Command, ReadWriteOp::Read)
            }

            CommandSet::WriteDataToRAM(data) => Self::new(
                RegisterSelection::Data,
                ReadWriteOp::Write(Bits::Bit8(data)),
            ),

            CommandSet::ReadDataFromRAM => Self::new(RegisterSelection::Data, ReadWriteOp::Read),
        }
    }
}
