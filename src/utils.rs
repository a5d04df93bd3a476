//! Common tools

/// The state of a bit,
/// It's either [`BitState::Clear`] to represent a 0
/// or [`BitState::Set`] to represent a 1
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitState {
    /// Bit is 0
    Clear,
    /// Bit is 1
    Set,
}

impl From<bool> for BitState {
    fn from(value: bool) -> Self {
        match value {
            true => BitState::Set,
            false => BitState::Clear,
        }
    }
}

/// Simple bit ops on a register-sized value
///
/// Bit positions wrap at 8, since every register and every instruction of the controller is a byte.
pub trait BitOps {
    /// Set bit `pos` to 1, and return the new value
    fn set_bit(&mut self, pos: u8) -> Self;
    /// Clear bit `pos` to 0, and return the new value
    fn clear_bit(&mut self, pos: u8) -> Self;
    /// Set or clear bit `pos` depending on `state`, and return the new value
    fn put_bit(&mut self, pos: u8, state: BitState) -> Self;
    #[allow(missing_docs)]
    fn check_bit(&self, pos: u8) -> BitState;
}

impl BitOps for u8 {
    fn set_bit(&mut self, pos: u8) -> Self {
        *self |= 1u8 << (pos & 0b111);
        *self
    }

    fn clear_bit(&mut self, pos: u8) -> Self {
        *self &= !(1u8 << (pos & 0b111));
        *self
    }

    fn put_bit(&mut self, pos: u8, state: BitState) -> Self {
        match state {
            BitState::Set => self.set_bit(pos),
            BitState::Clear => self.clear_bit(pos),
        }
    }

    fn check_bit(&self, pos: u8) -> BitState {
        BitState::from((*self >> (pos & 0b111)) & 1 == 1)
    }
}
