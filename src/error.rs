//! Driver errors

use core::fmt;

/// Errors that can occur when talking to the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// Error returned by one of the underlying GPIO lines
    Pin(E),
    /// The busy flag never cleared within the bounds of a [`PollPolicy::Bounded`](crate::sender::PollPolicy::Bounded)
    NotResponding,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Error::Pin(err)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Pin(e) => write!(f, "GPIO error: {:?}", e),
            Error::NotResponding => f.write_str("controller not responding"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for Error<E> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Error::Pin(_e) => defmt::write!(fmt, "GPIO error"),
            Error::NotResponding => defmt::write!(fmt, "Controller not responding"),
        }
    }
}
