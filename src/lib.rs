/*!
# HD44780 GPIO Driver

Drive an HD44780 (or compatible, LCD1602 / LCD2004 ...) character LCD over its parallel bus,
with 8 data lines or with only the upper 4.

Basic Usage:

1. Describe the wiring with a [`sender::PinSet`] <br/>
    Use [`sender::PinSet::eight_line`] or [`sender::PinSet::four_line`]. Control lines are any
    [`embedded_hal::digital::OutputPin`], data lines are any [`pins::DataPin`]:
    * register-addressed lines from [`registers`], for MCUs without a HAL
    * `embedded-hal` open drain pins, wrapped in [`pins::OpenDrain`]
<br/>
<br/>
2. Build a [`sender::ParallelSender`] from it, the data bus width is derived from the wiring
<br/>
<br/>
3. Use [`lcd::Lcd::new()`] or [`lcd::Lcd::new_with_config()`] to reset the LCD hardware,
    then use any methods provided by [`lcd::Lcd`] to control it

Every instruction waits for the busy flag of the controller, by default for as long as it takes.
Use a bounded [`sender::PollPolicy`] to get an [`Error::NotResponding`] instead of a hang.
*/

#![no_std]
#![warn(missing_docs)]

// must stay first, the other modules use its macros
mod fmt;

pub mod command;
mod error;
pub mod lcd;
pub mod pins;
pub mod registers;
pub mod sender;
pub mod utils;

#[cfg(test)]
mod testing;

pub use error::Error;
