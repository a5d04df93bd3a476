//! Built-in sender
//! If you want to drive the bus some other way, you will need to implement [`SendCommand`] trait

use embedded_hal::delay::DelayNs;

use crate::{
    command::{Bits, Command, DataWidth, ReadWriteOp, RegisterSelection},
    error::Error,
    utils::{BitOps, BitState},
};

mod parallel_sender;

pub use parallel_sender::{ParallelSender, PinSet};

/// How long to keep waiting for the controller to clear its busy flag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollPolicy {
    max_polls: Option<u32>,
    interval_us: u32,
}

impl PollPolicy {
    /// Poll until the controller is idle, however long that takes
    ///
    /// A disconnected or dead controller hangs the caller forever.
    pub const fn unbounded() -> Self {
        Self {
            max_polls: None,
            interval_us: 0,
        }
    }

    /// Give up with [`Error::NotResponding`] after `max_polls` reads that all reported busy
    pub const fn bounded(max_polls: u32) -> Self {
        Self {
            max_polls: Some(max_polls),
            interval_us: 0,
        }
    }

    /// Wait `interval_us` between two busy reads
    pub const fn with_interval_us(mut self, interval_us: u32) -> Self {
        self.interval_us = interval_us;
        self
    }

    #[allow(missing_docs)]
    pub fn get_max_polls(&self) -> Option<u32> {
        self.max_polls
    }

    #[allow(missing_docs)]
    pub fn get_interval_us(&self) -> u32 {
        self.interval_us
    }
}

/// [`SendCommand`] is the trait a sender should implement to communicate with the hardware
pub trait SendCommand<Delayer: DelayNs> {
    /// Error of the underlying bus
    type Error;

    /// Width of the data bus, fixed when the sender was built
    fn data_width(&self) -> DataWidth;

    /// Run one write transfer into the selected register
    fn write(
        &mut self,
        rs: RegisterSelection,
        bits: Bits,
        delayer: &mut Delayer,
    ) -> Result<(), Error<Self::Error>>;

    /// Select `rs` and turn the bus around for reading
    fn enter_read(&mut self, rs: RegisterSelection) -> Result<(), Error<Self::Error>>;

    /// Run one read transfer, the bus must already be in read mode
    fn read_transfer(&mut self, delayer: &mut Delayer) -> Result<u8, Error<Self::Error>>;

    /// Run one read transfer from the selected register
    fn read(
        &mut self,
        rs: RegisterSelection,
        delayer: &mut Delayer,
    ) -> Result<u8, Error<Self::Error>> {
        self.enter_read(rs)?;
        self.read_transfer(delayer)
    }

    /// Parse a [`Command`] and send it to hardware,
    /// and return the result value when [`Command`] is a [`ReadWriteOp::Read`] command
    fn send(
        &mut self,
        command: Command,
        delayer: &mut Delayer,
    ) -> Result<Option<u8>, Error<Self::Error>> {
        let rs = command.get_register_selection();
        match command.get_read_write_op() {
            ReadWriteOp::Write(bits) => {
                self.write(rs, bits, delayer)?;
                Ok(None)
            }
            ReadWriteOp::Read => self.read(rs, delayer).map(Some),
        }
    }

    /// Wait specific duration, and send command
    fn delay_and_send(
        &mut self,
        command: Command,
        delayer: &mut Delayer,
        delay_us: u32,
    ) -> Result<Option<u8>, Error<Self::Error>> {
        delayer.delay_us(delay_us);
        self.send(command, delayer)
    }

    /// Check LCD busy state, when LCD is idle, send the command
    fn wait_and_send(
        &mut self,
        command: Command,
        delayer: &mut Delayer,
        policy: PollPolicy,
    ) -> Result<Option<u8>, Error<Self::Error>> {
        self.wait_for_idle(delayer, policy)?;
        self.send(command, delayer)
    }

    /// Wait in a busy loop, until LCD is idle
    ///
    /// The bus is put in read mode once, then only read transfers are repeated.
    fn wait_for_idle(
        &mut self,
        delayer: &mut Delayer,
        policy: PollPolicy,
    ) -> Result<(), Error<Self::Error>> {
        let mut polls: u32 = 0;

        self.enter_read(RegisterSelection::Command)?;
        while busy_flag(self.read_transfer(delayer)?) {
            polls = polls.saturating_add(1);

            if let Some(max_polls) = policy.max_polls {
                if polls >= max_polls {
                    warn!("busy flag still set after {} polls", polls);
                    return Err(Error::NotResponding);
                }
            }

            if policy.interval_us > 0 {
                delayer.delay_us(policy.interval_us);
            }
        }

        Ok(())
    }

    /// Check LCD busy state
    fn check_busy(&mut self, delayer: &mut Delayer) -> Result<bool, Error<Self::Error>> {
        let busy_state = self.read(RegisterSelection::Command, delayer)?;
        Ok(busy_flag(busy_state))
    }
}

fn busy_flag(busy_state: u8) -> bool {
    busy_state.check_bit(7) == BitState::Set
}
