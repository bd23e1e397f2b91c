use std::time::Duration;

use crate::constants::{
    DEFAULT_BAUD_RATE, DEST_PATH, POST_COMMAND_SETTLE_MS, POST_INTERRUPT_SETTLE_MS,
    POST_OPEN_SETTLE_MS, POST_WRITE_SETTLE_MS, SERIAL_TIMEOUT_MS,
};

/// Everything a console session needs to know about the link and the
/// device-side timing. The console has no ack/nak layer, so the settle
/// delays are the only synchronisation between protocol steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub baud: u32,
    pub read_timeout: Duration,
    /// Path on the device the script is written to
    pub destination: String,

    /// Wait after opening, before the first byte is sent
    pub open_settle: Duration,
    /// Wait between the interrupt byte and the flush
    pub interrupt_settle: Duration,
    /// Wait between a command line and whatever follows it
    pub command_settle: Duration,
    /// Wait after the payload for the device to finish writing
    pub write_settle: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            baud: DEFAULT_BAUD_RATE,
            read_timeout: Duration::from_millis(SERIAL_TIMEOUT_MS),
            destination: DEST_PATH.to_string(),
            open_settle: Duration::from_millis(POST_OPEN_SETTLE_MS),
            interrupt_settle: Duration::from_millis(POST_INTERRUPT_SETTLE_MS),
            command_settle: Duration::from_millis(POST_COMMAND_SETTLE_MS),
            write_settle: Duration::from_millis(POST_WRITE_SETTLE_MS),
        }
    }
}

impl SessionConfig {
    /// Default link parameters with every settle delay set to zero
    pub fn without_delays() -> Self {
        SessionConfig {
            open_settle: Duration::ZERO,
            interrupt_settle: Duration::ZERO,
            command_settle: Duration::ZERO,
            write_settle: Duration::ZERO,
            ..Default::default()
        }
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = destination.into();
        self
    }
}
