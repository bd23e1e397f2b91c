pub const DEFAULT_BAUD_RATE: u32 = 230400;
pub const SERIAL_TIMEOUT_MS: u64 = 2000;
pub(crate) const MAX_RESPONSE_SIZE: usize = 1024;
pub(crate) const PAYLOAD_BLOCK_SIZE: usize = 256;

pub(crate) const POST_OPEN_SETTLE_MS: u64 = 500;
pub(crate) const POST_INTERRUPT_SETTLE_MS: u64 = 300;
pub(crate) const POST_COMMAND_SETTLE_MS: u64 = 300;
pub(crate) const POST_WRITE_SETTLE_MS: u64 = 500;

/// Ctrl-C, aborts whatever the console is currently running
pub const INTERRUPT: u8 = 0x03;
pub const LINE_TERMINATOR: &str = "\r";

pub const DEST_PATH: &str = "/ext/apps/Scripts/somfy_blinds.js";
pub const DEFAULT_SRC_FILE: &str = "somfy_blinds.js";
pub const DEFAULT_PORT_PATTERNS: [&str; 2] = ["/dev/tty.usbmodem*", "/dev/ttyACM*"];
