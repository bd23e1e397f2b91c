use std::thread;

use tracing::{debug, info, trace, warn};

use crate::config::SessionConfig;
use crate::constants::{INTERRUPT, LINE_TERMINATOR, PAYLOAD_BLOCK_SIZE};
use crate::error::DeployResult;
use crate::interface::{Connector, DeviceInterface};
use crate::util::create_progress_bar;

/// `storage write_chunk <dest> <len>\r`, where `len` is the payload size in
/// bytes. The console reads exactly that many raw bytes after the line.
pub fn write_chunk_command(destination: &str, byte_len: usize) -> String {
    format!("storage write_chunk {destination} {byte_len}{LINE_TERMINATOR}")
}

pub fn run_command(destination: &str) -> String {
    format!("js {destination}{LINE_TERMINATOR}")
}

/// Console output is diagnostic text only, so invalid UTF-8 is replaced
/// rather than rejected
pub fn decode_response(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// What the device printed back during a deploy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    pub destination: String,
    pub bytes_written: usize,
    pub write_response: String,
    pub run_response: Option<String>,
}

/// One serial session with the Flipper CLI. Opened once, closed once.
pub struct ConsoleSession {
    device: Box<dyn DeviceInterface>,
    config: SessionConfig,
}

impl ConsoleSession {
    /// Open the link and give the console time to come up
    pub fn open(
        connector: &mut dyn Connector,
        port: &str,
        config: SessionConfig,
    ) -> DeployResult<Self> {
        info!("Opening {} at {} baud", port, config.baud);
        let device = connector.connect(port, &config)?;
        thread::sleep(config.open_settle);

        Ok(ConsoleSession { device, config })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Interrupt whatever is running and throw away pending output. There is
    /// no prompt check, the interrupt settle delay has to be long enough.
    pub fn resync(&mut self) -> DeployResult<()> {
        self.device.send(&[INTERRUPT])?;
        thread::sleep(self.config.interrupt_settle);

        let discarded = self.device.receive_available()?;
        trace!("Discarded {} bytes after interrupt", discarded.len());
        Ok(())
    }

    /// Write `payload` to the destination path and return the console output
    pub fn write_file(&mut self, payload: &[u8], progress: bool) -> DeployResult<String> {
        let command = write_chunk_command(&self.config.destination, payload.len());
        debug!("Sending {:?}", command);
        self.device.send(command.as_bytes())?;
        thread::sleep(self.config.command_settle);

        if progress {
            let pb = create_progress_bar(payload.len() as u64, "Writing script");
            for block in payload.chunks(PAYLOAD_BLOCK_SIZE) {
                self.device.send(block)?;
                pb.inc(block.len() as u64);
            }
            pb.finish();
        } else {
            self.device.send(payload)?;
        }
        info!("Sent {} bytes to {}", payload.len(), self.config.destination);

        thread::sleep(self.config.write_settle);
        self.collect_response()
    }

    /// Ask the console to execute the script at the destination path
    pub fn run_script(&mut self) -> DeployResult<String> {
        let command = run_command(&self.config.destination);
        debug!("Sending {:?}", command);
        self.device.send(command.as_bytes())?;
        thread::sleep(self.config.command_settle);

        self.collect_response()
    }

    fn collect_response(&mut self) -> DeployResult<String> {
        let bytes = self.device.receive_available()?;
        Ok(decode_response(&bytes))
    }

    /// Full sequence: resync, write, optionally run, then close. The link is
    /// closed whether or not the exchange succeeded.
    pub fn deploy(
        mut self,
        payload: &[u8],
        run: bool,
        progress: bool,
    ) -> DeployResult<DeployReport> {
        let outcome = self.exchange(payload, run, progress);
        let closed = self.close();

        match (outcome, closed) {
            (Ok(report), Ok(())) => Ok(report),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), closed) => {
                if let Err(close_err) = closed {
                    warn!("Failed to close link after error: {}", close_err);
                }
                Err(e)
            }
        }
    }

    fn exchange(
        &mut self,
        payload: &[u8],
        run: bool,
        progress: bool,
    ) -> DeployResult<DeployReport> {
        self.resync()?;
        let write_response = self.write_file(payload, progress)?;

        let run_response = if run {
            info!("Running {}", self.config.destination);
            Some(self.run_script()?)
        } else {
            None
        };

        Ok(DeployReport {
            destination: self.config.destination.clone(),
            bytes_written: payload.len(),
            write_response,
            run_response,
        })
    }

    pub fn close(&mut self) -> DeployResult<()> {
        self.device.close()
    }
}
