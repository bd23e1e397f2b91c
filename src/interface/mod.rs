pub mod serialport;

use crate::config::SessionConfig;
use crate::error::DeployResult;

/// Byte-level link to the device console
pub trait DeviceInterface {
    /// Send raw bytes to the device
    fn send(&mut self, bytes: &[u8]) -> DeployResult<()>;

    /// Read whatever the device has buffered so far, possibly nothing
    fn receive_available(&mut self) -> DeployResult<Vec<u8>>;

    /// Release the link. Calling it again is a no-op.
    fn close(&mut self) -> DeployResult<()>;
}

/// Opens links to a device path
pub trait Connector {
    fn connect(
        &mut self,
        port: &str,
        config: &SessionConfig,
    ) -> DeployResult<Box<dyn DeviceInterface>>;
}
