use tracing::{debug, trace};

use super::{Connector, DeviceInterface};
use crate::config::SessionConfig;
use crate::constants::MAX_RESPONSE_SIZE;

use crate::error::{DeployError, DeployResult};
use std::io::{Read, Write};

/// Serial port device_interface layer
pub struct SerialPortDevice {
    serial_port: Option<Box<dyn serialport::SerialPort>>,
}

impl SerialPortDevice {
    pub fn new(port: &str, config: &SessionConfig) -> DeployResult<SerialPortDevice> {
        let serial_port = serialport::new(port, config.baud)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .timeout(config.read_timeout)
            .open()
            .map_err(|e| DeployError::Connection(format!("Failed to open {}: {}", port, e)))?;

        debug!("Opened {} at {} baud", port, config.baud);
        Ok(SerialPortDevice {
            serial_port: Some(serial_port),
        })
    }

    fn port(&mut self) -> DeployResult<&mut Box<dyn serialport::SerialPort>> {
        self.serial_port
            .as_mut()
            .ok_or_else(|| DeployError::Communication("Serial port already closed".to_string()))
    }
}

impl DeviceInterface for SerialPortDevice {
    fn send(&mut self, bytes: &[u8]) -> DeployResult<()> {
        let port = self.port()?;
        port.write_all(bytes)
            .map_err(|e| DeployError::Communication(format!("{:?}", e)))?;
        port.flush()
            .map_err(|e| DeployError::Communication(format!("Failed to flush: {:?}", e)))?;
        trace!("Sent bytes {:?}", bytes);
        Ok(())
    }

    fn receive_available(&mut self) -> DeployResult<Vec<u8>> {
        let port = self.port()?;
        let mut received = Vec::new();

        loop {
            let waiting = port.bytes_to_read().map_err(|e| {
                DeployError::Communication(format!("Failed to query input buffer: {:?}", e))
            })? as usize;
            if waiting == 0 {
                break;
            }

            let mut buffer = vec![0; waiting.min(MAX_RESPONSE_SIZE)];
            let size = port
                .read(&mut buffer)
                // Timeout error is fine, nothing more to drain
                .or_else(|e| {
                    if e.kind() == std::io::ErrorKind::TimedOut {
                        Ok(0)
                    } else {
                        Err(e)
                    }
                })
                .map_err(|e| DeployError::Communication(format!("{:?}", e)))?;

            if size == 0 {
                break;
            }
            received.extend_from_slice(&buffer[..size]);
        }

        trace!("Received bytes {:?}", received);
        Ok(received)
    }

    fn close(&mut self) -> DeployResult<()> {
        if let Some(mut port) = self.serial_port.take() {
            port.flush().map_err(|e| {
                DeployError::Communication(format!("Failed to flush before close, {}", e))
            })?;
            debug!("Closed serial port");
        }
        Ok(())
    }
}

/// Opens real serial ports
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialConnector;

impl Connector for SerialConnector {
    fn connect(
        &mut self,
        port: &str,
        config: &SessionConfig,
    ) -> DeployResult<Box<dyn DeviceInterface>> {
        Ok(Box::new(SerialPortDevice::new(port, config)?))
    }
}
