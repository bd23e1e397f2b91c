use std::{fs::File, io::Read, path::Path};

pub use config::SessionConfig;
use error::{DeployError, DeployResult};
use interface::{Connector, serialport::SerialConnector};
pub use ports::PortResolver;
use protocols::console::ConsoleSession;
pub use protocols::console::DeployReport;

pub mod config;
pub mod constants;
pub mod error;
pub mod interface;
pub mod ports;
pub mod protocols;
pub(crate) mod util;

/// Pushes a script onto a Flipper Zero through its serial console
pub struct Deployer {
    port: String,
    connector: Box<dyn Connector>,
    config: SessionConfig,
    run_after_write: bool,
    progress_bar_enable: bool,
}

impl Deployer {
    /// Real serial port with the default console timing
    pub fn new(port: impl Into<String>) -> Self {
        Self::with_connector(port, Box::new(SerialConnector), SessionConfig::default())
    }

    pub fn with_connector(
        port: impl Into<String>,
        connector: Box<dyn Connector>,
        config: SessionConfig,
    ) -> Self {
        Deployer {
            port: port.into(),
            connector,
            config,
            run_after_write: false,
            progress_bar_enable: false,
        }
    }

    /// Replace the console timing and destination
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn run_after_write(&mut self, enable: bool) {
        self.run_after_write = enable;
    }

    pub fn progress_bar(&mut self, enable: bool) {
        self.progress_bar_enable = enable;
    }

    /// Read the whole script into memory, then deploy it
    pub fn deploy_file(&mut self, file_path: impl AsRef<Path>) -> DeployResult<DeployReport> {
        let file_path = file_path.as_ref();
        let script = {
            let mut file = File::open(file_path).map_err(|e| {
                DeployError::SourceError(format!(
                    "Failed to open {}: {}",
                    file_path.display(),
                    e
                ))
            })?;
            let mut script = String::new();
            file.read_to_string(&mut script).map_err(|e| {
                DeployError::SourceError(format!(
                    "Could not read {} as UTF-8 text: {}",
                    file_path.display(),
                    e
                ))
            })?;
            script
        };

        self.deploy_buffer(&script)
    }

    /// Deploy script source already held in memory
    pub fn deploy_buffer(&mut self, script: &str) -> DeployResult<DeployReport> {
        let session =
            ConsoleSession::open(&mut *self.connector, &self.port, self.config.clone())?;
        session.deploy(
            script.as_bytes(),
            self.run_after_write,
            self.progress_bar_enable,
        )
    }
}
