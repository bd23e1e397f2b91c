#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use fzdeploy::SessionConfig;
use fzdeploy::error::{DeployError, DeployResult};
use fzdeploy::interface::{Connector, DeviceInterface};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireEvent {
    Open(String),
    Write(Vec<u8>),
    Drain,
    Close,
}

/// Records everything the session does on the link
#[derive(Debug, Default)]
pub struct Wire {
    pub events: Vec<WireEvent>,
    pub responses: VecDeque<Vec<u8>>,
    pub fail_writes_after: Option<usize>,
    pub fail_open: bool,
}

impl Wire {
    /// Writes merged into one byte stream
    pub fn written(&self) -> Vec<u8> {
        self.events
            .iter()
            .flat_map(|event| match event {
                WireEvent::Write(bytes) => bytes.as_slice(),
                _ => &[][..],
            })
            .copied()
            .collect()
    }

    pub fn count(&self, wanted: &WireEvent) -> usize {
        self.events.iter().filter(|event| *event == wanted).count()
    }

    pub fn opens(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, WireEvent::Open(_)))
            .count()
    }
}

pub struct FakeConnector {
    pub wire: Rc<RefCell<Wire>>,
}

impl FakeConnector {
    pub fn new() -> (Self, Rc<RefCell<Wire>>) {
        let wire = Rc::new(RefCell::new(Wire::default()));
        (
            FakeConnector {
                wire: Rc::clone(&wire),
            },
            wire,
        )
    }
}

impl Connector for FakeConnector {
    fn connect(
        &mut self,
        port: &str,
        _config: &SessionConfig,
    ) -> DeployResult<Box<dyn DeviceInterface>> {
        let mut wire = self.wire.borrow_mut();
        if wire.fail_open {
            return Err(DeployError::Connection(format!("No such device {}", port)));
        }
        wire.events.push(WireEvent::Open(port.to_string()));

        Ok(Box::new(FakeDevice {
            wire: Rc::clone(&self.wire),
            writes: 0,
            closed: false,
        }))
    }
}

struct FakeDevice {
    wire: Rc<RefCell<Wire>>,
    writes: usize,
    closed: bool,
}

impl DeviceInterface for FakeDevice {
    fn send(&mut self, bytes: &[u8]) -> DeployResult<()> {
        let mut wire = self.wire.borrow_mut();
        if wire.fail_writes_after.is_some_and(|limit| self.writes >= limit) {
            return Err(DeployError::Communication("Broken pipe".to_string()));
        }
        self.writes += 1;
        wire.events.push(WireEvent::Write(bytes.to_vec()));
        Ok(())
    }

    fn receive_available(&mut self) -> DeployResult<Vec<u8>> {
        let mut wire = self.wire.borrow_mut();
        wire.events.push(WireEvent::Drain);
        Ok(wire.responses.pop_front().unwrap_or_default())
    }

    fn close(&mut self) -> DeployResult<()> {
        if !self.closed {
            self.closed = true;
            self.wire.borrow_mut().events.push(WireEvent::Close);
        }
        Ok(())
    }
}
