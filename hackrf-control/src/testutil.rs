//! Scripted transport and probe stand-ins for unit tests.
//!
//! [`StubTransport`] records every control transfer and replays scripted
//! replies, so tests can assert exact wire parameters and simulate short
//! transfers, bus failures, and absent devices without hardware.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::transport::{ControlTransport, Probe, TransportError};

/// One recorded control transfer.
#[derive(Clone, Debug)]
pub(crate) struct LoggedCall {
    pub request: u8,
    pub value: u16,
    pub index: u16,
    /// Payload of an out transfer, `None` for in transfers.
    pub data: Option<Vec<u8>>,
    /// Requested length of an in transfer, `None` for out transfers.
    pub read_len: Option<u16>,
}

#[derive(Default)]
struct StubInner {
    out_script: RefCell<VecDeque<Result<usize, TransportError>>>,
    in_script: RefCell<VecDeque<Result<Vec<u8>, TransportError>>>,
    log: RefCell<Vec<LoggedCall>>,
}

/// A scripted [`ControlTransport`]. Cloning shares the script and log, so a
/// test can keep a handle while the session owns another.
///
/// Out transfers succeed with the full payload length unless a reply was
/// scripted with [`push_out`][Self::push_out] or
/// [`fail_out`][Self::fail_out]. In transfers must always be scripted.
#[derive(Clone, Default)]
pub(crate) struct StubTransport {
    inner: Rc<StubInner>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the byte count reported by the next out transfer.
    pub fn push_out(&self, sent: usize) {
        self.inner.out_script.borrow_mut().push_back(Ok(sent));
    }

    /// Script a failure for the next out transfer.
    pub fn fail_out(&self, err: TransportError) {
        self.inner.out_script.borrow_mut().push_back(Err(err));
    }

    /// Script the response bytes for the next in transfer.
    pub fn push_in(&self, data: Vec<u8>) {
        self.inner.in_script.borrow_mut().push_back(Ok(data));
    }

    /// Script a failure for the next in transfer.
    pub fn fail_in(&self, err: TransportError) {
        self.inner.in_script.borrow_mut().push_back(Err(err));
    }

    /// Total number of transfers issued.
    pub fn calls(&self) -> usize {
        self.inner.log.borrow().len()
    }

    /// All transfers issued so far.
    pub fn log(&self) -> Vec<LoggedCall> {
        self.inner.log.borrow().clone()
    }
}

impl ControlTransport for StubTransport {
    fn control_out(
        &self,
        request: u8,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> Result<usize, TransportError> {
        self.inner.log.borrow_mut().push(LoggedCall {
            request,
            value,
            index,
            data: Some(data.to_vec()),
            read_len: None,
        });
        match self.inner.out_script.borrow_mut().pop_front() {
            Some(reply) => reply,
            None => Ok(data.len()),
        }
    }

    fn control_in(
        &self,
        request: u8,
        value: u16,
        index: u16,
        length: u16,
    ) -> Result<Vec<u8>, TransportError> {
        self.inner.log.borrow_mut().push(LoggedCall {
            request,
            value,
            index,
            data: None,
            read_len: Some(length),
        });
        self.inner
            .in_script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted control_in for request {request}"))
    }
}

/// A scripted [`Probe`]: hands out a prepared transport once, reports a bus
/// failure, or finds nothing.
pub(crate) struct StubProbe {
    transport: Option<StubTransport>,
    failure: Option<TransportError>,
    probes: Rc<Cell<usize>>,
}

impl StubProbe {
    /// A probe that finds `transport` on the first call and nothing after.
    pub fn finding(transport: StubTransport) -> Self {
        Self {
            transport: Some(transport),
            failure: None,
            probes: Rc::default(),
        }
    }

    /// A probe that never finds a device.
    pub fn empty() -> Self {
        Self {
            transport: None,
            failure: None,
            probes: Rc::default(),
        }
    }

    /// A probe whose bus enumeration fails.
    pub fn failing(err: TransportError) -> Self {
        Self {
            transport: None,
            failure: Some(err),
            probes: Rc::default(),
        }
    }

    /// Shared counter of how many times the probe has run.
    pub fn probe_count(&self) -> Rc<Cell<usize>> {
        self.probes.clone()
    }
}

impl Probe for StubProbe {
    type Transport = StubTransport;

    fn probe(&mut self) -> Result<Option<StubTransport>, TransportError> {
        self.probes.set(self.probes.get() + 1);
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        Ok(self.transport.take())
    }
}

/// A plain I/O error for failure scripting.
pub(crate) fn io_failure(msg: &str) -> TransportError {
    TransportError::Io(std::io::Error::other(msg.to_string()))
}
