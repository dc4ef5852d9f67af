//! The control-transfer transport and device discovery.
//!
//! The driver core never touches USB directly; it talks through the
//! [`ControlTransport`] trait, which performs one vendor control transfer
//! per call. [`UsbTransport`] is the real implementation on top of `nusb`'s
//! blocking API, and [`UsbProbe`] finds and opens the device. Tests inject
//! scripted stand-ins for both.

use std::time::Duration;

use nusb::transfer::{Control, ControlType, Recipient};

use crate::consts::{HACKRF_JAWBREAKER_USB_PID, HACKRF_USB_VID};
use crate::error::Error;
use crate::proto::{Body, Request};

/// Default per-transfer timeout used by [`UsbTransport`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// A failure in the underlying control channel.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TransportError {
    /// Underlying OS I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// Transfer error from `nusb` (stall, cancellation, disconnect, ...).
    #[error("USB transfer error")]
    Transfer(#[from] nusb::transfer::TransferError),
}

/// One bidirectional vendor control channel to a device.
///
/// Implementations perform exactly one blocking request/response exchange
/// per call and apply whatever timeout policy they choose; the driver core
/// specifies none.
pub trait ControlTransport {
    /// Perform a host-to-device vendor transfer, returning the number of
    /// payload bytes actually sent.
    fn control_out(
        &self,
        request: u8,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> Result<usize, TransportError>;

    /// Perform a device-to-host vendor transfer of up to `length` bytes,
    /// returning whatever the device sent.
    fn control_in(
        &self,
        request: u8,
        value: u16,
        index: u16,
        length: u16,
    ) -> Result<Vec<u8>, TransportError>;
}

/// Run one encoded request against a transport, enforcing the short-transfer
/// rule for host-to-device payloads. Device-to-host length checks are
/// per-operation and live with the decoders.
pub(crate) fn exchange<T: ControlTransport>(
    transport: &T,
    req: &Request,
) -> Result<Vec<u8>, Error> {
    match &req.body {
        Body::None => {
            transport.control_out(req.code as u8, req.value, req.index, &[])?;
            Ok(Vec::new())
        }
        Body::Write(data) => {
            let sent = transport.control_out(req.code as u8, req.value, req.index, data)?;
            if sent < data.len() {
                return Err(Error::ShortTransfer {
                    expected: data.len(),
                    actual: sent,
                });
            }
            Ok(Vec::new())
        }
        Body::Read(length) => {
            Ok(transport.control_in(req.code as u8, req.value, req.index, *length)?)
        }
    }
}

/// The real transport: a claimed `nusb` interface plus a transfer timeout.
pub struct UsbTransport {
    interface: nusb::Interface,
    timeout: Duration,
}

impl UsbTransport {
    fn control(request: u8, value: u16, index: u16) -> Control {
        Control {
            control_type: ControlType::Vendor,
            recipient: Recipient::Device,
            request,
            value,
            index,
        }
    }
}

impl ControlTransport for UsbTransport {
    fn control_out(
        &self,
        request: u8,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> Result<usize, TransportError> {
        Ok(self.interface.control_out_blocking(
            Self::control(request, value, index),
            data,
            self.timeout,
        )?)
    }

    fn control_in(
        &self,
        request: u8,
        value: u16,
        index: u16,
        length: u16,
    ) -> Result<Vec<u8>, TransportError> {
        let mut buf = vec![0u8; length as usize];
        let n = self.interface.control_in_blocking(
            Self::control(request, value, index),
            &mut buf,
            self.timeout,
        )?;
        buf.truncate(n);
        Ok(buf)
    }
}

/// Device discovery: finds a transceiver on the bus and opens a transport
/// to it. Injected into the session so tests can simulate discovery
/// failures.
pub trait Probe {
    /// The transport type this probe produces.
    type Transport: ControlTransport;

    /// Look for a device. `Ok(None)` means nothing matching was found;
    /// `Err` means the bus enumeration or the open itself failed.
    fn probe(&mut self) -> Result<Option<Self::Transport>, TransportError>;
}

/// USB discovery by vendor/product ID, producing a [`UsbTransport`].
#[derive(Clone, Debug)]
pub struct UsbProbe {
    timeout: Duration,
}

impl UsbProbe {
    /// A probe using the default transfer timeout.
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// A probe whose opened transport uses the given per-transfer timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for UsbProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe for UsbProbe {
    type Transport = UsbTransport;

    fn probe(&mut self) -> Result<Option<UsbTransport>, TransportError> {
        let Some(info) = nusb::list_devices()?.find(|d| {
            d.vendor_id() == HACKRF_USB_VID && d.product_id() == HACKRF_JAWBREAKER_USB_PID
        }) else {
            return Ok(None);
        };

        tracing::debug!(serial = ?info.serial_number(), "found HackRF, opening");
        let device = info.open()?;
        #[cfg(not(target_os = "windows"))]
        {
            let config = device
                .active_configuration()
                .map_err(std::io::Error::other)?;
            if config.configuration_value() != 1 {
                device.detach_kernel_driver(0)?;
                device.set_configuration(1)?;
            }
        }
        let interface = device.detach_and_claim_interface(0)?;

        Ok(Some(UsbTransport {
            interface,
            timeout: self.timeout,
        }))
    }
}
