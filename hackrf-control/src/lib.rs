/*!

A synchronous, control-plane-only host driver for HackRF-class [SDR
peripherals][hackrf], covering the vendor control protocol of the original
Jawbreaker boards: tuning, sample rate, gain stages, amplifier switching,
transceiver mode, and board identity reads. Sample streaming and the bulk
data path are deliberately not part of this crate.

[hackrf]: https://greatscottgadgets.com/hackrf/

The entry point is the [`HackRf`] session. A session starts unopened;
[`HackRf::setup`] discovers the device over USB and opens it, and every
radio operation requires the opened state:

```no_run
use hackrf_control::HackRf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut radio = HackRf::new();
    radio.setup()?;

    println!("board: {}", radio.get_board_id()?);
    println!("firmware: {}", radio.get_version_string()?);
    println!("serial: {}", radio.get_board_serial_number()?);

    radio.set_sample_rate(20_000_000, 1)?;
    radio.set_frequency(915_000_000)?;
    radio.set_lna_gain(16)?;
    radio.set_vga_gain(16)?;
    radio.enable_amp()?;
    radio.set_rx_mode()?;
    Ok(())
}
```

Every operation performs at most one blocking request/response exchange and
returns a typed [`Result`]; nothing is retried or logged-and-swallowed. The
session exclusively owns its transport, so concurrent use from multiple
threads must be serialized externally (the protocol has no correlation IDs
and assumes strict request/response ordering).

The USB layer is injected through the [`ControlTransport`] and [`Probe`]
traits, with [`UsbProbe`]/[`UsbTransport`] as the `nusb`-backed defaults.

*/

#![warn(missing_docs)]

mod consts;
mod error;
pub mod info;
pub mod proto;
mod subdev;
#[cfg(test)]
mod testutil;
pub mod transport;

use std::sync::Arc;

pub use crate::consts::{
    Direction, HACKRF_JAWBREAKER_USB_PID, HACKRF_USB_VID, RequestCode, TransceiverMode,
};
pub use crate::error::Error;
pub use crate::info::{BoardId, BoardSerialNumber};
pub use crate::proto::GainStage;
pub use crate::subdev::{Max2837, Rffc5071, Si5351c, SpiFlash};
pub use crate::transport::{ControlTransport, Probe, TransportError, UsbProbe, UsbTransport};

use crate::proto::Request;
use crate::transport::exchange;

/// The opened half of a session: the transport plus the sub-device handles
/// constructed from it.
struct Opened<T: ControlTransport> {
    transport: Arc<T>,
    max2837: Max2837<T>,
    si5351c: Si5351c<T>,
    rffc5071: Rffc5071<T>,
}

/// A HackRF device session.
///
/// Created unopened; [`setup`][Self::setup] transitions it to opened, after
/// which the radio operations become available. A session that fails to
/// open stays unopened and `setup` can be retried. There is no transition
/// back: dropping the session releases the device.
pub struct HackRf<P: Probe = UsbProbe> {
    probe: P,
    link: Option<Opened<P::Transport>>,
}

impl HackRf<UsbProbe> {
    /// A session that will discover the device over USB with default
    /// settings.
    pub fn new() -> Self {
        Self::with_probe(UsbProbe::new())
    }
}

impl Default for HackRf<UsbProbe> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Probe> HackRf<P> {
    /// A session using a custom discovery collaborator.
    pub fn with_probe(probe: P) -> Self {
        Self { probe, link: None }
    }

    /// Whether `setup` has completed successfully.
    pub fn is_open(&self) -> bool {
        self.link.is_some()
    }

    /// Discover and open the device.
    ///
    /// On success the sub-device handles are constructed in the fixed order
    /// mixer, synthesizer, filter. On failure ([`Error::DeviceNotFound`] if
    /// nothing matched, [`Error::Transport`] if the bus failed) the session
    /// stays unopened. Calling `setup` on an opened session is a no-op.
    pub fn setup(&mut self) -> Result<(), Error> {
        if self.link.is_some() {
            return Ok(());
        }
        let transport = self.probe.probe()?.ok_or(Error::DeviceNotFound)?;
        let transport = Arc::new(transport);
        let max2837 = Max2837::attach(transport.clone())?;
        let si5351c = Si5351c::attach(transport.clone())?;
        let rffc5071 = Rffc5071::attach(transport.clone())?;
        self.link = Some(Opened {
            transport,
            max2837,
            si5351c,
            rffc5071,
        });
        tracing::debug!("device session opened");
        Ok(())
    }

    fn opened(&self) -> Result<&Opened<P::Transport>, Error> {
        self.link.as_ref().ok_or(Error::NotOpened)
    }

    fn submit(&self, req: &Request) -> Result<Vec<u8>, Error> {
        let link = self.opened()?;
        exchange(&*link.transport, req)
    }

    /// Tune to a center frequency in Hz.
    pub fn set_frequency(&self, freq_hz: u64) -> Result<(), Error> {
        self.opened()?;
        let req = Request::set_freq(freq_hz)?;
        tracing::debug!(freq_hz, "setting frequency");
        self.submit(&req)?;
        Ok(())
    }

    /// Set the sample rate from a clock frequency in Hz and a divider.
    ///
    /// The resulting rate is `freq_hz / divider`.
    pub fn set_sample_rate(&self, freq_hz: u32, divider: u32) -> Result<(), Error> {
        self.opened()?;
        tracing::debug!(freq_hz, divider, "setting sample rate");
        self.submit(&Request::set_sample_rate(freq_hz, divider))?;
        Ok(())
    }

    /// Set the baseband filter bandwidth in Hz.
    ///
    /// The device supports 1.75/2.5/3.5/5/5.5/6/7/8/9/10/12/14/15/20/24/28
    /// MHz; choosing one of those values is the caller's responsibility.
    pub fn set_baseband_filter_bandwidth(&self, bandwidth_hz: u32) -> Result<(), Error> {
        self.opened()?;
        self.submit(&Request::set_baseband_filter_bandwidth(bandwidth_hz))?;
        Ok(())
    }

    fn set_gain(&self, stage: GainStage, gain: u16) -> Result<(), Error> {
        self.opened()?;
        let req = Request::set_gain(stage, gain)?;
        tracing::debug!(%stage, gain, "setting gain");
        let resp = self.submit(&req)?;
        proto::decode_gain_ack(&resp)
    }

    /// Set the LNA (RF front-end) gain, 0-40 dB in 8 dB steps.
    pub fn set_lna_gain(&self, gain: u16) -> Result<(), Error> {
        self.set_gain(GainStage::Lna, gain)
    }

    /// Set the receive VGA (baseband) gain, 0-62 dB in 2 dB steps.
    pub fn set_vga_gain(&self, gain: u16) -> Result<(), Error> {
        self.set_gain(GainStage::Vga, gain)
    }

    /// Set the transmit VGA gain, 0-47 dB in 1 dB steps.
    pub fn set_txvga_gain(&self, gain: u16) -> Result<(), Error> {
        self.set_gain(GainStage::TxVga, gain)
    }

    fn set_amp(&self, enable: bool) -> Result<(), Error> {
        self.opened()?;
        self.submit(&Request::set_amp(enable))?;
        Ok(())
    }

    /// Turn on the RF amplifier.
    pub fn enable_amp(&self) -> Result<(), Error> {
        self.set_amp(true)
    }

    /// Turn off the RF amplifier.
    pub fn disable_amp(&self) -> Result<(), Error> {
        self.set_amp(false)
    }

    fn set_mode(&self, mode: TransceiverMode) -> Result<(), Error> {
        self.opened()?;
        tracing::debug!(?mode, "switching transceiver mode");
        self.submit(&Request::set_mode(mode))?;
        Ok(())
    }

    /// Switch the transceiver into receive mode.
    pub fn set_rx_mode(&self) -> Result<(), Error> {
        self.set_mode(TransceiverMode::Receive)
    }

    /// Switch the transceiver into transmit mode.
    pub fn set_tx_mode(&self) -> Result<(), Error> {
        self.set_mode(TransceiverMode::Transmit)
    }

    /// Switch the transceiver off.
    pub fn turn_off(&self) -> Result<(), Error> {
        self.set_mode(TransceiverMode::Off)
    }

    /// Read the board's hardware identifier.
    pub fn get_board_id(&self) -> Result<BoardId, Error> {
        let resp = self.submit(&Request::board_id())?;
        Ok(BoardId::from_u8(proto::decode_board_id(&resp)?))
    }

    /// Read the firmware version string.
    pub fn get_version_string(&self) -> Result<String, Error> {
        let resp = self.submit(&Request::version_string())?;
        Ok(proto::decode_version_string(&resp))
    }

    /// Read the board serial number.
    pub fn get_board_serial_number(&self) -> Result<BoardSerialNumber, Error> {
        let resp = self.submit(&Request::board_serial_number())?;
        proto::decode_serial_number(&resp)
    }

    /// Register access to the MAX2837 transceiver IC.
    pub fn max2837(&self) -> Result<&Max2837<P::Transport>, Error> {
        Ok(&self.opened()?.max2837)
    }

    /// Register access to the SI5351C clock generator.
    pub fn si5351c(&self) -> Result<&Si5351c<P::Transport>, Error> {
        Ok(&self.opened()?.si5351c)
    }

    /// Register access to the RFFC5071 mixer/synthesizer.
    pub fn rffc5071(&self) -> Result<&Rffc5071<P::Transport>, Error> {
        Ok(&self.opened()?.rffc5071)
    }

    /// Access the onboard SPI flash.
    pub fn spiflash(&self) -> Result<SpiFlash<'_, P::Transport>, Error> {
        Ok(SpiFlash::new(&*self.opened()?.transport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{StubProbe, StubTransport, io_failure};

    fn opened_session() -> (HackRf<StubProbe>, StubTransport) {
        let stub = StubTransport::new();
        let mut rf = HackRf::with_probe(StubProbe::finding(stub.clone()));
        rf.setup().unwrap();
        (rf, stub)
    }

    #[test]
    fn operations_before_setup_return_not_opened() {
        let stub = StubTransport::new();
        let rf = HackRf::with_probe(StubProbe::finding(stub.clone()));

        assert!(matches!(rf.set_frequency(915_000_000), Err(Error::NotOpened)));
        assert!(matches!(rf.set_sample_rate(20_000_000, 1), Err(Error::NotOpened)));
        assert!(matches!(rf.set_lna_gain(16), Err(Error::NotOpened)));
        assert!(matches!(rf.enable_amp(), Err(Error::NotOpened)));
        assert!(matches!(rf.set_rx_mode(), Err(Error::NotOpened)));
        assert!(matches!(rf.get_board_id(), Err(Error::NotOpened)));
        assert!(matches!(rf.get_version_string(), Err(Error::NotOpened)));
        assert!(matches!(rf.get_board_serial_number(), Err(Error::NotOpened)));
        assert!(matches!(rf.max2837(), Err(Error::NotOpened)));
        assert_eq!(stub.calls(), 0);
    }

    #[test]
    fn setup_failure_leaves_session_unopened() {
        let mut rf = HackRf::with_probe(StubProbe::empty());
        assert!(matches!(rf.setup(), Err(Error::DeviceNotFound)));
        assert!(!rf.is_open());
        assert!(matches!(rf.set_frequency(1_000_000), Err(Error::NotOpened)));
    }

    #[test]
    fn setup_bus_failure_passes_through() {
        let mut rf = HackRf::with_probe(StubProbe::failing(io_failure("bus fell over")));
        assert!(matches!(rf.setup(), Err(Error::Transport(_))));
        assert!(!rf.is_open());
    }

    #[test]
    fn setup_is_idempotent() {
        let stub = StubTransport::new();
        let probe = StubProbe::finding(stub.clone());
        let probes = probe.probe_count();
        let mut rf = HackRf::with_probe(probe);
        rf.setup().unwrap();
        rf.setup().unwrap();
        assert!(rf.is_open());
        assert_eq!(probes.get(), 1);
        assert_eq!(stub.calls(), 0);
    }

    #[test]
    fn set_frequency_wire_format() {
        let (rf, stub) = opened_session();
        rf.set_frequency(2_441_750_000).unwrap();
        let log = stub.log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].request, RequestCode::SetFreq as u8);
        assert_eq!((log[0].value, log[0].index), (0, 0));
        assert_eq!(
            log[0].data.as_deref(),
            Some(&[0x89u8, 0x09, 0x00, 0x00, 0xB0, 0x71, 0x0B, 0x00][..])
        );
    }

    #[test]
    fn sample_rate_wire_format() {
        let (rf, stub) = opened_session();
        rf.set_sample_rate(20_000_000, 1).unwrap();
        let log = stub.log();
        assert_eq!(log[0].request, RequestCode::SampleRateSet as u8);
        assert_eq!(
            log[0].data.as_deref(),
            Some(&[0x01u8, 0x31, 0x2D, 0x00, 0x00, 0x00, 0x00, 0x01][..])
        );
    }

    #[test]
    fn bandwidth_rides_in_parameter_words() {
        let (rf, stub) = opened_session();
        rf.set_baseband_filter_bandwidth(10_000_000).unwrap();
        let log = stub.log();
        assert_eq!(log[0].request, RequestCode::BasebandFilterBandwidthSet as u8);
        assert_eq!((log[0].value, log[0].index), (0x9680, 0x0098));
        assert_eq!(log[0].data.as_deref(), Some(&[][..]));
    }

    #[test]
    fn gain_validation_happens_before_any_transfer() {
        let (rf, stub) = opened_session();
        assert!(matches!(
            rf.set_lna_gain(41),
            Err(Error::GainOutOfRange { max: 40, .. })
        ));
        assert!(matches!(
            rf.set_vga_gain(63),
            Err(Error::GainOutOfRange { max: 62, .. })
        ));
        assert!(matches!(
            rf.set_txvga_gain(48),
            Err(Error::GainOutOfRange { max: 47, .. })
        ));
        assert_eq!(stub.calls(), 0);
    }

    #[test]
    fn gain_set_reads_back_an_ack() {
        let (rf, stub) = opened_session();
        stub.push_in(vec![1]);
        rf.set_lna_gain(40).unwrap();
        let log = stub.log();
        assert_eq!(log[0].request, RequestCode::SetLnaGain as u8);
        assert_eq!((log[0].value, log[0].index), (0, 40));
        assert_eq!(log[0].read_len, Some(1));

        stub.push_in(vec![0]);
        assert!(matches!(rf.set_vga_gain(2), Err(Error::GainRejected)));
    }

    #[test]
    fn short_transfer_is_an_error() {
        let (rf, stub) = opened_session();
        stub.push_out(4);
        assert!(matches!(
            rf.set_frequency(915_000_000),
            Err(Error::ShortTransfer {
                expected: 8,
                actual: 4
            })
        ));
    }

    #[test]
    fn transport_errors_pass_through_unmodified() {
        let (rf, stub) = opened_session();
        stub.fail_out(io_failure("unplugged"));
        assert!(matches!(
            rf.set_frequency(915_000_000),
            Err(Error::Transport(TransportError::Io(_)))
        ));
        stub.fail_in(io_failure("unplugged"));
        assert!(matches!(
            rf.get_board_id(),
            Err(Error::Transport(TransportError::Io(_)))
        ));
    }

    #[test]
    fn identity_reads() {
        let (rf, stub) = opened_session();

        stub.push_in(vec![1, 0]);
        assert_eq!(rf.get_board_id().unwrap(), BoardId::Jawbreaker);

        stub.push_in(b"2013.07.1".to_vec());
        assert_eq!(rf.get_version_string().unwrap(), "2013.07.1");

        stub.push_in((0u8..100).collect());
        let serial = rf.get_board_serial_number().unwrap();
        assert_eq!(
            serial.groups,
            ["57565554", "5B5A5958", "5F5E5D5C", "63626160"]
        );

        let log = stub.log();
        assert_eq!(log[0].read_len, Some(2));
        assert_eq!(log[1].read_len, Some(100));
        assert_eq!(log[2].read_len, Some(100));
    }

    #[test]
    fn amp_and_mode_requests() {
        let (rf, stub) = opened_session();
        rf.enable_amp().unwrap();
        rf.disable_amp().unwrap();
        rf.set_rx_mode().unwrap();
        rf.set_tx_mode().unwrap();
        rf.turn_off().unwrap();

        let log = stub.log();
        let summary: Vec<(u8, u16)> = log.iter().map(|c| (c.request, c.value)).collect();
        assert_eq!(
            summary,
            vec![
                (RequestCode::AmpEnable as u8, 1),
                (RequestCode::AmpEnable as u8, 0),
                (RequestCode::SetTransceiverMode as u8, 1),
                (RequestCode::SetTransceiverMode as u8, 2),
                (RequestCode::SetTransceiverMode as u8, 0),
            ]
        );
    }

    #[test]
    fn subdevice_handles_share_the_session_transport() {
        let (rf, stub) = opened_session();
        stub.push_in(vec![0x0d, 0x00]);
        assert_eq!(rf.max2837().unwrap().read(0).unwrap(), 0x0d);
        stub.push_in(vec![0x01]);
        assert_eq!(rf.si5351c().unwrap().read(0).unwrap(), 0x01);
        assert_eq!(stub.calls(), 2);
    }
}
