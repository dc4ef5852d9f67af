//! Protocol codec: translation between radio operations and vendor control
//! requests, plus decoding of the multi-field responses.
//!
//! Everything here is pure. A [`Request`] fully describes one control
//! exchange (request code, direction, the two 16-bit parameter words, and an
//! optional payload or expected response length); actually performing it is
//! the transport's job.
//!
//! Two wire quirks are reproduced deliberately:
//!
//! - The frequency payload is little-endian while the sample-rate payload is
//!   big-endian. The firmware really is asymmetric here; do not unify them.
//! - The gain-set requests are device-to-host transfers that read back a
//!   1-byte acknowledgment, even though they are conceptually writes.

use crate::consts::{Direction, RequestCode, TransceiverMode};
use crate::error::Error;
use crate::info::BoardSerialNumber;

const FREQ_ONE_MHZ: u64 = 1_000_000;

/// Response length requested for the version string read.
pub const VERSION_STRING_LEN: u16 = 100;
/// Response length requested for the part-id/serial-number read.
pub const SERIAL_NUMBER_LEN: u16 = 100;
/// Minimum response length the serial-number decoder can work with: the
/// 8-byte part-id region plus four 4-byte serial groups.
pub const SERIAL_NUMBER_MIN_LEN: usize = 24;

/// Payload side of a control request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Body {
    /// No payload in either direction.
    None,
    /// Host-to-device payload bytes.
    Write(Vec<u8>),
    /// Expected device-to-host response length, in bytes.
    Read(u16),
}

/// A fully-encoded vendor control request, ready for the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    /// Vendor request code.
    pub code: RequestCode,
    /// Transfer direction (also the `bmRequestType` value).
    pub direction: Direction,
    /// The `wValue` parameter word.
    pub value: u16,
    /// The `wIndex` parameter word.
    pub index: u16,
    /// Payload or expected response length.
    pub body: Body,
}

/// A gain stage of the receive/transmit chain, with its fixed maximum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GainStage {
    /// RF front-end LNA, 0-40 dB in 8 dB steps.
    Lna,
    /// Receive baseband VGA, 0-62 dB in 2 dB steps.
    Vga,
    /// Transmit VGA, 0-47 dB in 1 dB steps.
    TxVga,
}

impl GainStage {
    /// Maximum accepted gain for this stage, in dB.
    pub fn max_db(self) -> u16 {
        match self {
            Self::Lna => 40,
            Self::Vga => 62,
            Self::TxVga => 47,
        }
    }

    fn request_code(self) -> RequestCode {
        match self {
            Self::Lna => RequestCode::SetLnaGain,
            Self::Vga => RequestCode::SetVgaGain,
            Self::TxVga => RequestCode::SetTxvgaGain,
        }
    }
}

impl std::fmt::Display for GainStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lna => f.write_str("LNA"),
            Self::Vga => f.write_str("VGA"),
            Self::TxVga => f.write_str("TXVGA"),
        }
    }
}

impl Request {
    /// Switch the transceiver mode.
    pub fn set_mode(mode: TransceiverMode) -> Request {
        Request {
            code: RequestCode::SetTransceiverMode,
            direction: Direction::HostToDevice,
            value: mode as u16,
            index: 0,
            body: Body::None,
        }
    }

    /// Tune to a center frequency in Hz.
    ///
    /// The frequency is split into a megahertz count and a residual below
    /// 1 MHz, packed as two *little-endian* u32 fields. Fails with
    /// [`Error::InvalidFrequency`] if the megahertz count overflows its
    /// field.
    pub fn set_freq(freq_hz: u64) -> Result<Request, Error> {
        #[repr(C)]
        #[derive(Clone, Copy, bytemuck::Zeroable, bytemuck::Pod)]
        struct FreqParams {
            mhz: u32,
            hz: u32,
        }

        let mhz = freq_hz / FREQ_ONE_MHZ;
        let hz = freq_hz % FREQ_ONE_MHZ;
        if mhz > u32::MAX as u64 {
            return Err(Error::InvalidFrequency { freq_hz });
        }
        let params = FreqParams {
            mhz: (mhz as u32).to_le(),
            hz: (hz as u32).to_le(),
        };

        Ok(Request {
            code: RequestCode::SetFreq,
            direction: Direction::HostToDevice,
            value: 0,
            index: 0,
            body: Body::Write(bytemuck::bytes_of(&params).to_vec()),
        })
    }

    /// Set the sample rate from a clock frequency and divider.
    ///
    /// Both fields are packed *big-endian*, unlike the frequency payload.
    pub fn set_sample_rate(freq_hz: u32, divider: u32) -> Request {
        #[repr(C)]
        #[derive(Clone, Copy, bytemuck::Zeroable, bytemuck::Pod)]
        struct RateParams {
            freq_hz: u32,
            divider: u32,
        }

        let params = RateParams {
            freq_hz: freq_hz.to_be(),
            divider: divider.to_be(),
        };

        Request {
            code: RequestCode::SampleRateSet,
            direction: Direction::HostToDevice,
            value: 0,
            index: 0,
            body: Body::Write(bytemuck::bytes_of(&params).to_vec()),
        }
    }

    /// Set the baseband filter bandwidth in Hz.
    ///
    /// The bandwidth rides in the parameter words: `wValue` carries the low
    /// 16 bits and `wIndex` the high 16. The device supports a discrete set
    /// of bandwidths (1.75/2.5/3.5/5/5.5/6/7/8/9/10/12/14/15/20/24/28 MHz);
    /// picking one of them is the caller's responsibility, matching the
    /// firmware's own looseness.
    pub fn set_baseband_filter_bandwidth(bandwidth_hz: u32) -> Request {
        Request {
            code: RequestCode::BasebandFilterBandwidthSet,
            direction: Direction::HostToDevice,
            value: (bandwidth_hz & 0xffff) as u16,
            index: (bandwidth_hz >> 16) as u16,
            body: Body::None,
        }
    }

    /// Set a gain stage.
    ///
    /// The gain travels in `wIndex` and the device reads back a one-byte
    /// acknowledgment, so this is a device-to-host transfer despite being a
    /// "set". Fails with [`Error::GainOutOfRange`] before any transfer if
    /// the value exceeds the stage maximum.
    pub fn set_gain(stage: GainStage, gain: u16) -> Result<Request, Error> {
        let max = stage.max_db();
        if gain > max {
            return Err(Error::GainOutOfRange { stage, gain, max });
        }
        Ok(Request {
            code: stage.request_code(),
            direction: Direction::DeviceToHost,
            value: 0,
            index: gain,
            body: Body::Read(1),
        })
    }

    /// Enable or disable the RF amplifier.
    pub fn set_amp(enable: bool) -> Request {
        Request {
            code: RequestCode::AmpEnable,
            direction: Direction::HostToDevice,
            value: enable as u16,
            index: 0,
            body: Body::None,
        }
    }

    /// Read the board identifier (2-byte response).
    pub fn board_id() -> Request {
        Request {
            code: RequestCode::BoardIdRead,
            direction: Direction::DeviceToHost,
            value: 0,
            index: 0,
            body: Body::Read(2),
        }
    }

    /// Read the firmware version string.
    pub fn version_string() -> Request {
        Request {
            code: RequestCode::VersionStringRead,
            direction: Direction::DeviceToHost,
            value: 0,
            index: 0,
            body: Body::Read(VERSION_STRING_LEN),
        }
    }

    /// Read the part-id/serial-number block.
    pub fn board_serial_number() -> Request {
        Request {
            code: RequestCode::BoardPartidSerialnoRead,
            direction: Direction::DeviceToHost,
            value: 0,
            index: 0,
            body: Body::Read(SERIAL_NUMBER_LEN),
        }
    }

    /// Read a MAX2837 register (16-bit, little-endian response).
    pub fn max2837_read(register: u8) -> Request {
        Request {
            code: RequestCode::Max2837Read,
            direction: Direction::DeviceToHost,
            value: 0,
            index: register as u16,
            body: Body::Read(2),
        }
    }

    /// Write a MAX2837 register.
    pub fn max2837_write(register: u8, value: u16) -> Request {
        Request {
            code: RequestCode::Max2837Write,
            direction: Direction::HostToDevice,
            value,
            index: register as u16,
            body: Body::None,
        }
    }

    /// Read an SI5351C register (1-byte response).
    pub fn si5351c_read(register: u8) -> Request {
        Request {
            code: RequestCode::Si5351cRead,
            direction: Direction::DeviceToHost,
            value: 0,
            index: register as u16,
            body: Body::Read(1),
        }
    }

    /// Write an SI5351C register.
    pub fn si5351c_write(register: u8, value: u8) -> Request {
        Request {
            code: RequestCode::Si5351cWrite,
            direction: Direction::HostToDevice,
            value: value as u16,
            index: register as u16,
            body: Body::None,
        }
    }

    /// Read an RFFC5071 register (16-bit, little-endian response).
    pub fn rffc5071_read(register: u8) -> Request {
        Request {
            code: RequestCode::Rffc5071Read,
            direction: Direction::DeviceToHost,
            value: 0,
            index: register as u16,
            body: Body::Read(2),
        }
    }

    /// Write an RFFC5071 register.
    pub fn rffc5071_write(register: u8, value: u16) -> Request {
        Request {
            code: RequestCode::Rffc5071Write,
            direction: Direction::HostToDevice,
            value,
            index: register as u16,
            body: Body::None,
        }
    }

    /// Erase the SPI flash.
    pub fn spiflash_erase() -> Request {
        Request {
            code: RequestCode::SpiflashErase,
            direction: Direction::HostToDevice,
            value: 0,
            index: 0,
            body: Body::None,
        }
    }

    /// Write one page-bounded chunk to the SPI flash at `addr`.
    pub fn spiflash_write(addr: u32, chunk: Vec<u8>) -> Request {
        Request {
            code: RequestCode::SpiflashWrite,
            direction: Direction::HostToDevice,
            value: (addr >> 16) as u16,
            index: (addr & 0xffff) as u16,
            body: Body::Write(chunk),
        }
    }

    /// Read one page-bounded chunk from the SPI flash at `addr`.
    pub fn spiflash_read(addr: u32, len: u16) -> Request {
        Request {
            code: RequestCode::SpiflashRead,
            direction: Direction::DeviceToHost,
            value: (addr >> 16) as u16,
            index: (addr & 0xffff) as u16,
            body: Body::Read(len),
        }
    }
}

/// Decode the board-id response. The first byte of the 2-byte reply is the
/// significant one.
pub fn decode_board_id(bytes: &[u8]) -> Result<u8, Error> {
    if bytes.len() < 2 {
        return Err(Error::ShortTransfer {
            expected: 2,
            actual: bytes.len(),
        });
    }
    Ok(bytes[0])
}

/// Decode the version-string response as Latin-1 text.
///
/// No length validation beyond what the transport returned; the device
/// replies with however many bytes the string has.
pub fn decode_version_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Decode the part-id/serial-number response into the four serial groups.
///
/// The layout rule, reproduced exactly from the device:
///
/// 1. Drop the first 8 bytes (the part-id region).
/// 2. Reverse the remaining bytes.
/// 3. Take four 4-byte groups from the reversed sequence at `[12..16]`,
///    `[8..12]`, `[4..8]`, `[0..4]`, in that group order.
/// 4. Render each group as uppercase hex, two digits per byte, in array
///    order (the bytes are *not* reversed a second time).
pub fn decode_serial_number(bytes: &[u8]) -> Result<BoardSerialNumber, Error> {
    if bytes.len() < SERIAL_NUMBER_MIN_LEN {
        return Err(Error::ShortTransfer {
            expected: SERIAL_NUMBER_MIN_LEN,
            actual: bytes.len(),
        });
    }

    let mut tail = bytes[8..].to_vec();
    tail.reverse();

    let hex_group = |chunk: &[u8]| -> String {
        chunk.iter().map(|b| format!("{b:02X}")).collect()
    };

    Ok(BoardSerialNumber {
        groups: [
            hex_group(&tail[12..16]),
            hex_group(&tail[8..12]),
            hex_group(&tail[4..8]),
            hex_group(&tail[0..4]),
        ],
    })
}

/// Decode the one-byte acknowledgment of a gain-set request. The device
/// acknowledges with exactly 1.
pub fn decode_gain_ack(bytes: &[u8]) -> Result<(), Error> {
    let ack = bytes.first().ok_or(Error::ShortTransfer {
        expected: 1,
        actual: 0,
    })?;
    if *ack == 1 { Ok(()) } else { Err(Error::GainRejected) }
}
