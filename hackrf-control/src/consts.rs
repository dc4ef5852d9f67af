//! Wire-format constants for the HackRF vendor control protocol.
//!
//! Every value in this module is part of the device's USB contract and must
//! not be renumbered. The request codes match `hackrf.c` in the original
//! firmware distribution.

/// USB vendor ID for Great Scott Gadgets.
pub const HACKRF_USB_VID: u16 = 0x1d50;
/// USB product ID for the HackRF Jawbreaker.
pub const HACKRF_JAWBREAKER_USB_PID: u16 = 0x604b;

/// Vendor control request codes.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum RequestCode {
    SetTransceiverMode = 1,
    Max2837Write = 2,
    Max2837Read = 3,
    Si5351cWrite = 4,
    Si5351cRead = 5,
    SampleRateSet = 6,
    BasebandFilterBandwidthSet = 7,
    Rffc5071Write = 8,
    Rffc5071Read = 9,
    SpiflashErase = 10,
    SpiflashWrite = 11,
    SpiflashRead = 12,
    /// CPLD bitstream programming. Issued over the bulk path by the stock
    /// host tools, so this driver never sends it; listed for completeness of
    /// the protocol enumeration.
    CpldWrite = 13,
    BoardIdRead = 14,
    VersionStringRead = 15,
    SetFreq = 16,
    AmpEnable = 17,
    BoardPartidSerialnoRead = 18,
    SetLnaGain = 19,
    SetVgaGain = 20,
    SetTxvgaGain = 21,
}

/// Direction of a control transfer, carrying the `bmRequestType` value the
/// device expects for vendor requests.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Host writes to the device (`0x40`).
    HostToDevice = 0x40,
    /// Device replies to the host (`0xC0`).
    DeviceToHost = 0xC0,
}

/// Transceiver operating mode codes.
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TransceiverMode {
    Off = 0,
    Receive = 1,
    Transmit = 2,
}

#[cfg(test)]
mod tests {
    use super::*;

    // The numeric codes are wire contract; a renumbered variant would talk
    // to the device with the wrong request.
    #[test]
    fn request_codes_are_fixed() {
        assert_eq!(RequestCode::SetTransceiverMode as u8, 1);
        assert_eq!(RequestCode::SampleRateSet as u8, 6);
        assert_eq!(RequestCode::BasebandFilterBandwidthSet as u8, 7);
        assert_eq!(RequestCode::CpldWrite as u8, 13);
        assert_eq!(RequestCode::BoardIdRead as u8, 14);
        assert_eq!(RequestCode::SetFreq as u8, 16);
        assert_eq!(RequestCode::AmpEnable as u8, 17);
        assert_eq!(RequestCode::BoardPartidSerialnoRead as u8, 18);
        assert_eq!(RequestCode::SetTxvgaGain as u8, 21);
    }

    #[test]
    fn direction_codes_are_fixed() {
        assert_eq!(Direction::HostToDevice as u8, 0x40);
        assert_eq!(Direction::DeviceToHost as u8, 0xC0);
    }

    #[test]
    fn transceiver_mode_codes_are_fixed() {
        assert_eq!(TransceiverMode::Off as u16, 0);
        assert_eq!(TransceiverMode::Receive as u16, 1);
        assert_eq!(TransceiverMode::Transmit as u16, 2);
    }
}
