//! Board identity types: the hardware identifier and the serial number.

/// The physical board's identifier, from the first byte of the board-id
/// response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum BoardId {
    Jellybean,
    Jawbreaker,
    HackRfOne,
    Unknown(u8),
}

impl BoardId {
    pub(crate) fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Jellybean,
            1 => Self::Jawbreaker,
            2 => Self::HackRfOne,
            v => Self::Unknown(v),
        }
    }
}

impl std::fmt::Display for BoardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Jellybean => f.write_str("Jellybean"),
            Self::Jawbreaker => f.write_str("Jawbreaker"),
            Self::HackRfOne => f.write_str("HackRF One"),
            Self::Unknown(v) => write!(f, "unknown (0x{:x})", v),
        }
    }
}

/// The board serial number: four hex-string groups recovered from the
/// part-id/serial-number response.
///
/// The groups are kept as strings rather than integers because existing
/// tooling consumes them in exactly this form. Group order and the hex
/// digit order within each group follow the device's layout rule (see the
/// codec's serial-number decoder).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardSerialNumber {
    /// The four serial groups, most significant first.
    pub groups: [String; 4],
}

impl std::fmt::Display for BoardSerialNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            self.groups[0], self.groups[1], self.groups[2], self.groups[3]
        )
    }
}
