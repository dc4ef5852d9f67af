use clap::Args;
use color_eyre::eyre::Context;
use hackrf_control::{BoardId, BoardSerialNumber, HackRf};

/// Retrieve identity information from the attached HackRF.
#[derive(Args, Debug)]
pub struct Cmd {}

#[derive(Clone, Debug)]
struct AllInfo {
    id: BoardId,
    version_string: String,
    serial: BoardSerialNumber,
}

impl std::fmt::Display for AllInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Board ID: {}", self.id)?;
        writeln!(f, "Firmware Version: {}", self.version_string)?;
        writeln!(
            f,
            "Serial Number: {} {} {} {}",
            self.serial.groups[0],
            self.serial.groups[1],
            self.serial.groups[2],
            self.serial.groups[3],
        )
    }
}

impl Cmd {
    pub fn cmd(&self, radio: &HackRf) -> color_eyre::Result<()> {
        let info = AllInfo {
            id: radio.get_board_id().wrap_err("failed reading board ID")?,
            version_string: radio
                .get_version_string()
                .wrap_err("failed reading version string")?,
            serial: radio
                .get_board_serial_number()
                .wrap_err("failed reading serial number")?,
        };
        print!("{info}");
        Ok(())
    }
}
