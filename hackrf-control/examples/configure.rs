//! Open the first HackRF on the bus, print its identity, and configure it
//! for a 915 MHz receive setup.

use anyhow::{Context, Result};
use hackrf_control::HackRf;

fn main() -> Result<()> {
    let mut radio = HackRf::new();
    radio.setup().context("failed to open HackRF")?;

    println!("Board ID: {}", radio.get_board_id()?);
    println!("Firmware: {}", radio.get_version_string()?);
    println!("Serial:   {}", radio.get_board_serial_number()?);

    radio.set_sample_rate(20_000_000, 1)?;
    radio.set_baseband_filter_bandwidth(15_000_000)?;
    radio.set_frequency(915_000_000)?;
    radio.set_lna_gain(16)?;
    radio.set_vga_gain(20)?;
    radio.enable_amp()?;
    radio.set_rx_mode()?;

    println!("Receiving at 915 MHz. Press enter to stop.");
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;

    radio.turn_off()?;
    Ok(())
}
