mod config;
mod info;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Context;
use hackrf_control::HackRf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print identity information for the attached HackRF.
    Info(info::Cmd),
    /// Apply radio settings (frequency, rates, gains, amplifier).
    Config(config::Cmd),
    /// Switch the transceiver into receive mode.
    Rx,
    /// Switch the transceiver into transmit mode.
    Tx,
    /// Switch the transceiver off.
    Off,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Cli::parse();

    let mut radio = HackRf::new();
    radio.setup().wrap_err("failed to open HackRF")?;

    match args.command {
        Commands::Info(c) => c.cmd(&radio),
        Commands::Config(c) => c.cmd(&radio),
        Commands::Rx => radio.set_rx_mode().wrap_err("failed to enter receive mode"),
        Commands::Tx => radio.set_tx_mode().wrap_err("failed to enter transmit mode"),
        Commands::Off => radio.turn_off().wrap_err("failed to switch off"),
    }
}
