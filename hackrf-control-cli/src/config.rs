use clap::Args;
use color_eyre::eyre::Context;
use hackrf_control::HackRf;

/// Apply radio settings. Options that aren't given are left untouched.
#[derive(Args, Debug)]
pub struct Cmd {
    /// Center frequency in Hz.
    #[arg(short, long)]
    freq_hz: Option<u64>,

    /// Sample rate clock frequency in Hz. The effective rate is
    /// `rate / divider`.
    #[arg(short = 'r', long = "rate")]
    sample_rate_hz: Option<u32>,

    /// Sample rate divider.
    #[arg(short = 'd', long, default_value_t = 1)]
    divider: u32,

    /// Baseband filter bandwidth in Hz. The device supports
    /// 1.75/2.5/3.5/5/5.5/6/7/8/9/10/12/14/15/20/24/28 MHz.
    #[arg(short, long = "baseband")]
    baseband_filter_bw_hz: Option<u32>,

    /// RX LNA (IF) gain, 0-40dB, 8dB steps.
    #[arg(short = 'l', long = "lna")]
    lna_gain: Option<u16>,

    /// RX VGA (baseband) gain, 0-62dB, 2dB steps.
    #[arg(short = 'g', long = "vga")]
    vga_gain: Option<u16>,

    /// TX VGA (IF) gain, 0-47dB, 1dB steps.
    #[arg(short = 'x', long = "txvga")]
    txvga_gain: Option<u16>,

    /// RX/TX RF amplifier on/off.
    #[arg(short, long = "amp_en")]
    amp_enable: Option<bool>,
}

impl Cmd {
    pub fn cmd(&self, radio: &HackRf) -> color_eyre::Result<()> {
        if let Some(rate) = self.sample_rate_hz {
            radio
                .set_sample_rate(rate, self.divider)
                .wrap_err("failed setting sample rate")?;
        }

        if let Some(bw) = self.baseband_filter_bw_hz {
            radio
                .set_baseband_filter_bandwidth(bw)
                .wrap_err("failed setting baseband filter bandwidth")?;
        }

        if let Some(freq_hz) = self.freq_hz {
            radio
                .set_frequency(freq_hz)
                .wrap_err("failed setting frequency")?;
        }

        if let Some(gain) = self.lna_gain {
            radio.set_lna_gain(gain).wrap_err("failed setting LNA gain")?;
        }

        if let Some(gain) = self.vga_gain {
            radio.set_vga_gain(gain).wrap_err("failed setting VGA gain")?;
        }

        if let Some(gain) = self.txvga_gain {
            radio
                .set_txvga_gain(gain)
                .wrap_err("failed setting TXVGA gain")?;
        }

        if let Some(enable) = self.amp_enable {
            let result = if enable {
                radio.enable_amp()
            } else {
                radio.disable_amp()
            };
            result.wrap_err("failed switching amplifier")?;
        }

        Ok(())
    }
}
