//! ASCII plot of a waveform's static preview.

use clap::Args;
use tonegen_core::{PREVIEW_CYCLES, Waveform, preview};

use crate::display::ascii_plot;

#[derive(Args)]
pub struct PreviewArgs {
    /// Waveform: sine, square, sawtooth, triangle
    waveform: Waveform,

    /// Plot width in columns
    #[arg(long, default_value = "64")]
    width: usize,

    /// Plot height in rows
    #[arg(long, default_value = "11")]
    height: usize,
}

pub fn run(args: PreviewArgs) -> anyhow::Result<()> {
    if args.width == 0 {
        anyhow::bail!("--width must be at least 1");
    }
    println!("{} ({} cycles)", args.waveform.label(), PREVIEW_CYCLES);
    for row in ascii_plot(&preview(args.waveform, args.width), args.height) {
        println!("|{}", row.trim_end());
    }
    Ok(())
}
