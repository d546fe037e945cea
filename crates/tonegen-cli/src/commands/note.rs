//! Frequency to note name.

use clap::Args;
use tonegen_core::{clamp_frequency, frequency_to_note};

use crate::display::{format_frequency, format_note};

#[derive(Args)]
pub struct NoteArgs {
    /// Frequency in Hz (clamped to 20-20000)
    #[arg(allow_negative_numbers = true)]
    frequency: f32,
}

pub fn run(args: NoteArgs) -> anyhow::Result<()> {
    let hz = clamp_frequency(args.frequency);
    if hz != args.frequency {
        println!(
            "({} is outside 20-20000 Hz, using {})",
            args.frequency,
            format_frequency(hz)
        );
    }
    let label = frequency_to_note(hz);
    println!("{} -> {}", format_frequency(hz), format_note(&label));
    Ok(())
}
