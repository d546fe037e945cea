//! Text formatting for the terminal front end.

use tonegen_core::{NoteLabel, Waveform, frequency_to_note};

/// `"440.0 Hz"`
pub fn format_frequency(hz: f32) -> String {
    format!("{hz:.1} Hz")
}

/// Secondary frequency with its note: `"554.0 Hz (C#5)"`.
pub fn format_secondary(hz: f32) -> String {
    format!("{} ({})", format_frequency(hz), frequency_to_note(hz))
}

/// `"Sine @ 440.0 Hz"`
pub fn format_waveform_info(waveform: Waveform, hz: f32) -> String {
    format!("{} @ {}", waveform.label(), format_frequency(hz))
}

/// Volume in [0, 1] as a whole percentage: `"50%"`.
pub fn format_volume(volume: f32) -> String {
    format!("{}%", (volume * 100.0).round() as i32)
}

/// `"A4 (0 cents)"`
pub fn format_note(label: &NoteLabel) -> String {
    format!("{} ({})", label, label.cents_display())
}

/// Plot points in [-1, 1] as `height` rows of text, top row first.
///
/// The zero line is drawn with `-` where no point falls on it.
pub fn ascii_plot(points: &[f32], height: usize) -> Vec<String> {
    let height = height.max(2);
    let mut grid = vec![vec![' '; points.len()]; height];
    let zero_row = (height - 1) / 2;
    if height % 2 == 1 {
        grid[zero_row].fill('-');
    }
    let span = (height - 1) as f32;
    for (col, &p) in points.iter().enumerate() {
        let p = p.clamp(-1.0, 1.0);
        let row = ((1.0 - p) * 0.5 * span).round() as usize;
        grid[row.min(height - 1)][col] = '*';
    }
    grid.into_iter().map(|row| row.into_iter().collect()).collect()
}

const BARS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One-line sparkline of byte scope samples (128 = zero), `width` chars wide.
///
/// Each column shows the peak deviation from center within its slice.
pub fn sparkline(bytes: &[u8], width: usize) -> String {
    if bytes.is_empty() || width == 0 {
        return String::new();
    }
    let width = width.min(bytes.len());
    let chunk = bytes.len() / width;
    bytes
        .chunks(chunk)
        .take(width)
        .map(|slice| {
            let peak = slice
                .iter()
                .map(|&b| (i32::from(b) - 128).unsigned_abs())
                .max()
                .unwrap_or(0);
            BARS[(peak as usize * (BARS.len() - 1)).div_ceil(128).min(BARS.len() - 1)]
        })
        .collect()
}

/// Sparkline of a float preview in [-1, 1].
pub fn preview_sparkline(points: &[f32]) -> String {
    points
        .iter()
        .map(|p| {
            let level = ((p.clamp(-1.0, 1.0) + 1.0) * 0.5 * (BARS.len() - 1) as f32).round();
            BARS[level as usize]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonegen_core::preview;

    #[test]
    fn test_frequency_formats() {
        assert_eq!(format_frequency(440.0), "440.0 Hz");
        assert_eq!(format_frequency(261.63), "261.6 Hz");
        assert_eq!(format_secondary(554.0), "554.0 Hz (C#5)");
        assert_eq!(format_waveform_info(Waveform::Sine, 440.0), "Sine @ 440.0 Hz");
    }

    #[test]
    fn test_volume_and_note_formats() {
        assert_eq!(format_volume(0.5), "50%");
        assert_eq!(format_volume(0.0), "0%");
        assert_eq!(format_volume(1.0), "100%");
        assert_eq!(format_note(&frequency_to_note(440.0)), "A4 (0 cents)");
        assert_eq!(format_note(&frequency_to_note(445.0)), "A4 (+20 cents)");
    }

    #[test]
    fn test_plot_has_requested_shape() {
        let rows = ascii_plot(&preview(Waveform::Square, 40), 9);
        assert_eq!(rows.len(), 9);
        assert!(rows.iter().all(|r| r.chars().count() == 40));
        // square sits on the top and bottom rows only
        assert!(rows[0].contains('*'));
        assert!(rows[8].contains('*'));
        assert!(!rows[2].contains('*'));
    }

    #[test]
    fn test_sparkline_levels() {
        assert_eq!(sparkline(&[128; 64], 8), "        ");
        assert_eq!(sparkline(&[255; 64], 8), "████████");
        assert_eq!(sparkline(&[], 8), "");
    }

    #[test]
    fn test_preview_sparkline_spans_range() {
        let line = preview_sparkline(&[-1.0, 0.0, 1.0]);
        assert_eq!(line, " ▄█");
    }
}
