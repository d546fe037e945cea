//! Fixed frequency presets and musical intervals.

use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an unknown preset name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown preset '{0}' (expected a440, middleC, bass or treble)")]
pub struct UnknownPreset(pub String);

/// Error returned when parsing an unknown interval name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown interval '{0}'")]
pub struct UnknownInterval(pub String);

/// Primary-frequency presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Concert A, 440 Hz.
    A440,
    /// Middle C, 261.63 Hz.
    MiddleC,
    /// Low test tone, 100 Hz.
    Bass,
    /// High test tone, 1 kHz.
    Treble,
}

impl Preset {
    /// All presets in display order.
    pub const ALL: [Preset; 4] = [Preset::A440, Preset::MiddleC, Preset::Bass, Preset::Treble];

    /// Frequency in Hz.
    pub fn frequency(self) -> f32 {
        match self {
            Preset::A440 => 440.0,
            Preset::MiddleC => 261.63,
            Preset::Bass => 100.0,
            Preset::Treble => 1000.0,
        }
    }

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Preset::A440 => "a440",
            Preset::MiddleC => "middleC",
            Preset::Bass => "bass",
            Preset::Treble => "treble",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "a440" | "a4" => Ok(Preset::A440),
            "middlec" | "c4" => Ok(Preset::MiddleC),
            "bass" => Ok(Preset::Bass),
            "treble" => Ok(Preset::Treble),
            _ => Err(UnknownPreset(s.trim().to_string())),
        }
    }
}

/// Common just-intonation intervals for the secondary voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    /// 1:1
    Unison,
    /// 6:5
    MinorThird,
    /// 5:4
    MajorThird,
    /// 4:3
    Fourth,
    /// 3:2
    Fifth,
    /// 2:1
    Octave,
}

impl Interval {
    /// All intervals, narrowest first.
    pub const ALL: [Interval; 6] = [
        Interval::Unison,
        Interval::MinorThird,
        Interval::MajorThird,
        Interval::Fourth,
        Interval::Fifth,
        Interval::Octave,
    ];

    /// Frequency ratio of the secondary voice to the primary.
    pub fn ratio(self) -> f32 {
        match self {
            Interval::Unison => 1.0,
            Interval::MinorThird => 6.0 / 5.0,
            Interval::MajorThird => 5.0 / 4.0,
            Interval::Fourth => 4.0 / 3.0,
            Interval::Fifth => 3.0 / 2.0,
            Interval::Octave => 2.0,
        }
    }

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Interval::Unison => "unison",
            Interval::MinorThird => "minor-third",
            Interval::MajorThird => "major-third",
            Interval::Fourth => "fourth",
            Interval::Fifth => "fifth",
            Interval::Octave => "octave",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Interval {
    type Err = UnknownInterval;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match key.as_str() {
            "unison" => Ok(Interval::Unison),
            "minor-third" | "m3" => Ok(Interval::MinorThird),
            "major-third" | "third" => Ok(Interval::MajorThird),
            "fourth" | "p4" => Ok(Interval::Fourth),
            "fifth" | "p5" => Ok(Interval::Fifth),
            "octave" | "p8" => Ok(Interval::Octave),
            _ => Err(UnknownInterval(s.trim().to_string())),
        }
    }
}
