/// The six playback presets offered on the play screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectPreset {
    Slow,
    Fast,
    Chipmunk,
    Vader,
    Echo,
    Reverb,
}

/// Effect selector handed to the playback engine: a rate multiplier, a pitch
/// shift in cents, and echo/reverb switches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectParams {
    pub rate: f32,
    pub pitch_cents: f32,
    pub echo: bool,
    pub reverb: bool,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch_cents: 0.0,
            echo: false,
            reverb: false,
        }
    }
}

impl EffectPreset {
    pub const ALL: [EffectPreset; 6] = [
        EffectPreset::Slow,
        EffectPreset::Fast,
        EffectPreset::Chipmunk,
        EffectPreset::Vader,
        EffectPreset::Echo,
        EffectPreset::Reverb,
    ];

    pub fn params(self) -> EffectParams {
        match self {
            EffectPreset::Slow => EffectParams {
                rate: 0.5,
                ..EffectParams::default()
            },
            EffectPreset::Fast => EffectParams {
                rate: 1.5,
                ..EffectParams::default()
            },
            EffectPreset::Chipmunk => EffectParams {
                pitch_cents: 1000.0,
                ..EffectParams::default()
            },
            EffectPreset::Vader => EffectParams {
                pitch_cents: -1000.0,
                ..EffectParams::default()
            },
            EffectPreset::Echo => EffectParams {
                echo: true,
                ..EffectParams::default()
            },
            EffectPreset::Reverb => EffectParams {
                reverb: true,
                ..EffectParams::default()
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EffectPreset::Slow => "slow",
            EffectPreset::Fast => "fast",
            EffectPreset::Chipmunk => "chipmunk",
            EffectPreset::Vader => "vader",
            EffectPreset::Echo => "echo",
            EffectPreset::Reverb => "reverb",
        }
    }

    pub fn from_command(command: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.label() == command)
    }
}

/// Playback-rate factor for a pitch shift in cents (100 cents per semitone,
/// an octave doubles the rate).
pub fn pitch_rate_factor(cents: f32) -> f32 {
    2.0f32.powf(cents / 1200.0)
}
