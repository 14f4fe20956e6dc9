// NOTE: Capture and encoding assume 16-bit signed integer PCM throughout.
// If another sample format is ever needed, this must be parameterized.

#[derive(Debug, Clone, Copy)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioFormat {
    pub const BITS_PER_SAMPLE: u16 = 16;

    /// Calculate number of samples for a given duration in seconds
    pub fn samples_for_duration(&self, seconds: f32) -> usize {
        (self.sample_rate as f32 * seconds) as usize * self.channels as usize
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        // 44.1kHz mono: the file is recorded for playback, not for a
        // speech model, so keep full voice bandwidth.
        Self {
            sample_rate: 44100,
            channels: 1,
        }
    }
}
