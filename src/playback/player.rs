use super::effects::{EffectParams, EffectPreset, pitch_rate_factor};
use anyhow::{Context, Result};
use rodio::source::Source;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Early-reflection taps for the reverb tail, as (delay ms, attenuation)
/// pairs. Gains are further scaled by the configured reverb level.
const REVERB_TAPS: [(u64, f32); 4] = [(43, 1.0), (79, 0.72), (127, 0.5), (191, 0.35)];

/// Tuning knobs for the time-based effects, sourced from the config file.
#[derive(Debug, Clone, Copy)]
pub struct EffectTuning {
    pub echo_delay: Duration,
    pub echo_level: f32,
    pub reverb_level: f32,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            echo_delay: Duration::from_millis(350),
            echo_level: 0.45,
            reverb_level: 0.35,
        }
    }
}

/// Plays the finished recording through an effect preset.
///
/// Owns the output stream for the lifetime of the play screen. At most one
/// sink is live at a time; starting a preset stops the previous one.
pub struct Player {
    recording: PathBuf,
    tuning: EffectTuning,
    stream: OutputStream,
    sink: Option<Sink>,
}

impl Player {
    pub fn new(recording: PathBuf, tuning: EffectTuning) -> Result<Self> {
        let stream =
            OutputStreamBuilder::open_default_stream().context("No output audio device available")?;

        Ok(Self {
            recording,
            tuning,
            stream,
            sink: None,
        })
    }

    pub fn recording(&self) -> &Path {
        &self.recording
    }

    pub fn play(&mut self, preset: EffectPreset) -> Result<()> {
        self.stop();

        let source = build_source(&self.recording, preset.params(), self.tuning)?;
        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        self.sink = Some(sink);

        tracing::info!("Playing {} effect", preset.label());
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}

/// Build the source chain for one preset: rate and pitch both resolve to a
/// playback-speed factor, echo and reverb mix delayed attenuated copies of
/// the processed signal over the dry one.
fn build_source(
    path: &Path,
    params: EffectParams,
    tuning: EffectTuning,
) -> Result<Box<dyn Source + Send>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open recording: {:?}", path))?;
    let decoder = Decoder::new(BufReader::new(file))
        .with_context(|| format!("Failed to decode recording: {:?}", path))?;

    let base = decoder.buffered();
    let factor = params.rate * pitch_rate_factor(params.pitch_cents);

    let mut source: Box<dyn Source + Send> = Box::new(base.clone().speed(factor));

    if params.echo {
        let wet = base
            .clone()
            .speed(factor)
            .delay(tuning.echo_delay)
            .amplify(tuning.echo_level);
        source = Box::new(source.mix(wet));
    }

    if params.reverb {
        for (delay_ms, attenuation) in REVERB_TAPS {
            let tap = base
                .clone()
                .speed(factor)
                .delay(Duration::from_millis(delay_ms))
                .amplify(tuning.reverb_level * attenuation);
            source = Box::new(source.mix(tap));
        }
    }

    Ok(source)
}
