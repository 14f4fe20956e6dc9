use super::format::AudioFormat;
use super::sink::AudioSink;
use anyhow::Result;
use async_trait::async_trait;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::PathBuf;
use tokio::sync::{mpsc, oneshot};

enum WavCommand {
    WriteChunk(Vec<f32>),
    Finalize { reply: oneshot::Sender<Result<()>> },
}

/// WAV encoder using a dedicated blocking thread for I/O
///
/// A separate thread handles all file I/O so the capture path stays
/// non-blocking. Chunks are sent over a channel and written sequentially.
/// Creating the sink truncates any previous recording at the same path.
pub struct WavSink {
    tx: mpsc::UnboundedSender<WavCommand>,
}

impl WavSink {
    pub fn new(path: PathBuf, format: AudioFormat) -> Result<Self> {
        let spec = WavSpec {
            channels: format.channels,
            sample_rate: format.sample_rate,
            bits_per_sample: AudioFormat::BITS_PER_SAMPLE,
            sample_format: SampleFormat::Int,
        };

        let mut writer = WavWriter::create(&path, spec)
            .map_err(|e| anyhow::anyhow!("Failed to create WAV writer: {}", e))?;

        let (tx, mut rx) = mpsc::unbounded_channel();

        std::thread::spawn(move || {
            while let Some(cmd) = rx.blocking_recv() {
                match cmd {
                    WavCommand::WriteChunk(samples) => {
                        for sample in samples {
                            // Convert f32 (-1.0 to 1.0) to i16
                            let amplitude = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                            if let Err(e) = writer.write_sample(amplitude) {
                                eprintln!("Failed to write sample: {}", e);
                                break;
                            }
                        }
                    }
                    WavCommand::Finalize { reply } => {
                        let result = writer
                            .finalize()
                            .map(|_| ())
                            .map_err(|e| anyhow::anyhow!("Failed to finalize WAV: {}", e));
                        let _ = reply.send(result);
                        break;
                    }
                }
            }
        });

        Ok(Self { tx })
    }
}

#[async_trait]
impl AudioSink for WavSink {
    fn write_chunk(&mut self, samples: Vec<f32>) -> Result<()> {
        self.tx
            .send(WavCommand::WriteChunk(samples))
            .map_err(|e| anyhow::anyhow!("Failed to send write command: {}", e))
    }

    async fn finalize(&mut self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(WavCommand::Finalize { reply })
            .map_err(|e| anyhow::anyhow!("Failed to send finalize command: {}", e))?;

        rx.await
            .map_err(|e| anyhow::anyhow!("Failed to receive finalize response: {}", e))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_and_finalizes_a_readable_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take.wav");
        let format = AudioFormat {
            sample_rate: 8000,
            channels: 1,
        };

        let mut sink = WavSink::new(path.clone(), format).unwrap();
        sink.write_chunk(vec![0.0, 0.5, -0.5, 1.0]).unwrap();
        sink.finalize().await.unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 8000);
        assert_eq!(reader.spec().channels, 1);
        let samples: Vec<i16> = reader.samples().map(|s| s.unwrap()).collect();
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0], 0);
        assert_eq!(samples[3], i16::MAX);
    }

    #[tokio::test]
    async fn overwrites_previous_recording_at_same_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take.wav");
        let format = AudioFormat::default();

        let mut sink = WavSink::new(path.clone(), format).unwrap();
        sink.write_chunk(vec![0.1; 1024]).unwrap();
        sink.finalize().await.unwrap();

        let mut sink = WavSink::new(path.clone(), format).unwrap();
        sink.write_chunk(vec![0.1; 16]).unwrap();
        sink.finalize().await.unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.len(), 16);
    }
}
