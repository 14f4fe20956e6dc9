use crate::audio::{AudioCapture, AudioFormat, AudioSink, WavSink, capture::peak_level};
use crate::error::CaptureError;
use crate::lifecycle::CaptureBackend;
use crate::messages::{RecorderCommand, RecordingResult};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::{mpsc, oneshot};

/// Coordinates audio capture and encoding
///
/// This service:
/// - Opens and owns the capture stream for the duration of a session
/// - Receives audio chunks via channel and streams them to the WAV sink
/// - Reports exactly one RecordingResult per finalize on the event channel
///
/// Note: This service holds cpal::Stream which is !Send, so it must be spawned
/// on a LocalSet using tokio::task::spawn_local.
pub struct Recorder {
    format: AudioFormat,
    cmd_rx: mpsc::Receiver<RecorderCommand>,
    audio_rx: mpsc::Receiver<Vec<f32>>,
    audio_tx: mpsc::Sender<Vec<f32>>,
    event_tx: mpsc::Sender<RecordingResult>,
    sink: Option<Box<dyn AudioSink + Send>>,
    stream: Option<cpal::Stream>,
    destination: Option<PathBuf>,
    recording: bool,
}

impl Recorder {
    pub fn new(
        format: AudioFormat,
        cmd_rx: mpsc::Receiver<RecorderCommand>,
        audio_rx: mpsc::Receiver<Vec<f32>>,
        audio_tx: mpsc::Sender<Vec<f32>>,
        event_tx: mpsc::Sender<RecordingResult>,
    ) -> Self {
        Self {
            format,
            cmd_rx,
            audio_rx,
            audio_tx,
            event_tx,
            sink: None,
            stream: None,
            destination: None,
            recording: false,
        }
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                // Handle commands from the lifecycle controller
                Some(cmd) = self.cmd_rx.recv() => {
                    self.handle_command(cmd).await;
                }

                // Receive and process audio chunks (only when recording)
                Some(chunk) = self.audio_rx.recv(), if self.recording => {
                    tracing::trace!(peak = peak_level(&chunk) as f64, "audio level");
                    self.write_chunk(chunk);
                }
            }
        }
    }

    fn write_chunk(&mut self, chunk: Vec<f32>) {
        if let Some(sink) = self.sink.as_mut() {
            // Vec is moved to the sink, no copy
            if let Err(e) = sink.write_chunk(chunk) {
                tracing::error!("Failed to write audio chunk: {}", e);
                self.recording = false;
            }
        }
    }

    async fn handle_command(&mut self, cmd: RecorderCommand) {
        match cmd {
            RecorderCommand::Acquire { destination, reply } => {
                let result = self.acquire(destination);
                let _ = reply.send(result);
            }

            RecorderCommand::Finalize => {
                let result = self.finalize().await;
                // Exactly one completion event per finalize; the controller
                // treats this channel as the only source of truth.
                if self.event_tx.send(result).await.is_err() {
                    tracing::error!("Completion event dropped: controller is gone");
                }
            }
        }
    }

    fn acquire(&mut self, destination: PathBuf) -> Result<(), CaptureError> {
        if self.stream.is_some() {
            return Err(CaptureError::Acquisition(
                "a capture session is already in progress".into(),
            ));
        }

        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CaptureError::Acquisition(format!("cannot create recording directory: {}", e))
            })?;
        }

        // Overwrites any previous recording at the same path
        let sink = WavSink::new(destination.clone(), self.format)
            .map_err(|e| CaptureError::Acquisition(e.to_string()))?;

        match AudioCapture::start(self.format, self.audio_tx.clone()) {
            Ok(stream) => {
                self.sink = Some(Box::new(sink));
                self.stream = Some(stream);
                self.destination = Some(destination);
                self.recording = true;
                tracing::info!("Recording started");
                Ok(())
            }
            Err(e) => {
                // Dropping the sink ends its writer thread; no open handle
                // survives a failed acquisition.
                drop(sink);
                Err(CaptureError::Acquisition(e.to_string()))
            }
        }
    }

    async fn finalize(&mut self) -> RecordingResult {
        self.recording = false;

        // Drop the stream to stop audio capture
        self.stream = None;

        // Drain any remaining audio chunks from the channel into the sink
        while let Ok(chunk) = self.audio_rx.try_recv() {
            if let Some(sink) = self.sink.as_mut() {
                if let Err(e) = sink.write_chunk(chunk) {
                    tracing::error!("Failed to write audio chunk during drain: {}", e);
                    break;
                }
            }
        }

        // Replace audio channel with a fresh one for the next recording.
        // This drops the old receiver, which causes the bridge task's
        // tx.send() to fail and signals it to exit cleanly.
        let (new_audio_tx, new_audio_rx) = mpsc::channel(100);
        self.audio_tx = new_audio_tx;
        self.audio_rx = new_audio_rx;

        // Give the bridge task a moment to receive the Err from its send
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        let sink = self.sink.take();
        let destination = self.destination.take();

        let result = match (sink, destination) {
            (Some(mut sink), Some(destination)) => match sink.finalize().await {
                Ok(()) => RecordingResult::Success(destination),
                Err(e) => RecordingResult::Failure(e.to_string()),
            },
            _ => RecordingResult::Failure("no recording in progress".into()),
        };

        tracing::info!("Recording stopped");
        result
    }
}

/// Handle for communicating with the Recorder
#[derive(Clone)]
pub struct RecorderHandle {
    tx: mpsc::Sender<RecorderCommand>,
}

impl RecorderHandle {
    pub fn new(tx: mpsc::Sender<RecorderCommand>) -> Self {
        Self { tx }
    }

    /// Start a capture session writing to `destination`. Resolves once the
    /// device and output file are open, or with the acquisition failure.
    pub async fn acquire(&self, destination: PathBuf) -> Result<(), CaptureError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(RecorderCommand::Acquire { destination, reply })
            .await
            .map_err(|_| CaptureError::Acquisition("capture service is not running".into()))?;

        rx.await
            .map_err(|_| CaptureError::Acquisition("capture service dropped the request".into()))?
    }

    /// Request finalization. The outcome arrives later, exactly once, on the
    /// completion event channel.
    pub async fn finalize(&self) -> Result<(), CaptureError> {
        self.tx
            .send(RecorderCommand::Finalize)
            .await
            .map_err(|_| CaptureError::Save("capture service is not running".into()))
    }
}

#[async_trait]
impl CaptureBackend for RecorderHandle {
    async fn acquire(&mut self, destination: PathBuf) -> Result<(), CaptureError> {
        RecorderHandle::acquire(self, destination).await
    }

    async fn finalize(&mut self) -> Result<(), CaptureError> {
        RecorderHandle::finalize(self).await
    }
}
