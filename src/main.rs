mod app;
mod audio;
mod config;
mod error;
mod lifecycle;
mod messages;
mod playback;
mod services;
mod ui;

use app::App;
use audio::AudioFormat;
use config::Config;
use lifecycle::LifecycleController;
use services::{Recorder, RecorderHandle};

use anyhow::Result;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("Starting pitchbooth voice booth");

    // Load configuration
    let config = Config::load()?;
    config.validate()?;

    // Create LocalSet for !Send futures (needed for Recorder which holds cpal::Stream)
    let local = tokio::task::LocalSet::new();

    local.run_until(async move { run_app(config).await }).await
}

async fn run_app(config: Config) -> Result<()> {
    let format = AudioFormat {
        sample_rate: config.sample_rate,
        channels: config.channels,
    };

    // Capture service channels: commands in, audio chunks through,
    // completion events out
    let (audio_tx, audio_rx) = mpsc::channel(100);
    let (recorder_tx, recorder_rx) = mpsc::channel(10);
    let (event_tx, event_rx) = mpsc::channel(10);

    // Create and spawn Recorder (using spawn_local because it's !Send)
    let recorder = Recorder::new(format, recorder_rx, audio_rx, audio_tx, event_tx);
    let recorder_handle = RecorderHandle::new(recorder_tx);
    tokio::task::spawn_local(recorder.run());

    let destination = config.recording_path()?;
    tracing::info!("Recording destination: {:?}", destination);

    let controller = LifecycleController::new(destination, Box::new(recorder_handle));

    App::new(&config, controller, event_rx).run().await?;

    tracing::info!("Pitchbooth shutdown complete");
    Ok(())
}
