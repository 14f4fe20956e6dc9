use crate::config::Config;
use crate::lifecycle::{LifecycleController, Reaction};
use crate::messages::RecordingResult;
use crate::playback::{EffectTuning, Player};
use crate::ui;

use anyhow::Result;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Which of the two screens is showing. The play screen exists only while
/// it holds a finalized recording, carried over by the navigation handoff.
enum Screen {
    Record,
    Play(Player),
}

/// The two-screen application: a record screen driven by the lifecycle
/// controller and a play screen driven by the effects player.
///
/// All transitions happen on this single event loop; the capture service
/// reports back through the completion event channel.
pub struct App {
    controller: LifecycleController,
    event_rx: mpsc::Receiver<RecordingResult>,
    tuning: EffectTuning,
    screen: Screen,
}

impl App {
    pub fn new(
        config: &Config,
        controller: LifecycleController,
        event_rx: mpsc::Receiver<RecordingResult>,
    ) -> Self {
        let tuning = EffectTuning {
            echo_delay: Duration::from_millis(config.echo_delay_ms),
            echo_level: config.echo_level,
            reverb_level: config.reverb_level,
        };

        Self {
            controller,
            event_rx,
            tuning,
            screen: Screen::Record,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        self.render();

        loop {
            tracing::debug!("Main loop: waiting for event");
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if !self.handle_line(line.trim()).await {
                        break;
                    }
                }
                Some(result) = self.event_rx.recv() => {
                    tracing::debug!("Main loop: received completion event");
                    let reaction = self.controller.on_finished(result);
                    self.apply(reaction);
                    self.render();
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received Ctrl+C, shutting down");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Dispatch one line of input to the current screen. Returns false when
    /// the app should exit.
    async fn handle_line(&mut self, line: &str) -> bool {
        if line.is_empty() {
            return true;
        }

        match &mut self.screen {
            Screen::Record => match ui::parse_record_command(line) {
                Some(ui::RecordCommand::Record) => {
                    let reaction = self.controller.request_start().await;
                    self.apply(reaction);
                    self.render();
                }
                Some(ui::RecordCommand::Stop) => {
                    let reaction = self.controller.request_stop().await;
                    self.apply(reaction);
                    self.render();
                }
                Some(ui::RecordCommand::Quit) => return false,
                None => {
                    ui::render_error(&format!("unknown command: {}", line));
                    self.render();
                }
            },

            Screen::Play(player) => match ui::parse_play_command(line) {
                Some(ui::PlayCommand::Effect(preset)) => {
                    if let Err(e) = player.play(preset) {
                        ui::render_error(&e.to_string());
                    }
                }
                Some(ui::PlayCommand::Stop) => player.stop(),
                Some(ui::PlayCommand::Back) => {
                    self.screen = Screen::Record;
                    self.render();
                }
                Some(ui::PlayCommand::Quit) => return false,
                None => {
                    ui::render_error(&format!("unknown command: {}", line));
                    self.render();
                }
            },
        }

        true
    }

    /// Carry out the controller's reaction: surface an error, or perform the
    /// navigation handoff to the play screen.
    fn apply(&mut self, reaction: Reaction) {
        match reaction {
            Reaction::None => {}
            Reaction::SurfaceError(message) => ui::render_error(&message),
            Reaction::Navigate(location) => match Player::new(location, self.tuning) {
                Ok(player) => self.screen = Screen::Play(player),
                Err(e) => ui::render_error(&e.to_string()),
            },
        }
    }

    /// Re-render the current screen; on the record screen the view is a pure
    /// function of the controller state.
    fn render(&self) {
        match &self.screen {
            Screen::Record => ui::render_record_screen(&self.controller.descriptor()),
            Screen::Play(player) => ui::render_play_screen(player.recording()),
        }
    }
}
