use crate::error::CaptureError;
use crate::messages::RecordingResult;
use async_trait::async_trait;
use std::path::PathBuf;

/// The capture capability as seen by the lifecycle controller.
///
/// `acquire` resolves before any transition out of `Stopped`: on `Ok` a live
/// capture session exists, on `Err` nothing was left behind. `finalize` only
/// requests the flush; the outcome arrives later as a `RecordingResult` fed
/// to [`LifecycleController::on_finished`], exactly once per finalize.
#[async_trait]
pub trait CaptureBackend: Send {
    async fn acquire(&mut self, destination: PathBuf) -> Result<(), CaptureError>;
    async fn finalize(&mut self) -> Result<(), CaptureError>;
}

/// Current state of the recording lifecycle. Exactly one is active; the
/// machine cycles for the app's lifetime, there is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    Stopped,
    Recording,
    Saving,
}

/// Live capture session bookkeeping, held from entering `Recording` until
/// leaving `Saving` (on every path, success or not).
#[derive(Debug)]
struct PendingRecording {
    destination: PathBuf,
}

/// What the caller must do after a trigger. At most one reaction per
/// trigger; errors and navigation are mutually exclusive.
#[derive(Debug, Clone, PartialEq)]
pub enum Reaction {
    None,
    /// Show this message to the user; the machine is back in `Stopped`.
    SurfaceError(String),
    /// Hand this finalized file to the playback screen.
    Navigate(PathBuf),
}

/// Owns the recording state, drives the capture backend, and consumes the
/// one-shot completion signal.
///
/// "Stop" and "finished saving" are different events separated by unbounded
/// asynchronous delay: `request_stop` only moves the machine into `Saving`,
/// and navigation happens solely in `on_finished`. The completion channel is
/// the only trusted source of truth for whether the file is on disk.
pub struct LifecycleController {
    state: RecordingState,
    destination: PathBuf,
    capture: Box<dyn CaptureBackend>,
    pending: Option<PendingRecording>,
}

impl LifecycleController {
    pub fn new(destination: PathBuf, capture: Box<dyn CaptureBackend>) -> Self {
        Self {
            state: RecordingState::Stopped,
            destination,
            capture,
            pending: None,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn descriptor(&self) -> UiDescriptor {
        describe(self.state)
    }

    /// User requested to start recording. Valid only from `Stopped`.
    ///
    /// Acquisition resolves before the state ever becomes `Recording`; on
    /// failure the machine stays `Stopped` and the error is surfaced, so the
    /// state is never `Recording` without a live capture behind it.
    pub async fn request_start(&mut self) -> Reaction {
        if self.state != RecordingState::Stopped {
            tracing::debug!(state = ?self.state, "start ignored");
            return Reaction::None;
        }

        match self.capture.acquire(self.destination.clone()).await {
            Ok(()) => {
                self.pending = Some(PendingRecording {
                    destination: self.destination.clone(),
                });
                self.state = RecordingState::Recording;
                tracing::info!("Recording started: {:?}", self.destination);
                Reaction::None
            }
            Err(e) => {
                tracing::warn!("Acquisition failed: {}", e);
                Reaction::SurfaceError(e.to_string())
            }
        }
    }

    /// User requested to stop. Valid only from `Recording`.
    ///
    /// Moves to `Saving` immediately (disabling further start/stop requests)
    /// and commits to awaiting exactly one completion signal. Never
    /// navigates: that happens in `on_finished` once the file is flushed.
    pub async fn request_stop(&mut self) -> Reaction {
        if self.state != RecordingState::Recording {
            tracing::debug!(state = ?self.state, "stop ignored");
            return Reaction::None;
        }

        self.state = RecordingState::Saving;
        if let Some(pending) = &self.pending {
            tracing::info!("Saving recording to {:?}", pending.destination);
        }

        match self.capture.finalize().await {
            Ok(()) => Reaction::None,
            Err(e) => {
                // The finalize request itself could not be delivered, so no
                // completion signal will ever arrive. Release the session
                // rather than wait in `Saving` forever.
                tracing::error!("Finalize request failed: {}", e);
                self.pending = None;
                self.state = RecordingState::Stopped;
                Reaction::SurfaceError(e.to_string())
            }
        }
    }

    /// The capture subsystem finished flushing the file. Valid only from
    /// `Saving`; a stray completion in any other state is ignored.
    pub fn on_finished(&mut self, result: RecordingResult) -> Reaction {
        if self.state != RecordingState::Saving {
            tracing::warn!(state = ?self.state, "completion ignored: no save outstanding");
            return Reaction::None;
        }

        // The session is released on every exit from Saving
        self.pending = None;
        self.state = RecordingState::Stopped;

        match result {
            RecordingResult::Success(location) => {
                tracing::info!("Recording saved: {:?}", location);
                Reaction::Navigate(location)
            }
            RecordingResult::Failure(reason) => {
                tracing::warn!("Recording failed: {}", reason);
                Reaction::SurfaceError(CaptureError::Save(reason).to_string())
            }
        }
    }
}

/// Everything the record screen needs to render a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiDescriptor {
    pub prompt: &'static str,
    pub record_enabled: bool,
    pub stop_enabled: bool,
    pub stop_visible: bool,
    pub busy: bool,
}

/// Pure, total mapping from state to UI descriptor. No side effects; the
/// caller re-renders after every transition and on screen entry.
pub fn describe(state: RecordingState) -> UiDescriptor {
    match state {
        RecordingState::Stopped => UiDescriptor {
            prompt: "Ready to record",
            record_enabled: true,
            stop_enabled: false,
            stop_visible: true,
            busy: false,
        },
        RecordingState::Recording => UiDescriptor {
            prompt: "Recording in progress",
            record_enabled: false,
            stop_enabled: true,
            stop_visible: true,
            busy: false,
        },
        RecordingState::Saving => UiDescriptor {
            prompt: "Saving recording",
            record_enabled: false,
            stop_enabled: false,
            stop_visible: false,
            busy: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct FakeCaptureLog {
        acquires: Vec<PathBuf>,
        finalizes: usize,
    }

    struct FakeCapture {
        log: Arc<Mutex<FakeCaptureLog>>,
        fail_acquire: Option<String>,
    }

    impl FakeCapture {
        fn new() -> (Box<dyn CaptureBackend>, Arc<Mutex<FakeCaptureLog>>) {
            let log = Arc::new(Mutex::new(FakeCaptureLog::default()));
            let capture = Box::new(Self {
                log: log.clone(),
                fail_acquire: None,
            });
            (capture, log)
        }

        fn failing(reason: &str) -> (Box<dyn CaptureBackend>, Arc<Mutex<FakeCaptureLog>>) {
            let log = Arc::new(Mutex::new(FakeCaptureLog::default()));
            let capture = Box::new(Self {
                log: log.clone(),
                fail_acquire: Some(reason.to_string()),
            });
            (capture, log)
        }
    }

    #[async_trait]
    impl CaptureBackend for FakeCapture {
        async fn acquire(&mut self, destination: PathBuf) -> Result<(), CaptureError> {
            if let Some(reason) = &self.fail_acquire {
                return Err(CaptureError::Acquisition(reason.clone()));
            }
            self.log.lock().unwrap().acquires.push(destination);
            Ok(())
        }

        async fn finalize(&mut self) -> Result<(), CaptureError> {
            self.log.lock().unwrap().finalizes += 1;
            Ok(())
        }
    }

    fn controller(capture: Box<dyn CaptureBackend>) -> LifecycleController {
        LifecycleController::new(PathBuf::from("/a.wav"), capture)
    }

    #[tokio::test]
    async fn starts_recording_and_acquires_once() {
        let (capture, log) = FakeCapture::new();
        let mut ctl = controller(capture);

        assert_eq!(ctl.request_start().await, Reaction::None);
        assert_eq!(ctl.state(), RecordingState::Recording);
        assert_eq!(log.lock().unwrap().acquires, vec![PathBuf::from("/a.wav")]);
    }

    #[tokio::test]
    async fn double_start_never_acquires_a_second_session() {
        let (capture, log) = FakeCapture::new();
        let mut ctl = controller(capture);

        ctl.request_start().await;
        assert_eq!(ctl.request_start().await, Reaction::None);

        assert_eq!(ctl.state(), RecordingState::Recording);
        assert_eq!(log.lock().unwrap().acquires.len(), 1);
    }

    #[tokio::test]
    async fn stop_while_stopped_is_a_noop() {
        let (capture, log) = FakeCapture::new();
        let mut ctl = controller(capture);

        assert_eq!(ctl.request_stop().await, Reaction::None);
        assert_eq!(ctl.state(), RecordingState::Stopped);
        assert_eq!(log.lock().unwrap().finalizes, 0);
    }

    #[tokio::test]
    async fn acquisition_failure_surfaces_one_error_and_stays_stopped() {
        let (capture, _log) = FakeCapture::failing("permission denied");
        let mut ctl = controller(capture);

        let reaction = ctl.request_start().await;
        match reaction {
            Reaction::SurfaceError(msg) => assert!(msg.contains("permission denied")),
            other => panic!("expected error, got {:?}", other),
        }
        assert_eq!(ctl.state(), RecordingState::Stopped);

        // The user may retry immediately
        assert!(matches!(ctl.request_start().await, Reaction::SurfaceError(_)));
    }

    #[tokio::test]
    async fn stop_moves_to_saving_and_never_navigates_by_itself() {
        let (capture, log) = FakeCapture::new();
        let mut ctl = controller(capture);

        ctl.request_start().await;
        assert_eq!(ctl.request_stop().await, Reaction::None);

        assert_eq!(ctl.state(), RecordingState::Saving);
        assert_eq!(log.lock().unwrap().finalizes, 1);

        // Both start and stop are disabled while a save is outstanding
        assert_eq!(ctl.request_start().await, Reaction::None);
        assert_eq!(ctl.request_stop().await, Reaction::None);
        assert_eq!(ctl.state(), RecordingState::Saving);
        assert_eq!(log.lock().unwrap().acquires.len(), 1);
        assert_eq!(log.lock().unwrap().finalizes, 1);
    }

    #[tokio::test]
    async fn successful_save_navigates_with_the_finalized_location() {
        let (capture, _log) = FakeCapture::new();
        let mut ctl = controller(capture);

        ctl.request_start().await;
        ctl.request_stop().await;

        let reaction = ctl.on_finished(RecordingResult::Success(PathBuf::from("/a.wav")));
        assert_eq!(reaction, Reaction::Navigate(PathBuf::from("/a.wav")));
        assert_eq!(ctl.state(), RecordingState::Stopped);
        assert!(ctl.pending.is_none());
    }

    #[tokio::test]
    async fn failed_save_surfaces_one_error_and_zero_navigations() {
        let (capture, _log) = FakeCapture::new();
        let mut ctl = controller(capture);

        ctl.request_start().await;
        ctl.request_stop().await;

        let reaction = ctl.on_finished(RecordingResult::Failure("disk full".into()));
        match reaction {
            Reaction::SurfaceError(msg) => assert!(msg.contains("disk full")),
            other => panic!("expected error, got {:?}", other),
        }
        assert_eq!(ctl.state(), RecordingState::Stopped);
        assert!(ctl.pending.is_none());
    }

    #[tokio::test]
    async fn stray_completion_without_outstanding_save_is_ignored() {
        let (capture, _log) = FakeCapture::new();
        let mut ctl = controller(capture);

        let reaction = ctl.on_finished(RecordingResult::Success(PathBuf::from("/a.wav")));
        assert_eq!(reaction, Reaction::None);
        assert_eq!(ctl.state(), RecordingState::Stopped);
    }

    #[tokio::test]
    async fn machine_cycles_back_to_a_usable_idle_state() {
        let (capture, log) = FakeCapture::new();
        let mut ctl = controller(capture);

        ctl.request_start().await;
        ctl.request_stop().await;
        ctl.on_finished(RecordingResult::Success(PathBuf::from("/a.wav")));

        assert_eq!(ctl.request_start().await, Reaction::None);
        assert_eq!(ctl.state(), RecordingState::Recording);
        assert_eq!(log.lock().unwrap().acquires.len(), 2);
    }

    #[test]
    fn descriptor_is_fixed_per_state() {
        let stopped = describe(RecordingState::Stopped);
        assert!(stopped.record_enabled);
        assert!(!stopped.stop_enabled);
        assert!(stopped.stop_visible);
        assert!(!stopped.busy);

        let recording = describe(RecordingState::Recording);
        assert!(!recording.record_enabled);
        assert!(recording.stop_enabled);
        assert!(recording.stop_visible);
        assert!(!recording.busy);

        let saving = describe(RecordingState::Saving);
        assert!(!saving.record_enabled);
        assert!(!saving.stop_enabled);
        assert!(!saving.stop_visible);
        assert!(saving.busy);
    }
}
