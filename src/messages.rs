use crate::error::CaptureError;
use std::path::PathBuf;
use tokio::sync::oneshot;

/// Commands for the capture service
pub enum RecorderCommand {
    /// Open the input device and start writing to `destination`. The reply
    /// resolves before any audio is considered recorded; on `Err` no capture
    /// session is left behind.
    Acquire {
        destination: PathBuf,
        reply: oneshot::Sender<Result<(), CaptureError>>,
    },
    /// Stop capturing and flush the file. Completion is reported exactly
    /// once on the event channel, never through a return value.
    Finalize,
}

/// Outcome of finalizing a recording, consumed once by the lifecycle
/// controller to decide the next transition.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordingResult {
    Success(PathBuf),
    Failure(String),
}
