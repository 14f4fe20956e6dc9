use thiserror::Error;

/// The two user-facing failure kinds of the recording lifecycle.
///
/// Both are recoverable: the controller returns to `Stopped` and the user
/// may retry immediately. Nothing here is fatal to the process.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The capture device or session could not be started (no input device,
    /// permission denied, output file could not be created, ...).
    #[error("could not start recording: {0}")]
    Acquisition(String),

    /// Finalizing the recording failed; the file on disk is not trustworthy.
    #[error("recording could not be saved: {0}")]
    Save(String),
}
