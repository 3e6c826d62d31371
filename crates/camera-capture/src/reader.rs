//! Background frame reader
//!
//! Frame sources block on reads (a file, or a landmark model piping into
//! stdin). The reader thread owns the source and hands frames to the async
//! loop over a bounded channel, so the loop can always react to quit even
//! while a read is stalled.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{CameraError, FrameSource, LandmarkFrame};

/// One item from the reader: a frame, or the error that ended the source
pub type FrameResult = Result<LandmarkFrame, CameraError>;

/// Frames the reader may get ahead of the consumer
pub const READ_AHEAD: usize = 4;

/// Move `source` onto its own thread and stream its frames.
///
/// The channel closes once the source is exhausted. A source error is sent
/// as the final item. Dropping the receiver stops the thread after its
/// current read returns.
pub fn spawn_reader<F>(mut source: F) -> Result<mpsc::Receiver<FrameResult>, CameraError>
where
    F: FrameSource + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<FrameResult>(READ_AHEAD);

    std::thread::Builder::new()
        .name("frame-reader".to_string())
        .spawn(move || loop {
            match source.next_frame() {
                Ok(Some(frame)) => {
                    if tx.blocking_send(Ok(frame)).is_err() {
                        debug!("Frame receiver dropped");
                        break;
                    }
                }
                Ok(None) => {
                    debug!("Frame reader finished");
                    break;
                }
                Err(e) => {
                    warn!("Frame source failed: {}", e);
                    let _ = tx.blocking_send(Err(e));
                    break;
                }
            }
        })
        .map_err(|e| CameraError::Stream(format!("failed to start frame reader: {e}")))?;

    Ok(rx)
}
