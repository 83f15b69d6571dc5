//! Pointer events as seen by the capture loop.

use crate::error::CaptureError;
use crate::sampler::SampleRequest;

/// A pointer button number as reported by the server (1 = left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Button(pub u8);

impl Button {
    /// The button that arms and disarms sampling.
    pub const PRIMARY: Button = Button(1);

    pub fn is_primary(self) -> bool {
        self == Self::PRIMARY
    }
}

/// One event delivered while the pointer is grabbed.
///
/// Coordinates are in root-window space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Press { button: Button, x: i32, y: i32 },
    Release { button: Button, x: i32, y: i32 },
    Motion { x: i32, y: i32 },
}

impl PointerEvent {
    /// Where the pointer was when the event was generated.
    pub fn position(&self) -> SampleRequest {
        match *self {
            PointerEvent::Press { x, y, .. }
            | PointerEvent::Release { x, y, .. }
            | PointerEvent::Motion { x, y } => SampleRequest::new(x, y),
        }
    }
}

/// Blocking source of pointer events.
///
/// `next_event` waits indefinitely; it only returns an error when the
/// underlying connection is gone.
pub trait EventSource {
    fn next_event(&mut self) -> Result<PointerEvent, CaptureError>;
}
