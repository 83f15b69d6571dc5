//! Core types and logic for stint.
//!
//! stint grabs the pointer, waits for the user to press button 1, and prints
//! the color under the pointer for every motion event until the button is
//! released. This crate holds everything that does not talk to a display
//! server, so the capture loop can be driven by a scripted session in tests.
//!
//! # Modules
//!
//! - [`capture`]: pointer grab guard and the press/drag/release state machine
//! - [`event`]: pointer events and the blocking event source seam
//! - [`sampler`]: sample requests and the pixel sampler seam
//! - [`color`]: 8-bit color samples, channel scaling, output formats
//! - [`output`]: line-at-a-time sample output
//! - [`error`]: setup, sample, and capture errors
//! - [`status`]: run outcomes and process exit codes

pub mod capture;
pub mod color;
pub mod error;
pub mod event;
pub mod output;
pub mod sampler;
pub mod status;

pub use capture::{run_fixed, run_interactive, GrabGuard, PointerGrab, TriggerState};
pub use color::{ColorSample, OutputFormat};
pub use error::{CaptureError, SampleError, SetupError};
pub use event::{Button, EventSource, PointerEvent};
pub use sampler::{PixelSampler, SampleRequest};
pub use status::{ExitStatus, Outcome};
