//! Pointer capture: the grab guard and the press/drag/release state machine.
//!
//! An interactive run looks like this:
//!
//! 1. Grab the pointer ([`GrabGuard::acquire`]). The trigger moves from
//!    `Idle` to `Armed`.
//! 2. Wait for a button press. Button 1 makes the trigger `Active`; any other
//!    button makes it `Cancelled` until that same button is released.
//! 3. While `Active`, every motion event is sampled and written out. The
//!    release of button 1 is sampled once more and ends the run.
//!
//! The grab is released when the guard drops, which happens on every return
//! path out of [`run_interactive`], errors included.

use std::io::Write;
use std::ops::{Deref, DerefMut};

use tracing::{debug, warn};

use crate::color::OutputFormat;
use crate::error::{CaptureError, SetupError};
use crate::event::{Button, EventSource, PointerEvent};
use crate::output::{is_broken_pipe, write_sample};
use crate::sampler::{PixelSampler, SampleRequest};
use crate::status::Outcome;

/// Exclusive pointer capture on the root window.
pub trait PointerGrab {
    /// Start delivering press, button-1 motion, and release events to us.
    fn grab_pointer(&mut self) -> Result<(), SetupError>;

    /// Give the pointer back. Called at most once per successful grab.
    fn ungrab_pointer(&mut self);
}

/// Holds the pointer grab for as long as it lives.
///
/// Derefs to the session so the capture loop keeps reading events and
/// sampling through the guard.
pub struct GrabGuard<'a, S: PointerGrab> {
    session: &'a mut S,
}

impl<'a, S: PointerGrab> GrabGuard<'a, S> {
    pub fn acquire(session: &'a mut S) -> Result<Self, SetupError> {
        session.grab_pointer()?;
        debug!("Pointer grabbed");
        Ok(Self { session })
    }
}

impl<S: PointerGrab> Deref for GrabGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.session
    }
}

impl<S: PointerGrab> DerefMut for GrabGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.session
    }
}

impl<S: PointerGrab> Drop for GrabGuard<'_, S> {
    fn drop(&mut self) {
        self.session.ungrab_pointer();
        debug!("Pointer released");
    }
}

/// Progress through one press/drag/release gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    /// No grab held yet.
    Idle,
    /// Grab held, waiting for the first press.
    Armed,
    /// A non-primary button was pressed; waiting for it to come back up.
    Cancelled(Button),
    /// Button 1 is down; motion is being sampled.
    Active,
    /// Nothing more to do.
    Done,
}

/// What the loop should do with the event it just fed to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Ignore,
    Sample(SampleRequest),
    /// Sample once more, then stop.
    Finish(SampleRequest),
    /// Stop without sampling.
    Cancel,
}

impl TriggerState {
    /// Feed one event and get the next state plus what to do about it.
    pub fn advance(self, event: &PointerEvent) -> (TriggerState, Action) {
        use PointerEvent::*;

        match (self, *event) {
            (TriggerState::Idle | TriggerState::Armed, Press { button, .. }) => {
                if button.is_primary() {
                    (TriggerState::Active, Action::Ignore)
                } else {
                    (TriggerState::Cancelled(button), Action::Ignore)
                }
            }
            (TriggerState::Cancelled(held), Release { button, .. }) if button == held => {
                (TriggerState::Done, Action::Cancel)
            }
            (TriggerState::Active, Motion { x, y }) => {
                (TriggerState::Active, Action::Sample(SampleRequest::new(x, y)))
            }
            (TriggerState::Active, Release { button, x, y }) if button.is_primary() => {
                (TriggerState::Done, Action::Finish(SampleRequest::new(x, y)))
            }
            (state, _) => (state, Action::Ignore),
        }
    }
}

/// Run one interactive capture session.
///
/// Blocks on the session's event stream until button 1 is released or a
/// non-primary click cancels the gesture. A pixel that cannot be read is
/// logged and skipped; the gesture goes on.
pub fn run_interactive<S, W>(
    session: &mut S,
    format: OutputFormat,
    out: &mut W,
) -> Result<Outcome, CaptureError>
where
    S: PointerGrab + EventSource + PixelSampler,
    W: Write + ?Sized,
{
    let mut state = TriggerState::Idle;
    let mut grab = GrabGuard::acquire(session)?;
    state = transition(state, TriggerState::Armed);

    loop {
        let event = grab.next_event()?;
        let (next, action) = state.advance(&event);
        state = transition(state, next);

        match action {
            Action::Ignore => {}
            Action::Sample(at) => {
                if !emit(&mut *grab, at, format, out)? {
                    return Ok(Outcome::OutputClosed);
                }
            }
            Action::Finish(at) => {
                if !emit(&mut *grab, at, format, out)? {
                    return Ok(Outcome::OutputClosed);
                }
                return Ok(Outcome::Completed);
            }
            Action::Cancel => return Ok(Outcome::Cancelled),
        }
    }
}

/// Sample a single fixed point and write it out. No grab is taken.
pub fn run_fixed<P, W>(
    sampler: &mut P,
    at: SampleRequest,
    format: OutputFormat,
    out: &mut W,
) -> Result<Outcome, CaptureError>
where
    P: PixelSampler + ?Sized,
    W: Write + ?Sized,
{
    let sample = sampler.sample(at)?;
    debug!("{} -> {}", at, sample);
    match write_sample(out, sample, format) {
        Ok(()) => Ok(Outcome::Completed),
        Err(e) if is_broken_pipe(&e) => Ok(Outcome::OutputClosed),
        Err(e) => Err(e.into()),
    }
}

fn transition(from: TriggerState, to: TriggerState) -> TriggerState {
    if from != to {
        debug!("Trigger {:?} -> {:?}", from, to);
    }
    to
}

/// Sample `at` and write it. Returns `Ok(false)` once the reader is gone.
fn emit<P, W>(
    sampler: &mut P,
    at: SampleRequest,
    format: OutputFormat,
    out: &mut W,
) -> Result<bool, CaptureError>
where
    P: PixelSampler + ?Sized,
    W: Write + ?Sized,
{
    let sample = match sampler.sample(at) {
        Ok(sample) => sample,
        Err(e) => {
            warn!("Skipping sample at {}: {}", at, e);
            return Ok(true);
        }
    };
    debug!("{} -> {}", at, sample);

    match write_sample(out, sample, format) {
        Ok(()) => Ok(true),
        Err(e) if is_broken_pipe(&e) => {
            debug!("Output closed, ending capture");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}
