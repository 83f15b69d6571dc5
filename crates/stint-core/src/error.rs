//! Error types for capture sessions.

use std::io;

use thiserror::Error;

use crate::sampler::SampleRequest;

/// Boxed error from the windowing backend.
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The session could not be set up. Always fatal.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("could not open display: {0}")]
    Connect(#[source] BackendError),
    #[error("display has no screen {0}")]
    NoScreen(usize),
    #[error("could not allocate {what}: {source}")]
    Resource {
        what: &'static str,
        #[source]
        source: BackendError,
    },
    #[error("could not grab pointer ({0})")]
    GrabFailed(String),
}

impl SetupError {
    pub fn resource(what: &'static str, source: impl Into<BackendError>) -> Self {
        SetupError::Resource {
            what,
            source: source.into(),
        }
    }
}

/// A single pixel could not be read.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("{at} is outside the {width}x{height} root window")]
    OutOfBounds {
        at: SampleRequest,
        width: u16,
        height: u16,
    },
    #[error("image request failed: {0}")]
    Request(#[source] BackendError),
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("colormap returned no entry for pixel {0:#x}")]
    NoColor(u32),
}

impl SampleError {
    pub fn request(source: impl Into<BackendError>) -> Self {
        SampleError::Request(source.into())
    }
}

/// Errors that end a capture session.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Sample(#[from] SampleError),
    #[error("lost connection while waiting for events: {0}")]
    Events(#[source] BackendError),
    #[error("could not write output: {0}")]
    Output(#[from] io::Error),
}

impl CaptureError {
    pub fn events(source: impl Into<BackendError>) -> Self {
        CaptureError::Events(source.into())
    }
}
