//! The pixel sampling seam.

use std::fmt;

use crate::color::ColorSample;
use crate::error::SampleError;

/// A point in root-window coordinates to read a color from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleRequest {
    pub x: i32,
    pub y: i32,
}

impl SampleRequest {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for SampleRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Reads the color of a single screen pixel.
///
/// Implementations must not cache: the pointer may have moved since the
/// previous call.
pub trait PixelSampler {
    fn sample(&mut self, at: SampleRequest) -> Result<ColorSample, SampleError>;
}
