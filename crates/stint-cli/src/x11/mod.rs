//! X11 backend for the capture loop.

pub mod image;
pub mod session;

// Public API - used by main.rs
pub use session::X11Session;
