//! Line output for color samples.

use std::io::{self, Write};

use crate::color::{ColorSample, OutputFormat};

/// Write one sample as a line and flush it.
///
/// Every line is flushed on its own so a downstream reader sees it while
/// the pointer is still moving.
pub fn write_sample<W: Write + ?Sized>(
    out: &mut W,
    sample: ColorSample,
    format: OutputFormat,
) -> io::Result<()> {
    writeln!(out, "{}", sample.format(format))?;
    out.flush()
}

/// Whether a write failed because the reader went away.
pub fn is_broken_pipe(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::BrokenPipe
}
