//! CLI argument parsing with clap derive macros.

use clap::{Parser, ValueEnum};
use stint_core::{OutputFormat, SampleRequest};
use thiserror::Error;

/// Print the color under the pointer while you drag.
///
/// Press and hold the left mouse button, drag across the screen, and stint
/// prints the color of every pixel the pointer passes over until the button
/// is released. Pressing any other button first cancels without output.
#[derive(Debug, Parser)]
#[command(
    name = "stint",
    version,
    allow_negative_numbers = true,
    after_help = "\
Examples:
  stint                        # Drag with the left button, print 'r g b' lines
  stint -f hex                 # Print '#rrggbb' lines instead
  stint -x 100 -y 200          # Print the color at (100, 200) and exit
  stint -f hex | tail -n 1     # Keep only the color where the button came up

Exit status:
  0  finished normally
  1  could not open the display or grab the pointer
  2  cancelled by pressing a button other than the left one
  3  only one of -x and -y was given"
)]
pub struct Cli {
    /// Output format
    #[arg(
        short,
        long,
        value_enum,
        default_value_t = FormatArg::Decimal,
        env = "STINT_FORMAT"
    )]
    pub format: FormatArg,

    /// Sample this x coordinate instead of tracking the pointer (needs -y)
    #[arg(short = 'x', value_name = "X")]
    pub x: Option<i32>,

    /// Sample this y coordinate instead of tracking the pointer (needs -x)
    #[arg(short = 'y', value_name = "Y")]
    pub y: Option<i32>,

    /// X display to connect to [default: $DISPLAY]
    #[arg(short, long, value_name = "DISPLAY")]
    pub display: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Space-separated 0-255 channels: `r g b`
    Decimal,
    /// Lowercase hex triplet: `#rrggbb`
    Hex,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Decimal => OutputFormat::Decimal,
            FormatArg::Hex => OutputFormat::Hex,
        }
    }
}

/// What to sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Grab the pointer and follow a button-1 drag.
    Interactive,
    /// Read one pixel and exit.
    Fixed(SampleRequest),
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub format: OutputFormat,
    pub mode: Mode,
    pub display: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("-x was given without -y")]
    MissingY,
    #[error("-y was given without -x")]
    MissingX,
}

impl Cli {
    /// Check argument combinations clap cannot express with our exit codes.
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let mode = match (self.x, self.y) {
            (Some(x), Some(y)) => Mode::Fixed(SampleRequest::new(x, y)),
            (None, None) => Mode::Interactive,
            (Some(_), None) => return Err(ConfigError::MissingY),
            (None, Some(_)) => return Err(ConfigError::MissingX),
        };

        Ok(Config {
            format: self.format.into(),
            mode,
            display: self.display.filter(|d| !d.is_empty()),
        })
    }
}
