//! Color samples and their textual output formats.

use std::fmt;
use std::str::FromStr;

/// Channel precision reported by X11 `QueryColors` replies.
pub const SERVER_CHANNEL_BITS: u32 = 16;

/// An 8-bit-per-channel RGB color read from the screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ColorSample {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl ColorSample {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Build a sample from server channels of `bits` precision each.
    ///
    /// Keeps the most significant 8 bits of every channel.
    pub fn from_channels(red: u16, green: u16, blue: u16, bits: u32) -> Self {
        Self {
            red: scale_channel(red, bits),
            green: scale_channel(green, bits),
            blue: scale_channel(blue, bits),
        }
    }

    /// Parse `#rrggbb` or `rrggbb`, case-insensitive.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let red = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let green = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let blue = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Self { red, green, blue })
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }

    /// Space-separated decimal channels, e.g. `255 128 0`.
    pub fn to_decimal(&self) -> String {
        format!("{} {} {}", self.red, self.green, self.blue)
    }

    /// Render without the trailing newline.
    pub fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Decimal => self.to_decimal(),
            OutputFormat::Hex => self.to_hex(),
        }
    }
}

impl fmt::Display for ColorSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Reduce a `bits`-wide channel value to 8 bits.
///
/// Wider channels are right-shifted by the excess; narrower ones are
/// left-shifted so full intensity still maps near 255.
pub fn scale_channel(value: u16, bits: u32) -> u8 {
    let bits = bits.clamp(1, 16);
    if bits >= 8 {
        ((value >> (bits - 8)) & 0xFF) as u8
    } else {
        ((value << (8 - bits)) & 0xFF) as u8
    }
}

/// How each sample is written to the output stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `r g b` with 0–255 integers.
    #[default]
    Decimal,
    /// `#rrggbb`, lowercase.
    Hex,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "decimal" | "dec" => Ok(OutputFormat::Decimal),
            "hex" => Ok(OutputFormat::Hex),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Decimal => write!(f, "decimal"),
            OutputFormat::Hex => write!(f, "hex"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sixteen_bit_channels_keep_high_byte() {
        for value in [0u16, 0x00FF, 0x0100, 0x7FFF, 0x8000, 0xABCD, 0xFFFF] {
            assert_eq!(
                scale_channel(value, SERVER_CHANNEL_BITS),
                ((value >> 8) & 0xFF) as u8,
                "value {:#06x}",
                value
            );
        }
    }

    #[test]
    fn test_from_channels_sixteen_bit() {
        let sample = ColorSample::from_channels(0xFFFF, 0x8080, 0x00FF, 16);
        assert_eq!(sample, ColorSample::new(0xFF, 0x80, 0x00));
    }

    #[test]
    fn test_scale_channel_other_precisions() {
        assert_eq!(scale_channel(0xFF, 8), 0xFF);
        assert_eq!(scale_channel(0x3FF, 10), 0xFF);
        assert_eq!(scale_channel(0x200, 10), 0x80);
        assert_eq!(scale_channel(0x1F, 5), 0xF8);
    }

    #[test]
    fn test_decimal_format() {
        let sample = ColorSample::new(255, 128, 0);
        assert_eq!(sample.format(OutputFormat::Decimal), "255 128 0");
    }

    #[test]
    fn test_hex_format_is_lowercase_and_padded() {
        let sample = ColorSample::new(0xAB, 0x05, 0x00);
        assert_eq!(sample.format(OutputFormat::Hex), "#ab0500");
    }

    #[test]
    fn test_hex_parses_back_to_scaled_channels() {
        let raw = [(0x1234u16, 0xFEDCu16, 0x0001u16), (0xFFFF, 0, 0x8000)];
        for (r, g, b) in raw {
            let sample = ColorSample::from_channels(r, g, b, 16);
            let hex = sample.format(OutputFormat::Hex);

            let parsed = ColorSample::from_hex(&hex).unwrap();
            assert_eq!(parsed.red as u16, (r >> 8) & 0xFF);
            assert_eq!(parsed.green as u16, (g >> 8) & 0xFF);
            assert_eq!(parsed.blue as u16, (b >> 8) & 0xFF);
        }
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert!(ColorSample::from_hex("#12345").is_none());
        assert!(ColorSample::from_hex("zzzzzz").is_none());
        assert!(ColorSample::from_hex("#ééé").is_none());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("hex".parse::<OutputFormat>(), Ok(OutputFormat::Hex));
        assert_eq!("Decimal".parse::<OutputFormat>(), Ok(OutputFormat::Decimal));
        assert!("json".parse::<OutputFormat>().is_err());
    }
}
