//! Decoding single-pixel `GetImage` replies.

use stint_core::{SampleError, SampleRequest};
use x11rb::protocol::xproto::{Format, ImageOrder};

/// Convert root coordinates to the protocol's `i16`, rejecting anything
/// outside the `width` x `height` root window.
pub fn root_coords(at: SampleRequest, width: u16, height: u16) -> Result<(i16, i16), SampleError> {
    let out_of_bounds = || SampleError::OutOfBounds { at, width, height };

    if at.x < 0 || at.y < 0 || at.x >= i32::from(width) || at.y >= i32::from(height) {
        return Err(out_of_bounds());
    }
    let x = i16::try_from(at.x).map_err(|_| out_of_bounds())?;
    let y = i16::try_from(at.y).map_err(|_| out_of_bounds())?;
    Ok((x, y))
}

/// Bits per pixel the server uses for ZPixmap images of `depth`.
pub fn bits_per_pixel(formats: &[Format], depth: u8) -> Option<u8> {
    formats
        .iter()
        .find(|f| f.depth == depth)
        .map(|f| f.bits_per_pixel)
}

/// Read the first pixel value out of ZPixmap image data.
///
/// Only byte-aligned pixel sizes are handled. Bits above `depth` are
/// cleared so the value can go straight to `QueryColors`.
pub fn decode_pixel(data: &[u8], bits_per_pixel: u8, depth: u8, order: ImageOrder) -> Option<u32> {
    let len = match bits_per_pixel {
        8 | 16 | 24 | 32 => usize::from(bits_per_pixel / 8),
        _ => return None,
    };
    let raw = data.get(..len)?;

    let value = if order == ImageOrder::MSB_FIRST {
        raw.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
    } else {
        raw.iter().rev().fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
    };

    let mask = if depth >= 32 {
        u32::MAX
    } else {
        (1u32 << depth) - 1
    };
    Some(value & mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(depth: u8, bits_per_pixel: u8) -> Format {
        Format {
            depth,
            bits_per_pixel,
            scanline_pad: 32,
        }
    }

    #[test]
    fn test_root_coords_inside() {
        assert_eq!(root_coords(SampleRequest::new(0, 0), 1920, 1080).unwrap(), (0, 0));
        assert_eq!(
            root_coords(SampleRequest::new(1919, 1079), 1920, 1080).unwrap(),
            (1919, 1079)
        );
    }

    #[test]
    fn test_root_coords_edges_are_rejected() {
        for (x, y) in [(-1, 0), (0, -1), (1920, 0), (0, 1080), (i32::MAX, 5)] {
            let err = root_coords(SampleRequest::new(x, y), 1920, 1080).unwrap_err();
            assert!(matches!(err, SampleError::OutOfBounds { .. }), "({}, {})", x, y);
        }
    }

    #[test]
    fn test_bits_per_pixel_lookup() {
        let formats = [format(1, 1), format(24, 32), format(16, 16)];
        assert_eq!(bits_per_pixel(&formats, 24), Some(32));
        assert_eq!(bits_per_pixel(&formats, 16), Some(16));
        assert_eq!(bits_per_pixel(&formats, 8), None);
    }

    #[test]
    fn test_decode_32bpp_lsb_first() {
        // BGRX in memory.
        let data = [0x30, 0x20, 0x10, 0xFF];
        assert_eq!(
            decode_pixel(&data, 32, 24, ImageOrder::LSB_FIRST),
            Some(0x10_20_30)
        );
        assert_eq!(
            decode_pixel(&data, 32, 32, ImageOrder::LSB_FIRST),
            Some(0xFF_10_20_30)
        );
    }

    #[test]
    fn test_decode_32bpp_msb_first() {
        let data = [0x00, 0x10, 0x20, 0x30];
        assert_eq!(
            decode_pixel(&data, 32, 24, ImageOrder::MSB_FIRST),
            Some(0x10_20_30)
        );
    }

    #[test]
    fn test_decode_24bpp() {
        let data = [0xAA, 0xBB, 0xCC];
        assert_eq!(
            decode_pixel(&data, 24, 24, ImageOrder::LSB_FIRST),
            Some(0xCC_BB_AA)
        );
        assert_eq!(
            decode_pixel(&data, 24, 24, ImageOrder::MSB_FIRST),
            Some(0xAA_BB_CC)
        );
    }

    #[test]
    fn test_decode_16bpp() {
        let data = [0x1F, 0xF8];
        assert_eq!(decode_pixel(&data, 16, 16, ImageOrder::LSB_FIRST), Some(0xF81F));
        assert_eq!(decode_pixel(&data, 16, 16, ImageOrder::MSB_FIRST), Some(0x1FF8));
    }

    #[test]
    fn test_decode_8bpp_ignores_order() {
        let data = [0x42, 0x00, 0x00, 0x00];
        assert_eq!(decode_pixel(&data, 8, 8, ImageOrder::LSB_FIRST), Some(0x42));
        assert_eq!(decode_pixel(&data, 8, 8, ImageOrder::MSB_FIRST), Some(0x42));
    }

    #[test]
    fn test_decode_rejects_short_or_unaligned() {
        assert_eq!(decode_pixel(&[0x01, 0x02], 32, 24, ImageOrder::LSB_FIRST), None);
        assert_eq!(decode_pixel(&[0x01], 1, 1, ImageOrder::LSB_FIRST), None);
        assert_eq!(decode_pixel(&[0x01], 4, 4, ImageOrder::MSB_FIRST), None);
    }
}
