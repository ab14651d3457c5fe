//! Raster-to-PNG conversion (§4.7). Genera ships 1-bit raster images MSB
//! first; PNG's packed 1-bit rows expect the same bit order, but the byte
//! values themselves come out of the archive bit-reversed, so every byte is
//! flipped before encoding. Ported from
//! `original_source/sab2html/png_writer.py`'s `_flip_byte`/`_FLIP_TABLE`.

use base64::Engine;

use crate::error::Error;
use crate::form::Form;

const fn flip_byte(n: u8) -> u8 {
    let mut result = 0u8;
    let mut i = 0;
    while i < 8 {
        if n & (1 << i) != 0 {
            result |= 1 << (7 - i);
        }
        i += 1;
    }
    result
}

const fn build_flip_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = flip_byte(i as u8);
        i += 1;
    }
    table
}

const FLIP_TABLE: [u8; 256] = build_flip_table();

pub fn raster_to_png_bytes(width: u32, height: u32, data: &[u8]) -> Result<Vec<u8>, Error> {
    let flipped: Vec<u8> = data.iter().map(|b| FLIP_TABLE[*b as usize]).collect();

    let mut png_bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_bytes, width, height);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::One);
        let mut writer = encoder
            .write_header()
            .map_err(|e| Error::RasterEncode(e.to_string()))?;
        writer
            .write_image_data(&flipped)
            .map_err(|e| Error::RasterEncode(e.to_string()))?;
    }
    Ok(png_bytes)
}

pub fn raster_to_png_data_uri(width: u32, height: u32, data: &[u8]) -> Result<String, Error> {
    let png_bytes = raster_to_png_bytes(width, height, data)?;
    let b64 = base64::engine::general_purpose::STANDARD.encode(png_bytes);
    Ok(format!("data:image/png;base64,{}", b64))
}

/// Convenience wrapper for rendering an `Image` form's raster child.
pub fn data_uri_for_raster(form: &Form) -> Result<Option<String>, Error> {
    match form {
        Form::RasterImage { width, height, data, .. } => {
            raster_to_png_data_uri((*width).max(0) as u32, (*height).max(0) as u32, data).map(Some)
        },
        _ => Ok(None),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_table_reverses_bits() {
        assert_eq!(FLIP_TABLE[0b1000_0000], 0b0000_0001);
        assert_eq!(FLIP_TABLE[0b0000_0001], 0b1000_0000);
        assert_eq!(FLIP_TABLE[0b1100_0000], 0b0000_0011);
    }

    #[test]
    fn encodes_a_tiny_raster_to_png() {
        // 8x1 all-white raster (single 0xFF byte) flips to 0xFF and should
        // encode without error.
        let png = raster_to_png_bytes(8, 1, &[0xFF]).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn data_uri_has_expected_prefix() {
        let uri = raster_to_png_data_uri(8, 1, &[0x00]).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }
}
