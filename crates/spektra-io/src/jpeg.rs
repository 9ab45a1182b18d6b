//! JPEG format support.
//!
//! Decoding accepts RGB, grayscale (8 and 16 bit) and CMYK files and
//! produces opaque RGBA8. Encoding drops alpha and writes baseline RGB at
//! a caller-chosen quality.
//!
//! # Example
//!
//! ```rust,ignore
//! use spektra_io::jpeg;
//!
//! let image = jpeg::read("photo.jpg")?;
//! jpeg::write("output.jpg", &image, 92)?;
//! ```

use crate::{IoError, IoResult};
use spektra_core::PixelBuffer;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Default export quality, matching what browsers use for `image/jpeg`
/// canvas exports at 0.92.
pub const DEFAULT_QUALITY: u8 = 92;

/// Reads a JPEG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let file = File::open(path.as_ref())?;
    decode(BufReader::new(file))
}

/// Decodes a JPEG stream.
pub fn decode<R: std::io::Read>(reader: R) -> IoResult<PixelBuffer> {
    let mut decoder = jpeg_decoder::Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;

    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("missing JPEG info".into()))?;

    let width = info.width as u32;
    let height = info.height as u32;
    trace!(width, height, pixel_format = ?info.pixel_format, "jpeg::decode");

    let rgba: Vec<u8> = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => pixels
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
        jpeg_decoder::PixelFormat::L8 => pixels.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        jpeg_decoder::PixelFormat::L16 => pixels
            .chunks_exact(2)
            .flat_map(|l16| {
                // High byte of the big-endian sample
                let g = l16[0];
                [g, g, g, 255]
            })
            .collect(),
        jpeg_decoder::PixelFormat::CMYK32 => pixels
            .chunks_exact(4)
            .flat_map(|cmyk| {
                let c = cmyk[0] as f32 / 255.0;
                let m = cmyk[1] as f32 / 255.0;
                let y = cmyk[2] as f32 / 255.0;
                let k = cmyk[3] as f32 / 255.0;

                let r = ((1.0 - c) * (1.0 - k) * 255.0).round() as u8;
                let g = ((1.0 - m) * (1.0 - k) * 255.0).round() as u8;
                let b = ((1.0 - y) * (1.0 - k) * 255.0).round() as u8;

                [r, g, b, 255]
            })
            .collect(),
    };

    Ok(PixelBuffer::from_raw(width, height, rgba)?)
}

/// Encodes a buffer to JPEG bytes in memory.
///
/// `quality` is 1 to 100.
pub fn encode(image: &PixelBuffer, quality: u8) -> IoResult<Vec<u8>> {
    use jpeg_encoder::{ColorType, Encoder};

    if !(1..=100).contains(&quality) {
        return Err(IoError::EncodeError(format!(
            "quality {quality} is outside 1..=100"
        )));
    }
    let (width, height) = image.dimensions();
    if image.is_empty() || width > u16::MAX as u32 || height > u16::MAX as u32 {
        return Err(IoError::EncodeError(format!(
            "cannot encode {width}x{height} as JPEG"
        )));
    }

    let rgb = image.to_rgb();
    let mut buffer = Vec::new();
    let encoder = Encoder::new(&mut buffer, quality);
    encoder
        .encode(&rgb, width as u16, height as u16, ColorType::Rgb)
        .map_err(|e: jpeg_encoder::EncodingError| IoError::EncodeError(e.to_string()))?;

    Ok(buffer)
}

/// Writes a buffer to a JPEG file, dropping alpha.
pub fn write<P: AsRef<Path>>(path: P, image: &PixelBuffer, quality: u8) -> IoResult<()> {
    trace!(width = image.width(), height = image.height(), quality, "jpeg::write");
    let data = encode(image, quality)?;
    std::fs::write(path.as_ref(), data)?;
    Ok(())
}
