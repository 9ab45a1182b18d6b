//! PNG format support.
//!
//! Every PNG color type is decoded to RGBA8: palettes and low bit depths
//! are expanded, 16-bit samples are stripped to their high byte and a
//! `tRNS` chunk becomes real alpha. Files are written as 8-bit RGBA with
//! an sRGB chunk.
//!
//! # Example
//!
//! ```rust,ignore
//! use spektra_io::png::{read, write};
//!
//! let image = read("input.png")?;
//! write("output.png", &image)?;
//! ```

use crate::{IoError, IoResult};
use spektra_core::PixelBuffer;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Reads a PNG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let file = File::open(path.as_ref())?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let (width, height) = (info.width, info.height);
    trace!(width, height, color_type = ?info.color_type, bit_depth = ?info.bit_depth, "png::read");

    if info.bit_depth != png::BitDepth::Eight {
        return Err(IoError::UnsupportedBitDepth(format!(
            "{:?} {:?}",
            info.color_type, info.bit_depth
        )));
    }

    let samples = &buf[..info.buffer_size()];
    let rgba: Vec<u8> = match info.color_type {
        png::ColorType::Rgba => samples.to_vec(),
        png::ColorType::Rgb => samples
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
        png::ColorType::Grayscale => samples.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        png::ColorType::GrayscaleAlpha => samples
            .chunks_exact(2)
            .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
            .collect(),
        other => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "{:?} {:?}",
                other, info.bit_depth
            )));
        }
    };

    Ok(PixelBuffer::from_raw(width, height, rgba)?)
}

/// Writes a buffer to a PNG file as 8-bit RGBA.
pub fn write<P: AsRef<Path>>(path: P, image: &PixelBuffer) -> IoResult<()> {
    trace!(width = image.width(), height = image.height(), "png::write");
    if image.is_empty() {
        return Err(IoError::EncodeError("cannot encode an empty image".into()));
    }

    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());
    encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .write_image_data(image.as_raw())
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .finish()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;

    Ok(())
}
