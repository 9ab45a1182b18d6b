//! # spektra-io
//!
//! Image file reading and writing for Spektra.
//!
//! Every format is decoded to, and encoded from, an RGBA8
//! [`PixelBuffer`]:
//!
//! - **PNG** - Lossless, keeps alpha
//! - **JPEG** - Lossy, alpha dropped on export
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use spektra_io::{read, write, write_with, WriteOptions};
//!
//! // Read any supported format (auto-detected)
//! let image = read("input.jpg")?;
//!
//! // Write, picking the format from the extension
//! write("output.png", &image)?;
//! write_with("output.jpg", &image, &WriteOptions { quality: 80 })?;
//! ```
//!
//! # Supported Formats
//!
//! | Format | Read | Write | Bit Depths | Notes |
//! |--------|------|-------|------------|-------|
//! | PNG | Yes | Yes | 1-16 in, 8 out | Palette and gray expanded |
//! | JPEG | Yes | Yes | 8 (16-bit gray in) | RGB, gray, CMYK in |

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod detect;
pub mod jpeg;
pub mod png;

pub use detect::Format;
pub use error::{IoError, IoResult};
pub use spektra_core::PixelBuffer;

use std::path::Path;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Encoder settings for [`write_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// JPEG quality, 1 to 100. Ignored for PNG.
    pub quality: u8,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            quality: jpeg::DEFAULT_QUALITY,
        }
    }
}

/// Reads an image, detecting the format from magic bytes then extension.
///
/// # Errors
///
/// [`IoError::UnsupportedFormat`] for anything other than PNG or JPEG,
/// [`IoError::DecodeError`] for corrupt files.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let path = path.as_ref();
    let format = Format::detect(path)?;
    debug!(path = %path.display(), ?format, "reading image");

    match format {
        Format::Png => png::read(path),
        Format::Jpeg => jpeg::read(path),
        Format::Unknown => Err(unsupported(path)),
    }
}

/// Writes an image with default options, choosing the format from the
/// file extension.
pub fn write<P: AsRef<Path>>(path: P, image: &PixelBuffer) -> IoResult<()> {
    write_with(path, image, &WriteOptions::default())
}

/// Writes an image with explicit encoder options.
pub fn write_with<P: AsRef<Path>>(path: P, image: &PixelBuffer, options: &WriteOptions) -> IoResult<()> {
    let path = path.as_ref();
    let format = Format::from_extension(path);
    debug!(path = %path.display(), ?format, width = image.width(), height = image.height(), "writing image");

    match format {
        Format::Png => png::write(path, image),
        Format::Jpeg => jpeg::write(path, image, options.quality),
        Format::Unknown => Err(unsupported(path)),
    }
}

fn unsupported(path: &Path) -> IoError {
    IoError::UnsupportedFormat(
        path.extension()
            .and_then(|e| e.to_str())
            .unwrap_or("unknown")
            .to_string(),
    )
}
