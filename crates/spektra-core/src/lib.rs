//! # spektra-core
//!
//! Core types for the Spektra image-adjustment engine.
//!
//! - [`PixelBuffer`] - Owned 8-bit RGBA raster, row-major, origin top-left
//! - [`Error`], [`Result`] - Buffer construction and bounds errors
//!
//! ## Crate Structure
//!
//! This crate has no internal dependencies. Every other Spektra crate
//! builds on it:
//!
//! ```text
//! spektra-core (this crate)
//!    ^
//!    |
//!    +-- spektra-color (RGB <-> HSL)
//!    +-- spektra-ops (tone and detail stages, engine)
//!    +-- spektra-io (PNG / JPEG)
//!    +-- spektra-cli
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod error;

pub use buffer::{PixelBuffer, CHANNELS};
pub use error::{Error, Result};
