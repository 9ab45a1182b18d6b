//! # spektra-color
//!
//! Color-model conversion used by the Spektra adjustment engine.
//!
//! The engine works on 8-bit display-referred RGB. It needs HSL for two
//! things: a lightness value that gates the tone regions, and a saturation
//! channel that can be rescaled and converted back. Everything here is a
//! pure function on the 0..=255 channel scale.
//!
//! # Quick Start
//!
//! ```rust
//! use spektra_color::{hsl_to_rgb, rgb_to_hsl};
//!
//! let hsl = rgb_to_hsl(200.0, 150.0, 100.0);
//! let [r, g, b] = hsl_to_rgb(hsl.h, hsl.s, hsl.l);
//! assert!((r - 200.0).abs() < 1e-3);
//! assert!((g - 150.0).abs() < 1e-3);
//! assert!((b - 100.0).abs() < 1e-3);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod hsl;

pub use hsl::{hsl_to_rgb, hue_to_rgb, lightness, rgb_to_hsl, Hsl};
