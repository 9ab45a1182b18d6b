//! # spektra-ops
//!
//! The Spektra photo-adjustment engine.
//!
//! Given a source [`PixelBuffer`](spektra_core::PixelBuffer) and an
//! [`Adjustments`] vector, the engine produces an adjusted buffer of the
//! same size in two ordered stages:
//!
//! 1. [`tone`] - per-pixel exposure, contrast, tone regions, white
//!    balance and saturation
//! 2. [`detail`] - neighborhood-based clarity, dehaze and texture
//!
//! # Modules
//!
//! - [`adjust`] - The twelve-field adjustment vector and YAML presets
//! - [`engine`] - Pipeline driver and neighbor sampling modes
//! - [`resize`] - Preview sizing and resampling
//! - [`schedule`] - Latest-wins render bookkeeping for interactive callers
//!
//! # Example
//!
//! ```rust
//! use spektra_core::PixelBuffer;
//! use spektra_ops::{process, Adjustments, Field};
//!
//! let src = PixelBuffer::filled(32, 32, [200, 150, 100, 255]);
//! let adj = Adjustments::identity()
//!     .with(Field::Saturation, 50.0)
//!     .with(Field::Clarity, 20.0);
//!
//! let out = process(&src, &adj).unwrap();
//! assert_eq!(out.dimensions(), (32, 32));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod adjust;
pub mod detail;
pub mod engine;
pub mod resize;
pub mod schedule;
pub mod tone;

pub use adjust::{Adjustments, Field};
pub use engine::{process, Engine, NeighborSampling};
pub use error::{OpsError, OpsResult};
pub use resize::Filter;
pub use schedule::{Completion, RenderScheduler, RenderState};
