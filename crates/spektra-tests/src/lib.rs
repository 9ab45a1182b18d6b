//! Integration tests for Spektra crates.
//!
//! End-to-end checks across decoding, the engine, resizing, presets and
//! render scheduling.
