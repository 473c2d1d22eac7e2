//! Common utilities for the Wren renderer.
//!
//! This crate provides shared infrastructure used by all pipeline stages:
//! - **Warning System** - colored, deduplicated terminal output for input
//!   the pipeline recovers from (unknown colors, dropped CSS, bad sizes)

pub mod warning;
