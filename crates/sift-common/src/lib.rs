//! Common utilities for the sift selector engine.
//!
//! This crate provides shared infrastructure used by the tree and selector crates:
//! - **Warning System** - colored, deduplicated terminal diagnostics

pub mod warning;
