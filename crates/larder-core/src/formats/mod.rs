//! # Formats Module
//!
//! Snapshot encoding. File and network I/O live in the app layer.

mod persistence;

pub use persistence::*;
