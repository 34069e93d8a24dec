//! # larder
//!
//! The Larder application: cache synchronization, HTTP API and CLI over the
//! `larder-core` engine.

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod messages;
pub mod sync;
