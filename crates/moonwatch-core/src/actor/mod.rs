//! Actor implementations
//!
//! - `monitor`: owns the host list, drives poll rounds, gates notifications

pub mod monitor;
