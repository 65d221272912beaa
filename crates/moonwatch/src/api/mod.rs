//! API route handlers

pub mod error;
pub mod hosts;
pub mod system;
