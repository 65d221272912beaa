//! moonwatch-api: Shared API types and schemas
//!
//! Contains request/response types, event types, and OpenAPI schema definitions
//! used across the daemon and any external clients.

pub mod events;
pub mod requests;
pub mod responses;
