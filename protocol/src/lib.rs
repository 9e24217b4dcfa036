//! Wire types for the Shortly REST API
//!
//! DTOs are organized by direction and domain:
//! - `api`: request/response bodies, one module per endpoint group
//! - `common`: entities shared across endpoints
//!
//! Everything serializes camelCase to match the backend's JSON surface.

pub mod api;
pub mod common;

pub use api::*;
pub use common::*;
