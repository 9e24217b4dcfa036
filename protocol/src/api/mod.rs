//! API DTOs module
//!
//! Request and response bodies organized by endpoint group:
//! - `auth`: session lifecycle (login, register, refresh, recovery)
//! - `url`: short link management
//! - `folder`: folder management
//! - `domain`: custom domain management

pub mod auth;
pub mod domain;
pub mod folder;
pub mod url;

pub use auth::*;
pub use domain::*;
pub use folder::*;
pub use url::*;
