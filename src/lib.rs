//! Client SDK for the Shortly URL shortening platform
//!
//! The pieces fit together like the web app they mirror:
//! - [`client::ApiClient`] performs authenticated calls, unwraps the response
//!   envelope and renews the session transparently on a 401
//! - [`guard`] decides per navigation whether a route may render, for hosts
//!   that embed the SDK behind a UI
//! - [`store`] holds the access/refresh pair the way the browser holds its
//!   two cookies, behind a trait so hosts choose the persistence
//! - the service modules ([`links`], [`folders`], [`domains`], [`analytics`],
//!   [`users`], [`auth`]) wrap the REST surface with typed operations
//!
//! The `shortly` binary in this crate is one such host.

pub mod analytics;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod domains;
pub mod error;
pub mod folders;
pub mod guard;
pub mod links;
pub mod store;
pub mod ui;
pub mod users;
pub mod version;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{Result, ShortlyError};
