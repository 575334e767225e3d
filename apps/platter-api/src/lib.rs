//! # Platter API
//!
//! HTTP adapter over [`platter_engine`]. Handlers verify the caller, call
//! one engine operation and translate its result into JSON.
//!
//! ## Module Organization
//!
//! - [`config`] - Environment configuration
//! - [`auth`] - Bearer token verification, [`auth::AuthUser`] extractor
//! - [`error`] - [`error::ApiError`] and the JSON error envelope
//! - [`routes`] - Route handlers and the router

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use platter_engine::Platter;

use crate::auth::TokenVerifier;

/// Shared application state.
pub struct AppState {
    pub platter: Platter,
    pub verifier: TokenVerifier,
}

impl AppState {
    pub fn new(platter: Platter, verifier: TokenVerifier) -> Self {
        AppState { platter, verifier }
    }
}

pub use routes::router;
