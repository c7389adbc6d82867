//! Helpers for axum JSON APIs: JWT request authentication, a response
//! envelope with typed API errors, an application factory and string helpers.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod response;
pub mod services;
pub mod state;
pub mod text;
