/*
 * Responsibility
 * - Public interface of the middleware (re-exports)
 */
pub mod allowed_hosts;
pub mod auth;
pub mod cors;
pub mod http;
