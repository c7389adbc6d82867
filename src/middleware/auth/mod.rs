pub mod access;
pub mod token;

pub use access::{OnFailure, RedirectTarget, RequireAuth};
