//! Who is calling.
//!
//! `AuthCtx` is written by the route guard; handlers read it with
//! `AuthCtxExtractor` (guarded routes) or ask for `MaybeSubject`
//! (public routes that personalize).

mod core;
mod types;

pub use self::core::{AuthCtxExtractor, MaybeSubject};
pub use self::types::AuthCtx;
