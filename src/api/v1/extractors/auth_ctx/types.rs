/*
 * Responsibility
 * - The "authenticated context" type handlers see
 * - The guard validates the token and stores this in request extensions;
 *   handlers only ever receive this type
 */
use crate::services::auth::Claims;

/// Context attached to an authenticated request.
///
/// - `subject` is the validated, non-empty subject (`sub` or legacy `user_id`)
/// - `claims` is the decoded payload, unmodified
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub subject: String,
    pub claims: Claims,
}

impl AuthCtx {
    /// `None` when the claims carry no subject.
    pub fn from_claims(claims: Claims) -> Option<Self> {
        let subject = claims.subject()?.to_string();
        Some(Self { subject, claims })
    }

    pub fn handle(&self) -> Option<&str> {
        self.claims.handle.as_deref()
    }
}
