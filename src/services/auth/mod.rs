pub mod claims;
pub mod config;
pub mod issuer;
pub mod validator;

pub use claims::Claims;
pub use config::{AuthConfig, MissingSecret, TokenKey};
pub use issuer::{IssueError, IssueOptions, IssuedToken, JwtIssuer, issue};
pub use validator::{AuthError, Rejection, current_subject, validate, validate_at};
