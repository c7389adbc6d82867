/*
 * Responsibility
 * - Browser-facing pages (outside /api)
 * - Guarded with the redirect policy: unauthenticated browsers go to
 *   LOGIN_URL?next=<original path>
 */
use axum::{Router, body::Body, extract::OriginalUri, http::Request, routing::get};

use crate::api::v1::extractors::AuthCtxExtractor;
use crate::config::Config;
use crate::middleware::auth::{RequireAuth, access};
use crate::state::AppState;

pub fn routes(state: &AppState, config: &Config) -> Router<AppState> {
    let login_url = config.login_url.clone();
    let guard = RequireAuth::redirect_with(state.auth.clone(), move |req| {
        login_redirect(&login_url, req)
    });

    access::apply(Router::new().route("/account", get(account)), guard)
}

async fn account(AuthCtxExtractor(ctx): AuthCtxExtractor) -> String {
    match ctx.handle() {
        Some(handle) => format!("account: {} ({handle})", ctx.subject),
        None => format!("account: {}", ctx.subject),
    }
}

/// `login_url` with the requested path (and query) as `next`.
///
/// Under `Router::nest` the request URI has the prefix stripped; the
/// `OriginalUri` extension keeps the full path.
pub fn login_redirect(login_url: &str, req: &Request<Body>) -> String {
    let uri = match req.extensions().get::<OriginalUri>() {
        Some(OriginalUri(uri)) => uri,
        None => req.uri(),
    };
    let next = uri
        .path_and_query()
        .map_or("/", |pq| pq.as_str());
    let next: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
    let sep = if login_url.contains('?') { '&' } else { '?' };
    format!("{login_url}{sep}next={next}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[test]
    fn next_carries_path_and_query() {
        assert_eq!(
            login_redirect("/login", &request("/account?tab=billing")),
            "/login?next=%2Faccount%3Ftab%3Dbilling"
        );
    }

    #[test]
    fn nested_routes_keep_their_prefix() {
        let mut req = request("/account?tab=billing");
        req.extensions_mut()
            .insert(OriginalUri("/portal/account?tab=billing".parse().unwrap()));
        assert_eq!(
            login_redirect("/login", &req),
            "/login?next=%2Fportal%2Faccount%3Ftab%3Dbilling"
        );
    }

    #[test]
    fn existing_query_is_extended() {
        assert_eq!(
            login_redirect("https://id.example/login?app=web", &request("/account")),
            "https://id.example/login?app=web&next=%2Faccount"
        );
    }
}
