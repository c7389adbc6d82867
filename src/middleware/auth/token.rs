//! Locate the token in a request: configured header first, then cookie.

use axum::http::{HeaderMap, header};

use crate::services::auth::{AuthConfig, AuthError, Claims, MissingSecret, TokenKey, validator};

/// Token carried by the request, if any.
///
/// The header may hold `Bearer <token>` or the bare token. An empty header
/// value falls through to the cookie.
pub fn extract_token<'a>(headers: &'a HeaderMap, key: &TokenKey) -> Option<&'a str> {
    from_header(headers, key).or_else(|| from_cookie(headers, &key.cookie))
}

fn from_header<'a>(headers: &'a HeaderMap, key: &TokenKey) -> Option<&'a str> {
    let value = headers.get(&key.header)?.to_str().ok()?.trim();
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        Some(_) => return None,
        None if value.eq_ignore_ascii_case("bearer") => return None,
        None => value,
    };
    (!token.is_empty()).then_some(token)
}

fn from_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim().trim_matches('"'))
        .filter(|v| !v.is_empty())
}

/// Locate and validate the request's token.
pub fn validate_request(headers: &HeaderMap, config: &AuthConfig) -> Result<Claims, AuthError> {
    validator::validate(extract_token(headers, &config.token_key), config)
}

/// Soft variant of `validate_request`.
pub fn current_subject(
    headers: &HeaderMap,
    config: &AuthConfig,
) -> Result<Option<String>, MissingSecret> {
    validator::current_subject(extract_token(headers, &config.token_key), config)
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderName, HeaderValue};

    use super::*;

    fn headers(pairs: &[(HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn bearer_header() {
        let h = headers(&[(header::AUTHORIZATION, "Bearer abc.def.ghi")]);
        assert_eq!(extract_token(&h, &TokenKey::default()), Some("abc.def.ghi"));

        let h = headers(&[(header::AUTHORIZATION, "bearer   abc")]);
        assert_eq!(extract_token(&h, &TokenKey::default()), Some("abc"));
    }

    #[test]
    fn raw_header_value() {
        let h = headers(&[(header::AUTHORIZATION, "abc.def.ghi")]);
        assert_eq!(extract_token(&h, &TokenKey::default()), Some("abc.def.ghi"));
    }

    #[test]
    fn other_schemes_are_not_tokens() {
        let h = headers(&[(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")]);
        assert_eq!(extract_token(&h, &TokenKey::default()), None);
    }

    #[test]
    fn falls_back_to_cookie() {
        let h = headers(&[(header::COOKIE, "theme=dark; jwt=abc.def.ghi; other=1")]);
        assert_eq!(extract_token(&h, &TokenKey::default()), Some("abc.def.ghi"));

        let h = headers(&[
            (header::AUTHORIZATION, "Bearer "),
            (header::COOKIE, "a=1"),
            (header::COOKIE, "jwt=\"quoted\""),
        ]);
        assert_eq!(extract_token(&h, &TokenKey::default()), Some("quoted"));
    }

    #[test]
    fn header_wins_over_cookie() {
        let h = headers(&[
            (header::AUTHORIZATION, "Bearer from-header"),
            (header::COOKIE, "jwt=from-cookie"),
        ]);
        assert_eq!(extract_token(&h, &TokenKey::default()), Some("from-header"));
    }

    #[test]
    fn configurable_key_names() {
        let key = TokenKey {
            header: HeaderName::from_static("x-auth-token"),
            cookie: "session".to_string(),
        };
        let h = headers(&[
            (header::AUTHORIZATION, "Bearer ignored"),
            (header::COOKIE, "jwt=ignored; session=mine"),
        ]);
        assert_eq!(extract_token(&h, &key), Some("mine"));

        let h = headers(&[(HeaderName::from_static("x-auth-token"), "direct")]);
        assert_eq!(extract_token(&h, &key), Some("direct"));
    }

    #[test]
    fn absent_everywhere() {
        let h = headers(&[(header::COOKIE, "jwt=; theme=dark")]);
        assert_eq!(extract_token(&h, &TokenKey::default()), None);
        assert_eq!(extract_token(&HeaderMap::new(), &TokenKey::default()), None);
    }
}
