use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use peoplehub_application::ClientContext;

use super::SESSION_TOKEN_HEADER;

pub(crate) fn extract_request_context(headers: &HeaderMap) -> ClientContext {
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned);

    let user_agent = headers
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned);

    ClientContext {
        ip_address,
        user_agent,
    }
}

/// Reads the raw session token from `Authorization: Bearer` or `X-Session-Token`.
pub(crate) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            let (scheme, token) = value.trim().split_once(' ')?;
            scheme.eq_ignore_ascii_case("bearer").then_some(token)
        });

    bearer
        .or_else(|| {
            headers
                .get(SESSION_TOKEN_HEADER)
                .and_then(|value| value.to_str().ok())
        })
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue};
    use proptest::prelude::*;

    use super::{extract_request_context, extract_session_token};

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(*name, HeaderValue::from_static(value));
        }
        headers
    }

    #[test]
    fn bearer_token_is_preferred() {
        let headers = headers(&[
            ("authorization", "Bearer abc123"),
            ("x-session-token", "other"),
        ]);
        assert_eq!(extract_session_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn session_header_is_fallback() {
        let headers = headers(&[("x-session-token", "  tok  ")]);
        assert_eq!(extract_session_token(&headers).as_deref(), Some("tok"));
    }

    #[test]
    fn other_schemes_and_blank_values_are_ignored() {
        assert_eq!(
            extract_session_token(&headers(&[("authorization", "Basic dXNlcjpwdw==")])),
            None
        );
        assert_eq!(extract_session_token(&headers(&[("x-session-token", "  ")])), None);
        assert_eq!(extract_session_token(&HeaderMap::new()), None);
    }

    #[test]
    fn request_context_uses_first_forwarded_address() {
        let context = extract_request_context(&headers(&[
            ("x-forwarded-for", "203.0.113.7, 10.0.0.1"),
            ("user-agent", "curl/8.0"),
        ]));
        assert_eq!(context.ip_address.as_deref(), Some("203.0.113.7"));
        assert_eq!(context.user_agent.as_deref(), Some("curl/8.0"));
    }

    proptest! {
        #[test]
        fn hex_tokens_survive_either_transport(
            token in "[0-9a-f]{64}",
            scheme in prop::sample::select(vec!["Bearer", "bearer", "BEARER"]),
        ) {
            let mut bearer = HeaderMap::new();
            let value = HeaderValue::from_str(&format!("{scheme} {token}"))
                .unwrap_or_else(|_| unreachable!());
            bearer.insert("authorization", value);
            prop_assert_eq!(extract_session_token(&bearer), Some(token.clone()));

            let mut custom = HeaderMap::new();
            let value = HeaderValue::from_str(&token).unwrap_or_else(|_| unreachable!());
            custom.insert("x-session-token", value);
            prop_assert_eq!(extract_session_token(&custom), Some(token));
        }
    }
}
