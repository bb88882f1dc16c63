use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, state::AppState, types::UserId};

/// Identity of the caller, inserted by [`auth`] for downstream handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
}

/// Requires a valid access token in the `Authorization: Bearer` header.
/// Access tokens are short-lived and checked offline; no store lookup.
pub async fn auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

    let claims = state.tokens.verify_access(token)?;
    let user_id = claims.user_id()?;

    request.extensions_mut().insert(AuthUser { user_id });
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_bearer_token)
        .filter(|token| !token.is_empty())
}

fn parse_bearer_token(header: &str) -> Option<&str> {
    let (scheme, rest) = header.trim().split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| rest.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bearer_scheme_case_insensitively() {
        assert_eq!(parse_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(parse_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(parse_bearer_token("BEARER   abc "), Some("abc"));
    }

    #[test]
    fn rejects_other_schemes() {
        assert_eq!(parse_bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(parse_bearer_token("Bearer"), None);
    }

    #[test]
    fn empty_token_is_treated_as_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer ".parse().expect("header"));
        assert_eq!(bearer_token(&headers), None);
    }
}
