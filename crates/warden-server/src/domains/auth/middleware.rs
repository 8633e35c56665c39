use axum::body::Body;
use axum::http::{header, HeaderValue, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine;

use crate::app::AppState;
use crate::infra::metrics;

use super::service::{authenticate, AuthError};

const CHALLENGE: &str = "Basic realm=\"warden\"";

/// Requires HTTP Basic credentials of a stored user and attaches the
/// resulting [`super::Principal`] to the request.
pub async fn basic_auth_middleware(mut request: Request<Body>, next: Next) -> Response {
    let Some(state) = request.extensions().get::<AppState>().cloned() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    let Some((name, password)) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(decode_basic)
    else {
        metrics::auth_attempt("missing");
        return unauthorized();
    };

    match authenticate(&state.users, state.config.auth.kdf, &name, &password).await {
        Ok(principal) => {
            metrics::auth_attempt("ok");
            tracing::Span::current().record("user_id", principal.user_id);
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(AuthError::InvalidCredentials) => {
            metrics::auth_attempt("rejected");
            tracing::warn!(event = "auth_failed", user = %name, "Basic credentials rejected");
            unauthorized()
        }
        Err(err) => {
            metrics::auth_attempt("error");
            tracing::error!(event = "auth_error", error = %err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn unauthorized() -> Response {
    let mut response = StatusCode::UNAUTHORIZED.into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(CHALLENGE));
    response
}

/// Splits `Basic base64(name:password)` at the first colon.
fn decode_basic(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (name, password) = decoded.split_once(':')?;
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(raw: &str) -> String {
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(raw)
        )
    }

    #[test]
    fn decodes_name_and_password() {
        assert_eq!(
            decode_basic(&encode("admin:adminpass")),
            Some(("admin".to_string(), "adminpass".to_string()))
        );
    }

    #[test]
    fn password_may_contain_colons() {
        assert_eq!(
            decode_basic(&encode("admin:a:b")),
            Some(("admin".to_string(), "a:b".to_string()))
        );
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert_eq!(decode_basic("Bearer abc"), None);
        assert_eq!(decode_basic("Basic !!!"), None);
        assert_eq!(decode_basic(&encode("no-colon")), None);
        assert_eq!(decode_basic(&encode(":secret")), None);
    }
}
