/*
 * Responsibility
 * - Authorization header -> verified (scanner, bot) -> AuthorizationContext skeleton
 * - No registry or cache I/O here; a request rejected at this stage costs nothing downstream
 */
use axum::http::{HeaderMap, header};

use crate::services::auth::context::{AuthorizationContext, Scope};
use crate::services::auth::error::AuthError;
use crate::services::auth::keys::KEY_SEPARATOR;
use crate::services::auth::scanner_jwt::TokenVerifier;

/// Build the unresolved context for a request.
///
/// `scope` and `path_key` are the raw path parameters (either may be absent).
pub fn extract(
    verifier: &dyn TokenVerifier,
    headers: &HeaderMap,
    scope: Option<&str>,
    path_key: Option<&str>,
) -> Result<AuthorizationContext, AuthError> {
    let token = bearer_token(headers)?;

    let verified = verifier.verify(token).map_err(AuthError::InvalidToken)?;

    let bot_id = verified
        .bot_id
        .filter(|b| !b.trim().is_empty())
        .ok_or(AuthError::MissingIdentity)?;

    let scope = Scope::parse(scope);

    let path_key = path_key
        .filter(|k| !k.is_empty())
        .ok_or(AuthError::MissingKey)?;
    // `Path` has already percent-decoded the key; a separator here would let one
    // scope address another scope's namespace.
    if path_key.contains(KEY_SEPARATOR) {
        return Err(AuthError::InvalidKey);
    }

    Ok(AuthorizationContext::new(
        bot_id,
        verified.scanner,
        scope,
        path_key,
    ))
}

// Exactly one `Authorization: <scheme> <token>` header, scheme matched case-insensitively.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let mut values = headers.get_all(header::AUTHORIZATION).iter();
    let value = values.next().ok_or(AuthError::MissingCredential)?;
    if values.next().is_some() {
        return Err(AuthError::MalformedCredential);
    }

    let raw = value.to_str().map_err(|_| AuthError::MalformedCredential)?;

    let parts: Vec<&str> = raw.split(' ').collect();
    let [scheme, token] = parts.as_slice() else {
        return Err(AuthError::MalformedCredential);
    };
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::MalformedCredential);
    }

    Ok(*token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    use crate::services::testing::FakeVerifier;

    const BOT: &str = "0xdeadbeefdeadbeefdeadbeefdeadbeefdeadbeefc0e4493c993e060e89c09ed1";
    const SCANNER: &str = "0xdeadbeefdeadbeefdeadbeefdeadbeefdeadbeef";

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn extracts_context_with_default_scope() {
        let verifier = FakeVerifier::valid(SCANNER, BOT);
        let ctx = extract(&verifier, &headers("Bearer tok"), None, Some("secrets.json"))
            .expect("context");

        assert_eq!(ctx.bot_id, BOT);
        assert_eq!(ctx.scanner, SCANNER);
        assert_eq!(ctx.scope, Scope::Scanner);
        assert_eq!(ctx.path_key, "secrets.json");
        assert!(ctx.owner.is_none());
        assert_eq!(verifier.seen_tokens(), vec!["tok".to_string()]);
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let verifier = FakeVerifier::valid(SCANNER, BOT);
        let ctx = extract(&verifier, &headers("bearer test"), Some("bot"), Some("k"))
            .expect("context");
        assert_eq!(ctx.scope, Scope::Bot);
    }

    #[test]
    fn missing_header_is_rejected_before_verification() {
        let verifier = FakeVerifier::valid(SCANNER, BOT);
        let err = extract(&verifier, &HeaderMap::new(), None, Some("k")).unwrap_err();

        assert!(matches!(err, AuthError::MissingCredential));
        assert!(verifier.seen_tokens().is_empty());
    }

    #[test]
    fn malformed_headers_are_rejected() {
        let verifier = FakeVerifier::valid(SCANNER, BOT);
        for value in ["Bearer", "Bearer a b", "Basic abc", "Bearer ", "tok"] {
            let err = extract(&verifier, &headers(value), None, Some("k")).unwrap_err();
            assert!(
                matches!(err, AuthError::MalformedCredential),
                "{value:?} gave {err:?}"
            );
        }
        assert!(verifier.seen_tokens().is_empty());
    }

    #[test]
    fn repeated_header_is_rejected() {
        let verifier = FakeVerifier::valid(SCANNER, BOT);
        let mut h = headers("Bearer one");
        h.append(header::AUTHORIZATION, HeaderValue::from_static("Bearer two"));

        let err = extract(&verifier, &h, None, Some("k")).unwrap_err();
        assert!(matches!(err, AuthError::MalformedCredential));
    }

    #[test]
    fn verifier_failure_is_invalid_token() {
        let verifier = FakeVerifier::failing();
        let err = extract(&verifier, &headers("Bearer tok"), None, Some("k")).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn token_without_bot_id_is_missing_identity() {
        let verifier = FakeVerifier::without_bot(SCANNER);
        let err = extract(&verifier, &headers("Bearer tok"), None, Some("k")).unwrap_err();
        assert!(matches!(err, AuthError::MissingIdentity));
    }

    #[test]
    fn empty_or_absent_key_is_missing_key() {
        let verifier = FakeVerifier::valid(SCANNER, BOT);
        for key in [None, Some("")] {
            let err = extract(&verifier, &headers("Bearer tok"), None, key).unwrap_err();
            assert!(matches!(err, AuthError::MissingKey));
        }
    }

    #[test]
    fn key_with_separator_is_rejected() {
        let verifier = FakeVerifier::valid(SCANNER, BOT);
        for key in [format!("{SCANNER}/secrets.json"), "/".to_string(), "a/".to_string()] {
            let err = extract(&verifier, &headers("Bearer tok"), Some("bot"), Some(key.as_str()))
                .unwrap_err();
            assert!(matches!(err, AuthError::InvalidKey), "{key:?} gave {err:?}");
            assert!(err.is_denial());
        }
    }

    #[test]
    fn unknown_scope_passes_extraction() {
        let verifier = FakeVerifier::valid(SCANNER, BOT);
        let ctx = extract(&verifier, &headers("Bearer tok"), Some("global"), Some("k"))
            .expect("context");
        assert_eq!(ctx.scope, Scope::Other("global".into()));
    }
}
