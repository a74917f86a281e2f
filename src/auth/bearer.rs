/// Bearer token extraction from the `Authorization` header.

use actix_web::http::header::{HeaderMap, AUTHORIZATION};

use crate::error::{AppError, AuthError};

/// Pull the credential out of an `Authorization: Bearer <token>` header
///
/// The header value must split on spaces into exactly two parts, the first
/// being `bearer` in any case. The second part is returned verbatim.
///
/// # Errors
/// - `MissingHeader` if there is no (or an empty) `Authorization` header
/// - `MalformedHeader` for any other shape
pub fn get_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let value = match headers.get(AUTHORIZATION) {
        None => return Err(AppError::Auth(AuthError::MissingHeader)),
        Some(value) if value.is_empty() => return Err(AppError::Auth(AuthError::MissingHeader)),
        Some(value) => value
            .to_str()
            .map_err(|_| AppError::Auth(AuthError::MalformedHeader))?,
    };

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") => Ok(token.to_string()),
        _ => Err(AppError::Auth(AuthError::MalformedHeader)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderValue, CONTENT_TYPE};

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_valid_bearer_token() {
        let token = get_bearer_token(&headers_with("Bearer abcdef123456")).unwrap();
        assert_eq!(token, "abcdef123456");
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let token = get_bearer_token(&headers_with("bEaReR abcdef123456")).unwrap();
        assert_eq!(token, "abcdef123456");
    }

    #[test]
    fn test_missing_header() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let result = get_bearer_token(&headers);
        assert!(matches!(result, Err(AppError::Auth(AuthError::MissingHeader))));
    }

    #[test]
    fn test_empty_header() {
        let result = get_bearer_token(&headers_with(""));
        assert!(matches!(result, Err(AppError::Auth(AuthError::MissingHeader))));
    }

    #[test]
    fn test_extra_segment() {
        let result = get_bearer_token(&headers_with("Bearer abcdef123456 extra"));
        assert!(matches!(result, Err(AppError::Auth(AuthError::MalformedHeader))));
    }

    #[test]
    fn test_wrong_scheme() {
        let result = get_bearer_token(&headers_with("Dearer abcdef123456"));
        assert!(matches!(result, Err(AppError::Auth(AuthError::MalformedHeader))));
    }

    #[test]
    fn test_scheme_only() {
        let result = get_bearer_token(&headers_with("Bearer"));
        assert!(matches!(result, Err(AppError::Auth(AuthError::MalformedHeader))));
    }
}
