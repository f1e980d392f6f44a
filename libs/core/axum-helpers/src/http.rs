//! HTTP-level middleware and header helpers.

use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Add a conservative set of security headers to every response.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    response
}

/// The authenticated user forwarded by the gateway in `x-user-id`,
/// when present and well-formed.
pub fn extract_user_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_user_id() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_user_id(&headers), None);

        headers.insert("x-user-id", "not-a-uuid".parse().unwrap());
        assert_eq!(extract_user_id(&headers), None);

        let id = Uuid::now_v7();
        headers.insert("x-user-id", id.to_string().parse().unwrap());
        assert_eq!(extract_user_id(&headers), Some(id));
    }
}
